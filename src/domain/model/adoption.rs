use crate::domain::error::ShelterError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Storage format of `Adoption_Date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, ShelterError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| ShelterError::validation(format!("Invalid adoption date '{}': {}", raw, e)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adoption {
    pub adoption_id: i64,
    pub pet_id: i64,
    pub adopter_id: i64,
    pub adoption_date: NaiveDate,
}

impl Adoption {
    pub const SELECT: &'static str =
        "SELECT Adoption_ID, Pet_ID, Adopter_ID, Adoption_Date FROM Adoption";

    pub fn from_row(row: &SqliteRow) -> Result<Self, ShelterError> {
        let date: String = row.try_get("Adoption_Date")?;
        Ok(Self {
            adoption_id: row.try_get("Adoption_ID")?,
            pet_id: row.try_get("Pet_ID")?,
            adopter_id: row.try_get("Adopter_ID")?,
            adoption_date: parse_date(&date)?,
        })
    }
}

/// One row of the `AdoptedPets` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptedPetRow {
    pub pet_name: String,
    pub breed: String,
    pub adopter_name: String,
    pub city: String,
    pub adoption_date: NaiveDate,
}

impl AdoptedPetRow {
    pub const COLUMNS: [&'static str; 5] =
        ["Pet_Name", "Breed", "Adopter_Name", "City", "Adoption_Date"];

    pub const SELECT: &'static str =
        "SELECT Pet_Name, Breed, Adopter_Name, City, Adoption_Date FROM AdoptedPets";

    pub fn from_row(row: &SqliteRow) -> Result<Self, ShelterError> {
        let date: String = row.try_get("Adoption_Date")?;
        Ok(Self {
            pet_name: row.try_get::<Option<String>, _>("Pet_Name")?.unwrap_or_default(),
            breed: row.try_get::<Option<String>, _>("Breed")?.unwrap_or_default(),
            adopter_name: row.try_get::<Option<String>, _>("Adopter_Name")?.unwrap_or_default(),
            city: row.try_get::<Option<String>, _>("City")?.unwrap_or_default(),
            adoption_date: parse_date(&date)?,
        })
    }
}

use crate::domain::error::ShelterError;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// Adoption status. Moves from `Available` to `Adopted` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PetStatus {
    Available,
    Adopted,
}

impl PetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Available => "Available",
            PetStatus::Adopted => "Adopted",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetStatus {
    type Err = ShelterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(PetStatus::Available),
            "Adopted" => Ok(PetStatus::Adopted),
            other => Err(ShelterError::validation(format!(
                "Unknown pet status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub pet_id: i64,
    pub name: String,
    pub breed: String,
    pub age: u32,
    pub gender: String,
    pub status: PetStatus,
}

impl Pet {
    /// Column list matching [`Pet::from_row`].
    pub const COLUMNS: [&'static str; 6] = ["Pet_ID", "Pet_Name", "Breed", "Age", "Gender", "Status"];

    pub const SELECT: &'static str =
        "SELECT Pet_ID, Pet_Name, Breed, Age, Gender, Status FROM Pets";

    pub fn from_row(row: &SqliteRow) -> Result<Self, ShelterError> {
        let status: String = row.try_get("Status")?;
        let age: i64 = row.try_get("Age")?;
        Ok(Self {
            pet_id: row.try_get("Pet_ID")?,
            name: row.try_get::<Option<String>, _>("Pet_Name")?.unwrap_or_default(),
            breed: row.try_get::<Option<String>, _>("Breed")?.unwrap_or_default(),
            age: u32::try_from(age)
                .map_err(|_| ShelterError::validation(format!("Stored age {} is negative", age)))?,
            gender: row.try_get::<Option<String>, _>("Gender")?.unwrap_or_default(),
            status: status.parse()?,
        })
    }

    pub fn is_available(&self) -> bool {
        self.status == PetStatus::Available
    }
}

/// Insert payload: the shelter assigns the id and the initial status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub breed: String,
    pub age: u32,
    pub gender: String,
}

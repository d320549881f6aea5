use crate::domain::error::ShelterError;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adopter {
    pub adopter_id: i64,
    pub name: String,
    pub phone: String,
    pub city: String,
}

impl Adopter {
    pub const COLUMNS: [&'static str; 4] = ["Adopter_ID", "Adopter_Name", "Phone", "City"];

    pub const SELECT: &'static str = "SELECT Adopter_ID, Adopter_Name, Phone, City FROM Adopters";

    pub fn from_row(row: &SqliteRow) -> Result<Self, ShelterError> {
        Ok(Self {
            adopter_id: row.try_get("Adopter_ID")?,
            name: row.try_get::<Option<String>, _>("Adopter_Name")?.unwrap_or_default(),
            phone: row.try_get::<Option<String>, _>("Phone")?.unwrap_or_default(),
            city: row.try_get::<Option<String>, _>("City")?.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdopter {
    pub name: String,
    pub phone: String,
    pub city: String,
}

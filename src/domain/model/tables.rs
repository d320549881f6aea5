use super::TableModel;

/// `Pets`: one row per animal; `Status` starts as `Available`.
pub struct PetTable;

impl TableModel for PetTable {
    fn table_name(&self) -> &str {
        "Pets"
    }

    fn primary_key_field(&self) -> &str {
        "Pet_ID"
    }

    fn create_table_sql(&self) -> &str {
        "CREATE TABLE IF NOT EXISTS Pets (
            Pet_ID INTEGER PRIMARY KEY AUTOINCREMENT,
            Pet_Name VARCHAR(50),
            Breed VARCHAR(50),
            Age INT,
            Gender VARCHAR(10),
            Status VARCHAR(20) DEFAULT 'Available'
        )"
    }
}

/// `Adopters`: people who may adopt. Never updated or deleted.
pub struct AdopterTable;

impl TableModel for AdopterTable {
    fn table_name(&self) -> &str {
        "Adopters"
    }

    fn primary_key_field(&self) -> &str {
        "Adopter_ID"
    }

    fn create_table_sql(&self) -> &str {
        "CREATE TABLE IF NOT EXISTS Adopters (
            Adopter_ID INTEGER PRIMARY KEY AUTOINCREMENT,
            Adopter_Name VARCHAR(50),
            Phone VARCHAR(15),
            City VARCHAR(50)
        )"
    }
}

/// `Adoption`: links one pet to one adopter.
///
/// `Pet_ID` is UNIQUE: a pet can be adopted at most once.
pub struct AdoptionTable;

impl TableModel for AdoptionTable {
    fn table_name(&self) -> &str {
        "Adoption"
    }

    fn primary_key_field(&self) -> &str {
        "Adoption_ID"
    }

    fn create_table_sql(&self) -> &str {
        "CREATE TABLE IF NOT EXISTS Adoption (
            Adoption_ID INTEGER PRIMARY KEY AUTOINCREMENT,
            Pet_ID INT UNIQUE,
            Adopter_ID INT,
            Adoption_Date DATE,
            FOREIGN KEY (Pet_ID) REFERENCES Pets(Pet_ID),
            FOREIGN KEY (Adopter_ID) REFERENCES Adopters(Adopter_ID)
        )"
    }
}

/// Tables in creation order (referenced tables first).
pub const ALL_TABLES: &[&dyn TableModel] = &[&PetTable, &AdopterTable, &AdoptionTable];

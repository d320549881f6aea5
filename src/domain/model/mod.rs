//! Domain model definitions for the shelter's tables.

pub mod adopter;
pub mod adoption;
pub mod pet;
pub mod tables;

pub use adopter::{Adopter, NewAdopter};
pub use adoption::{AdoptedPetRow, Adoption};
pub use pet::{NewPet, Pet, PetStatus};
pub use tables::{AdopterTable, AdoptionTable, PetTable, ALL_TABLES};

/// Trait that defines the contract for a table the schema manager owns.
///
/// Each implementation provides the table name, its key column and its
/// CREATE statement.
pub trait TableModel: Send + Sync {
    /// Returns the name of the database table for this model.
    fn table_name(&self) -> &str;

    /// Returns the name of the primary key column.
    fn primary_key_field(&self) -> &str;

    /// Returns the SQL CREATE TABLE statement for this model.
    fn create_table_sql(&self) -> &str;

    /// DROP statement used by the destructive reset.
    fn drop_table_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.table_name())
    }
}

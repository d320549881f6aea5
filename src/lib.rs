pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::outcome::{Notice, NoticeLevel, Outcome, Table};
pub use app::shelter_service::ShelterService;
pub use domain::command::{Action, Command, FormField, FormInput};
pub use domain::error::ShelterError;
pub use domain::model::{AdoptedPetRow, Adopter, Adoption, NewAdopter, NewPet, Pet, PetStatus};
pub use storage::executor::{SqlParam, SqlValue, StatementExecutor};
pub use storage::schema::{SchemaManager, SchemaReport};

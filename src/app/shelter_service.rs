//! The shelter service: one handler per user-facing action.
//!
//! It owns the statement executor (the process's single database session)
//! and is the only place the adoption rules live:
//! 1.  A pet's status flips to `Adopted` inside the same transaction that
//!     records the adoption, never anywhere else.
//! 2.  The available count is a live `COUNT(*)`, recomputed on every call.
//! 3.  Deleting a pet removes its adoption rows first.

use crate::app::outcome::{Notice, Outcome, Table};
use crate::domain::command::{Action, Command, FormInput};
use crate::domain::error::{Result, ShelterError};
use crate::domain::model::{
    AdoptedPetRow, Adopter, AdopterTable, Adoption, AdoptionTable, NewAdopter, NewPet, Pet,
    PetStatus, PetTable, TableModel,
};
use crate::storage::executor::{SqlParam, StatementExecutor};
use crate::storage::schema::{SchemaManager, SchemaReport};
use chrono::{Local, NaiveDate};
use sqlx::{Row, Sqlite, Transaction};

/// A listing read, shared by the typed accessors and the table views so both
/// always run the same statement.
struct Listing {
    sql: String,
    params: Vec<SqlParam>,
}

impl Listing {
    fn all_pets() -> Self {
        Self {
            sql: format!("{} ORDER BY {}", Pet::SELECT, PetTable.primary_key_field()),
            params: Vec::new(),
        }
    }

    fn pets_named_like(fragment: &str) -> Self {
        Self {
            sql: format!(
                "{} WHERE Pet_Name LIKE ? ORDER BY {}",
                Pet::SELECT,
                PetTable.primary_key_field()
            ),
            params: vec![format!("%{}%", fragment).into()],
        }
    }

    fn all_adopters() -> Self {
        Self {
            sql: format!("{} ORDER BY {}", Adopter::SELECT, AdopterTable.primary_key_field()),
            params: Vec::new(),
        }
    }

    fn adopted_pets() -> Self {
        Self {
            sql: AdoptedPetRow::SELECT.to_string(),
            params: Vec::new(),
        }
    }
}

pub struct ShelterService {
    executor: StatementExecutor,
}

impl ShelterService {
    pub fn new(executor: StatementExecutor) -> Self {
        Self { executor }
    }

    /// Connects to `database_url` and sets up the schema.
    ///
    /// With `clear` the schema is dropped and recreated, losing existing data.
    pub async fn connect(database_url: &str, clear: bool) -> Result<(Self, SchemaReport)> {
        let executor = StatementExecutor::connect(database_url).await?;
        let report = SchemaManager::setup(&executor, clear).await;
        Ok((Self::new(executor), report))
    }

    pub fn executor(&self) -> &StatementExecutor {
        &self.executor
    }

    pub fn is_connected(&self) -> bool {
        self.executor.is_connected()
    }

    /// Closes the session.
    pub async fn close(&self) {
        self.executor.close().await;
    }

    // --- Pets ---

    /// Registers a pet as `Available` and returns its id.
    pub async fn add_pet(&self, pet: &NewPet) -> Result<i64> {
        let id = self
            .executor
            .insert(
                "INSERT INTO Pets (Pet_Name, Breed, Age, Gender) VALUES (?, ?, ?, ?)",
                &[
                    pet.name.as_str().into(),
                    pet.breed.as_str().into(),
                    pet.age.into(),
                    pet.gender.as_str().into(),
                ],
            )
            .await?;
        tracing::info!(pet_id = id, name = %pet.name, "pet added");
        Ok(id)
    }

    pub async fn list_pets(&self) -> Result<Vec<Pet>> {
        let listing = Listing::all_pets();
        self.executor
            .fetch(&listing.sql, &listing.params)
            .await?
            .iter()
            .map(Pet::from_row)
            .collect()
    }

    pub async fn find_pet(&self, pet_id: i64) -> Result<Option<Pet>> {
        let sql = format!("{} WHERE Pet_ID = ?", Pet::SELECT);
        let rows = self.executor.fetch(&sql, &[pet_id.into()]).await?;
        rows.first().map(Pet::from_row).transpose()
    }

    pub async fn update_pet_name(&self, pet_id: i64, new_name: &str) -> Result<()> {
        let affected = self
            .executor
            .mutate(
                "UPDATE Pets SET Pet_Name = ? WHERE Pet_ID = ?",
                &[new_name.into(), pet_id.into()],
            )
            .await?;
        if affected == 0 {
            return Err(ShelterError::PetNotFound(pet_id));
        }
        tracing::info!(pet_id, new_name, "pet renamed");
        Ok(())
    }

    /// Deletes a pet together with its adoption rows.
    pub async fn delete_pet(&self, pet_id: i64) -> Result<()> {
        let mut tx = self.executor.begin().await?;
        match delete_pet_in(&mut tx, pet_id).await {
            Ok(adoptions) => {
                tx.commit().await?;
                tracing::info!(pet_id, adoptions, "pet deleted");
                Ok(())
            }
            Err(e) => {
                StatementExecutor::rollback(tx).await;
                Err(e)
            }
        }
    }

    /// Pets whose name contains `fragment`.
    pub async fn search_pets(&self, fragment: &str) -> Result<Vec<Pet>> {
        if fragment.is_empty() {
            return Err(ShelterError::validation("Please enter a pet name."));
        }
        let listing = Listing::pets_named_like(fragment);
        self.executor
            .fetch(&listing.sql, &listing.params)
            .await?
            .iter()
            .map(Pet::from_row)
            .collect()
    }

    // --- Adopters ---

    pub async fn add_adopter(&self, adopter: &NewAdopter) -> Result<i64> {
        let id = self
            .executor
            .insert(
                "INSERT INTO Adopters (Adopter_Name, Phone, City) VALUES (?, ?, ?)",
                &[
                    adopter.name.as_str().into(),
                    adopter.phone.as_str().into(),
                    adopter.city.as_str().into(),
                ],
            )
            .await?;
        tracing::info!(adopter_id = id, name = %adopter.name, "adopter added");
        Ok(id)
    }

    pub async fn list_adopters(&self) -> Result<Vec<Adopter>> {
        let listing = Listing::all_adopters();
        self.executor
            .fetch(&listing.sql, &listing.params)
            .await?
            .iter()
            .map(Adopter::from_row)
            .collect()
    }

    // --- Adoption ---

    /// Records that `adopter_id` adopted `pet_id` today.
    pub async fn adopt_pet(&self, pet_id: i64, adopter_id: i64) -> Result<Adoption> {
        self.register_adoption(pet_id, adopter_id, Local::now().date_naive())
            .await
    }

    /// Adoption protocol, in one transaction:
    /// the pet must exist and be `Available`, the adopter must exist; the
    /// adoption row is inserted and the status flipped with a
    /// compare-and-swap. `Adoption.Pet_ID` is UNIQUE, so a second adoption
    /// of the same pet cannot commit even if both pass the status check.
    pub async fn register_adoption(
        &self,
        pet_id: i64,
        adopter_id: i64,
        date: NaiveDate,
    ) -> Result<Adoption> {
        let mut tx = self.executor.begin().await?;
        let adoption_id = match register_adoption_in(&mut tx, pet_id, adopter_id, date).await {
            Ok(id) => id,
            Err(e) => {
                StatementExecutor::rollback(tx).await;
                return Err(e);
            }
        };
        tx.commit().await?;
        tracing::info!(pet_id, adopter_id, adoption_id, "adoption registered");

        Ok(Adoption {
            adoption_id,
            pet_id,
            adopter_id,
            adoption_date: date,
        })
    }

    pub async fn list_adoptions(&self) -> Result<Vec<Adoption>> {
        let sql = format!("{} ORDER BY {}", Adoption::SELECT, AdoptionTable.primary_key_field());
        self.executor
            .fetch(&sql, &[])
            .await?
            .iter()
            .map(Adoption::from_row)
            .collect()
    }

    /// Rows of the `AdoptedPets` view.
    pub async fn adopted_report(&self) -> Result<Vec<AdoptedPetRow>> {
        let listing = Listing::adopted_pets();
        self.executor
            .fetch(&listing.sql, &listing.params)
            .await?
            .iter()
            .map(AdoptedPetRow::from_row)
            .collect()
    }

    /// Number of pets currently `Available`.
    pub async fn available_count(&self) -> Result<i64> {
        let rows = self
            .executor
            .fetch(
                "SELECT COUNT(*) AS available_count FROM Pets WHERE Status = ?",
                &[PetStatus::Available.as_str().into()],
            )
            .await?;
        match rows.first() {
            Some(row) => Ok(row.try_get("available_count")?),
            None => Ok(0),
        }
    }

    // --- Dispatch ---

    /// Parses and runs one action. Never fails: every error becomes an
    /// error notice.
    pub async fn handle(&self, action: Action, form: &FormInput) -> Outcome {
        let command = match Command::parse(action, form) {
            Ok(c) => c,
            Err(e) => return Notice::from_error(e.title(), &e).into(),
        };
        self.execute(command).await
    }

    pub async fn execute(&self, command: Command) -> Outcome {
        let action = command.action();
        match self.try_execute(command).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(action = action.key(), error = %e, "action failed");
                Notice::from_error(failure_title(action, &e), &e).into()
            }
        }
    }

    /// Runs a parsed command, keeping the typed error for callers that map it
    /// themselves (HTTP status codes).
    pub async fn try_execute(&self, command: Command) -> Result<Outcome> {
        let outcome = match command {
            Command::AddPet(pet) => {
                self.add_pet(&pet).await?;
                Notice::info("Success", "Pet added successfully!").into()
            }
            Command::ViewPets => self
                .table("All Pets", &Pet::COLUMNS, Listing::all_pets())
                .await?
                .into(),
            Command::UpdatePetName { pet_id, new_name } => {
                self.update_pet_name(pet_id, &new_name).await?;
                Notice::info(
                    "Success",
                    format!(
                        "Pet ID {} name updated to '{}' successfully!",
                        pet_id, new_name
                    ),
                )
                .into()
            }
            Command::DeletePet { pet_id } => {
                self.delete_pet(pet_id).await?;
                Notice::info("Success", format!("Pet ID {} deleted successfully!", pet_id)).into()
            }
            Command::SearchPets { fragment } => {
                let title = format!("Search Results for '{}'", fragment);
                let table = self
                    .table(&title, &Pet::COLUMNS, Listing::pets_named_like(&fragment))
                    .await?;
                if table.is_empty() {
                    Notice::info(
                        "No Results",
                        format!("No pets found with names matching '{}'.", fragment),
                    )
                    .into()
                } else {
                    table.into()
                }
            }
            Command::AddAdopter(adopter) => {
                self.add_adopter(&adopter).await?;
                Notice::info("Success", "Adopter added successfully!").into()
            }
            Command::ViewAdopters => self
                .table("All Adopters", &Adopter::COLUMNS, Listing::all_adopters())
                .await?
                .into(),
            Command::AdoptPet { pet_id, adopter_id } => {
                self.adopt_pet(pet_id, adopter_id).await?;
                Notice::info("Success", "Pet adopted successfully! Status updated.").into()
            }
            Command::AdoptedReport => self
                .table(
                    "Adopted Pets Report",
                    &AdoptedPetRow::COLUMNS,
                    Listing::adopted_pets(),
                )
                .await?
                .into(),
            Command::AvailableCount => {
                let count = self.available_count().await?;
                Notice::info("Available Pets", format!("Total Available Pets: {}", count)).into()
            }
            Command::Exit => {
                self.close().await;
                Outcome::Closed
            }
        };
        Ok(outcome)
    }

    async fn table(&self, title: &str, columns: &[&str], listing: Listing) -> Result<Table> {
        let rows = self
            .executor
            .fetch_values(&listing.sql, &listing.params)
            .await?;
        Ok(Table::new(title, columns, rows))
    }
}

/// Deletes the pet's adoption rows, then the pet. Returns the number of
/// adoption rows removed.
async fn delete_pet_in(tx: &mut Transaction<'_, Sqlite>, pet_id: i64) -> Result<u64> {
    let adoptions = StatementExecutor::execute_in(
        tx,
        "DELETE FROM Adoption WHERE Pet_ID = ?",
        &[pet_id.into()],
    )
    .await?
    .rows_affected();
    let pets = StatementExecutor::execute_in(tx, "DELETE FROM Pets WHERE Pet_ID = ?", &[pet_id.into()])
        .await?
        .rows_affected();
    if pets == 0 {
        return Err(ShelterError::PetNotFound(pet_id));
    }
    Ok(adoptions)
}

/// The adoption steps up to, not including, commit. Returns the new adoption id.
async fn register_adoption_in(
    tx: &mut Transaction<'_, Sqlite>,
    pet_id: i64,
    adopter_id: i64,
    date: NaiveDate,
) -> Result<i64> {
    let status: Option<String> = StatementExecutor::fetch_optional_in(
        tx,
        "SELECT Status FROM Pets WHERE Pet_ID = ?",
        &[pet_id.into()],
    )
    .await?
    .map(|row| row.try_get("Status"))
    .transpose()?;
    let status: PetStatus = match status {
        None => return Err(ShelterError::PetNotFound(pet_id)),
        Some(s) => s.parse()?,
    };
    if status == PetStatus::Adopted {
        return Err(ShelterError::AlreadyAdopted(pet_id));
    }

    let adopter = StatementExecutor::fetch_optional_in(
        tx,
        "SELECT 1 FROM Adopters WHERE Adopter_ID = ?",
        &[adopter_id.into()],
    )
    .await?;
    if adopter.is_none() {
        return Err(ShelterError::AdopterNotFound(adopter_id));
    }

    let inserted = StatementExecutor::execute_in(
        tx,
        "INSERT INTO Adoption (Pet_ID, Adopter_ID, Adoption_Date) VALUES (?, ?, ?)",
        &[pet_id.into(), adopter_id.into(), date.into()],
    )
    .await;
    let adoption_id = match inserted {
        Ok(done) => done.last_insert_rowid(),
        Err(e) if e.is_unique_violation() => return Err(ShelterError::AlreadyAdopted(pet_id)),
        Err(e) => return Err(e),
    };

    let flipped = StatementExecutor::execute_in(
        tx,
        "UPDATE Pets SET Status = ? WHERE Pet_ID = ? AND Status = ?",
        &[
            PetStatus::Adopted.as_str().into(),
            pet_id.into(),
            PetStatus::Available.as_str().into(),
        ],
    )
    .await?
    .rows_affected();
    if flipped != 1 {
        return Err(ShelterError::AlreadyAdopted(pet_id));
    }
    Ok(adoption_id)
}

/// Title of the failure notice for `action`.
pub fn failure_title(action: Action, err: &ShelterError) -> &'static str {
    let domain_failure = err.is_not_found() || matches!(err, ShelterError::AlreadyAdopted(_));
    match action {
        Action::UpdatePetName if domain_failure => "Update Failed",
        Action::DeletePet if domain_failure => "Delete Failed",
        Action::AdoptPet if domain_failure => "Adoption Failed",
        _ => err.title(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_titles_depend_on_action() {
        let missing = ShelterError::PetNotFound(1);
        assert_eq!(failure_title(Action::UpdatePetName, &missing), "Update Failed");
        assert_eq!(failure_title(Action::DeletePet, &missing), "Delete Failed");
        assert_eq!(failure_title(Action::AdoptPet, &missing), "Adoption Failed");
        assert_eq!(
            failure_title(Action::AdoptPet, &ShelterError::ConnectionUnavailable),
            "Connection Error"
        );
        assert_eq!(
            failure_title(Action::AddPet, &ShelterError::validation("x")),
            "Input Error"
        );
    }
}

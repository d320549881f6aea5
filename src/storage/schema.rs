//! Schema manager: creates (or recreates) the shelter's tables and report view.
//!
//! Every statement is guarded on its own. A failure is logged and recorded
//! in the [`SchemaReport`] and the remaining statements still run.

use crate::domain::model::{TableModel, ALL_TABLES};
use crate::storage::executor::StatementExecutor;

pub const ADOPTED_PETS_VIEW: &str = "AdoptedPets";

const DROP_VIEW_SQL: &str = "DROP VIEW IF EXISTS AdoptedPets";

const CREATE_VIEW_SQL: &str = "CREATE VIEW IF NOT EXISTS AdoptedPets AS
    SELECT p.Pet_Name, p.Breed, a.Adopter_Name, a.City, ad.Adoption_Date
    FROM Pets p
    JOIN Adoption ad ON p.Pet_ID = ad.Pet_ID
    JOIN Adopters a ON ad.Adopter_ID = a.Adopter_ID";

/// What a setup run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    /// Statements that succeeded.
    pub executed: usize,
    /// `(statement, error)` for each statement that failed.
    pub failures: Vec<(String, String)>,
}

impl SchemaReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct SchemaManager;

impl SchemaManager {
    /// Drops everything and recreates it. Existing data is lost.
    pub async fn reset(executor: &StatementExecutor) -> SchemaReport {
        let mut report = SchemaReport::default();

        // Dependents first: the view, then Adoption, then the tables it references.
        run(executor, DROP_VIEW_SQL, &mut report).await;
        for table in ALL_TABLES.iter().rev() {
            run(executor, &table.drop_table_sql(), &mut report).await;
        }

        Self::create_all(executor, &mut report).await;
        report
    }

    /// Creates whatever is missing and leaves existing rows alone.
    pub async fn ensure(executor: &StatementExecutor) -> SchemaReport {
        let mut report = SchemaReport::default();
        Self::create_all(executor, &mut report).await;
        report
    }

    /// `reset` when `clear` is set, `ensure` otherwise.
    pub async fn setup(executor: &StatementExecutor, clear: bool) -> SchemaReport {
        if clear {
            Self::reset(executor).await
        } else {
            Self::ensure(executor).await
        }
    }

    async fn create_all(executor: &StatementExecutor, report: &mut SchemaReport) {
        let before = report.failures.len();
        for table in ALL_TABLES {
            run(executor, table.create_table_sql(), report).await;
        }
        if report.failures.len() == before {
            tracing::info!("Tables created successfully!");
        }

        let before = report.failures.len();
        run(executor, CREATE_VIEW_SQL, report).await;
        if report.failures.len() == before {
            tracing::info!(view = ADOPTED_PETS_VIEW, "Views created successfully");
        }
    }
}

async fn run(executor: &StatementExecutor, sql: &str, report: &mut SchemaReport) {
    match executor.execute_ddl(sql).await {
        Ok(()) => report.executed += 1,
        Err(e) => {
            tracing::error!(error = %e, "schema statement failed");
            report.failures.push((first_line(sql), e.to_string()));
        }
    }
}

fn first_line(sql: &str) -> String {
    sql.lines().next().unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reset_is_repeatable() {
        let exec = StatementExecutor::connect("sqlite::memory:").await.unwrap();
        let first = SchemaManager::reset(&exec).await;
        assert!(first.is_clean(), "{:?}", first.failures);
        let second = SchemaManager::reset(&exec).await;
        assert!(second.is_clean(), "{:?}", second.failures);
        // 1 view drop + 3 table drops + 3 creates + 1 view create
        assert_eq!(second.executed, 8);
    }

    #[tokio::test]
    async fn failures_do_not_stop_later_statements() {
        let exec = StatementExecutor::connect("sqlite::memory:").await.unwrap();
        exec.close().await;
        let report = SchemaManager::ensure(&exec).await;
        assert_eq!(report.executed, 0);
        assert_eq!(report.failures.len(), 4);
        assert_eq!(report.failures[0].0, "CREATE TABLE IF NOT EXISTS Pets (");
    }
}

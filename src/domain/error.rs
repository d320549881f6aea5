//! Error type shared by the executor, the workflow handlers and the transports.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShelterError>;

#[derive(Error, Debug)]
pub enum ShelterError {
    /// The session was closed (or never opened); nothing reached the database.
    #[error("Database connection is not available.")]
    ConnectionUnavailable,

    /// Opening the session failed. Fatal at startup.
    #[error("Could not connect to the database: {0}")]
    Connect(#[source] sqlx::Error),

    /// Malformed SQL, constraint violation, type mismatch. Rolled back.
    #[error("SQL execution failed: {0}")]
    Statement(#[from] sqlx::Error),

    /// Input coercion failed before the database was touched.
    #[error("{0}")]
    Validation(String),

    #[error("Pet ID {0} not found.")]
    PetNotFound(i64),

    #[error("Adopter ID {0} not found.")]
    AdopterNotFound(i64),

    #[error("Pet ID {0} is already adopted.")]
    AlreadyAdopted(i64),
}

impl ShelterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Notification title for this error kind.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ConnectionUnavailable | Self::Connect(_) => "Connection Error",
            Self::Statement(_) => "Database Error",
            Self::Validation(_) => "Input Error",
            Self::PetNotFound(_) | Self::AdopterNotFound(_) => "Not Found",
            Self::AlreadyAdopted(_) => "Adoption Failed",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PetNotFound(_) | Self::AdopterNotFound(_))
    }

    /// True for UNIQUE constraint failures reported by the engine.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Statement(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_follow_error_kind() {
        assert_eq!(ShelterError::ConnectionUnavailable.title(), "Connection Error");
        assert_eq!(ShelterError::validation("x").title(), "Input Error");
        assert_eq!(ShelterError::AlreadyAdopted(3).title(), "Adoption Failed");
        assert_eq!(
            ShelterError::Statement(sqlx::Error::RowNotFound).title(),
            "Database Error"
        );
    }

    #[test]
    fn messages_name_the_identifier() {
        assert_eq!(ShelterError::PetNotFound(7).to_string(), "Pet ID 7 not found.");
        assert_eq!(
            ShelterError::AlreadyAdopted(7).to_string(),
            "Pet ID 7 is already adopted."
        );
        assert!(ShelterError::AdopterNotFound(2).is_not_found());
    }
}

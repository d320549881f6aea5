//! Presentation-neutral results of an action.

use crate::domain::error::ShelterError;
use crate::storage::executor::SqlValue;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message box: title plus message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn from_error(title: &str, err: &ShelterError) -> Self {
        Self::error(title, err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Tabular data with column headers, rows in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl Table {
    pub fn new(title: impl Into<String>, columns: &[&str], rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            title: title.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Notice(Notice),
    Table(Table),
    /// The session was closed (Exit).
    Closed,
}

impl Outcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Notice(n) if n.is_error())
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Outcome::Notice(n) => Some(n),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&Table> {
        match self {
            Outcome::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Notice> for Outcome {
    fn from(n: Notice) -> Self {
        Outcome::Notice(n)
    }
}

impl From<Table> for Outcome {
    fn from(t: Table) -> Self {
        Outcome::Table(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_with_kind_tag() {
        let json = serde_json::to_value(Outcome::from(Notice::info("Success", "ok"))).unwrap();
        assert_eq!(json["kind"], "notice");
        assert_eq!(json["level"], "info");

        let table = Table::new("T", &["A"], vec![vec![SqlValue::Integer(1)]]);
        let json = serde_json::to_value(Outcome::from(table)).unwrap();
        assert_eq!(json["kind"], "table");
        assert_eq!(json["rows"][0][0], 1);

        let json = serde_json::to_value(Outcome::Closed).unwrap();
        assert_eq!(json["kind"], "closed");
    }
}

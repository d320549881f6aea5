//! The statement executor: the single chokepoint for database access.
//!
//! It owns the one logical session of the process (a SQLite pool capped at a
//! single connection) and gives every mutation its own transaction:
//! committed on success, rolled back and reported on failure.

use crate::domain::error::{Result, ShelterError};
use crate::domain::model::adoption::DATE_FORMAT;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteQueryResult,
    SqliteRow,
};
use sqlx::{Row, Sqlite, Transaction, TypeInfo, ValueRef};
use std::str::FromStr;
use std::time::Duration;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
    Date(NaiveDate),
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

impl From<u32> for SqlParam {
    fn from(v: u32) -> Self {
        SqlParam::Int(i64::from(v))
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(v: NaiveDate) -> Self {
        SqlParam::Date(v)
    }
}

/// A column value as handed to a table display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Null => Ok(()),
            SqlValue::Integer(v) => write!(f, "{}", v),
            SqlValue::Real(v) => write!(f, "{}", v),
            SqlValue::Text(v) => f.write_str(v),
        }
    }
}

/// Binds `params` in order onto `sql`.
pub fn bind_params<'q>(sql: &'q str, params: &[SqlParam]) -> SqliteQuery<'q> {
    let mut query = sqlx::query(sql);
    for p in params {
        query = match p {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.clone()),
            SqlParam::Date(v) => query.bind(v.format(DATE_FORMAT).to_string()),
        };
    }
    query
}

/// Converts one result row into ordered column values.
pub fn row_values(row: &SqliteRow) -> Result<Vec<SqlValue>> {
    let mut values = Vec::with_capacity(row.len());
    for idx in 0..row.len() {
        let raw = row.try_get_raw(idx)?;
        if raw.is_null() {
            values.push(SqlValue::Null);
            continue;
        }
        let type_name = raw.type_info().name().to_string();
        let value = match type_name.as_str() {
            "INTEGER" | "BOOLEAN" => SqlValue::Integer(row.try_get::<i64, _>(idx)?),
            "REAL" => SqlValue::Real(row.try_get::<f64, _>(idx)?),
            "BLOB" => {
                let bytes: Vec<u8> = row.try_get(idx)?;
                SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
            _ => SqlValue::Text(row.try_get_unchecked::<String, _>(idx)?),
        };
        values.push(value);
    }
    Ok(values)
}

pub struct StatementExecutor {
    pool: SqlitePool,
}

impl StatementExecutor {
    /// Opens the session. Foreign keys are enforced.
    ///
    /// The pool holds exactly one connection that never expires, so
    /// `sqlite::memory:` keeps one database for the lifetime of the executor.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(ShelterError::Connect)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(Option::<Duration>::None)
            .max_lifetime(Option::<Duration>::None)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "database connection failed");
                ShelterError::Connect(e)
            })?;

        tracing::info!(url = database_url, "connected to database");
        Ok(Self { pool })
    }

    pub fn is_connected(&self) -> bool {
        !self.pool.is_closed()
    }

    fn live_pool(&self) -> Result<&SqlitePool> {
        if self.pool.is_closed() {
            tracing::warn!("statement refused: database connection is not available");
            return Err(ShelterError::ConnectionUnavailable);
        }
        Ok(&self.pool)
    }

    /// Runs a query and returns the full result set in order.
    pub async fn fetch(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<SqliteRow>> {
        let pool = self.live_pool()?;
        bind_params(sql, params).fetch_all(pool).await.map_err(|e| {
            tracing::warn!(error = %e, sql, "fetch failed");
            ShelterError::Statement(e)
        })
    }

    /// Like [`fetch`](Self::fetch), flattened into display values.
    pub async fn fetch_values(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Vec<SqlValue>>> {
        self.fetch(sql, params)
            .await?
            .iter()
            .map(row_values)
            .collect()
    }

    /// Runs one mutating statement in its own transaction and returns the
    /// number of affected rows. On failure nothing is kept.
    pub async fn mutate(&self, sql: &str, params: &[SqlParam]) -> Result<u64> {
        Ok(self.run_in_tx(sql, params).await?.rows_affected())
    }

    /// Inserts a row and returns its rowid.
    pub async fn insert(&self, sql: &str, params: &[SqlParam]) -> Result<i64> {
        Ok(self.run_in_tx(sql, params).await?.last_insert_rowid())
    }

    async fn run_in_tx(&self, sql: &str, params: &[SqlParam]) -> Result<SqliteQueryResult> {
        let mut tx = self.begin().await?;
        match Self::execute_in(&mut tx, sql, params).await {
            Ok(done) => {
                tx.commit().await?;
                Ok(done)
            }
            Err(e) => {
                Self::rollback(tx).await;
                Err(e)
            }
        }
    }

    /// Runs one statement inside a caller-owned transaction.
    ///
    /// The transaction is left open; the caller commits or calls
    /// [`rollback`](Self::rollback).
    pub async fn execute_in(
        tx: &mut Transaction<'_, Sqlite>,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<SqliteQueryResult> {
        bind_params(sql, params).execute(&mut **tx).await.map_err(|e| {
            tracing::warn!(error = %e, sql, "statement failed");
            ShelterError::Statement(e)
        })
    }

    /// Fetches at most one row inside a caller-owned transaction.
    pub async fn fetch_optional_in(
        tx: &mut Transaction<'_, Sqlite>,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<SqliteRow>> {
        bind_params(sql, params)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, sql, "fetch failed");
                ShelterError::Statement(e)
            })
    }

    /// Rolls back `tx`. A failed rollback is logged, not returned: the
    /// connection discards the transaction either way.
    pub async fn rollback(tx: Transaction<'_, Sqlite>) {
        if let Err(e) = tx.rollback().await {
            tracing::warn!(error = %e, "rollback failed");
        } else {
            tracing::debug!("transaction rolled back");
        }
    }

    /// Runs a DDL statement outside any explicit transaction.
    pub async fn execute_ddl(&self, sql: &str) -> Result<()> {
        let pool = self.live_pool()?;
        sqlx::query(sql).execute(pool).await.map_err(|e| {
            tracing::warn!(error = %e, sql, "DDL statement failed");
            ShelterError::Statement(e)
        })?;
        Ok(())
    }

    /// Starts a transaction for multi-statement operations.
    ///
    /// Dropping it without `commit` rolls back.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        let pool = self.live_pool()?;
        Ok(pool.begin().await?)
    }

    /// Closes the session. Later calls fail with `ConnectionUnavailable`.
    pub async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            tracing::info!("database connection closed");
        }
    }
}

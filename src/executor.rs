//! `StoreExecutor` trait and the SQLite-backed store.
//!
//! The trait abstracts statement execution so entity operations run
//! identically against a plain store handle or an open [`Transaction`].
//! Statements arrive pre-built (SQL text plus bound [`sea_query::Values`])
//! and results come back as owned [`Row`]s ready for model hydration.
//!
//! [`Transaction`]: crate::transaction::Transaction

use rusqlite::types::Value as SqliteValue;
use rusqlite::Connection;
use sea_query::Values;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::transaction::Transaction;
use crate::value::{bind_values, Row};

/// Trait for executing built statements against the store.
///
/// Implemented by [`SqliteStore`] and [`Transaction`] so callers can write
/// against `&dyn StoreExecutor` and stay agnostic of transaction scope.
pub trait StoreExecutor {
    /// Execute a statement and return the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns a classified [`StoreError`] if execution fails.
    fn execute(&self, sql: &str, values: &Values) -> Result<u64, StoreError>;

    /// Execute a query and return the first row, if any.
    ///
    /// # Errors
    ///
    /// Returns a classified [`StoreError`] if execution fails.
    fn query_opt(&self, sql: &str, values: &Values) -> Result<Option<Row>, StoreError>;

    /// Execute a query and return all rows.
    ///
    /// # Errors
    ///
    /// Returns a classified [`StoreError`] if execution fails.
    fn query_all(&self, sql: &str, values: &Values) -> Result<Vec<Row>, StoreError>;

    /// Execute a raw multi-statement batch (DDL, triggers).
    ///
    /// # Errors
    ///
    /// Returns a classified [`StoreError`] if any statement fails.
    fn execute_batch(&self, sql: &str) -> Result<(), StoreError>;

    /// Execute a query that must produce exactly one row, such as an
    /// `INSERT ... RETURNING`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] when the statement yields no row.
    fn query_one(&self, sql: &str, values: &Values) -> Result<Row, StoreError> {
        self.query_opt(sql, values)?
            .ok_or_else(|| StoreError::Query(format!("statement returned no rows: {sql}")))
    }
}

/// Handle over an embedded SQLite database.
///
/// Opening a store configures the connection for schema enforcement:
/// foreign keys are switched on (SQLite leaves them off per connection),
/// the busy timeout is applied, and the configured journal mode is set.
///
/// # Examples
///
/// ```no_run
/// use shopkeeper::{schema, SqliteStore, StoreConfig};
///
/// # fn main() -> Result<(), shopkeeper::StoreError> {
/// let config = StoreConfig::load()
///     .map_err(|e| shopkeeper::StoreError::Query(e.to_string()))?;
/// let store = SqliteStore::open(&config)?;
/// schema::create_all(&store)?;
/// # Ok(())
/// # }
/// ```
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] if the file cannot be opened or a
    /// pragma cannot be applied.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = if config.path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(Path::new(&config.path))?
        };
        Self::configure(conn, config)
    }

    /// Open a private in-memory database with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] if the connection cannot be set up.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::configure(Connection::open_in_memory()?, &StoreConfig::default())
    }

    fn configure(conn: Connection, config: &StoreConfig) -> Result<Self, StoreError> {
        // Referential integrity is off by default in SQLite; the schema
        // relies on it.
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        if config.path != ":memory:" {
            conn.pragma_update(None, "journal_mode", &config.journal_mode)?;
        }
        log::debug!("opened store at '{}'", config.path);
        Ok(Self { conn })
    }

    /// Start a transaction. All entity operations accept the returned
    /// [`Transaction`] wherever they accept the store itself.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if `BEGIN` fails.
    pub fn begin(&self) -> Result<Transaction<'_>, StoreError> {
        Transaction::begin(&self.conn)
    }
}

impl StoreExecutor for SqliteStore {
    fn execute(&self, sql: &str, values: &Values) -> Result<u64, StoreError> {
        run_execute(&self.conn, sql, values)
    }

    fn query_opt(&self, sql: &str, values: &Values) -> Result<Option<Row>, StoreError> {
        Ok(run_query_all(&self.conn, sql, values)?.into_iter().next())
    }

    fn query_all(&self, sql: &str, values: &Values) -> Result<Vec<Row>, StoreError> {
        run_query_all(&self.conn, sql, values)
    }

    fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        run_batch(&self.conn, sql)
    }
}

pub(crate) fn run_execute(
    conn: &Connection,
    sql: &str,
    values: &Values,
) -> Result<u64, StoreError> {
    log::debug!("execute: {sql}");
    let params = bind_values(values)?;
    let mut stmt = conn.prepare(sql)?;
    let changed = stmt.execute(rusqlite::params_from_iter(params))?;
    Ok(changed as u64)
}

pub(crate) fn run_query_all(
    conn: &Connection,
    sql: &str,
    values: &Values,
) -> Result<Vec<Row>, StoreError> {
    log::debug!("query: {sql}");
    let params = bind_values(values)?;
    let mut stmt = conn.prepare(sql)?;
    let columns: Arc<Vec<String>> =
        Arc::new(stmt.column_names().into_iter().map(String::from).collect());
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut fields = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            fields.push(SqliteValue::from(row.get_ref(index)?));
        }
        out.push(Row::new(Arc::clone(&columns), fields));
    }
    Ok(out)
}

pub(crate) fn run_batch(conn: &Connection, sql: &str) -> Result<(), StoreError> {
    log::debug!("batch: {sql}");
    conn.execute_batch(sql)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory_enforces_foreign_keys() {
        let store = SqliteStore::open_in_memory().unwrap();
        let row = store
            .query_one("PRAGMA foreign_keys", &Values(vec![]))
            .unwrap();
        assert_eq!(row.get::<i64>("foreign_keys").unwrap(), 1);
    }

    #[test]
    fn query_opt_returns_none_for_no_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY)")
            .unwrap();
        let row = store.query_opt("SELECT * FROM t", &Values(vec![])).unwrap();
        assert!(row.is_none());
    }

    #[test]
    fn execute_reports_rows_affected() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT)")
            .unwrap();
        store
            .execute_batch("INSERT INTO t (v) VALUES ('a'), ('b')")
            .unwrap();
        let changed = store
            .execute("UPDATE t SET v = 'z'", &Values(vec![]))
            .unwrap();
        assert_eq!(changed, 2);
    }
}

//! Transaction support.
//!
//! A [`Transaction`] implements [`StoreExecutor`], so any entity operation
//! can run inside one. Multi-write operations (placing an order with its
//! items) rely on this: either every statement commits or none does, and
//! constraint violations abort the whole transaction.
//!
//! Commit and rollback consume the transaction, so statements cannot be
//! issued against a closed transaction. An uncommitted transaction rolls
//! back when dropped.

use rusqlite::Connection;
use sea_query::Values;

use crate::error::StoreError;
use crate::executor::{run_batch, run_execute, run_query_all, StoreExecutor};
use crate::value::Row;

/// A database transaction.
///
/// # Examples
///
/// ```no_run
/// use shopkeeper::{schema, SqliteStore, StoreError};
/// use shopkeeper::entity::tag::{NewTag, Tags};
///
/// # fn main() -> Result<(), StoreError> {
/// let store = SqliteStore::open_in_memory()?;
/// schema::create_all(&store)?;
///
/// let tx = store.begin()?;
/// Tags::insert(&tx, &NewTag { name: "sale".into(), description: None })?;
/// Tags::insert(&tx, &NewTag { name: "new".into(), description: None })?;
/// tx.commit()?;
/// # Ok(())
/// # }
/// ```
pub struct Transaction<'a> {
    conn: &'a Connection,
    open: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn begin(conn: &'a Connection) -> Result<Self, StoreError> {
        conn.execute_batch("BEGIN")?;
        log::debug!("transaction started");
        Ok(Self { conn, open: true })
    }

    /// Commit the transaction, making all writes visible.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if `COMMIT` fails; the transaction is
    /// closed either way.
    pub fn commit(mut self) -> Result<(), StoreError> {
        self.open = false;
        self.conn.execute_batch("COMMIT")?;
        log::debug!("transaction committed");
        Ok(())
    }

    /// Roll the transaction back, discarding all writes.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if `ROLLBACK` fails.
    pub fn rollback(mut self) -> Result<(), StoreError> {
        self.open = false;
        self.conn.execute_batch("ROLLBACK")?;
        log::debug!("transaction rolled back");
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                log::warn!("rollback of dropped transaction failed: {e}");
            }
        }
    }
}

impl StoreExecutor for Transaction<'_> {
    fn execute(&self, sql: &str, values: &Values) -> Result<u64, StoreError> {
        run_execute(self.conn, sql, values)
    }

    fn query_opt(&self, sql: &str, values: &Values) -> Result<Option<Row>, StoreError> {
        Ok(run_query_all(self.conn, sql, values)?.into_iter().next())
    }

    fn query_all(&self, sql: &str, values: &Values) -> Result<Vec<Row>, StoreError> {
        run_query_all(self.conn, sql, values)
    }

    fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        run_batch(self.conn, sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SqliteStore;

    fn store_with_table() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT)")
            .unwrap();
        store
    }

    fn count(store: &SqliteStore) -> i64 {
        store
            .query_one("SELECT COUNT(*) AS n FROM t", &Values(vec![]))
            .unwrap()
            .get("n")
            .unwrap()
    }

    #[test]
    fn committed_writes_are_visible() {
        let store = store_with_table();
        let tx = store.begin().unwrap();
        tx.execute_batch("INSERT INTO t (v) VALUES ('a')").unwrap();
        tx.commit().unwrap();
        assert_eq!(count(&store), 1);
    }

    #[test]
    fn rollback_discards_writes() {
        let store = store_with_table();
        let tx = store.begin().unwrap();
        tx.execute_batch("INSERT INTO t (v) VALUES ('a')").unwrap();
        tx.rollback().unwrap();
        assert_eq!(count(&store), 0);
    }

    #[test]
    fn dropped_transaction_rolls_back() {
        let store = store_with_table();
        {
            let tx = store.begin().unwrap();
            tx.execute_batch("INSERT INTO t (v) VALUES ('a')").unwrap();
        }
        assert_eq!(count(&store), 0);
    }
}

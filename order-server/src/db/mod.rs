//! redb-based storage layer
//!
//! One embedded database holds every persistent collection, one table per
//! concern:
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` (JSON) | Order store |
//! | `loyalty` | `user_id` | `i64` | Loyalty point balances |
//! | `restaurants` | `restaurant_id` | `Restaurant` (JSON) | Catalog |
//! | `reviews` | `(restaurant_id, review_id)` | `Review` (JSON) | Dish reviews |
//! | `pending_effects` | `effect_id` | `PendingEffect` (JSON) | Post-settlement ledger effects |
//!
//! # Durability
//!
//! redb commits are durable as soon as `commit()` returns (copy-on-write with
//! atomic pointer swap), so a crash mid-settlement leaves the database in a
//! consistent state: either a bucket's order committed or it did not.
//!
//! # Concurrency
//!
//! redb serializes write transactions. Every loyalty mutation runs inside a
//! single write transaction, which is what serializes concurrent redemptions
//! for the same user.

use redb::{Database, ReadTransaction, ReadableDatabase, TableDefinition, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::utils::AppError;

/// Orders: key = order_id, value = JSON-serialized Order
pub const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Loyalty balances: key = user_id, value = point balance
pub const LOYALTY_TABLE: TableDefinition<&str, i64> = TableDefinition::new("loyalty");

/// Restaurants: key = restaurant_id, value = JSON-serialized Restaurant
pub const RESTAURANTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("restaurants");

/// Reviews: key = (restaurant_id, review_id), value = JSON-serialized Review
pub const REVIEWS_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("reviews");

/// Post-settlement effect queue: key = effect_id, value = JSON-serialized PendingEffect
pub const PENDING_EFFECTS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("pending_effects");

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Database(e.to_string())
    }
}

/// Shared handle to the embedded database
#[derive(Clone)]
pub struct Db {
    inner: Arc<Database>,
}

impl Db {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, ephemeral dev runs)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // Create all tables up front so readers never hit a missing table
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(LOYALTY_TABLE)?;
            let _ = write_txn.open_table(RESTAURANTS_TABLE)?;
            let _ = write_txn.open_table(REVIEWS_TABLE)?;
            let _ = write_txn.open_table(PENDING_EFFECTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            inner: Arc::new(db),
        })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.inner.begin_write()?)
    }

    /// Begin a read transaction
    pub fn begin_read(&self) -> StoreResult<ReadTransaction> {
        Ok(self.inner.begin_read()?)
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_initialized_on_open() {
        let db = Db::open_in_memory().unwrap();
        // A fresh database must serve reads on every table without erroring
        let read_txn = db.begin_read().unwrap();
        assert!(read_txn.open_table(ORDERS_TABLE).is_ok());
        assert!(read_txn.open_table(LOYALTY_TABLE).is_ok());
        assert!(read_txn.open_table(RESTAURANTS_TABLE).is_ok());
        assert!(read_txn.open_table(REVIEWS_TABLE).is_ok());
        assert!(read_txn.open_table(PENDING_EFFECTS_TABLE).is_ok());
    }

    #[test]
    fn test_committed_data_survives_reopen() {
        use redb::ReadableTable;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.db");

        {
            let db = Db::open(&path).unwrap();
            let txn = db.begin_write().unwrap();
            {
                let mut table = txn.open_table(LOYALTY_TABLE).unwrap();
                table.insert("u1", 42i64).unwrap();
            }
            txn.commit().unwrap();
        }

        let db = Db::open(&path).unwrap();
        let read_txn = db.begin_read().unwrap();
        let table = read_txn.open_table(LOYALTY_TABLE).unwrap();
        assert_eq!(table.get("u1").unwrap().map(|g| g.value()), Some(42));
    }
}

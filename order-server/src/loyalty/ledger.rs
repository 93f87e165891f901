//! Point balance bookkeeping
//!
//! Invariant: a balance never goes negative. Every mutation is a
//! read-modify-write inside a single redb write transaction; redb's
//! single-writer model serializes concurrent redemptions for the same user,
//! so two overlapping redeems can never both drain the same points.

use redb::ReadableTable;

use crate::db::{Db, LOYALTY_TABLE, StoreError};
use crate::utils::AppError;

/// Ledger errors
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Zero or negative point count
    #[error("Invalid points value")]
    InvalidAmount,

    #[error("Not enough points: requested {requested}, balance {balance}")]
    InsufficientPoints { requested: i64, balance: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InvalidAmount => AppError::Validation("Invalid points value".to_string()),
            LedgerError::InsufficientPoints { .. } => {
                AppError::BusinessRule("Not enough points".to_string())
            }
            LedgerError::Store(inner) => inner.into(),
        }
    }
}

/// redb-backed loyalty ledger. Accounts are created lazily at zero.
#[derive(Clone, Debug)]
pub struct LoyaltyLedger {
    db: Db,
}

impl LoyaltyLedger {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Current balance; missing accounts read as 0.
    pub fn balance(&self, user_id: &str) -> Result<i64, LedgerError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LOYALTY_TABLE).map_err(StoreError::from)?;
        Ok(table
            .get(user_id)
            .map_err(StoreError::from)?
            .map(|g| g.value())
            .unwrap_or(0))
    }

    /// Add points (one per whole currency unit invoiced). Negative amounts
    /// are rejected; zero is a no-op.
    pub fn accrue(&self, user_id: &str, points: i64) -> Result<i64, LedgerError> {
        if points < 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if points == 0 {
            return self.balance(user_id);
        }

        let txn = self.db.begin_write()?;
        let new_balance;
        {
            let mut table = txn.open_table(LOYALTY_TABLE).map_err(StoreError::from)?;
            let current = table
                .get(user_id)
                .map_err(StoreError::from)?
                .map(|g| g.value())
                .unwrap_or(0);
            new_balance = current + points;
            table
                .insert(user_id, new_balance)
                .map_err(StoreError::from)?;
        }
        txn.commit().map_err(StoreError::from)?;

        tracing::debug!(user_id = %user_id, points, balance = new_balance, "Points accrued");
        Ok(new_balance)
    }

    /// Deduct points. Fails without touching the balance when the request
    /// exceeds it; returns the new balance otherwise.
    pub fn redeem(&self, user_id: &str, points: i64) -> Result<i64, LedgerError> {
        if points <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let txn = self.db.begin_write()?;
        let new_balance;
        {
            let mut table = txn.open_table(LOYALTY_TABLE).map_err(StoreError::from)?;
            let current = table
                .get(user_id)
                .map_err(StoreError::from)?
                .map(|g| g.value())
                .unwrap_or(0);
            if points > current {
                // Dropping the transaction without commit leaves the balance untouched
                return Err(LedgerError::InsufficientPoints {
                    requested: points,
                    balance: current,
                });
            }
            new_balance = current - points;
            table
                .insert(user_id, new_balance)
                .map_err(StoreError::from)?;
        }
        txn.commit().map_err(StoreError::from)?;

        tracing::debug!(user_id = %user_id, points, balance = new_balance, "Points redeemed");
        Ok(new_balance)
    }
}

//! Post-settlement ledger effects
//!
//! Once payment is captured and orders are persisted, the loyalty mutations
//! (redeem, then accrue) are secondary effects: they must never roll back the
//! orders. Instead of inline fire-and-forget calls, each mutation is queued
//! as a persisted, individually retryable effect.
//!
//! Failure handling:
//! - ledger *rejections* (insufficient points, invalid amount) are terminal —
//!   logged and removed, the orders stand;
//! - *storage* failures stay queued with a retry count and are re-attempted
//!   by the background task.

use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use shared::util;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::db::{Db, PENDING_EFFECTS_TABLE, StoreResult};
use crate::loyalty::{LedgerError, LoyaltyLedger};

/// A single ledger mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LedgerEffect {
    Redeem { user_id: String, points: i64 },
    Accrue { user_id: String, points: i64 },
}

/// Queued effect with retry bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingEffect {
    pub id: String,
    pub effect: LedgerEffect,
    pub retry_count: u32,
    pub last_error: Option<String>,
    pub created_at: i64,
}

/// Persisted FIFO of ledger effects. Keys are zero-padded sequence numbers so
/// key order is enqueue order.
#[derive(Clone)]
pub struct EffectQueue {
    db: Db,
    ledger: LoyaltyLedger,
    seq: Arc<AtomicU64>,
}

impl EffectQueue {
    pub fn new(db: Db, ledger: LoyaltyLedger) -> Self {
        // Seed from the clock so keys stay monotonic across restarts
        let seed = (util::now_millis() as u64) << 16;
        Self {
            db,
            ledger,
            seq: Arc::new(AtomicU64::new(seed)),
        }
    }

    /// Queue an effect; returns its id.
    pub fn enqueue(&self, effect: LedgerEffect) -> StoreResult<String> {
        let id = format!("{:020}", self.seq.fetch_add(1, Ordering::SeqCst));
        let pending = PendingEffect {
            id: id.clone(),
            effect,
            retry_count: 0,
            last_error: None,
            created_at: util::now_millis(),
        };

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PENDING_EFFECTS_TABLE)?;
            let value = serde_json::to_vec(&pending)?;
            table.insert(id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(id)
    }

    /// Currently queued effects, in enqueue order.
    pub fn pending(&self) -> StoreResult<Vec<PendingEffect>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PENDING_EFFECTS_TABLE)?;

        let mut effects = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let pending: PendingEffect = serde_json::from_slice(value.value())?;
            effects.push(pending);
        }
        Ok(effects)
    }

    fn remove(&self, id: &str) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PENDING_EFFECTS_TABLE)?;
            table.remove(id)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn record_failure(&self, pending: &PendingEffect, error: &str) -> StoreResult<()> {
        let updated = PendingEffect {
            retry_count: pending.retry_count + 1,
            last_error: Some(error.to_string()),
            ..pending.clone()
        };
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PENDING_EFFECTS_TABLE)?;
            let value = serde_json::to_vec(&updated)?;
            table.insert(updated.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn apply(&self, effect: &LedgerEffect) -> Result<i64, LedgerError> {
        match effect {
            LedgerEffect::Redeem { user_id, points } => self.ledger.redeem(user_id, *points),
            LedgerEffect::Accrue { user_id, points } => self.ledger.accrue(user_id, *points),
        }
    }

    /// Run every queued effect once, in order. Returns how many applied.
    pub fn drain(&self) -> StoreResult<usize> {
        let mut applied = 0;
        for pending in self.pending()? {
            match self.apply(&pending.effect) {
                Ok(balance) => {
                    tracing::debug!(
                        effect_id = %pending.id,
                        effect = ?pending.effect,
                        balance,
                        "Ledger effect applied"
                    );
                    self.remove(&pending.id)?;
                    applied += 1;
                }
                Err(e @ (LedgerError::InvalidAmount | LedgerError::InsufficientPoints { .. })) => {
                    // The ledger refused the mutation; retrying cannot help
                    tracing::error!(
                        effect_id = %pending.id,
                        effect = ?pending.effect,
                        error = %e,
                        "Ledger effect rejected, dropping"
                    );
                    self.remove(&pending.id)?;
                }
                Err(LedgerError::Store(e)) => {
                    tracing::warn!(
                        effect_id = %pending.id,
                        effect = ?pending.effect,
                        retry_count = pending.retry_count + 1,
                        error = %e,
                        "Ledger effect failed, will retry"
                    );
                    self.record_failure(&pending, &e.to_string())?;
                }
            }
        }
        Ok(applied)
    }

    /// Spawn the background retry loop.
    pub fn spawn_retry_task(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let queue = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                match queue.drain() {
                    Ok(0) => {}
                    Ok(applied) => {
                        tracing::info!(applied, "Retried pending ledger effects");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Effect queue drain failed");
                    }
                }
            }
        })
    }
}

impl std::fmt::Debug for EffectQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectQueue").finish_non_exhaustive()
    }
}

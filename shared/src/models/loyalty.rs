//! Loyalty account model

use serde::{Deserialize, Serialize};

/// Per-user loyalty balance. One account per user, created lazily at zero.
///
/// Invariant: `points` never goes negative; the ledger rejects any redemption
/// that would overdraw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyAccount {
    pub user_id: String,
    pub points: i64,
}

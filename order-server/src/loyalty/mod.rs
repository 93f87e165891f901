//! Loyalty Ledger
//!
//! Owns per-user point balances. Points are integers; the £0.01-per-point
//! conversion belongs to the checkout flow, never to the ledger.

mod ledger;

pub use ledger::{LedgerError, LoyaltyLedger};

//! Checkout settlement
//!
//! Turns a validated cart plus a confirmed card charge into one persisted
//! order per restaurant, then settles the loyalty ledger. This is the only
//! path that creates orders.

mod cart;
mod effects;
mod engine;
pub mod money;

pub use cart::{Bucket, GroupedCart, group_cart, validate_cart_item};
pub use effects::{EffectQueue, LedgerEffect, PendingEffect};
pub use engine::{
    ChargeConfirmation, FailedBucket, OrderSink, PaymentSummary, SettlementEngine,
    SettlementError, SettlementReceipt,
};

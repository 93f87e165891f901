//! Gateway trait and wire types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::AppError;

/// Gateway errors
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Http(String),

    #[error("Payment intent not found: {0}")]
    IntentNotFound(String),

    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::IntentNotFound(id) => {
                AppError::PaymentNotConfirmed(format!("Unknown payment intent {id}"))
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Charge lifecycle status as reported by the gateway.
///
/// Only `Succeeded` ever settles an order; pending or ambiguous states are
/// treated the same as failures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Succeeded,
    Processing,
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// A payment intent as known to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    /// Amount in minor currency units (pence).
    pub amount: i64,
    pub currency: String,
    pub status: IntentStatus,
}

/// Payment gateway boundary.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an intent for `amount` minor units; returns the client secret
    /// the browser uses to capture the card.
    async fn create_intent(&self, amount: i64, currency: &str)
    -> Result<PaymentIntent, GatewayError>;

    /// Fetch the current state of an intent for server-side verification.
    async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, GatewayError>;
}

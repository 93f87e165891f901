//! In-memory gateway
//!
//! Used when no gateway secret is configured (development) and throughout the
//! test suite. Intents are held in a concurrent map; tests drive the status
//! transitions explicitly.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::{GatewayError, IntentStatus, PaymentGateway, PaymentIntent};

#[derive(Clone, Default)]
pub struct MockGateway {
    intents: Arc<DashMap<String, PaymentIntent>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an intent as captured (what the browser-side confirmation does
    /// against the real gateway).
    pub fn mark_succeeded(&self, intent_id: &str) {
        if let Some(mut intent) = self.intents.get_mut(intent_id) {
            intent.status = IntentStatus::Succeeded;
        }
    }

    /// Force a status, for exercising failure paths.
    pub fn set_status(&self, intent_id: &str, status: IntentStatus) {
        if let Some(mut intent) = self.intents.get_mut(intent_id) {
            intent.status = status;
        }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let id = format!("pi_mock_{}", uuid::Uuid::new_v4().simple());
        let intent = PaymentIntent {
            id: id.clone(),
            client_secret: format!("{id}_secret"),
            amount,
            currency: currency.to_string(),
            status: IntentStatus::RequiresPaymentMethod,
        };
        self.intents.insert(id, intent.clone());
        Ok(intent)
    }

    async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, GatewayError> {
        self.intents
            .get(intent_id)
            .map(|i| i.clone())
            .ok_or_else(|| GatewayError::IntentNotFound(intent_id.to_string()))
    }
}

//! Stripe-backed gateway
//!
//! Thin HTTPS client over the payment-intents API. Form-encoded requests,
//! bearer auth with the secret key.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{GatewayError, IntentStatus, PaymentGateway, PaymentIntent};

const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";

/// Gateway calls must complete before the client gives up on the checkout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Gateway implementation talking to the Stripe HTTP API.
pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: String,
    amount: i64,
    currency: String,
    status: IntentStatus,
}

impl From<IntentResponse> for PaymentIntent {
    fn from(r: IntentResponse) -> Self {
        PaymentIntent {
            id: r.id,
            client_secret: r.client_secret,
            amount: r.amount,
            currency: r.currency,
            status: r.status,
        }
    }
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self::with_api_base(secret_key, DEFAULT_API_BASE)
    }

    /// Override the API base URL (integration tests point this at a stub).
    pub fn with_api_base(secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            secret_key: secret_key.into(),
        }
    }

    async fn parse_intent(&self, resp: reqwest::Response) -> Result<PaymentIntent, GatewayError> {
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::IntentNotFound("intent".to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Http(format!(
                "gateway returned {status}: {body}"
            )));
        }
        let intent: IntentResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(intent.into())
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let params = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let resp = self
            .client
            .post(format!("{}/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .timeout(REQUEST_TIMEOUT)
            .form(&params)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        self.parse_intent(resp).await
    }

    async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, GatewayError> {
        let resp = self
            .client
            .get(format!("{}/payment_intents/{}", self.api_base, intent_id))
            .bearer_auth(&self.secret_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        match self.parse_intent(resp).await {
            Err(GatewayError::IntentNotFound(_)) => {
                Err(GatewayError::IntentNotFound(intent_id.to_string()))
            }
            other => other,
        }
    }
}

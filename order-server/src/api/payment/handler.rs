//! Payment API Handler

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Amount in minor currency units (pence).
#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub amount: i64,
}

/// The browser confirms the card against this secret.
#[derive(Debug, Serialize)]
pub struct CreateIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// POST /api/payment/create-payment-intent
pub async fn create_payment_intent(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateIntentRequest>,
) -> AppResult<Json<CreateIntentResponse>> {
    if payload.amount <= 0 {
        return Err(AppError::validation("Amount is required"));
    }

    let intent = state
        .gateway
        .create_intent(payload.amount, &state.config.currency)
        .await?;

    tracing::debug!(
        user_id = %user.id,
        intent_id = %intent.id,
        amount = intent.amount,
        "Payment intent created"
    );

    Ok(Json(CreateIntentResponse {
        client_secret: intent.client_secret,
    }))
}

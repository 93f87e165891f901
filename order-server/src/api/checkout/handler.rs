//! Checkout API Handler

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use shared::models::{Address, CartItem};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::settlement::{ChargeConfirmation, SettlementReceipt};
use crate::utils::AppResult;

/// Checkout payload: the whole cart plus the captured charge reference.
/// Items may span several restaurants; the engine splits them.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,
    pub address: Address,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub points_to_redeem: i64,
    pub payment_intent_id: String,
}

/// POST /api/checkout - settle a confirmed cart into orders
pub async fn settle(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<SettlementReceipt>)> {
    let receipt = state
        .engine
        .settle(
            &user,
            payload.items,
            payload.address,
            payload.special_instructions,
            payload.points_to_redeem,
            ChargeConfirmation {
                payment_intent_id: payload.payment_intent_id,
            },
        )
        .await?;

    tracing::info!(
        user_id = %user.id,
        orders = receipt.orders.len(),
        "Orders created from a single cart"
    );

    Ok((StatusCode::CREATED, Json(receipt)))
}

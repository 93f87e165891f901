//! Loyalty API Handler

use axum::{Json, extract::State};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

/// "My points" view
#[derive(Debug, Serialize)]
pub struct LoyaltyResponse {
    pub name: Option<String>,
    pub points: i64,
}

/// GET /api/loyalty - current user's point balance
pub async fn balance(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<LoyaltyResponse>> {
    let points = state.ledger.balance(&user.id)?;
    Ok(Json(LoyaltyResponse {
        name: user.name,
        points,
    }))
}

//! Order API Handlers
//!
//! Read access is owner-or-admin; status writes are admin-only. Both rules
//! live in the tracker, with the admin routes additionally gated by
//! middleware.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{Order, OrderStatus};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/orders/my-orders - the calling customer's orders, newest first
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.tracker.my_orders(&user)?;
    Ok(Json(orders))
}

/// GET /api/orders - admins see every order, customers their own; newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.tracker.list_orders(&user)?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - single order, owner or admin
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> AppResult<Json<Order>> {
    let order = state.tracker.get_order(&id, &user)?;
    Ok(Json(order))
}

/// Status update payload. An unrecognized status string fails to parse here,
/// before any business logic runs.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// PUT /api/orders/{id}/status - admin status write
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state.tracker.set_status(&id, payload.status, &user)?;
    Ok(Json(order))
}

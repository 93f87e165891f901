//! Recommendations API Handler

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::catalog::Recommendation;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

const RECOMMENDATION_LIMIT: usize = 5;

/// GET /api/recommendations/{restaurant_id}
///
/// Suggestions from this restaurant's menu for the calling customer, based
/// on their order history. No history means an empty list.
pub async fn for_restaurant(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Recommendation>>> {
    let restaurant = state
        .catalog
        .get(&restaurant_id)?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {restaurant_id} not found")))?;

    let past_orders = state.tracker.my_orders(&user)?;
    let suggestions = state
        .recommender
        .recommend(&past_orders, &restaurant, RECOMMENDATION_LIMIT);

    Ok(Json(suggestions))
}

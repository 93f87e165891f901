//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Restaurant, RestaurantCreate, Review, ReviewCreate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/restaurants - all restaurants
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = state.catalog.list()?;
    Ok(Json(restaurants))
}

/// GET /api/restaurants/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = state
        .catalog
        .get(&id)?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {id} not found")))?;
    Ok(Json(restaurant))
}

/// POST /api/restaurants - create restaurant (admin seeding)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Restaurant name is required"));
    }
    let restaurant = state.catalog.create(payload)?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// GET /api/restaurants/{id}/reviews - reviews for a restaurant, newest first
pub async fn list_reviews(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Review>>> {
    let reviews = state.reviews.list_for_restaurant(&id)?;
    Ok(Json(reviews))
}

/// POST /api/restaurants/{id}/reviews - submit a dish review
pub async fn create_review(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<(StatusCode, Json<Review>)> {
    // Reviews only make sense against a known restaurant
    if state.catalog.get(&id)?.is_none() {
        return Err(AppError::not_found(format!("Restaurant {id} not found")));
    }

    let review = state.reviews.create(&id, &user, payload)?;
    Ok((StatusCode::CREATED, Json(review)))
}

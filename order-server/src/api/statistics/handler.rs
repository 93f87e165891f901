//! Statistics API Handler
//!
//! Pure aggregates recomputed over the order list on every read; nothing is
//! cached or persisted.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::orders::analytics::{
    self, DishCount, TopCustomer, fulfillment_counts, most_ordered_dish, top_customer,
};
use crate::utils::AppResult;

// ============================================================================
// Response Types
// ============================================================================

/// Overview statistics
#[derive(Debug, Clone, Serialize)]
pub struct OverviewStats {
    pub revenue: f64,
    pub orders: usize,
    pub pending_orders: usize,
    pub completed_orders: usize,
}

/// Full statistics response
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub overview: OverviewStats,
    pub most_ordered_dish: Option<DishCount>,
    pub top_customer: Option<TopCustomer>,
}

// ============================================================================
// Handler
// ============================================================================

/// GET /api/statistics - admin sales overview
pub async fn get_statistics(
    State(state): State<ServerState>,
) -> AppResult<Json<StatisticsResponse>> {
    let orders = state.orders.list_all()?;

    let (pending, completed) = fulfillment_counts(&orders);
    let overview = OverviewStats {
        revenue: analytics::total_revenue(&orders),
        orders: orders.len(),
        pending_orders: pending,
        completed_orders: completed,
    };

    let ledger = state.ledger.clone();
    let top = top_customer(&orders, |user_id| {
        ledger.balance(user_id).unwrap_or_else(|e| {
            tracing::warn!(user_id = %user_id, error = %e, "Balance lookup failed for statistics");
            0
        })
    });

    Ok(Json(StatisticsResponse {
        overview,
        most_ordered_dish: most_ordered_dish(&orders),
        top_customer: top,
    }))
}

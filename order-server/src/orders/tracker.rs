//! Order Status Tracker
//!
//! The read/write contract over persisted orders: owners and admins may read,
//! only admins may write, and the only writable field is `status`.
//!
//! By default any of the four statuses may be set from any other (support
//! occasionally reverts a mis-click); setting `enforce_forward_only` rejects
//! regressions such as Delivered → Paid.

use shared::models::{Order, OrderStatus};

use crate::auth::CurrentUser;
use crate::db::StoreError;
use crate::orders::OrderStore;
use crate::utils::AppError;

/// Tracker errors
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    #[error("Order {0} not found")]
    NotFound(String),

    #[error("Cannot move order back from {from} to {to}")]
    StatusRegression { from: OrderStatus, to: OrderStatus },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TrackerError> for AppError {
    fn from(e: TrackerError) -> Self {
        match e {
            TrackerError::Forbidden(msg) => AppError::forbidden(msg),
            TrackerError::NotFound(id) => AppError::not_found(format!("Order {id} not found")),
            TrackerError::StatusRegression { from, to } => {
                AppError::business_rule(format!("Cannot move order back from {from} to {to}"))
            }
            TrackerError::Store(inner) => inner.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct OrderTracker {
    store: OrderStore,
    enforce_forward_only: bool,
}

impl OrderTracker {
    pub fn new(store: OrderStore, enforce_forward_only: bool) -> Self {
        Self {
            store,
            enforce_forward_only,
        }
    }

    /// Read a single order. Owner or admin only.
    pub fn get_order(&self, order_id: &str, caller: &CurrentUser) -> Result<Order, TrackerError> {
        let order = self
            .store
            .get(order_id)?
            .ok_or_else(|| TrackerError::NotFound(order_id.to_string()))?;

        if !caller.is_admin() && order.user_id != caller.id {
            return Err(TrackerError::Forbidden("Not your order"));
        }
        Ok(order)
    }

    /// The caller's own orders regardless of role. Newest first.
    pub fn my_orders(&self, caller: &CurrentUser) -> Result<Vec<Order>, TrackerError> {
        Ok(self.store.list_by_user(&caller.id)?)
    }

    /// Admins see every order; customers see their own. Newest first.
    pub fn list_orders(&self, caller: &CurrentUser) -> Result<Vec<Order>, TrackerError> {
        let orders = if caller.is_admin() {
            self.store.list_all()?
        } else {
            self.store.list_by_user(&caller.id)?
        };
        Ok(orders)
    }

    /// Admin-only status write. The status value itself is already typed;
    /// unrecognized strings never get this far.
    pub fn set_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
        caller: &CurrentUser,
    ) -> Result<Order, TrackerError> {
        if !caller.is_admin() {
            return Err(TrackerError::Forbidden("Admins only"));
        }

        if self.enforce_forward_only {
            let current = self
                .store
                .get(order_id)?
                .ok_or_else(|| TrackerError::NotFound(order_id.to_string()))?;
            if new_status.rank() < current.status.rank() {
                return Err(TrackerError::StatusRegression {
                    from: current.status,
                    to: new_status,
                });
            }
        }

        let updated = self
            .store
            .update_status(order_id, new_status)?
            .ok_or_else(|| TrackerError::NotFound(order_id.to_string()))?;

        tracing::info!(
            order_id = %order_id,
            status = %new_status,
            operator = %caller.id,
            "Order status updated"
        );
        Ok(updated)
    }
}

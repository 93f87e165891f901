//! Order Settlement Engine
//!
//! The one place orders come into existence. A settlement takes a
//! multi-restaurant cart, a delivery address and a charge reference, and:
//!
//! 1. validates address, points and cart items (rejecting before any
//!    external call);
//! 2. groups valid items into per-restaurant buckets;
//! 3. verifies the referenced charge was captured for the discounted total;
//! 4. persists one `Paid` order per bucket, each in its own transaction;
//! 5. queues the ledger effects (redeem, then accrue) and runs them.
//!
//! A bucket that fails to persist is reported — with every bucket that
//! succeeded — as a partial failure; nothing is rolled back, because the
//! payment has already been captured and must not be lost.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use shared::models::{Address, CartItem, Order, OrderStatus};
use shared::util;
use std::sync::Arc;

use super::cart::{Bucket, group_cart};
use super::effects::{EffectQueue, LedgerEffect};
use super::money::{minor_units, points_discount, to_f64, whole_units};
use crate::auth::CurrentUser;
use crate::catalog::CatalogStore;
use crate::db::StoreError;
use crate::loyalty::LoyaltyLedger;
use crate::orders::OrderStore;
use crate::payment::{GatewayError, IntentStatus, PaymentGateway};
use crate::utils::AppError;

/// Client-supplied reference to the charge captured for this checkout.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ChargeConfirmation {
    pub payment_intent_id: String,
}

/// Money summary returned alongside the created orders.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSummary {
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
    pub points_redeemed: i64,
    pub points_balance: i64,
}

/// Successful settlement: every bucket became an order.
#[derive(Debug, Serialize)]
pub struct SettlementReceipt {
    pub orders: Vec<Order>,
    pub payment: PaymentSummary,
}

/// A bucket whose order could not be persisted.
#[derive(Debug, Clone, Serialize)]
pub struct FailedBucket {
    pub restaurant_id: String,
    pub total_amount: f64,
    pub reason: String,
}

/// Settlement errors
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error("No valid cart items")]
    NoValidItems,

    #[error("Delivery address is incomplete")]
    AddressIncomplete,

    #[error("Invalid points redemption: {0}")]
    InvalidPoints(String),

    #[error("Charge not confirmed: {0}")]
    ChargeNotConfirmed(String),

    /// Payment captured, some buckets persisted, some did not.
    #[error("Settlement partially persisted: {} bucket(s) failed", .failed.len())]
    PartialPersistence {
        created: Vec<Order>,
        failed: Vec<FailedBucket>,
    },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SettlementError> for AppError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::NoValidItems => {
                AppError::Validation("Cart items are required".to_string())
            }
            SettlementError::AddressIncomplete => {
                AppError::Validation("Delivery address is required".to_string())
            }
            SettlementError::InvalidPoints(msg) => AppError::Validation(msg),
            SettlementError::ChargeNotConfirmed(msg) => AppError::PaymentNotConfirmed(msg),
            SettlementError::PartialPersistence { created, failed } => {
                AppError::PartialSettlement(json!({
                    "created": created,
                    "failed": failed,
                }))
            }
            SettlementError::Gateway(inner) => inner.into(),
            SettlementError::Store(inner) => inner.into(),
        }
    }
}

/// Persistence boundary for settled orders.
pub trait OrderSink: Send + Sync {
    fn persist(&self, order: &Order) -> Result<(), StoreError>;
}

impl OrderSink for OrderStore {
    fn persist(&self, order: &Order) -> Result<(), StoreError> {
        self.insert(order)
    }
}

pub struct SettlementEngine {
    sink: Arc<dyn OrderSink>,
    ledger: LoyaltyLedger,
    catalog: CatalogStore,
    gateway: Arc<dyn PaymentGateway>,
    effects: EffectQueue,
    currency: String,
}

impl SettlementEngine {
    pub fn new(
        sink: Arc<dyn OrderSink>,
        ledger: LoyaltyLedger,
        catalog: CatalogStore,
        gateway: Arc<dyn PaymentGateway>,
        effects: EffectQueue,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            ledger,
            catalog,
            gateway,
            effects,
            currency: currency.into(),
        }
    }

    /// Settle a checkout. See module docs for the step sequence.
    pub async fn settle(
        &self,
        user: &CurrentUser,
        cart_items: Vec<CartItem>,
        address: Address,
        special_instructions: Option<String>,
        points_to_redeem: i64,
        charge: ChargeConfirmation,
    ) -> Result<SettlementReceipt, SettlementError> {
        // ---- Validation, before any external call ----
        if !address.is_complete() {
            return Err(SettlementError::AddressIncomplete);
        }
        if points_to_redeem < 0 {
            return Err(SettlementError::InvalidPoints(
                "Points to redeem cannot be negative".to_string(),
            ));
        }

        let grouped = group_cart(cart_items);
        for (item, reason) in &grouped.dropped {
            tracing::warn!(
                target: "data_integrity",
                item = %item.name,
                restaurant_id = item.restaurant_id.as_deref().unwrap_or("<none>"),
                reason,
                "Cart item excluded from settlement"
            );
        }
        if grouped.buckets.is_empty() {
            return Err(SettlementError::NoValidItems);
        }

        let subtotal = grouped.subtotal();
        let discount = points_discount(points_to_redeem);
        if discount > subtotal {
            return Err(SettlementError::InvalidPoints(format!(
                "Discount {} exceeds subtotal {}",
                to_f64(discount),
                to_f64(subtotal)
            )));
        }
        let charge_total = subtotal - discount;

        // ---- Charge verification: no order without a captured payment ----
        self.verify_charge(&charge, charge_total).await?;

        // ---- Per-bucket persistence ----
        let instructions = special_instructions.unwrap_or_default();
        let mut created: Vec<Order> = Vec::new();
        let mut failed: Vec<FailedBucket> = Vec::new();

        for bucket in grouped.buckets {
            let order = self.build_order(user, &bucket, &address, &instructions)?;
            match self.sink.persist(&order) {
                Ok(()) => created.push(order),
                Err(e) => {
                    tracing::error!(
                        restaurant_id = %bucket.restaurant_id,
                        total_amount = bucket.total_amount,
                        error = %e,
                        "Failed to persist order for bucket"
                    );
                    failed.push(FailedBucket {
                        restaurant_id: bucket.restaurant_id,
                        total_amount: bucket.total_amount,
                        reason: e.to_string(),
                    });
                }
            }
        }

        // ---- Ledger effects: redeem then accrue, for what actually persisted ----
        let invoiced: Decimal = created
            .iter()
            .map(|o| super::money::to_decimal(o.total_amount))
            .sum();
        let accrue_points = whole_units(invoiced - discount);

        if points_to_redeem > 0 {
            self.effects.enqueue(LedgerEffect::Redeem {
                user_id: user.id.clone(),
                points: points_to_redeem,
            })?;
        }
        if accrue_points > 0 {
            self.effects.enqueue(LedgerEffect::Accrue {
                user_id: user.id.clone(),
                points: accrue_points,
            })?;
        }
        self.effects.drain()?;

        if !failed.is_empty() {
            return Err(SettlementError::PartialPersistence { created, failed });
        }

        let points_balance = self.ledger.balance(&user.id).unwrap_or_else(|e| {
            tracing::warn!(user_id = %user.id, error = %e, "Could not read balance for receipt");
            0
        });

        tracing::info!(
            user_id = %user.id,
            orders = created.len(),
            subtotal = to_f64(subtotal),
            discount = to_f64(discount),
            total = to_f64(charge_total),
            points_redeemed = points_to_redeem,
            "Checkout settled"
        );

        Ok(SettlementReceipt {
            orders: created,
            payment: PaymentSummary {
                subtotal: to_f64(subtotal),
                discount: to_f64(discount),
                total: to_f64(charge_total),
                points_redeemed: points_to_redeem,
                points_balance,
            },
        })
    }

    /// The referenced intent must be explicitly succeeded, in the configured
    /// currency, for the expected amount (±1 minor unit of rounding).
    async fn verify_charge(
        &self,
        charge: &ChargeConfirmation,
        expected: Decimal,
    ) -> Result<(), SettlementError> {
        let intent = match self.gateway.retrieve_intent(&charge.payment_intent_id).await {
            Ok(intent) => intent,
            Err(GatewayError::IntentNotFound(id)) => {
                return Err(SettlementError::ChargeNotConfirmed(format!(
                    "Unknown payment intent {id}"
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if intent.status != IntentStatus::Succeeded {
            return Err(SettlementError::ChargeNotConfirmed(format!(
                "Payment intent {} is {:?}, not succeeded",
                intent.id, intent.status
            )));
        }
        if !intent.currency.eq_ignore_ascii_case(&self.currency) {
            return Err(SettlementError::ChargeNotConfirmed(format!(
                "Charged in {}, expected {}",
                intent.currency, self.currency
            )));
        }

        let expected_minor = minor_units(expected);
        if (intent.amount - expected_minor).abs() > 1 {
            return Err(SettlementError::ChargeNotConfirmed(format!(
                "Charged amount {} does not match order total {}",
                intent.amount, expected_minor
            )));
        }
        Ok(())
    }

    fn build_order(
        &self,
        user: &CurrentUser,
        bucket: &Bucket,
        address: &Address,
        instructions: &str,
    ) -> Result<Order, StoreError> {
        let restaurant_name = Some(
            self.catalog
                .name_of(&bucket.restaurant_id)?
                .unwrap_or_else(|| "Unknown".to_string()),
        );

        Ok(Order {
            id: util::new_id(),
            user_id: user.id.clone(),
            customer_name: user.name.clone(),
            customer_email: user.email.clone(),
            restaurant_id: Some(bucket.restaurant_id.clone()),
            restaurant_name,
            items: bucket.items.clone(),
            total_amount: bucket.total_amount,
            address: address.clone(),
            status: OrderStatus::Paid,
            special_instructions: instructions.to_string(),
            created_at: util::now_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use crate::payment::MockGateway;
    use shared::models::RestaurantCreate;

    struct Fixture {
        engine: SettlementEngine,
        store: OrderStore,
        ledger: LoyaltyLedger,
        gateway: MockGateway,
        restaurant_ids: Vec<String>,
    }

    /// A sink that refuses orders for one restaurant.
    struct FailFor {
        inner: OrderStore,
        restaurant_id: String,
    }

    impl OrderSink for FailFor {
        fn persist(&self, order: &Order) -> Result<(), StoreError> {
            use serde::ser::Error as _;
            if order.restaurant_id.as_deref() == Some(self.restaurant_id.as_str()) {
                return Err(StoreError::Serialization(serde_json::Error::custom(
                    "simulated write failure",
                )));
            }
            self.inner.insert(order)
        }
    }

    fn fixture_with_sink(make_sink: impl Fn(OrderStore, &[String]) -> Arc<dyn OrderSink>) -> Fixture {
        let db = Db::open_in_memory().unwrap();
        let store = OrderStore::new(db.clone());
        let ledger = LoyaltyLedger::new(db.clone());
        let catalog = CatalogStore::new(db.clone());
        let gateway = MockGateway::new();
        let effects = EffectQueue::new(db.clone(), ledger.clone());

        let mut restaurant_ids = Vec::new();
        for name in ["Pizzeria Uno", "Zen Sushi"] {
            let r = catalog
                .create(RestaurantCreate {
                    name: name.to_string(),
                    cuisine: None,
                    menu: vec![],
                })
                .unwrap();
            restaurant_ids.push(r.id);
        }

        let sink = make_sink(store.clone(), &restaurant_ids);
        let engine = SettlementEngine::new(
            sink,
            ledger.clone(),
            catalog,
            Arc::new(gateway.clone()),
            effects,
            "gbp",
        );

        Fixture {
            engine,
            store,
            ledger,
            gateway,
            restaurant_ids,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_sink(|store, _| Arc::new(store))
    }

    fn customer() -> CurrentUser {
        CurrentUser {
            id: "u1".to_string(),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            is_admin: false,
        }
    }

    fn address() -> Address {
        Address {
            street: "1 High Street".to_string(),
            postcode: "AB1 2CD".to_string(),
            county: "Kent".to_string(),
            country: "UK".to_string(),
        }
    }

    fn cart_item(name: &str, price: f64, quantity: i32, restaurant_id: &str) -> CartItem {
        CartItem {
            name: name.to_string(),
            price,
            quantity,
            restaurant_id: Some(restaurant_id.to_string()),
        }
    }

    /// Create an intent for `minor` pence and mark it captured.
    async fn captured_charge(fx: &Fixture, minor: i64) -> ChargeConfirmation {
        let intent = fx.gateway.create_intent(minor, "gbp").await.unwrap();
        fx.gateway.mark_succeeded(&intent.id);
        ChargeConfirmation {
            payment_intent_id: intent.id,
        }
    }

    #[tokio::test]
    async fn test_two_restaurant_cart_creates_two_orders() {
        let fx = fixture();
        let (r1, r2) = (fx.restaurant_ids[0].clone(), fx.restaurant_ids[1].clone());
        let charge = captured_charge(&fx, 2600).await;

        let receipt = fx
            .engine
            .settle(
                &customer(),
                vec![
                    cart_item("Pizza", 10.0, 2, &r1),
                    cart_item("Sushi", 6.0, 1, &r2),
                ],
                address(),
                Some("Ring the bell".to_string()),
                0,
                charge,
            )
            .await
            .unwrap();

        assert_eq!(receipt.orders.len(), 2);
        let totals: Vec<f64> = receipt.orders.iter().map(|o| o.total_amount).collect();
        assert_eq!(totals, [20.0, 6.0]);

        for order in &receipt.orders {
            assert_eq!(order.status, OrderStatus::Paid);
            assert_eq!(order.special_instructions, "Ring the bell");
            assert_eq!(order.user_id, "u1");
            assert!(fx.store.get(&order.id).unwrap().is_some());
        }
        assert_eq!(
            receipt.orders[0].restaurant_name.as_deref(),
            Some("Pizzeria Uno")
        );

        assert_eq!(receipt.payment.subtotal, 26.0);
        assert_eq!(receipt.payment.discount, 0.0);
        assert_eq!(receipt.payment.total, 26.0);
        // One point per whole pound invoiced
        assert_eq!(fx.ledger.balance("u1").unwrap(), 26);
        assert_eq!(receipt.payment.points_balance, 26);
    }

    #[tokio::test]
    async fn test_redemption_scenario() {
        // 500 points, redeem 300 (£3) on a £26 subtotal → charge £23,
        // final balance 500 − 300 + floor(23) = 223
        let fx = fixture();
        let (r1, r2) = (fx.restaurant_ids[0].clone(), fx.restaurant_ids[1].clone());
        fx.ledger.accrue("u1", 500).unwrap();
        let charge = captured_charge(&fx, 2300).await;

        let receipt = fx
            .engine
            .settle(
                &customer(),
                vec![
                    cart_item("Pizza", 10.0, 2, &r1),
                    cart_item("Sushi", 6.0, 1, &r2),
                ],
                address(),
                None,
                300,
                charge,
            )
            .await
            .unwrap();

        assert_eq!(receipt.payment.discount, 3.0);
        assert_eq!(receipt.payment.total, 23.0);
        assert_eq!(receipt.payment.points_redeemed, 300);
        assert_eq!(receipt.payment.points_balance, 223);
        assert_eq!(fx.ledger.balance("u1").unwrap(), 223);

        // The split keeps full bucket totals; the discount is global
        let totals: Vec<f64> = receipt.orders.iter().map(|o| o.total_amount).collect();
        assert_eq!(totals, [20.0, 6.0]);
    }

    #[tokio::test]
    async fn test_incomplete_address_rejected_before_charge() {
        let fx = fixture();
        let r1 = fx.restaurant_ids[0].clone();

        let result = fx
            .engine
            .settle(
                &customer(),
                vec![cart_item("Pizza", 10.0, 1, &r1)],
                Address {
                    street: String::new(),
                    ..address()
                },
                None,
                0,
                ChargeConfirmation {
                    payment_intent_id: "pi_never_checked".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(SettlementError::AddressIncomplete)));
        assert!(fx.store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_invalid_items_rejected() {
        let fx = fixture();
        let r1 = fx.restaurant_ids[0].clone();

        let result = fx
            .engine
            .settle(
                &customer(),
                vec![
                    cart_item("Bad", -1.0, 1, &r1),
                    CartItem {
                        name: "Orphan".to_string(),
                        price: 5.0,
                        quantity: 1,
                        restaurant_id: None,
                    },
                ],
                address(),
                None,
                0,
                ChargeConfirmation {
                    payment_intent_id: "pi_never_checked".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(SettlementError::NoValidItems)));
    }

    #[tokio::test]
    async fn test_unconfirmed_charge_creates_nothing() {
        let fx = fixture();
        let r1 = fx.restaurant_ids[0].clone();
        // Intent exists but was never captured
        let intent = fx.gateway.create_intent(1000, "gbp").await.unwrap();

        let result = fx
            .engine
            .settle(
                &customer(),
                vec![cart_item("Pizza", 10.0, 1, &r1)],
                address(),
                None,
                0,
                ChargeConfirmation {
                    payment_intent_id: intent.id,
                },
            )
            .await;

        assert!(matches!(result, Err(SettlementError::ChargeNotConfirmed(_))));
        assert!(fx.store.list_all().unwrap().is_empty());
        assert_eq!(fx.ledger.balance("u1").unwrap(), 0);
    }

    #[tokio::test]
    async fn test_amount_mismatch_rejected() {
        let fx = fixture();
        let r1 = fx.restaurant_ids[0].clone();
        // Captured £9.00 for a £10.00 cart
        let charge = captured_charge(&fx, 900).await;

        let result = fx
            .engine
            .settle(
                &customer(),
                vec![cart_item("Pizza", 10.0, 1, &r1)],
                address(),
                None,
                0,
                charge,
            )
            .await;

        assert!(matches!(result, Err(SettlementError::ChargeNotConfirmed(_))));
        assert!(fx.store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_discount_exceeding_subtotal_rejected() {
        let fx = fixture();
        let r1 = fx.restaurant_ids[0].clone();
        fx.ledger.accrue("u1", 5000).unwrap();

        let result = fx
            .engine
            .settle(
                &customer(),
                // £10 subtotal, 2000 points = £20 discount
                vec![cart_item("Pizza", 10.0, 1, &r1)],
                address(),
                None,
                2000,
                ChargeConfirmation {
                    payment_intent_id: "pi_never_checked".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(SettlementError::InvalidPoints(_))));
    }

    #[tokio::test]
    async fn test_failed_redemption_does_not_roll_back_orders() {
        // Balance shrinks between charge and settlement: redemption is
        // refused, orders stand, accrual still happens.
        let fx = fixture();
        let (r1, r2) = (fx.restaurant_ids[0].clone(), fx.restaurant_ids[1].clone());
        fx.ledger.accrue("u1", 100).unwrap();
        let charge = captured_charge(&fx, 2300).await;

        let receipt = fx
            .engine
            .settle(
                &customer(),
                vec![
                    cart_item("Pizza", 10.0, 2, &r1),
                    cart_item("Sushi", 6.0, 1, &r2),
                ],
                address(),
                None,
                300, // more than the 100 available
                charge,
            )
            .await
            .unwrap();

        assert_eq!(receipt.orders.len(), 2);
        // 100 (untouched) + floor(23) accrued
        assert_eq!(fx.ledger.balance("u1").unwrap(), 123);
    }

    #[tokio::test]
    async fn test_partial_persistence_names_both_sides() {
        let fx = fixture_with_sink(|store, ids| {
            Arc::new(FailFor {
                inner: store,
                restaurant_id: ids[1].clone(),
            })
        });
        let (r1, r2) = (fx.restaurant_ids[0].clone(), fx.restaurant_ids[1].clone());
        let charge = captured_charge(&fx, 2600).await;

        let result = fx
            .engine
            .settle(
                &customer(),
                vec![
                    cart_item("Pizza", 10.0, 2, &r1),
                    cart_item("Sushi", 6.0, 1, &r2),
                ],
                address(),
                None,
                0,
                charge,
            )
            .await;

        let Err(SettlementError::PartialPersistence { created, failed }) = result else {
            panic!("Expected PartialPersistence");
        };
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].restaurant_id.as_deref(), Some(r1.as_str()));
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].restaurant_id, r2);
        assert_eq!(failed[0].total_amount, 6.0);

        // The surviving order is durable and accrual reflects it alone
        assert_eq!(fx.store.list_all().unwrap().len(), 1);
        assert_eq!(fx.ledger.balance("u1").unwrap(), 20);
    }

    #[tokio::test]
    async fn test_unknown_restaurant_name_falls_back() {
        let fx = fixture();
        let charge = captured_charge(&fx, 1000).await;

        let receipt = fx
            .engine
            .settle(
                &customer(),
                vec![cart_item("Mystery Dish", 10.0, 1, "r-unseeded")],
                address(),
                None,
                0,
                charge,
            )
            .await
            .unwrap();

        assert_eq!(receipt.orders[0].restaurant_name.as_deref(), Some("Unknown"));
    }
}

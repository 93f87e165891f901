//! Order persistence

use redb::ReadableTable;
use shared::models::{Order, OrderStatus};

use crate::db::{Db, ORDERS_TABLE, StoreResult};

/// redb-backed order collection. Values are JSON snapshots keyed by order id.
#[derive(Clone, Debug)]
pub struct OrderStore {
    db: Db,
}

impl OrderStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Persist a new order. Each insert commits its own transaction so one
    /// failed bucket never blocks the others during settlement.
    pub fn insert(&self, order: &Order) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            table.insert(order.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get(&self, order_id: &str) -> StoreResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All orders, newest first.
    pub fn list_all(&self) -> StoreResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            orders.push(order);
        }

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// One user's orders, newest first.
    pub fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<Order>> {
        let mut orders = self.list_all()?;
        orders.retain(|o| o.user_id == user_id);
        Ok(orders)
    }

    /// Update the status field; returns the updated order, or `None` when the
    /// order does not exist.
    pub fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> StoreResult<Option<Order>> {
        let txn = self.db.begin_write()?;
        let updated;
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            let Some(existing) = table.get(order_id)? else {
                return Ok(None);
            };
            let mut order: Order = serde_json::from_slice(existing.value())?;
            drop(existing);
            order.status = status;
            let value = serde_json::to_vec(&order)?;
            table.insert(order_id, value.as_slice())?;
            updated = order;
        }
        txn.commit()?;
        Ok(Some(updated))
    }
}

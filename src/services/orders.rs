//! Order lifecycle: checkout, cancellation with stock restoration, and
//! per-user / per-timeframe queries.
//!
//! Checkout is check-then-commit: every cart line is validated against one
//! catalog snapshot before any stock moves. The commit itself decrements one
//! product per load-modify-save cycle, so a failure partway through leaves
//! earlier decrements applied. There is no rollback; under the single-writer
//! deployment assumption the validate phase makes that path unreachable.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::domain::aggregates::{Cart, Order};
use crate::services::catalog::Catalog;
use crate::storage::{Store, ORDERS_FILE};
use crate::{Result, ShopError};

#[derive(Clone, Debug)]
pub struct OrderBook {
    store: Store,
    catalog: Catalog,
}

impl OrderBook {
    pub fn new(store: Store) -> Self {
        let catalog = Catalog::new(store.clone());
        Self { store, catalog }
    }

    pub fn list(&self) -> Result<Vec<Order>> {
        Ok(self.store.load_collection(ORDERS_FILE)?)
    }

    /// Converts a cart into an order. All-or-nothing availability gate: if
    /// any line references a missing product or more stock than is on hand,
    /// no stock moves and the error names the offending line.
    pub fn create_order(&self, username: &str, cart: &Cart) -> Result<String> {
        if cart.is_empty() {
            return Err(ShopError::InvalidInput("cart is empty".into()));
        }

        // Validate phase, one catalog snapshot.
        let products = self.catalog.list()?;
        for item in cart.items() {
            let product = products
                .iter()
                .find(|p| p.product_id == item.product_id)
                .ok_or_else(|| ShopError::ProductNotFound(item.product_id.to_string()))?;
            if product.stock < item.quantity {
                return Err(ShopError::InsufficientStock {
                    product_id: item.product_id.to_string(),
                    requested: item.quantity,
                    available: product.stock,
                });
            }
        }

        // Commit phase, one decrement per line.
        for item in cart.items() {
            if let Err(err) = self.catalog.decrease_stock(&item.product_id, item.quantity) {
                warn!(
                    product_id = %item.product_id,
                    %err,
                    "decrement failed mid-commit; earlier lines stay applied"
                );
                return Err(err);
            }
        }

        let order = Order::from_cart(username, cart);
        let mut orders = self.list()?;
        orders.push(order.clone());
        self.store.save_collection(ORDERS_FILE, &orders)?;
        info!(order_id = %order.order_id, username, total = %order.total, "order created");
        Ok(order.order_id)
    }

    /// Cancels an active order: restores each line's quantity to catalog
    /// stock, flips the status and persists the full orders sequence with
    /// the order retained. Cancelling twice is an error.
    pub fn cancel_order(&self, order_id: &str) -> Result<Order> {
        let mut orders = self.list()?;
        let order = orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| ShopError::OrderNotFound(order_id.to_string()))?;
        order.cancel()?;

        // Best effort: a line whose product has left the catalog is logged
        // and skipped, the cancellation itself still stands.
        for item in &order.items {
            if let Err(err) = self.catalog.increase_stock(&item.product_id, item.quantity) {
                warn!(
                    order_id,
                    product_id = %item.product_id,
                    %err,
                    "stock restore failed during cancellation"
                );
            }
        }

        let canceled = order.clone();
        self.store.save_collection(ORDERS_FILE, &orders)?;
        info!(order_id, "order canceled");
        Ok(canceled)
    }

    /// Full scan filtered by username, insertion order preserved.
    pub fn orders_for_user(&self, username: &str) -> Result<Vec<Order>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|o| o.username == username)
            .collect())
    }

    /// Keeps orders dated at or after `start`. Orders whose stored date does
    /// not parse are logged and skipped rather than failing the whole
    /// filter.
    pub fn filter_by_timeframe(orders: &[Order], start: NaiveDateTime) -> Vec<Order> {
        orders
            .iter()
            .filter(|order| match order.parsed_date() {
                Some(date) => date >= start,
                None => {
                    warn!(
                        order_id = %order.order_id,
                        date = %order.date,
                        "skipping order with unparseable date"
                    );
                    false
                }
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::OrderStatus;
    use crate::domain::value_objects::ProductId;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Catalog, OrderBook) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());
        store.init().unwrap();
        let catalog = Catalog::new(store.clone());
        catalog
            .create("Widget", Decimal::new(10, 0), 5, "tools", "")
            .unwrap();
        catalog
            .create("Gadget", Decimal::new(20, 0), 1, "tools", "")
            .unwrap();
        (dir, catalog, OrderBook::new(store))
    }

    fn cart_with(catalog: &Catalog, lines: &[(&str, u32)]) -> Cart {
        let mut cart = Cart::new();
        for (id, qty) in lines {
            catalog
                .add_to_cart(&mut cart, &ProductId::new(*id), *qty)
                .unwrap();
        }
        cart
    }

    #[test]
    fn checkout_decrements_stock_and_records_the_order() {
        let (_dir, catalog, orders) = setup();
        let cart = cart_with(&catalog, &[("P001", 3)]);
        let order_id = orders.create_order("alice", &cart).unwrap();

        assert_eq!(catalog.get(&ProductId::new("P001")).unwrap().unwrap().stock, 2);
        let recorded = orders.orders_for_user("alice").unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].order_id, order_id);
        assert_eq!(recorded[0].total, Decimal::new(30, 0));
        assert_eq!(recorded[0].status, OrderStatus::Active);
    }

    #[test]
    fn insufficient_stock_mutates_nothing() {
        let (_dir, catalog, orders) = setup();
        let cart = cart_with(&catalog, &[("P001", 10)]);
        let err = orders.create_order("alice", &cart).unwrap_err();
        assert!(matches!(err, ShopError::InsufficientStock { .. }));
        assert_eq!(catalog.get(&ProductId::new("P001")).unwrap().unwrap().stock, 5);
        assert!(orders.list().unwrap().is_empty());
    }

    #[test]
    fn one_bad_line_blocks_the_whole_cart() {
        let (_dir, catalog, orders) = setup();
        // P001 has plenty, P002 does not; neither may move
        let cart = cart_with(&catalog, &[("P001", 2), ("P002", 3)]);
        let err = orders.create_order("alice", &cart).unwrap_err();
        assert!(matches!(err, ShopError::InsufficientStock { .. }));
        assert_eq!(catalog.get(&ProductId::new("P001")).unwrap().unwrap().stock, 5);
        assert_eq!(catalog.get(&ProductId::new("P002")).unwrap().unwrap().stock, 1);
    }

    #[test]
    fn unknown_product_in_cart_fails_checkout() {
        let (_dir, catalog, orders) = setup();
        let mut cart = cart_with(&catalog, &[("P001", 1)]);
        // line for a product that has since left the catalog
        catalog.add_to_cart(&mut cart, &ProductId::new("P002"), 1).unwrap();
        catalog.remove(&ProductId::new("P002")).unwrap();

        let err = orders.create_order("alice", &cart).unwrap_err();
        assert!(matches!(err, ShopError::ProductNotFound(_)));
        assert_eq!(catalog.get(&ProductId::new("P001")).unwrap().unwrap().stock, 5);
    }

    #[test]
    fn empty_cart_is_rejected() {
        let (_dir, _catalog, orders) = setup();
        let err = orders.create_order("alice", &Cart::new()).unwrap_err();
        assert!(matches!(err, ShopError::InvalidInput(_)));
    }

    #[test]
    fn cancel_restores_stock_exactly_once() {
        let (_dir, catalog, orders) = setup();
        let cart = cart_with(&catalog, &[("P001", 3)]);
        let order_id = orders.create_order("alice", &cart).unwrap();
        assert_eq!(catalog.get(&ProductId::new("P001")).unwrap().unwrap().stock, 2);

        let canceled = orders.cancel_order(&order_id).unwrap();
        assert_eq!(canceled.status, OrderStatus::Canceled);
        assert_eq!(catalog.get(&ProductId::new("P001")).unwrap().unwrap().stock, 5);

        // the order stays on file, flagged canceled
        let on_file = orders.orders_for_user("alice").unwrap();
        assert_eq!(on_file.len(), 1);
        assert_eq!(on_file[0].status, OrderStatus::Canceled);

        let err = orders.cancel_order(&order_id).unwrap_err();
        assert!(matches!(err, ShopError::AlreadyCanceled(_)));
        assert_eq!(catalog.get(&ProductId::new("P001")).unwrap().unwrap().stock, 5);
    }

    #[test]
    fn cancel_unknown_order_is_not_found() {
        let (_dir, _catalog, orders) = setup();
        let err = orders.cancel_order("no-such-order").unwrap_err();
        assert!(matches!(err, ShopError::OrderNotFound(_)));
    }

    #[test]
    fn cancel_survives_a_product_that_left_the_catalog() {
        let (_dir, catalog, orders) = setup();
        let cart = cart_with(&catalog, &[("P001", 2), ("P002", 1)]);
        let order_id = orders.create_order("alice", &cart).unwrap();
        catalog.remove(&ProductId::new("P002")).unwrap();

        let canceled = orders.cancel_order(&order_id).unwrap();
        assert_eq!(canceled.status, OrderStatus::Canceled);
        // the surviving product is still restored
        assert_eq!(catalog.get(&ProductId::new("P001")).unwrap().unwrap().stock, 5);
    }

    #[test]
    fn user_query_is_idempotent_and_scoped() {
        let (_dir, catalog, orders) = setup();
        orders
            .create_order("alice", &cart_with(&catalog, &[("P001", 1)]))
            .unwrap();
        orders
            .create_order("bob", &cart_with(&catalog, &[("P001", 1)]))
            .unwrap();

        let first = orders.orders_for_user("alice").unwrap();
        let second = orders.orders_for_user("alice").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].username, "alice");
    }

    #[test]
    fn timeframe_filter_skips_malformed_dates() {
        let (_dir, catalog, orders) = setup();
        orders
            .create_order("alice", &cart_with(&catalog, &[("P001", 1)]))
            .unwrap();
        let mut all = orders.list().unwrap();
        let mut stale = all[0].clone();
        stale.order_id = "stale".into();
        stale.date = "2001-01-01 00:00:00".into();
        let mut garbled = all[0].clone();
        garbled.order_id = "garbled".into();
        garbled.date = "last tuesday".into();
        all.push(stale);
        all.push(garbled);

        let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let recent = OrderBook::filter_by_timeframe(&all, start);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].order_id, all[0].order_id);
    }
}

//! Read-only admin reports over orders and the catalog.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::aggregates::{Order, Product};
use crate::domain::value_objects::ProductId;
use crate::services::orders::OrderBook;
use crate::storage::{Store, ORDERS_FILE, PRODUCTS_FILE};
use crate::Result;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FinancialReport {
    pub total_revenue: Decimal,
    pub total_orders: usize,
    /// Revenue keyed by `YYYY-MM-DD`; orders with an unusable date land in
    /// the `"unknown"` bucket.
    pub sales_by_date: BTreeMap<String, Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockLine {
    pub product_id: ProductId,
    pub name: String,
    pub stock: u32,
}

/// Units sold and revenue for one product, priced at the CURRENT catalog
/// price rather than what each order actually charged.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProductStats {
    pub sold: u64,
    pub revenue: Decimal,
}

#[derive(Clone, Debug)]
pub struct Reports {
    store: Store,
}

impl Reports {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Revenue summary over every order on file. Canceled orders are NOT
    /// excluded from the totals; whether they should be is an open product
    /// question, so the existing behavior stands.
    pub fn financial(&self) -> Result<FinancialReport> {
        let orders: Vec<Order> = self.store.load_collection(ORDERS_FILE)?;
        let mut total_revenue = Decimal::ZERO;
        let mut sales_by_date: BTreeMap<String, Decimal> = BTreeMap::new();
        for order in &orders {
            let day = order.date.get(..10).unwrap_or("unknown").to_string();
            total_revenue += order.total;
            *sales_by_date.entry(day).or_insert(Decimal::ZERO) += order.total;
        }
        Ok(FinancialReport {
            total_revenue,
            total_orders: orders.len(),
            sales_by_date,
        })
    }

    /// Direct projection of the catalog: id, name, stock on hand.
    pub fn stock(&self) -> Result<Vec<StockLine>> {
        let products: Vec<Product> = self.store.load_collection(PRODUCTS_FILE)?;
        Ok(products
            .into_iter()
            .map(|p| StockLine {
                product_id: p.product_id,
                name: p.name,
                stock: p.stock,
            })
            .collect())
    }

    /// Per-product sales over all orders. Every catalog product gets an
    /// entry, sold or not; order lines for products no longer in the
    /// catalog are skipped.
    pub fn sales_stats(&self) -> Result<BTreeMap<ProductId, ProductStats>> {
        let products: Vec<Product> = self.store.load_collection(PRODUCTS_FILE)?;
        let orders: Vec<Order> = self.store.load_collection(ORDERS_FILE)?;
        Ok(compute_stats(&products, &orders))
    }

    /// Same as [`sales_stats`](Self::sales_stats) but restricted to orders
    /// dated at or after `start`.
    pub fn sales_stats_since(&self, start: NaiveDateTime) -> Result<BTreeMap<ProductId, ProductStats>> {
        let products: Vec<Product> = self.store.load_collection(PRODUCTS_FILE)?;
        let orders: Vec<Order> = self.store.load_collection(ORDERS_FILE)?;
        let recent = OrderBook::filter_by_timeframe(&orders, start);
        Ok(compute_stats(&products, &recent))
    }
}

fn compute_stats(products: &[Product], orders: &[Order]) -> BTreeMap<ProductId, ProductStats> {
    let mut stats: BTreeMap<ProductId, ProductStats> = products
        .iter()
        .map(|p| (p.product_id.clone(), ProductStats::default()))
        .collect();
    for order in orders {
        for line in &order.items {
            let price = match products.iter().find(|p| p.product_id == line.product_id) {
                Some(product) => product.price,
                None => continue,
            };
            if let Some(entry) = stats.get_mut(&line.product_id) {
                entry.sold += u64::from(line.quantity);
                entry.revenue += price * Decimal::from(line.quantity);
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Cart;
    use crate::services::catalog::Catalog;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Catalog, OrderBook, Reports) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());
        store.init().unwrap();
        let catalog = Catalog::new(store.clone());
        catalog
            .create("Widget", Decimal::new(10, 0), 10, "tools", "")
            .unwrap();
        catalog
            .create("Gadget", Decimal::new(20, 0), 10, "tools", "")
            .unwrap();
        (
            dir,
            catalog.clone(),
            OrderBook::new(store.clone()),
            Reports::new(store),
        )
    }

    fn order_of(catalog: &Catalog, orders: &OrderBook, user: &str, id: &str, qty: u32) -> String {
        let mut cart = Cart::new();
        catalog
            .add_to_cart(&mut cart, &ProductId::new(id), qty)
            .unwrap();
        orders.create_order(user, &cart).unwrap()
    }

    #[test]
    fn financial_report_counts_canceled_orders_too() {
        let (_dir, catalog, orders, reports) = setup();
        order_of(&catalog, &orders, "alice", "P001", 3); // 30
        let canceled = order_of(&catalog, &orders, "bob", "P002", 1); // 20
        orders.cancel_order(&canceled).unwrap();

        let report = reports.financial().unwrap();
        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_revenue, Decimal::new(50, 0));
        // both orders were placed today, so they share one date bucket
        assert_eq!(report.sales_by_date.len(), 1);
        assert_eq!(
            report.sales_by_date.values().copied().sum::<Decimal>(),
            Decimal::new(50, 0)
        );
    }

    #[test]
    fn empty_order_file_reports_zero() {
        let (_dir, _catalog, _orders, reports) = setup();
        let report = reports.financial().unwrap();
        assert_eq!(report.total_orders, 0);
        assert_eq!(report.total_revenue, Decimal::ZERO);
        assert!(report.sales_by_date.is_empty());
    }

    #[test]
    fn short_date_lands_in_unknown_bucket() {
        let (_dir, catalog, orders, reports) = setup();
        order_of(&catalog, &orders, "alice", "P001", 1);
        let mut all = orders.list().unwrap();
        all[0].date = "n/a".into();
        Store::new(reports.store.root())
            .save_collection(ORDERS_FILE, &all)
            .unwrap();

        let report = reports.financial().unwrap();
        assert_eq!(report.sales_by_date.keys().next().unwrap(), "unknown");
    }

    #[test]
    fn stock_report_projects_the_catalog() {
        let (_dir, catalog, orders, reports) = setup();
        order_of(&catalog, &orders, "alice", "P001", 4);
        let lines = reports.stock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, ProductId::new("P001"));
        assert_eq!(lines[0].stock, 6);
        assert_eq!(lines[1].stock, 10);
    }

    #[test]
    fn sales_stats_price_at_current_catalog_price() {
        let (_dir, catalog, orders, reports) = setup();
        order_of(&catalog, &orders, "alice", "P001", 2);
        // reprice after the sale: stats follow the new price
        catalog
            .update(
                &ProductId::new("P001"),
                crate::domain::aggregates::ProductPatch {
                    price: Some(Decimal::new(15, 0)),
                    ..Default::default()
                },
            )
            .unwrap();

        let stats = reports.sales_stats().unwrap();
        let widget = &stats[&ProductId::new("P001")];
        assert_eq!(widget.sold, 2);
        assert_eq!(widget.revenue, Decimal::new(30, 0));
        // unsold product still gets a zeroed entry
        assert_eq!(stats[&ProductId::new("P002")], ProductStats::default());
    }

    #[test]
    fn sales_stats_since_excludes_older_orders() {
        let (_dir, catalog, orders, reports) = setup();
        order_of(&catalog, &orders, "alice", "P001", 2);
        let mut all = orders.list().unwrap();
        all[0].date = "2001-01-01 00:00:00".into();
        Store::new(reports.store.root())
            .save_collection(ORDERS_FILE, &all)
            .unwrap();

        let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let stats = reports.sales_stats_since(start).unwrap();
        assert_eq!(stats[&ProductId::new("P001")].sold, 0);
    }
}

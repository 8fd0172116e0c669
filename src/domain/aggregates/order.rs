//! Order Aggregate
//!
//! Immutable after creation except for the status flag, which moves
//! `Active -> Canceled` exactly once and never back. Orders are appended to
//! the orders file and never physically deleted.

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregates::cart::Cart;
use crate::domain::value_objects::ProductId;
use crate::ShopError;

/// Wire format of the `date` field. Kept as a string on the record so a
/// malformed value in the file degrades one order, not every read.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Active,
    Canceled,
}

/// Priced line item, snapshotted from the cart at checkout. Distinct from
/// the live catalog entry and never re-resolved against it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderLine {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub username: String,
    pub items: Vec<OrderLine>,
    pub date: String,
    pub status: OrderStatus,
    pub total: Decimal,
}

impl Order {
    /// Builds an active order from a cart: random unique id, current
    /// timestamp, total taken from the cart's snapshotted prices.
    pub fn from_cart(username: impl Into<String>, cart: &Cart) -> Self {
        let items = cart
            .items()
            .iter()
            .map(|i| OrderLine {
                product_id: i.product_id.clone(),
                name: i.name.clone(),
                quantity: i.quantity,
                price: i.price,
            })
            .collect();
        Self {
            order_id: Uuid::new_v4().to_string(),
            username: username.into(),
            items,
            date: Utc::now().format(DATE_FORMAT).to_string(),
            status: OrderStatus::Active,
            total: cart.total(),
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.status == OrderStatus::Canceled
    }

    /// Flips the status. A second cancellation is an explicit error, not a
    /// silent no-op.
    pub fn cancel(&mut self) -> Result<(), ShopError> {
        if self.is_canceled() {
            return Err(ShopError::AlreadyCanceled(self.order_id.clone()));
        }
        self.status = OrderStatus::Canceled;
        Ok(())
    }

    /// None when the stored date does not match [`DATE_FORMAT`].
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

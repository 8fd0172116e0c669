//! Cart Aggregate
//!
//! Ephemeral, session-scoped and threaded through calls as a plain value;
//! nothing here touches the store. Name and price are snapshotted when a
//! line is added and never re-resolved: the price a customer saw when they
//! put the item in the cart is the price the order is built from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ProductId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Adds a line, merging into an existing line with the same product id
    /// instead of duplicating it. The existing snapshot wins on merge.
    pub fn add_item(&mut self, item: CartItem) {
        if self.bump_quantity(&item.product_id, item.quantity) {
            return;
        }
        self.items.push(item);
    }

    /// Increments an existing line's quantity; false if the product is not
    /// in the cart yet.
    pub fn bump_quantity(&mut self, product_id: &ProductId, qty: u32) -> bool {
        match self.items.iter_mut().find(|i| &i.product_id == product_id) {
            Some(item) => {
                item.quantity += qty;
                true
            }
            None => false,
        }
    }

    /// Drops the line for `product_id`; a miss is not an error.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.items.retain(|i| &i.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

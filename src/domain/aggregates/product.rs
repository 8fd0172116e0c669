//! Product Aggregate

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ProductId;
use crate::ShopError;

/// Catalog record. The catalog file holds the canonical `stock` value;
/// carts and orders only ever carry snapshots of `name` and `price`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

fn default_category() -> String {
    "Uncategorized".to_string()
}

impl Product {
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        stock: u32,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            price,
            stock,
            category: category.into(),
            description: description.into(),
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn receive_stock(&mut self, qty: u32) {
        self.stock = self.stock.saturating_add(qty);
    }

    /// Floor-checked decrement: stock is untouched when the request exceeds
    /// what is available.
    pub fn deduct_stock(&mut self, qty: u32) -> Result<(), ShopError> {
        if qty > self.stock {
            return Err(ShopError::InsufficientStock {
                product_id: self.product_id.to_string(),
                requested: qty,
                available: self.stock,
            });
        }
        self.stock -= qty;
        Ok(())
    }

    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }
}

/// Partial field edit; only populated fields are applied.
#[derive(Clone, Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub category: Option<String>,
    pub description: Option<String>,
}

//! Product catalog over the flat-file store.
//!
//! Every mutation reloads the whole products file, edits the in-memory copy
//! and overwrites the file; nothing is cached between calls, so back-to-back
//! operations always see the latest persisted state.

use rust_decimal::Decimal;
use tracing::info;

use crate::domain::aggregates::{Cart, CartItem, Product, ProductPatch};
use crate::domain::value_objects::ProductId;
use crate::storage::{IdTracker, Store, PRODUCTS_FILE, TRACKER_FILE};
use crate::{Result, ShopError};

/// Browse filter; unset fields do not constrain the result.
#[derive(Clone, Debug, Default)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    /// Case-insensitive substring match on the product name.
    pub keyword: Option<String>,
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(min) = self.price_min {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.price_max {
            if product.price > max {
                return false;
            }
        }
        if let Some(keyword) = &self.keyword {
            if !product
                .name
                .to_lowercase()
                .contains(&keyword.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

#[derive(Clone, Debug)]
pub struct Catalog {
    store: Store,
}

impl Catalog {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Product>> {
        Ok(self.store.load_collection(PRODUCTS_FILE)?)
    }

    pub fn get(&self, product_id: &ProductId) -> Result<Option<Product>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|p| &p.product_id == product_id))
    }

    /// One page of the catalog plus the total record count. Pages are
    /// 1-based; a page past the end is empty, not an error.
    pub fn page(&self, page: usize, per_page: usize) -> Result<(Vec<Product>, usize)> {
        let products = self.list()?;
        let total = products.len();
        let start = page.saturating_sub(1).saturating_mul(per_page);
        let slice = products
            .into_iter()
            .skip(start)
            .take(per_page)
            .collect();
        Ok((slice, total))
    }

    pub fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect())
    }

    fn next_product_id(&self) -> Result<ProductId> {
        let mut tracker: IdTracker = self.store.load_object(TRACKER_FILE)?;
        tracker.last_product_id += 1;
        // The counter hits disk before the product does. A crash in between
        // leaves a gap in the sequence, never a duplicate id.
        self.store.save_object(TRACKER_FILE, &tracker)?;
        Ok(ProductId::from_sequence(tracker.last_product_id))
    }

    pub fn create(
        &self,
        name: impl Into<String>,
        price: Decimal,
        stock: u32,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Product> {
        let mut products = self.list()?;
        let product = Product::new(
            self.next_product_id()?,
            name,
            price,
            stock,
            category,
            description,
        );
        products.push(product.clone());
        self.store.save_collection(PRODUCTS_FILE, &products)?;
        info!(product_id = %product.product_id, name = %product.name, "product created");
        Ok(product)
    }

    /// Load-modify-save around a single product; the file is only written
    /// back when the edit succeeds.
    fn with_product<F>(&self, product_id: &ProductId, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Product) -> Result<()>,
    {
        let mut products = self.list()?;
        let product = products
            .iter_mut()
            .find(|p| &p.product_id == product_id)
            .ok_or_else(|| ShopError::ProductNotFound(product_id.to_string()))?;
        edit(product)?;
        self.store.save_collection(PRODUCTS_FILE, &products)?;
        Ok(())
    }

    pub fn increase_stock(&self, product_id: &ProductId, qty: u32) -> Result<()> {
        self.with_product(product_id, |p| {
            p.receive_stock(qty);
            info!(product_id = %p.product_id, qty, stock = p.stock, "stock increased");
            Ok(())
        })
    }

    /// Floor-checked decrement within a single load-modify-save cycle.
    pub fn decrease_stock(&self, product_id: &ProductId, qty: u32) -> Result<()> {
        self.with_product(product_id, |p| {
            p.deduct_stock(qty)?;
            info!(product_id = %p.product_id, qty, stock = p.stock, "stock decreased");
            Ok(())
        })
    }

    /// Direct stock overwrite, bypassing the increment/decrement arithmetic.
    pub fn set_stock(&self, product_id: &ProductId, stock: u32) -> Result<()> {
        self.with_product(product_id, |p| {
            p.stock = stock;
            Ok(())
        })
    }

    pub fn update(&self, product_id: &ProductId, patch: ProductPatch) -> Result<()> {
        self.with_product(product_id, |p| {
            p.apply(patch);
            Ok(())
        })
    }

    pub fn remove(&self, product_id: &ProductId) -> Result<()> {
        let mut products = self.list()?;
        let before = products.len();
        products.retain(|p| &p.product_id != product_id);
        if products.len() == before {
            return Err(ShopError::ProductNotFound(product_id.to_string()));
        }
        self.store.save_collection(PRODUCTS_FILE, &products)?;
        info!(%product_id, "product removed");
        Ok(())
    }

    /// Puts `qty` of a product into the cart. A repeat add bumps the
    /// existing line without re-resolving the price; a first add snapshots
    /// the product's current name and price.
    pub fn add_to_cart(&self, cart: &mut Cart, product_id: &ProductId, qty: u32) -> Result<()> {
        if cart.bump_quantity(product_id, qty) {
            return Ok(());
        }
        let product = self
            .get(product_id)?
            .ok_or_else(|| ShopError::ProductNotFound(product_id.to_string()))?;
        cart.add_item(CartItem {
            product_id: product.product_id,
            name: product.name,
            price: product.price,
            quantity: qty,
        });
        Ok(())
    }
}

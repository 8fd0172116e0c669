//! Storefront Core
//!
//! Flat-file e-commerce storefront: product catalog, session carts, order
//! lifecycle with stock consistency, admin reports and a user directory.
//!
//! ## Features
//! - Product catalog with filters and pagination
//! - Shopping cart with price locked at add-to-cart time
//! - Checkout with an all-or-nothing stock availability gate
//! - Order cancellation that restores stock
//! - Financial and stock reports
//!
//! All state lives in JSON files under a single data directory; every write
//! replaces the whole file. The deployment assumption is a single process
//! with low concurrency, see [`storage::Store`].

use thiserror::Error;

pub mod domain;
pub mod services;
pub mod storage;

pub use domain::aggregates::{Cart, CartItem, Order, OrderLine, OrderStatus};
pub use domain::aggregates::{NewUser, Product, ProductPatch, Role, User, UserPatch};
pub use domain::value_objects::{ProductId, Timeframe};
pub use services::{Catalog, Directory, OrderBook, ProductFilter, Reports};
pub use storage::Store;

// =============================================================================
// Error Types
// =============================================================================

/// Failures of the backing JSON files themselves. These are fatal to the
/// operation that hit them and propagate to the outermost caller unchanged.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("resource {name} is missing")]
    Missing { name: String },

    #[error("failed to access {name}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("resource {name} is corrupt")]
    Corrupt {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {name}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Business-rule failures. Expected conditions the caller branches on,
/// never panics; resource failures fold in via [`StoreError`].
#[derive(Error, Debug)]
pub enum ShopError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already canceled: {0}")]
    AlreadyCanceled(String),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ShopError>;

//! Services over the flat-file store. Each service holds a [`Store`] handle
//! and reloads its backing file on every call.
//!
//! [`Store`]: crate::storage::Store
pub mod catalog;
pub mod orders;
pub mod reports;
pub mod users;

pub use catalog::{Catalog, ProductFilter};
pub use orders::OrderBook;
pub use reports::{FinancialReport, ProductStats, Reports, StockLine};
pub use users::Directory;

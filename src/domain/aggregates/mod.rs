//! Aggregates module
pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem};
pub use order::{Order, OrderLine, OrderStatus, DATE_FORMAT};
pub use product::{Product, ProductPatch};
pub use user::{NewUser, Role, User, UserPatch};

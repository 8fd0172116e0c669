//! Storefront domain: aggregates and the value objects they share.
pub mod aggregates;
pub mod value_objects;

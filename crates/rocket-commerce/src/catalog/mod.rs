//! Product catalog module.
//!
//! Contains the product and stock types along with the lookup traits the
//! cart uses to reach the storefront API.

mod product;
mod stock;

pub use product::{Product, ProductCatalog};
pub use stock::{StockEntry, StockService};

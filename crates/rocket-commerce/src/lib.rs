//! Storefront domain types for the Rocket Shoes cart.
//!
//! This crate provides the types shared by every other crate in the workspace:
//!
//! - **Catalog**: products and the [`ProductCatalog`] lookup seam
//! - **Stock**: point-in-time availability and the [`StockService`] lookup seam
//! - **Cart**: the ordered, id-unique list of [`CartItem`]s
//!
//! # Example
//!
//! ```rust
//! use rocket_commerce::prelude::*;
//!
//! let sneaker = Product::new(1, "Tênis de Caminhada", 179.9, "https://cdn.example.com/1.jpg");
//!
//! let cart = Cart::new().with_item(CartItem::new(sneaker, 1)).unwrap();
//! let cart = cart.with_amount(ProductId::new(1), 3).unwrap();
//!
//! assert_eq!(cart.item_count(), 3);
//! ```

pub mod error;
pub mod ids;

pub mod cart;
pub mod catalog;

pub use error::CommerceError;
pub use ids::ProductId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::ProductId;

    // Catalog
    pub use crate::catalog::{Product, ProductCatalog, StockEntry, StockService};

    // Cart
    pub use crate::cart::{Cart, CartItem, UpdateProductAmount};
}

//! Stock-checked, persisted shopping cart manager for Rocket Shoes.
//!
//! [`CartManager`] owns the cart for a session. It restores the cart from a
//! [`PersistentStore`](rocket_store::PersistentStore) on creation, checks the
//! stock service before any amount goes up, and writes the complete cart back
//! after every successful change.
//!
//! Failures never escape as panics or partial updates: the user is told
//! through a [`Notifier`], and the caller gets a [`CartError`] to branch on.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_cart::{CartManager, RecordingNotifier};
//! use rocket_commerce::prelude::*;
//! use rocket_fetch::StorefrontApi;
//! use rocket_store::FileStore;
//! use std::sync::Arc;
//!
//! let api = Arc::new(StorefrontApi::new("http://localhost:3333"));
//! let store = Arc::new(FileStore::open(".rocket")?);
//! let notifier = Arc::new(RecordingNotifier::new());
//!
//! let manager = CartManager::new(api.clone(), api, store).with_notifier(notifier.clone());
//!
//! manager.add_product(ProductId::new(1)).await?;
//! manager
//!     .update_product_amount(UpdateProductAmount::new(ProductId::new(1), 3))
//!     .await?;
//!
//! println!("{} items", manager.cart().item_count());
//! ```

mod error;
mod manager;
pub mod notify;

pub use error::{CartError, FailureKind};
pub use manager::{CartManager, CART_STORAGE_KEY};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CartError, CartManager, FailureKind, Notifier};
    pub use rocket_commerce::prelude::*;
}

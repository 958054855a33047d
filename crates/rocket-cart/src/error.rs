//! Cart mutation errors.

use rocket_commerce::{CommerceError, ProductId};
use rocket_store::StoreError;
use thiserror::Error;

/// Why a cart mutation was rejected.
///
/// Every variant has already been reported to the notifier by the time the
/// caller sees it; the value exists so callers can branch on the outcome.
#[derive(Error, Debug)]
pub enum CartError {
    /// Requested amount exceeds what the stock service reported.
    #[error("Requested {requested} of {product_id}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The stock service has no entry for the product.
    #[error("No stock entry for {0}")]
    StockNotFound(ProductId),

    /// Cart or catalog rejected the change.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// The new cart could not be written.
    #[error("Failed to persist cart: {0}")]
    Storage(#[from] StoreError),
}

/// Coarse classification of a [`CartError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Not enough stock for the requested amount.
    OutOfStock,
    /// Item missing from the cart, or product/stock missing remotely.
    NotFound,
    /// Amount not positive, or a change that would break cart uniqueness.
    InvalidInput,
    /// A remote lookup failed.
    TransportFailure,
    /// The cart could not be saved.
    StorageFailure,
}

impl CartError {
    /// Classify this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            CartError::OutOfStock { .. } => FailureKind::OutOfStock,
            CartError::StockNotFound(_) => FailureKind::NotFound,
            CartError::Commerce(e) => match e {
                CommerceError::ProductNotFound(_) | CommerceError::ItemNotInCart(_) => {
                    FailureKind::NotFound
                }
                CommerceError::DuplicateItem(_) | CommerceError::InvalidQuantity(_) => {
                    FailureKind::InvalidInput
                }
                CommerceError::LookupFailed(_) => FailureKind::TransportFailure,
            },
            CartError::Storage(_) => FailureKind::StorageFailure,
        }
    }

    /// Whether this is an out-of-stock rejection.
    pub fn is_out_of_stock(&self) -> bool {
        self.kind() == FailureKind::OutOfStock
    }
}

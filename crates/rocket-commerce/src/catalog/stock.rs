//! Stock availability types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Available quantity for a product, as reported by the stock service.
///
/// This is a point-in-time reading, not a reservation. It is never cached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockEntry {
    /// Product this entry describes.
    pub id: ProductId,
    /// Quantity available.
    pub amount: i64,
}

impl StockEntry {
    /// Create a new stock entry.
    pub fn new(id: u64, amount: i64) -> Self {
        Self {
            id: ProductId::new(id),
            amount,
        }
    }

    /// Check if nothing is available.
    pub fn is_out_of_stock(&self) -> bool {
        self.amount <= 0
    }

    /// Check if a specific quantity is available.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity <= self.amount
    }
}

/// Read-only access to remote stock levels.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the current stock entry for a product.
    async fn stock(&self, id: ProductId) -> Result<Option<StockEntry>, CommerceError>;
}

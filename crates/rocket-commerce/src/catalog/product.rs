//! Product type and catalog lookup.

use crate::error::CommerceError;
use crate::ids::ProductId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// Products are immutable once fetched; the catalog is the authoritative source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// Image URL.
    #[serde(rename = "image", alias = "imageUrl")]
    pub image_url: String,
}

impl Product {
    /// Create a new product.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        price: f64,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            price,
            image_url: image_url.into(),
        }
    }
}

/// Read-only access to the product catalog.
///
/// `Ok(None)` means the catalog answered but has no such product; `Err` means
/// the lookup itself failed.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch a single product by id.
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CommerceError>;
}

//! Storefront API endpoints.

use crate::{FetchClient, FetchError, Response};
use async_trait::async_trait;
use rocket_commerce::catalog::{Product, ProductCatalog, StockEntry, StockService};
use rocket_commerce::{CommerceError, ProductId};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for the storefront's product and stock endpoints.
///
/// - `GET /products` lists the catalog
/// - `GET /products/{id}` fetches one product
/// - `GET /stock/{id}` fetches the available amount for one product
#[derive(Debug, Clone)]
pub struct StorefrontApi {
    client: FetchClient,
}

impl StorefrontApi {
    /// Create a client for the API at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_client(
            FetchClient::new()
                .with_base_url(base_url)
                .with_default_header("Accept", "application/json"),
        )
    }

    /// Create a client from a configured [`FetchClient`].
    pub fn from_client(client: FetchClient) -> Self {
        Self { client }
    }

    /// List every product in the catalog.
    pub async fn list_products(&self) -> Result<Vec<Product>, FetchError> {
        let response = self.client.get("/products").send().await?;
        Ok(decode_entity(response)?.unwrap_or_default())
    }

    /// Fetch a single product.
    pub async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, FetchError> {
        self.fetch_entity(&format!("/products/{}", id)).await
    }

    /// Fetch the stock entry for a product.
    pub async fn fetch_stock(&self, id: ProductId) -> Result<Option<StockEntry>, FetchError> {
        self.fetch_entity(&format!("/stock/{}", id)).await
    }

    async fn fetch_entity<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, FetchError> {
        let response = self.client.get(path).send().await?;
        let entity = decode_entity(response)?;
        debug!(path, found = entity.is_some(), "storefront lookup");
        Ok(entity)
    }
}

#[async_trait]
impl ProductCatalog for StorefrontApi {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CommerceError> {
        Ok(self.fetch_product(id).await?)
    }
}

#[async_trait]
impl StockService for StorefrontApi {
    async fn stock(&self, id: ProductId) -> Result<Option<StockEntry>, CommerceError> {
        Ok(self.fetch_stock(id).await?)
    }
}

/// Interpret a lookup response.
///
/// A 404, an empty body and a JSON `null` all mean the entity is absent.
/// Any other non-2xx status is an error.
fn decode_entity<T: DeserializeOwned>(response: Response) -> Result<Option<T>, FetchError> {
    if response.is_not_found() {
        return Ok(None);
    }
    let response = response.error_for_status()?;
    if response.is_empty() {
        return Ok(None);
    }
    response.json::<Option<T>>()
}

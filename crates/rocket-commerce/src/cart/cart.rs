//! Cart and cart item types.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A shopping cart.
///
/// Items keep insertion order and are unique by product id. Every mutating
/// method is copy-on-write: it leaves `self` untouched and returns the next
/// cart, so a failed mutation never leaves a half-applied value behind.
///
/// Serializes as a plain JSON array of [`CartItem`]. Deserializing rejects
/// duplicate ids and non-positive amounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from items, validating uniqueness and amounts.
    pub fn from_items(items: Vec<CartItem>) -> Result<Self, CommerceError> {
        let mut cart = Self::new();
        for item in items {
            cart.push(item)?;
        }
        Ok(cart)
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Get number of unique items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by product id.
    pub fn find(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Check if a product is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.find(product_id).is_some()
    }

    /// Get total item count (sum of amounts).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.amount).sum()
    }

    /// Sum of every item's subtotal.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Return a cart with `item` appended.
    pub fn with_item(&self, item: CartItem) -> Result<Self, CommerceError> {
        let mut next = self.clone();
        next.push(item)?;
        Ok(next)
    }

    /// Return a cart without the item for `product_id`.
    pub fn without(&self, product_id: ProductId) -> Result<Self, CommerceError> {
        if !self.contains(product_id) {
            return Err(CommerceError::ItemNotInCart(product_id));
        }
        let items = self
            .items
            .iter()
            .filter(|i| i.product.id != product_id)
            .cloned()
            .collect();
        Ok(Self { items })
    }

    /// Return a cart with the amount of `product_id` set to `amount`.
    pub fn with_amount(&self, product_id: ProductId, amount: i64) -> Result<Self, CommerceError> {
        if amount <= 0 {
            return Err(CommerceError::InvalidQuantity(amount));
        }
        let mut next = self.clone();
        let item = next
            .items
            .iter_mut()
            .find(|i| i.product.id == product_id)
            .ok_or(CommerceError::ItemNotInCart(product_id))?;
        item.amount = amount;
        Ok(next)
    }

    fn push(&mut self, item: CartItem) -> Result<(), CommerceError> {
        if item.amount <= 0 {
            return Err(CommerceError::InvalidQuantity(item.amount));
        }
        if self.contains(item.product.id) {
            return Err(CommerceError::DuplicateItem(item.product.id));
        }
        self.items.push(item);
        Ok(())
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CommerceError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A product in the cart together with how many of it were picked.
///
/// Serialized flat: the product fields and `amount` sit side by side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product snapshot taken when the item was added.
    #[serde(flatten)]
    pub product: Product,
    /// Quantity, always at least 1 inside a [`Cart`].
    pub amount: i64,
}

impl CartItem {
    /// Create a new cart item.
    pub fn new(product: Product, amount: i64) -> Self {
        Self { product, amount }
    }

    /// Product id of this item.
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    pub fn subtotal(&self) -> f64 {
        self.product.price * self.amount as f64
    }
}

/// Request to set the amount of a product already in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    /// Product to update.
    pub product_id: ProductId,
    /// Requested amount.
    pub amount: i64,
}

impl UpdateProductAmount {
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}

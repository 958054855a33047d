//! The cart manager.

use crate::error::CartError;
use crate::notify::{self, Notifier, TracingNotifier};
use rocket_commerce::prelude::*;
use rocket_store::{JsonStore, PersistentStore};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// The three cart mutations, used to pick the failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Add,
    Remove,
    UpdateAmount,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Remove => "remove",
            Operation::UpdateAmount => "update_amount",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Operation::Add => notify::ADD_FAILED,
            Operation::Remove => notify::REMOVE_FAILED,
            Operation::UpdateAmount => notify::UPDATE_FAILED,
        }
    }
}

/// Owner and sole mutator of the shopping cart.
///
/// Consumers read immutable snapshots through [`cart`](Self::cart) or follow
/// changes through [`subscribe`](Self::subscribe). Every mutation:
///
/// 1. waits its turn in a single queue, so it sees all earlier commits,
/// 2. consults the stock service and catalog as needed,
/// 3. computes the next cart without touching the current one,
/// 4. writes the whole cart to the store, then publishes it.
///
/// A rejected mutation notifies the user, returns the typed error and leaves
/// both the snapshot and the stored value exactly as they were.
pub struct CartManager {
    catalog: Arc<dyn ProductCatalog>,
    stock: Arc<dyn StockService>,
    store: JsonStore,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<Arc<Cart>>,
    queue: Mutex<()>,
}

impl CartManager {
    /// Create a manager, restoring the cart from `store`.
    ///
    /// A missing or unreadable stored cart starts the session empty.
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        stock: Arc<dyn StockService>,
        store: Arc<dyn PersistentStore>,
    ) -> Self {
        let store = JsonStore::new(store);
        let cart = load_cart(&store);
        let (state, _) = watch::channel(Arc::new(cart));

        Self {
            catalog,
            stock,
            store,
            notifier: Arc::new(TracingNotifier),
            state,
            queue: Mutex::new(()),
        }
    }

    /// Route user-facing messages to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Current cart snapshot.
    pub fn cart(&self) -> Arc<Cart> {
        self.state.borrow().clone()
    }

    /// Receiver that observes every committed cart.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.state.subscribe()
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart goes through
    /// [`update_product_amount`](Self::update_product_amount) with its amount
    /// plus one, including that operation's messages.
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let _turn = self.queue.lock().await;
        let cart = self.cart();
        debug!(%product_id, "add product");

        if let Some(existing) = cart.find(product_id) {
            let result = match existing.amount.checked_add(1) {
                Some(amount) => self.set_amount(&cart, product_id, amount).await,
                None => Err(CommerceError::InvalidQuantity(existing.amount).into()),
            };
            return result.map_err(|e| self.reject(Operation::UpdateAmount, product_id, e));
        }

        self.insert(&cart, product_id)
            .await
            .map_err(|e| self.reject(Operation::Add, product_id, e))
    }

    /// Remove a product from the cart. Never contacts remote services.
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let _turn = self.queue.lock().await;
        let cart = self.cart();
        debug!(%product_id, "remove product");

        let result = cart
            .without(product_id)
            .map_err(CartError::from)
            .and_then(|next| self.commit(next));

        match result {
            Ok(()) => {
                info!(%product_id, "removed product");
                Ok(())
            }
            Err(e) => Err(self.reject(Operation::Remove, product_id, e)),
        }
    }

    /// Set the amount of a product already in the cart.
    ///
    /// The amount must be positive and covered by the stock reported now.
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> Result<(), CartError> {
        let _turn = self.queue.lock().await;
        let cart = self.cart();
        debug!(product_id = %request.product_id, amount = request.amount, "update amount");

        self.set_amount(&cart, request.product_id, request.amount)
            .await
            .map_err(|e| self.reject(Operation::UpdateAmount, request.product_id, e))
    }

    async fn insert(&self, cart: &Cart, product_id: ProductId) -> Result<(), CartError> {
        let stock = self.current_stock(product_id).await?;
        if stock.is_out_of_stock() {
            return Err(CartError::OutOfStock {
                product_id,
                requested: 1,
                available: stock.amount,
            });
        }

        let product = self
            .catalog
            .product(product_id)
            .await?
            .filter(|p| p.id == product_id)
            .ok_or(CommerceError::ProductNotFound(product_id))?;

        let next = cart.with_item(CartItem::new(product, 1))?;
        self.commit(next)?;
        info!(%product_id, amount = 1, "added product");
        Ok(())
    }

    async fn set_amount(
        &self,
        cart: &Cart,
        product_id: ProductId,
        amount: i64,
    ) -> Result<(), CartError> {
        if amount <= 0 {
            return Err(CommerceError::InvalidQuantity(amount).into());
        }
        if !cart.contains(product_id) {
            return Err(CommerceError::ItemNotInCart(product_id).into());
        }

        let stock = self.current_stock(product_id).await?;
        if !stock.can_fulfill(amount) {
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let next = cart.with_amount(product_id, amount)?;
        self.commit(next)?;
        info!(%product_id, amount, "updated amount");
        Ok(())
    }

    async fn current_stock(&self, product_id: ProductId) -> Result<StockEntry, CartError> {
        self.stock
            .stock(product_id)
            .await?
            .ok_or(CartError::StockNotFound(product_id))
    }

    /// Persist `next`, then publish it. Nothing is published if the write fails.
    fn commit(&self, next: Cart) -> Result<(), CartError> {
        self.store.set(CART_STORAGE_KEY, &next)?;
        self.state.send_replace(Arc::new(next));
        Ok(())
    }

    fn reject(&self, operation: Operation, product_id: ProductId, error: CartError) -> CartError {
        let message = if error.is_out_of_stock() {
            notify::UNAVAILABLE
        } else {
            operation.failure_message()
        };
        warn!(
            operation = operation.as_str(),
            %product_id,
            kind = ?error.kind(),
            %error,
            "cart mutation rejected"
        );
        self.notifier.error(message);
        error
    }
}

impl fmt::Debug for CartManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartManager")
            .field("cart", &self.cart())
            .finish_non_exhaustive()
    }
}

fn load_cart(store: &JsonStore) -> Cart {
    match store.get::<Cart>(CART_STORAGE_KEY) {
        Ok(Some(cart)) => {
            debug!(items = cart.len(), "restored stored cart");
            cart
        }
        Ok(None) => Cart::new(),
        Err(error) => {
            warn!(%error, "ignoring unreadable stored cart");
            Cart::new()
        }
    }
}

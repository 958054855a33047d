//! Cart manager behaviour against in-memory catalog, stock and storage.

use async_trait::async_trait;
use rocket_cart::notify::{ADD_FAILED, REMOVE_FAILED, UNAVAILABLE, UPDATE_FAILED};
use rocket_cart::prelude::*;
use rocket_cart::{RecordingNotifier, CART_STORAGE_KEY};
use rocket_store::{MemoryStore, PersistentStore, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// === Fakes ===

#[derive(Default)]
struct FakeStorefront {
    products: Mutex<HashMap<ProductId, Product>>,
    stock: Mutex<HashMap<ProductId, i64>>,
    offline: AtomicBool,
    lookups: AtomicUsize,
    latency: Option<Duration>,
}

impl FakeStorefront {
    fn new() -> Self {
        Self::default()
    }

    fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    fn with_product(self, id: u64, stock: i64) -> Self {
        self.set_product(id, stock);
        self
    }

    fn set_product(&self, id: u64, stock: i64) {
        self.products.lock().unwrap().insert(ProductId::new(id), product(id));
        self.set_stock(id, stock);
    }

    fn set_stock(&self, id: u64, amount: i64) {
        self.stock.lock().unwrap().insert(ProductId::new(id), amount);
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    async fn lookup(&self) -> Result<(), CommerceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(CommerceError::LookupFailed("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for FakeStorefront {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CommerceError> {
        self.lookup().await?;
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl StockService for FakeStorefront {
    async fn stock(&self, id: ProductId) -> Result<Option<StockEntry>, CommerceError> {
        self.lookup().await?;
        Ok(self
            .stock
            .lock()
            .unwrap()
            .get(&id)
            .map(|amount| StockEntry::new(id.get(), *amount)))
    }
}

/// Memory store whose writes can be switched off.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl PersistentStore for FlakyStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::StoreError("disk full".into()));
        }
        self.inner.write(key, value)
    }
}

// === Harness ===

struct Harness {
    api: Arc<FakeStorefront>,
    store: Arc<FlakyStore>,
    notifier: Arc<RecordingNotifier>,
    manager: CartManager,
}

impl Harness {
    fn new(api: FakeStorefront) -> Self {
        Self::with_store(api, FlakyStore::default())
    }

    /// Start from a stored cart of `(id, amount)` pairs.
    fn with_cart(api: FakeStorefront, items: &[(u64, i64)]) -> Self {
        let cart = Cart::from_items(
            items
                .iter()
                .map(|(id, amount)| CartItem::new(product(*id), *amount))
                .collect(),
        )
        .unwrap();
        let store = FlakyStore::default();
        store
            .write(CART_STORAGE_KEY, &serde_json::to_string(&cart).unwrap())
            .unwrap();
        Self::with_store(api, store)
    }

    fn with_store(api: FakeStorefront, store: FlakyStore) -> Self {
        let api = Arc::new(api);
        let store = Arc::new(store);
        let notifier = Arc::new(RecordingNotifier::new());
        let manager = CartManager::new(api.clone(), api.clone(), store.clone())
            .with_notifier(notifier.clone());
        Self {
            api,
            store,
            notifier,
            manager,
        }
    }

    fn stored(&self) -> Option<String> {
        self.store.read(CART_STORAGE_KEY).unwrap()
    }

    fn stored_cart(&self) -> Cart {
        serde_json::from_str(&self.stored().expect("cart was stored")).unwrap()
    }

    fn amounts(&self) -> Vec<(u64, i64)> {
        self.manager
            .cart()
            .iter()
            .map(|i| (i.id().get(), i.amount))
            .collect()
    }

    /// Assert nothing changed in memory or in storage since `before`.
    fn assert_untouched(&self, before: &(Arc<Cart>, Option<String>)) {
        assert_eq!(*self.manager.cart(), *before.0);
        assert_eq!(self.stored(), before.1);
    }

    fn snapshot(&self) -> (Arc<Cart>, Option<String>) {
        (self.manager.cart(), self.stored())
    }
}

fn product(id: u64) -> Product {
    Product::new(id, format!("Tênis {}", id), 100.0 + id as f64, format!("{}.jpg", id))
}

fn id(n: u64) -> ProductId {
    ProductId::new(n)
}

// === Scenarios ===

#[tokio::test]
async fn add_new_product_to_empty_cart() {
    let h = Harness::new(FakeStorefront::new().with_product(1, 5));

    h.manager.add_product(id(1)).await.unwrap();

    assert_eq!(h.amounts(), vec![(1, 1)]);
    let item = h.manager.cart().find(id(1)).cloned().unwrap();
    assert_eq!(item.product, product(1));
    assert_eq!(h.stored_cart(), *h.manager.cart());
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn add_existing_product_increments_amount() {
    let h = Harness::with_cart(FakeStorefront::new().with_product(1, 5), &[(1, 1)]);

    h.manager.add_product(id(1)).await.unwrap();

    assert_eq!(h.amounts(), vec![(1, 2)]);
    assert_eq!(h.stored_cart(), *h.manager.cart());
}

#[tokio::test]
async fn add_product_without_stock_is_unavailable() {
    let api = FakeStorefront::new().with_product(1, 0).with_product(2, 0);
    let h = Harness::with_cart(api, &[(1, 1)]);
    let before = h.snapshot();

    let err = h.manager.add_product(id(2)).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::OutOfStock);
    assert_eq!(h.notifier.messages(), vec![UNAVAILABLE]);
    h.assert_untouched(&before);
}

#[tokio::test]
async fn update_above_stock_is_unavailable() {
    let h = Harness::with_cart(FakeStorefront::new().with_product(1, 5), &[(1, 3)]);
    let before = h.snapshot();

    let err = h
        .manager
        .update_product_amount(UpdateProductAmount::new(id(1), 10))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CartError::OutOfStock {
            requested: 10,
            available: 5,
            ..
        }
    ));
    assert_eq!(h.notifier.messages(), vec![UNAVAILABLE]);
    assert_eq!(h.amounts(), vec![(1, 3)]);
    h.assert_untouched(&before);
}

#[tokio::test]
async fn remove_existing_product() {
    let h = Harness::with_cart(FakeStorefront::new(), &[(1, 2)]);

    h.manager.remove_product(id(1)).await.unwrap();

    assert!(h.manager.cart().is_empty());
    assert_eq!(h.stored().as_deref(), Some("[]"));
}

#[tokio::test]
async fn remove_missing_product_fails() {
    let h = Harness::new(FakeStorefront::new());
    let before = h.snapshot();

    let err = h.manager.remove_product(id(99)).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::NotFound);
    assert_eq!(h.notifier.messages(), vec![REMOVE_FAILED]);
    h.assert_untouched(&before);
}

// === Add ===

#[tokio::test]
async fn add_product_missing_from_catalog_fails() {
    let api = FakeStorefront::new();
    api.set_stock(7, 3);
    let h = Harness::new(api);
    let before = h.snapshot();

    let err = h.manager.add_product(id(7)).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::NotFound);
    assert_eq!(h.notifier.messages(), vec![ADD_FAILED]);
    h.assert_untouched(&before);
}

#[tokio::test]
async fn add_product_without_stock_entry_fails() {
    let h = Harness::new(FakeStorefront::new());
    let before = h.snapshot();

    let err = h.manager.add_product(id(3)).await.unwrap_err();

    assert!(matches!(err, CartError::StockNotFound(p) if p == id(3)));
    assert_eq!(h.notifier.messages(), vec![ADD_FAILED]);
    h.assert_untouched(&before);
}

#[tokio::test]
async fn add_product_while_offline_fails() {
    let api = FakeStorefront::new().with_product(1, 5);
    api.offline.store(true, Ordering::SeqCst);
    let h = Harness::new(api);
    let before = h.snapshot();

    let err = h.manager.add_product(id(1)).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::TransportFailure);
    assert_eq!(h.notifier.messages(), vec![ADD_FAILED]);
    h.assert_untouched(&before);
}

#[tokio::test]
async fn add_existing_product_at_stock_limit_is_unavailable() {
    let h = Harness::with_cart(FakeStorefront::new().with_product(1, 2), &[(1, 2)]);
    let before = h.snapshot();

    let err = h.manager.add_product(id(1)).await.unwrap_err();

    assert!(err.is_out_of_stock());
    assert_eq!(h.notifier.messages(), vec![UNAVAILABLE]);
    h.assert_untouched(&before);
}

#[tokio::test]
async fn add_existing_product_while_offline_reports_update_failure() {
    let api = FakeStorefront::new().with_product(1, 5);
    api.offline.store(true, Ordering::SeqCst);
    let h = Harness::with_cart(api, &[(1, 1)]);
    let before = h.snapshot();

    let err = h.manager.add_product(id(1)).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::TransportFailure);
    assert_eq!(h.notifier.messages(), vec![UPDATE_FAILED]);
    h.assert_untouched(&before);
}

#[tokio::test]
async fn add_existing_product_at_max_amount_is_rejected() {
    let h = Harness::with_cart(FakeStorefront::new().with_product(1, i64::MAX), &[(1, i64::MAX)]);
    let before = h.snapshot();

    let err = h.manager.add_product(id(1)).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::InvalidInput);
    assert_eq!(h.notifier.messages(), vec![UPDATE_FAILED]);
    assert_eq!(h.api.lookups(), 0);
    h.assert_untouched(&before);
}

#[tokio::test]
async fn add_twice_increments_twice() {
    let h = Harness::new(FakeStorefront::new().with_product(1, 5));

    h.manager.add_product(id(1)).await.unwrap();
    h.manager.add_product(id(1)).await.unwrap();

    assert_eq!(h.amounts(), vec![(1, 2)]);
}

#[tokio::test]
async fn add_keeps_insertion_order() {
    let api = FakeStorefront::new()
        .with_product(3, 5)
        .with_product(1, 5)
        .with_product(2, 5);
    let h = Harness::new(api);

    for n in [3, 1, 2] {
        h.manager.add_product(id(n)).await.unwrap();
    }

    assert_eq!(h.amounts(), vec![(3, 1), (1, 1), (2, 1)]);
}

// === Update ===

#[tokio::test]
async fn update_to_non_positive_amount_is_rejected_without_lookup() {
    let h = Harness::with_cart(FakeStorefront::new().with_product(1, 5), &[(1, 2)]);
    let before = h.snapshot();

    for amount in [0, -1] {
        let err = h
            .manager
            .update_product_amount(UpdateProductAmount::new(id(1), amount))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }

    assert_eq!(h.notifier.messages(), vec![UPDATE_FAILED, UPDATE_FAILED]);
    assert_eq!(h.api.lookups(), 0);
    h.assert_untouched(&before);
}

#[tokio::test]
async fn update_missing_item_fails() {
    let h = Harness::new(FakeStorefront::new().with_product(1, 5));
    let before = h.snapshot();

    let err = h
        .manager
        .update_product_amount(UpdateProductAmount::new(id(1), 2))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::NotFound);
    assert_eq!(h.notifier.messages(), vec![UPDATE_FAILED]);
    h.assert_untouched(&before);
}

#[tokio::test]
async fn update_up_to_stock_succeeds() {
    let h = Harness::with_cart(FakeStorefront::new().with_product(1, 5), &[(1, 1)]);

    h.manager
        .update_product_amount(UpdateProductAmount::new(id(1), 5))
        .await
        .unwrap();

    assert_eq!(h.amounts(), vec![(1, 5)]);
    assert_eq!(h.stored_cart(), *h.manager.cart());
}

#[tokio::test]
async fn update_can_decrease_amount() {
    let h = Harness::with_cart(FakeStorefront::new().with_product(1, 5), &[(1, 4)]);

    h.manager
        .update_product_amount(UpdateProductAmount::new(id(1), 1))
        .await
        .unwrap();

    assert_eq!(h.amounts(), vec![(1, 1)]);
}

#[tokio::test]
async fn update_never_exceeds_reported_stock() {
    let h = Harness::with_cart(FakeStorefront::new().with_product(1, 5), &[(1, 1)]);

    for requested in 1..=8 {
        let stock = 5 - (requested % 3);
        h.api.set_stock(1, stock);
        let outcome = h
            .manager
            .update_product_amount(UpdateProductAmount::new(id(1), requested))
            .await;

        let amount = h.manager.cart().find(id(1)).unwrap().amount;
        assert_eq!(outcome.is_ok(), requested <= stock);
        if outcome.is_ok() {
            assert_eq!(amount, requested);
        }
        assert!(h.stored_cart().find(id(1)).unwrap().amount <= 5);
    }
}

// === Remove ===

#[tokio::test]
async fn remove_never_contacts_remote_services() {
    let api = FakeStorefront::new();
    api.offline.store(true, Ordering::SeqCst);
    let h = Harness::with_cart(api, &[(1, 1), (2, 1)]);

    h.manager.remove_product(id(1)).await.unwrap();

    assert_eq!(h.amounts(), vec![(2, 1)]);
    assert_eq!(h.api.lookups(), 0);
}

// === Persistence ===

#[tokio::test]
async fn reloading_from_storage_restores_identical_cart() {
    let api = FakeStorefront::new()
        .with_product(2, 9)
        .with_product(1, 9)
        .with_product(3, 9);
    let h = Harness::new(api);
    for n in [2, 1, 3, 1] {
        h.manager.add_product(id(n)).await.unwrap();
    }
    h.manager
        .update_product_amount(UpdateProductAmount::new(id(3), 4))
        .await
        .unwrap();

    let reloaded = CartManager::new(h.api.clone(), h.api.clone(), h.store.clone());

    assert_eq!(*reloaded.cart(), *h.manager.cart());
    assert_eq!(
        serde_json::to_string(&*reloaded.cart()).unwrap(),
        h.stored().unwrap()
    );
}

#[tokio::test]
async fn failed_write_leaves_cart_and_storage_untouched() {
    let h = Harness::with_cart(
        FakeStorefront::new().with_product(1, 5).with_product(2, 5),
        &[(1, 1)],
    );
    h.store.fail_writes.store(true, Ordering::SeqCst);
    let before = h.snapshot();

    let add = h.manager.add_product(id(2)).await.unwrap_err();
    let increment = h.manager.add_product(id(1)).await.unwrap_err();
    let remove = h.manager.remove_product(id(1)).await.unwrap_err();

    for err in [&add, &increment, &remove] {
        assert_eq!(err.kind(), FailureKind::StorageFailure);
    }
    assert_eq!(
        h.notifier.messages(),
        vec![ADD_FAILED, UPDATE_FAILED, REMOVE_FAILED]
    );
    h.assert_untouched(&before);
}

// === Invariants ===

#[tokio::test]
async fn items_stay_unique_across_mixed_operations() {
    let api = FakeStorefront::new()
        .with_product(1, 3)
        .with_product(2, 1)
        .with_product(3, 0);
    let h = Harness::new(api);

    let ops: [(u8, u64, i64); 12] = [
        (0, 1, 0),
        (0, 1, 0),
        (0, 2, 0),
        (0, 2, 0),
        (0, 3, 0),
        (1, 1, 3),
        (0, 1, 0),
        (2, 2, 0),
        (0, 2, 0),
        (2, 9, 0),
        (1, 2, 0),
        (0, 1, 0),
    ];
    for (op, n, amount) in ops {
        let _ = match op {
            0 => h.manager.add_product(id(n)).await,
            1 => {
                h.manager
                    .update_product_amount(UpdateProductAmount::new(id(n), amount))
                    .await
            }
            _ => h.manager.remove_product(id(n)).await,
        };

        let cart = h.manager.cart();
        let mut ids: Vec<u64> = cart.iter().map(|i| i.id().get()).collect();
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), len, "duplicate ids after op {:?}", (op, n));
        assert!(cart.iter().all(|i| i.amount >= 1));
    }

    assert_eq!(h.amounts(), vec![(1, 3), (2, 1)]);
}

// === Concurrency ===

#[tokio::test]
async fn concurrent_adds_of_same_product_are_not_lost() {
    let api = FakeStorefront::with_latency(Duration::from_millis(10)).with_product(1, 5);
    let h = Harness::new(api);

    let (a, b, c) = tokio::join!(
        h.manager.add_product(id(1)),
        h.manager.add_product(id(1)),
        h.manager.add_product(id(1)),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(h.amounts(), vec![(1, 3)]);
    assert_eq!(h.stored_cart(), *h.manager.cart());
}

#[tokio::test]
async fn concurrent_adds_from_spawned_tasks_keep_every_product() {
    let api = FakeStorefront::with_latency(Duration::from_millis(5))
        .with_product(1, 5)
        .with_product(2, 5);
    let h = Harness::new(api);
    let manager = Arc::new(h.manager);

    let tasks: Vec<_> = [1, 2, 1, 2]
        .into_iter()
        .map(|n| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.add_product(id(n)).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let cart = manager.cart();
    assert_eq!(cart.find(id(1)).unwrap().amount, 2);
    assert_eq!(cart.find(id(2)).unwrap().amount, 2);
}

#[tokio::test]
async fn concurrent_increment_respects_stock() {
    let api = FakeStorefront::with_latency(Duration::from_millis(5)).with_product(1, 2);
    let h = Harness::with_cart(api, &[(1, 1)]);

    let (a, b) = tokio::join!(h.manager.add_product(id(1)), h.manager.add_product(id(1)));

    assert!(a.is_ok());
    assert!(b.unwrap_err().is_out_of_stock());
    assert_eq!(h.amounts(), vec![(1, 2)]);
}

#[tokio::test]
async fn subscribers_see_committed_carts_only() {
    let h = Harness::new(FakeStorefront::new().with_product(1, 5));
    let mut rx = h.manager.subscribe();

    let _ = h.manager.remove_product(id(1)).await;
    assert!(!rx.has_changed().unwrap());

    h.manager.add_product(id(1)).await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().item_count(), 1);
}

//! Application state shared across handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use localazy_core::UserId;
use localazy_core::catalog::Catalog;
use localazy_core::inventory::Inventory;
use localazy_core::order::OrderBook;
use tokio::sync::RwLock;

use crate::config::StorefrontConfig;
use crate::content::ContentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Per-visitor state lives in
/// the session; everything here is visible to every visitor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    content: ContentStore,
    orders: RwLock<OrderBook>,
    inventory: RwLock<Inventory>,
    next_user_id: AtomicI32,
}

impl AppState {
    /// Create a new application state with an empty order book and the
    /// sample store inventory.
    #[must_use]
    pub fn new(config: StorefrontConfig, content: ContentStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                content,
                orders: RwLock::new(OrderBook::new()),
                inventory: RwLock::new(Inventory::sample()),
                next_user_id: AtomicI32::new(1),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the loaded content.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.inner.content.catalog()
    }

    /// Orders placed by every visitor.
    #[must_use]
    pub fn orders(&self) -> &RwLock<OrderBook> {
        &self.inner.orders
    }

    /// The demo store's product table.
    #[must_use]
    pub fn inventory(&self) -> &RwLock<Inventory> {
        &self.inner.inventory
    }

    /// Hand out an id for a newly signed-in user.
    #[must_use]
    pub fn next_user_id(&self) -> UserId {
        UserId::new(self.inner.next_user_id.fetch_add(1, Ordering::Relaxed))
    }
}

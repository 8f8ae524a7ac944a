//! Dashboard Controller
//!
//! Owns the session, the mirrored collections and the add forms, and runs
//! every backend call the admin dashboard makes.
//!
//! ## Behaviour
//!
//! - The three fetchers run together whenever the credential goes from
//!   absent to present, and each replaces its collection wholesale.
//! - Mutation handlers call the backend first and only touch local state
//!   once the call succeeded.
//! - Every failure is logged and swallowed: local state stays exactly as it
//!   was and the handler returns `None` / `false`.
//!
//! Handlers take `&self` and never hold the state lock across a network
//! call, so several requests can be in flight at once. Status edits are the
//! one exception: they are serialized per order id. Credential storage runs
//! on the blocking pool with no lock held.

mod locks;
mod state;

pub use locks::KeyedLocks;
pub use state::{CategoryForm, Collection, DashboardState, ItemDefaults, ItemForm, Summary};

use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{Acknowledgement, ApiError, ApiResult, Backend};
use crate::models::{Category, Item, Order, OrderStatus};
use crate::session::{
    erase_credential, load_credential, store_credential, Credential, KeyValueStore, Session,
    StoreResult,
};

/// How local state follows a successful create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcilePolicy {
    /// Append the submitted values and stop there
    #[default]
    Optimistic,
    /// Append the submitted values, then re-fetch that collection so server
    /// ids and normalization replace them
    Refetch,
}

/// Dashboard behaviour settings
#[derive(Debug, Clone, Default)]
pub struct DashboardConfig {
    pub reconcile: ReconcilePolicy,
    pub item_defaults: ItemDefaults,
}

/// The admin dashboard
pub struct Dashboard<B, S> {
    backend: B,
    session: RwLock<Session<Arc<S>>>,
    state: RwLock<DashboardState>,
    order_locks: KeyedLocks,
    config: DashboardConfig,
}

impl<B, S> Dashboard<B, S>
where
    B: Backend,
    S: KeyValueStore + 'static,
{
    /// Create a dashboard with no credential and empty collections
    pub fn new(backend: B, store: S, config: DashboardConfig) -> Self {
        Self {
            backend,
            session: RwLock::new(Session::new(Arc::new(store))),
            state: RwLock::new(DashboardState::with_item_defaults(&config.item_defaults)),
            order_locks: KeyedLocks::new(),
            config,
        }
    }

    /// Restore the saved credential, fetching everything if there is one.
    ///
    /// Returns whether a credential is now set.
    pub async fn start(&self) -> StoreResult<bool> {
        let saved = self.with_store(|store| load_credential(store)).await?;
        match saved {
            Some(credential) => {
                tracing::info!("Restored saved credential");
                self.set_credential(credential.expose()).await;
                Ok(true)
            }
            None => {
                tracing::info!("No saved credential");
                Ok(self.session.read().await.is_authenticated())
            }
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    // ============================================
    // Session
    // ============================================

    /// Replace the in-memory credential (not persisted).
    ///
    /// Fetches all three collections when this is an absent to present
    /// transition and returns whether it was.
    pub async fn set_credential(&self, token: impl Into<String>) -> bool {
        let became_present = self.session.write().await.set(token);
        if became_present {
            self.refresh_all().await;
        }
        became_present
    }

    /// Persist the current credential. `false` means there was none to save.
    pub async fn save_credential(&self) -> StoreResult<bool> {
        let Some(credential) = self.credential().await else {
            return Ok(false);
        };
        self.with_store(move |store| store_credential(store, &credential))
            .await?;
        Ok(true)
    }

    /// Forget the credential in memory and in durable storage.
    /// Mirrored collections are left as they are.
    pub async fn clear_credential(&self) -> StoreResult<()> {
        self.with_store(|store| erase_credential(store)).await?;
        self.session.write().await.forget();
        Ok(())
    }

    pub async fn credential(&self) -> Option<Credential> {
        self.session.read().await.credential().cloned()
    }

    /// Run a store operation on the blocking pool
    async fn with_store<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&S) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(self.session.read().await.store());
        tokio::task::spawn_blocking(move || op(&*store)).await?
    }

    // ============================================
    // View state
    // ============================================

    /// Copy of the whole view state
    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.state.read().await.categories.clone()
    }

    pub async fn items(&self) -> Vec<Item> {
        self.state.read().await.items.clone()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.state.read().await.orders.clone()
    }

    pub async fn summary(&self) -> Summary {
        self.state.read().await.summary()
    }

    /// Edit the add-category form
    pub async fn update_category_form<F>(&self, edit: F)
    where
        F: FnOnce(&mut CategoryForm),
    {
        edit(&mut self.state.write().await.category_form);
    }

    /// Edit the add-item form
    pub async fn update_item_form<F>(&self, edit: F)
    where
        F: FnOnce(&mut ItemForm),
    {
        edit(&mut self.state.write().await.item_form);
    }

    // ============================================
    // Fetchers
    // ============================================

    /// Run all three fetchers concurrently. Completion order does not matter.
    pub async fn refresh_all(&self) {
        let (categories, items, orders) = tokio::join!(
            self.fetch_categories(),
            self.fetch_items(),
            self.fetch_orders()
        );
        tracing::debug!(categories, items, orders, "Refresh finished");
    }

    /// Replace the category list with the backend's. Returns success.
    pub async fn fetch_categories(&self) -> bool {
        let Some(credential) = self.credential().await else {
            return false;
        };
        let result = self.backend.list_categories(&credential).await;
        self.replace(Collection::Categories, result, |state| &mut state.categories)
            .await
    }

    /// Replace the item list with the backend's. Returns success.
    pub async fn fetch_items(&self) -> bool {
        let Some(credential) = self.credential().await else {
            return false;
        };
        let result = self.backend.list_items(&credential).await;
        self.replace(Collection::Items, result, |state| &mut state.items)
            .await
    }

    /// Replace the order list with the backend's. Returns success.
    pub async fn fetch_orders(&self) -> bool {
        let Some(credential) = self.credential().await else {
            return false;
        };
        let result = self.backend.list_orders(&credential).await;
        self.replace(Collection::Orders, result, |state| &mut state.orders)
            .await
    }

    async fn replace<T>(
        &self,
        collection: Collection,
        result: ApiResult<Vec<T>>,
        slot: fn(&mut DashboardState) -> &mut Vec<T>,
    ) -> bool {
        match result {
            Ok(fetched) => {
                tracing::debug!(resource = %collection, count = fetched.len(), "Fetched collection");
                *slot(&mut *self.state.write().await) = fetched;
                true
            }
            Err(e) => {
                report_failure(collection, "fetch", &e);
                false
            }
        }
    }

    // ============================================
    // Mutation handlers
    // ============================================

    /// Submit the add-category form.
    ///
    /// On success the submitted category is appended, the form is cleared
    /// and the backend's message is returned for acknowledgement.
    pub async fn add_category(&self) -> Option<Acknowledgement> {
        let Some(credential) = self.credential().await else {
            report_failure(Collection::Categories, "create", &ApiError::MissingCredential);
            return None;
        };
        let category = self.state.read().await.category_form.to_category();

        match self.backend.create_category(&credential, &category).await {
            Ok(ack) => {
                tracing::info!(name = %category.name, message = %ack.message, "Category created");
                {
                    let mut state = self.state.write().await;
                    state.categories.push(category);
                    state.category_form = CategoryForm::default();
                }
                if self.config.reconcile == ReconcilePolicy::Refetch {
                    self.fetch_categories().await;
                }
                Some(ack)
            }
            Err(e) => {
                report_failure(Collection::Categories, "create", &e);
                None
            }
        }
    }

    /// Submit the add-item form, uploading the attached image.
    ///
    /// On success the submitted item (with its local image path) is
    /// appended and every form field, attachment included, is cleared.
    pub async fn add_item(&self) -> Option<Acknowledgement> {
        let Some(credential) = self.credential().await else {
            report_failure(Collection::Items, "create", &ApiError::MissingCredential);
            return None;
        };
        let form = self.state.read().await.item_form.clone();

        let upload = match form.to_upload().await {
            Ok(upload) => upload,
            Err(e) => {
                report_failure(Collection::Items, "create", &e);
                return None;
            }
        };

        match self.backend.create_item(&credential, upload).await {
            Ok(ack) => {
                tracing::info!(name = %form.name, message = %ack.message, "Item created");
                {
                    let mut state = self.state.write().await;
                    state.items.push(form.to_item());
                    state.item_form = ItemForm::default();
                }
                if self.config.reconcile == ReconcilePolicy::Refetch {
                    self.fetch_items().await;
                }
                Some(ack)
            }
            Err(e) => {
                report_failure(Collection::Items, "create", &e);
                None
            }
        }
    }

    /// Ask the backend to move an order to `status`.
    ///
    /// Any status may be requested from any other; the backend decides. On
    /// success only the matching order's status changes locally.
    pub async fn edit_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Option<Acknowledgement> {
        let Some(credential) = self.credential().await else {
            report_order_failure(order_id, &ApiError::MissingCredential);
            return None;
        };

        let _guard = self.order_locks.lock(order_id).await;
        match self
            .backend
            .update_order_status(&credential, order_id, &status)
            .await
        {
            Ok(ack) => {
                tracing::info!(order_id, status = %status, message = %ack.message, "Order status updated");
                let mut state = self.state.write().await;
                for order in state.orders.iter_mut().filter(|o| o.id == order_id) {
                    order.status = Some(status.clone());
                }
                Some(ack)
            }
            Err(e) => {
                report_order_failure(order_id, &e);
                None
            }
        }
    }
}

fn report_failure(collection: Collection, action: &str, error: &ApiError) {
    tracing::error!(resource = %collection, action, error = %error, "Backend call failed");
    if error.is_unauthorized() {
        tracing::warn!("Backend rejected the auth token");
    }
}

fn report_order_failure(order_id: &str, error: &ApiError) {
    tracing::error!(
        resource = %Collection::Orders,
        action = "update_status",
        order_id,
        error = %error,
        "Backend call failed"
    );
    if error.is_unauthorized() {
        tracing::warn!("Backend rejected the auth token");
    }
}

//! # Roasterz Admin
//!
//! Administration client for the Roasterz catalog backend: keeps an admin
//! token, mirrors categories, items and orders locally, and creates
//! categories and items or moves orders between fulfilment states.
//!
//! ## Modules
//!
//! - [`models`]: Categories, items, orders as the backend sends them
//! - [`api`]: The [`Backend`] trait and its HTTP implementation
//! - [`session`]: Credential holder with durable storage
//! - [`dashboard`]: The controller tying session, backend and view state together
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roasterz_admin::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ApiClientConfig::default())?;
//!     let store = FileStore::new("/tmp/roasterz-admin");
//!     let dashboard = Dashboard::new(client, store, DashboardConfig::default());
//!
//!     // Fetches categories, items and orders once a token is present
//!     dashboard.set_credential("my-admin-token").await;
//!     dashboard.save_credential().await?;
//!
//!     dashboard
//!         .update_category_form(|form| *form = CategoryForm::new("Posters", "https://cdn/p.png"))
//!         .await;
//!     if let Some(ack) = dashboard.add_category().await {
//!         println!("{}", ack.message);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod session;

pub use api::{
    Acknowledgement, ApiClient, ApiClientConfig, ApiError, ApiResult, Attachment, Backend,
    ItemUpload,
};

pub use config::{Config, ConfigError, LoggingConfig};

pub use dashboard::{
    CategoryForm, Collection, Dashboard, DashboardConfig, DashboardState, ItemDefaults, ItemForm,
    KeyedLocks, ReconcilePolicy, Summary,
};

pub use models::{Category, ImageRef, Item, ItemRef, Order, OrderLine, OrderStatus};

pub use session::{
    Credential, FileStore, KeyValueStore, MemoryStore, Session, StoreError, StoreResult,
    AUTH_TOKEN_KEY,
};

//! Roasterz Backend API
//!
//! Everything the dashboard needs from the remote backend, behind the
//! [`Backend`] trait so the dashboard can be driven by [`ApiClient`] in
//! production and by an in-memory fake in tests.
//!
//! # Endpoints
//!
//! - `GET /categories/Get` - List categories
//! - `GET /items/Get` - List items
//! - `GET /orders/get-all-orders` - List orders
//! - `POST /categories/Add` - Create a category (JSON)
//! - `POST /items/Add` - Create an item (multipart, with image)
//! - `PUT /orders/update-order-status` - Set an order's status (JSON)
//!
//! All endpoints require the `auth-token` header.

pub mod client;
pub mod dto;
pub mod error;

pub use client::{ApiClient, ApiClientConfig, AUTH_HEADER, DEFAULT_BASE_URL};
pub use dto::{Acknowledgement, Attachment, ItemUpload};
pub use error::{ApiError, ApiResult};

use async_trait::async_trait;

use crate::models::{Category, Item, Order, OrderStatus};
use crate::session::Credential;

/// Remote catalog backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch every category
    async fn list_categories(&self, credential: &Credential) -> ApiResult<Vec<Category>>;

    /// Fetch every item
    async fn list_items(&self, credential: &Credential) -> ApiResult<Vec<Item>>;

    /// Fetch every order
    async fn list_orders(&self, credential: &Credential) -> ApiResult<Vec<Order>>;

    /// Create a category from its name and icon URL
    async fn create_category(
        &self,
        credential: &Credential,
        category: &Category,
    ) -> ApiResult<Acknowledgement>;

    /// Create an item, uploading its image alongside the fields
    async fn create_item(
        &self,
        credential: &Credential,
        upload: ItemUpload,
    ) -> ApiResult<Acknowledgement>;

    /// Request a status change. The backend decides whether the transition
    /// is allowed.
    async fn update_order_status(
        &self,
        credential: &Credential,
        order_id: &str,
        status: &OrderStatus,
    ) -> ApiResult<Acknowledgement>;
}

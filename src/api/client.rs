//! Roasterz REST API Client
//!
//! HTTP client for the backend's admin endpoints. Every request carries the
//! session credential in the `auth-token` header.

use async_trait::async_trait;
use reqwest::{multipart, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{error_message, Acknowledgement, ItemUpload, UpdateOrderStatusRequest};
use super::error::{ApiError, ApiResult};
use super::Backend;
use crate::models::{Category, Item, Order, OrderStatus};
use crate::session::Credential;

/// Header the backend reads the credential from
pub const AUTH_HEADER: &str = "auth-token";

/// Production backend
pub const DEFAULT_BASE_URL: &str = "https://roasterz-backend.vercel.app/api";

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL including the `/api` prefix
    pub base_url: String,
    /// Per-request timeout. `None` lets requests run until they finish or fail.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Roasterz backend client
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ApiClientConfig) -> ApiResult<Self> {
        let mut builder = Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str, credential: &Credential) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(AUTH_HEADER, credential.expose())
    }

    async fn send<T>(&self, builder: RequestBuilder) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        serde_json::from_str(&text).map_err(|error| ApiError::InvalidJson { body: text, error })
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn list_categories(&self, credential: &Credential) -> ApiResult<Vec<Category>> {
        self.send(self.request(Method::GET, "/categories/Get", credential))
            .await
    }

    async fn list_items(&self, credential: &Credential) -> ApiResult<Vec<Item>> {
        self.send(self.request(Method::GET, "/items/Get", credential))
            .await
    }

    async fn list_orders(&self, credential: &Credential) -> ApiResult<Vec<Order>> {
        self.send(self.request(Method::GET, "/orders/get-all-orders", credential))
            .await
    }

    async fn create_category(
        &self,
        credential: &Credential,
        category: &Category,
    ) -> ApiResult<Acknowledgement> {
        let builder = self
            .request(Method::POST, "/categories/Add", credential)
            .json(category);
        self.send(builder).await
    }

    async fn create_item(
        &self,
        credential: &Credential,
        upload: ItemUpload,
    ) -> ApiResult<Acknowledgement> {
        let mut form = multipart::Form::new()
            .text("ItemName", upload.name)
            .text("ItemDescription", upload.description)
            .text("price", upload.price)
            .text("quantity", upload.quantity)
            .text("discount", upload.discount)
            .text("type", upload.kind);

        if let Some(image) = upload.image {
            let part = multipart::Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("itemImage", part);
        }

        let builder = self
            .request(Method::POST, "/items/Add", credential)
            .multipart(form);
        self.send(builder).await
    }

    async fn update_order_status(
        &self,
        credential: &Credential,
        order_id: &str,
        status: &OrderStatus,
    ) -> ApiResult<Acknowledgement> {
        let body = UpdateOrderStatusRequest { status, order_id };
        let builder = self
            .request(Method::PUT, "/orders/update-order-status", credential)
            .json(&body);
        self.send(builder).await
    }
}

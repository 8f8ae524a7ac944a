//! Request/Response DTOs
//!
//! Bodies exchanged with the backend that are not catalog entities
//! themselves.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ApiError, ApiResult};
use crate::models::OrderStatus;

/// `{message}` body returned by every successful mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: String,
}

impl Acknowledgement {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `PUT /orders/update-order-status`
#[derive(Debug, Serialize)]
pub struct UpdateOrderStatusRequest<'a> {
    pub status: &'a OrderStatus,
    #[serde(rename = "orderId")]
    pub order_id: &'a str,
}

/// Everything `POST /items/Add` sends as multipart fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpload {
    pub name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub discount: String,
    pub kind: String,
    pub image: Option<Attachment>,
}

/// A file loaded into memory for upload
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Attachment {
    /// Read a file from disk
    pub async fn read(path: &Path) -> ApiResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|error| ApiError::Attachment {
                path: path.to_path_buf(),
                error,
            })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self {
            file_name,
            content_type: guess_content_type(path),
            bytes,
        })
    }
}

/// Content type from the file extension; unknown types go as raw bytes
pub fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

/// Pull a human-readable message out of an error body.
///
/// The backend usually replies `{"message": "..."}` or `{"error": "..."}`;
/// anything else is returned as-is.
pub(crate) fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorBody {
            error: Some(error), ..
        }) => error,
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_update_status_body() {
        let status = OrderStatus::Delivered;
        let body = UpdateOrderStatusRequest {
            status: &status,
            order_id: "o1",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"status": "Delivered", "orderId": "o1"})
        );
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a/b.PNG")), "image/png");
        assert_eq!(guess_content_type(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(guess_content_type(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_guess_less_common_image_types() {
        assert_eq!(guess_content_type(Path::new("poster.bmp")), "image/bmp");
        assert_eq!(guess_content_type(Path::new("poster.tiff")), "image/tiff");
        assert_eq!(guess_content_type(Path::new("favicon.ico")), "image/x-icon");
        assert!(guess_content_type(Path::new("poster.avif")).starts_with("image/"));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(r#"{"message": "Invalid token"}"#), "Invalid token");
        assert_eq!(error_message(r#"{"error": "boom"}"#), "boom");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_read_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.webp");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"RIFF....WEBP")
            .unwrap();

        let attachment = Attachment::read(&path).await.unwrap();
        assert_eq!(attachment.file_name, "poster.webp");
        assert_eq!(attachment.content_type, "image/webp");
        assert_eq!(attachment.bytes, b"RIFF....WEBP");
    }

    #[tokio::test]
    async fn test_read_missing_attachment() {
        let err = Attachment::read(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Attachment { .. }));
    }
}

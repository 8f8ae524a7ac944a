use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;

use super::string_or_number;

/// A catalog item as listed by `/items/Get`
///
/// Price, quantity and discount stay textual: that is how the add form
/// captures them and how they are sent in the multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "ItemName", default)]
    pub name: String,

    #[serde(rename = "ItemDescription", default)]
    pub description: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub price: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub quantity: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub discount: String,

    /// Free-text category tag (e.g. "Anime")
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(rename = "itemImage", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// Where an item's picture lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Hosted by the backend (what fetched items carry)
    Remote(String),
    /// The file that was attached when the item was created locally
    Local(PathBuf),
}

impl ImageRef {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ImageRef::Remote)
    }
}

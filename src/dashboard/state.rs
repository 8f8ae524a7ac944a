//! Dashboard view state: the mirrored collections and the two add forms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::api::{ApiResult, Attachment, ItemUpload};
use crate::models::{Category, ImageRef, Item, Order};

/// Everything the dashboard shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
    pub orders: Vec<Order>,
    pub category_form: CategoryForm,
    pub item_form: ItemForm,
}

impl DashboardState {
    /// Empty collections with the item form seeded from `defaults`
    pub fn with_item_defaults(defaults: &ItemDefaults) -> Self {
        Self {
            item_form: ItemForm::from_defaults(defaults),
            ..Default::default()
        }
    }

    pub fn summary(&self) -> Summary {
        let mut by_status = BTreeMap::new();
        for order in &self.orders {
            let status = order
                .status
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            *by_status.entry(status).or_insert(0) += 1;
        }

        Summary {
            categories: self.categories.len(),
            items: self.items.len(),
            orders: self.orders.len(),
            by_status,
        }
    }
}

/// Which mirrored collection a call concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Categories,
    Items,
    Orders,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Categories => "categories",
            Self::Items => "items",
            Self::Orders => "orders",
        })
    }
}

/// Counts for the overview
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub categories: usize,
    pub items: usize,
    pub orders: usize,
    pub by_status: BTreeMap<String, usize>,
}

/// Add-category form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub icon: String,
}

impl CategoryForm {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
        }
    }

    pub fn to_category(&self) -> Category {
        Category::new(self.name.clone(), self.icon.clone())
    }
}

/// Add-item form. Numeric fields are free text; the backend validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub discount: String,
    pub kind: String,
    pub image: Option<PathBuf>,
}

impl ItemForm {
    pub fn from_defaults(defaults: &ItemDefaults) -> Self {
        Self {
            price: defaults.price.clone(),
            quantity: defaults.quantity.clone(),
            discount: defaults.discount.clone(),
            kind: defaults.kind.clone(),
            ..Default::default()
        }
    }

    /// The item as submitted, which is what gets appended locally
    pub fn to_item(&self) -> Item {
        Item {
            id: None,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price.clone(),
            quantity: self.quantity.clone(),
            discount: self.discount.clone(),
            kind: self.kind.clone(),
            image: self.image.clone().map(ImageRef::Local),
        }
    }

    /// Load the attachment and package every field for upload
    pub async fn to_upload(&self) -> ApiResult<ItemUpload> {
        let image = match &self.image {
            Some(path) => Some(Attachment::read(path).await?),
            None => None,
        };

        Ok(ItemUpload {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price.clone(),
            quantity: self.quantity.clone(),
            discount: self.discount.clone(),
            kind: self.kind.clone(),
            image,
        })
    }
}

/// Initial values of the add-item form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefaults {
    #[serde(default = "default_price")]
    pub price: String,

    #[serde(default = "default_quantity")]
    pub quantity: String,

    #[serde(default = "default_discount")]
    pub discount: String,

    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

fn default_price() -> String {
    "180".to_string()
}

fn default_quantity() -> String {
    "999".to_string()
}

fn default_discount() -> String {
    "50".to_string()
}

fn default_kind() -> String {
    "Anime".to_string()
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            price: default_price(),
            quantity: default_quantity(),
            discount: default_discount(),
            kind: default_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    fn order(id: &str, status: Option<OrderStatus>) -> Order {
        Order {
            id: id.to_string(),
            status,
            date: None,
            lines: Vec::new(),
        }
    }

    #[test]
    fn test_item_form_defaults() {
        let form = ItemForm::from_defaults(&ItemDefaults::default());
        assert_eq!(form.price, "180");
        assert_eq!(form.quantity, "999");
        assert_eq!(form.discount, "50");
        assert_eq!(form.kind, "Anime");
        assert!(form.name.is_empty());
        assert!(form.image.is_none());
    }

    #[test]
    fn test_to_item_keeps_local_image() {
        let form = ItemForm {
            name: "Poster".to_string(),
            image: Some(PathBuf::from("poster.png")),
            ..Default::default()
        };
        let item = form.to_item();

        assert!(item.id.is_none());
        assert_eq!(item.image, Some(ImageRef::Local(PathBuf::from("poster.png"))));
    }

    #[tokio::test]
    async fn test_to_upload_without_image() {
        let form = ItemForm {
            name: "Mug".to_string(),
            price: "250".to_string(),
            ..Default::default()
        };
        let upload = form.to_upload().await.unwrap();

        assert_eq!(upload.name, "Mug");
        assert_eq!(upload.price, "250");
        assert!(upload.image.is_none());
    }

    #[test]
    fn test_summary() {
        let state = DashboardState {
            categories: vec![Category::new("Posters", "p.png")],
            orders: vec![
                order("o1", Some(OrderStatus::Delivered)),
                order("o2", Some(OrderStatus::Delivered)),
                order("o3", Some(OrderStatus::ReadyToShip)),
                order("o4", None),
            ],
            ..Default::default()
        };
        let summary = state.summary();

        assert_eq!(summary.categories, 1);
        assert_eq!(summary.items, 0);
        assert_eq!(summary.orders, 4);
        assert_eq!(summary.by_status.get("Delivered"), Some(&2));
        assert_eq!(summary.by_status.get("Ready to Ship"), Some(&1));
        assert_eq!(summary.by_status.get("Unknown"), Some(&1));
    }

    #[test]
    fn test_item_defaults_from_toml() {
        let defaults: ItemDefaults = toml::from_str("price = \"200\"\ntype = \"Manga\"").unwrap();
        assert_eq!(defaults.price, "200");
        assert_eq!(defaults.quantity, "999");
        assert_eq!(defaults.kind, "Manga");
    }
}

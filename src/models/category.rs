use serde::{Deserialize, Serialize};

/// A product category as listed by `/categories/Get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Server-assigned identifier. Locally appended categories have none.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "categoryName", default)]
    pub name: String,

    /// Icon URL
    #[serde(rename = "categoryIcon", default)]
    pub icon: String,
}

impl Category {
    /// Create a category the way the add form submits it (no id)
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            icon: icon.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_category() {
        let json = r#"{"_id": "66a1", "categoryName": "Posters", "categoryIcon": "https://cdn/p.png", "__v": 0}"#;
        let category: Category = serde_json::from_str(json).unwrap();

        assert_eq!(category.id.as_deref(), Some("66a1"));
        assert_eq!(category.name, "Posters");
        assert_eq!(category.icon, "https://cdn/p.png");
    }

    #[test]
    fn test_serialize_without_id() {
        let value = serde_json::to_value(Category::new("Posters", "url1")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"categoryName": "Posters", "categoryIcon": "url1"})
        );
    }
}

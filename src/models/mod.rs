//! Catalog Models
//!
//! Mirrors of the entities the Roasterz backend owns. Field names on the
//! wire follow the backend exactly; the Rust side uses snake_case names.
//!
//! Nothing here enforces uniqueness, referential integrity or numeric
//! ranges. The backend is the only authority for those.

mod category;
mod item;
mod order;

pub use category::Category;
pub use item::{ImageRef, Item};
pub use order::{ItemRef, Order, OrderLine, OrderStatus};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Accepts either a JSON string or a JSON number and keeps it as text.
///
/// The admin forms treat price, quantity and discount as strings, while the
/// backend stores them as numbers. Lists fetched from the backend therefore
/// carry numbers that need to land in the same string fields.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Integer(i64),
        Float(f64),
        Missing,
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(text) => text,
        Loose::Integer(n) => n.to_string(),
        Loose::Float(n) => n.to_string(),
        Loose::Missing => String::new(),
    })
}

/// Accepts a JSON number or a numeric string. Missing, null and blank
/// values become zero; text that is not a number is an error.
pub(crate) fn lenient_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let text = string_or_number(deserializer)?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(T::default());
    }
    text.parse()
        .map_err(|_| D::Error::custom(format!("expected a number, got {:?}", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Priced {
        #[serde(default, deserialize_with = "string_or_number")]
        value: String,
    }

    #[test]
    fn test_string_or_number() {
        let priced: Priced = serde_json::from_str(r#"{"value": "180"}"#).unwrap();
        assert_eq!(priced.value, "180");

        let priced: Priced = serde_json::from_str(r#"{"value": 999}"#).unwrap();
        assert_eq!(priced.value, "999");

        let priced: Priced = serde_json::from_str(r#"{"value": 12.5}"#).unwrap();
        assert_eq!(priced.value, "12.5");

        let priced: Priced = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(priced.value, "");

        let priced: Priced = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(priced.value, "");
    }
}

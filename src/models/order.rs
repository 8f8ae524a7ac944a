use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::str::FromStr;

use super::lenient_number;

/// An order as listed by `/orders/get-all-orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "OrderStatus", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,

    /// Placement date exactly as the backend sent it
    #[serde(rename = "OrderDate", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(rename = "Items", default)]
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Parse the placement date, if it is RFC 3339
    pub fn placed_at(&self) -> Option<DateTime<Utc>> {
        let date = self.date.as_deref()?;
        DateTime::parse_from_rfc3339(date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Sum of price x quantity over all lines
    pub fn total(&self) -> f64 {
        self.lines.iter().map(OrderLine::total).sum()
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// `None` when the referenced item no longer exists
    #[serde(default)]
    pub item: Option<ItemRef>,

    #[serde(rename = "pricePerItem", default, deserialize_with = "lenient_number")]
    pub price_per_item: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: u32,
}

impl OrderLine {
    pub fn total(&self) -> f64 {
        self.price_per_item * f64::from(self.quantity)
    }

    /// Public product page for this line's item
    pub fn storefront_url(&self, storefront_base: &str) -> Option<String> {
        let item = self.item.as_ref()?;
        Some(format!(
            "{}/item/{}",
            storefront_base.trim_end_matches('/'),
            item.id()
        ))
    }
}

/// Reference from an order line to an item.
///
/// The backend sends either the bare item id or, when it populates the
/// reference, an item object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(rename = "ItemName", default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl ItemRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Populated { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Populated { name, .. } => name.as_deref(),
        }
    }
}

/// Order fulfilment status.
///
/// The backend treats status as an open string, so anything it sends that
/// is not one of the named states is kept verbatim in `Other`. No ordering
/// between states is enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    PrintingAndPacking,
    ReadyToShip,
    Delivered,
    Other(String),
}

impl OrderStatus {
    /// The named states, in fulfilment order
    pub const KNOWN: [OrderStatus; 3] = [
        OrderStatus::PrintingAndPacking,
        OrderStatus::ReadyToShip,
        OrderStatus::Delivered,
    ];

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::PrintingAndPacking => "Printing and Packing",
            Self::ReadyToShip => "Ready to Ship",
            Self::Delivered => "Delivered",
            Self::Other(status) => status,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for OrderStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "Printing and Packing" => Self::PrintingAndPacking,
            "Ready to Ship" => Self::ReadyToShip,
            "Delivered" => Self::Delivered,
            _ => Self::Other(status),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(status: &str) -> Self {
        Self::from(status.to_string())
    }
}

/// Lenient parse for user input: also accepts `ready-to-ship`,
/// `ready_to_ship` and friends, case-insensitively.
impl FromStr for OrderStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        Ok(match normalized.as_str() {
            "printing and packing" => Self::PrintingAndPacking,
            "ready to ship" => Self::ReadyToShip,
            "delivered" => Self::Delivered,
            _ => Self::from(s.trim()),
        })
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(OrderStatus::from)
    }
}

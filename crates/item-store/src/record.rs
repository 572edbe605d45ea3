use chrono::{DateTime, Utc};
use common::{ItemId, ItemStatus, Market};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Version number of a stored item, used for optimistic concurrency control.
///
/// A freshly inserted item is at version 1; every successful replace
/// increments it by one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the version (0) of an item that has not been stored yet.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the version (1) an item has right after insertion.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// A single inventory record.
///
/// Plain data: the store persists it as-is and the stock manager is the only
/// component that decides how its fields change. Two records are equal when
/// they share an id, regardless of the other fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, assigned at creation.
    pub id: ItemId,

    /// Display name (never blank).
    pub name: String,

    /// Optional free-form description.
    pub description: Option<String>,

    /// Country the item is sold in.
    pub market: Market,

    /// Unit price (always positive).
    pub price: Decimal,

    /// Units on hand (never negative).
    pub stock: i64,

    /// Lifecycle status.
    pub status: ItemStatus,

    /// Stored version for compare-and-swap writes.
    #[serde(default)]
    pub version: Version,

    /// When the item was created.
    pub created_at: DateTime<Utc>,

    /// When the item was last changed.
    pub updated_at: DateTime<Utc>,
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl std::hash::Hash for Item {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: ItemId, stock: i64) -> Item {
        let now = Utc::now();
        Item {
            id,
            name: "Widget".to_string(),
            description: None,
            market: Market::parse("PT").unwrap(),
            price: Decimal::new(999, 2),
            stock,
            status: ItemStatus::Active,
            version: Version::first(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn version_sequence() {
        assert_eq!(Version::initial().next(), Version::first());
        assert_eq!(Version::first().next(), Version::new(2));
        assert!(Version::new(3) > Version::first());
    }

    #[test]
    fn items_compare_by_id_only() {
        let id = ItemId::new();
        assert_eq!(sample(id, 1), sample(id, 99));
        assert_ne!(sample(id, 1), sample(ItemId::new(), 1));
    }

    #[test]
    fn missing_version_deserializes_as_initial() {
        let json = serde_json::json!({
            "id": ItemId::new(),
            "name": "Widget",
            "description": null,
            "market": "pt",
            "price": "9.99",
            "stock": 2,
            "status": "INACTIVE",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
        });

        let item: Item = serde_json::from_value(json).unwrap();
        assert_eq!(item.version, Version::initial());
        assert_eq!(item.market.as_str(), "PT");
        assert_eq!(item.status, ItemStatus::Inactive);
        assert_eq!(item.price, Decimal::new(999, 2));
    }
}

//! Item records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One inventory record.
///
/// Stack-eligible items share a slot via `count`; unique items get a
/// slot each. A count of zero leaves the record in place — whether a
/// drained stack disappears is the caller's decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable type key, e.g. `"apple"` or `"lamp_blue"`.
    pub type_key: String,
    /// Display name.
    pub name: String,
    /// Flavor/description text shown in tooltips.
    pub description: String,
    /// Whether multiple units share one slot via `count`.
    pub stackable: bool,
    /// Number of units in this slot. Never negative.
    pub count: u32,
    /// Opaque per-item properties (color, placement, wear...).
    /// The engine round-trips these without interpreting them.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, serde_json::Value>,
}

impl Item {
    /// Creates a stack-eligible item with the given count.
    #[must_use]
    pub fn stackable(type_key: impl Into<String>, name: impl Into<String>, count: u32) -> Self {
        Self {
            type_key: type_key.into(),
            name: name.into(),
            description: String::new(),
            stackable: true,
            count,
            properties: HashMap::new(),
        }
    }

    /// Creates a unique (non-stacking) item.
    #[must_use]
    pub fn unique(type_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_key: type_key.into(),
            name: name.into(),
            description: String::new(),
            stackable: false,
            count: 1,
            properties: HashMap::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attaches an opaque property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let item = Item::stackable("apple", "Apple", 3)
            .with_description("Keeps the vet away.")
            .with_property("freshness", serde_json::json!(0.9));
        assert!(item.stackable);
        assert_eq!(item.count, 3);
        assert_eq!(item.properties["freshness"], serde_json::json!(0.9));

        let lamp = Item::unique("lamp_blue", "Blue Lamp");
        assert!(!lamp.stackable);
        assert_eq!(lamp.count, 1);
    }
}

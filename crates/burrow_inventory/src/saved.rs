//! The persistence hand-off.
//!
//! `SavedInventory` is the `{slot_id -> record}` structure the host
//! moves to and from its key-value store or remote sync client. It is
//! plain serde data: the engine produces and consumes it, nothing
//! more.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::item::Item;

/// One serialized slot record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedItem {
    /// Stable type key.
    pub type_key: String,
    /// Display name.
    pub name: String,
    /// Description text.
    #[serde(default)]
    pub description: String,
    /// Stack eligibility.
    pub stackable: bool,
    /// Unit count.
    pub count: u32,
    /// Opaque per-item properties, round-tripped untouched.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, serde_json::Value>,
}

impl SavedItem {
    pub(crate) fn from_item(item: &Item) -> Self {
        Self {
            type_key: item.type_key.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            stackable: item.stackable,
            count: item.count,
            properties: item.properties.clone(),
        }
    }

    pub(crate) fn to_item(&self) -> Item {
        Item {
            type_key: self.type_key.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            stackable: self.stackable,
            count: self.count,
            properties: self.properties.clone(),
        }
    }
}

/// The full serialized inventory, keyed by raw slot id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedInventory {
    /// Slot records in slot order.
    pub slots: BTreeMap<u32, SavedItem>,
}

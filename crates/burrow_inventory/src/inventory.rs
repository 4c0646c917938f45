//! The slot map and stack index.

use std::collections::{BTreeMap, HashMap};

use crate::error::{InventoryError, InventoryResult};
use crate::item::Item;
use crate::saved::{SavedInventory, SavedItem};

/// Identifier of an inventory slot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SlotId(pub u32);

impl SlotId {
    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A keyed collection of item slots.
///
/// Slots live in a `BTreeMap` so free-id scans and iteration are
/// ordered; the stack index maps a stack-eligible type key to its one
/// slot for O(1) lookup.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    slots: BTreeMap<SlotId, Item>,
    stack_index: HashMap<String, SlotId>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true when no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the item in `slot`, if any.
    #[must_use]
    pub fn get(&self, slot: SlotId) -> Option<&Item> {
        self.slots.get(&slot)
    }

    /// Returns the slot holding the stack for `type_key`, if any.
    #[must_use]
    pub fn stack_slot(&self, type_key: &str) -> Option<SlotId> {
        self.stack_index.get(type_key).copied()
    }

    /// Iterates `(slot, item)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Item)> {
        self.slots.iter().map(|(id, item)| (*id, item))
    }

    /// Total units of `type_key` across the inventory.
    #[must_use]
    pub fn count_of(&self, type_key: &str) -> u32 {
        self.slots
            .values()
            .filter(|item| item.type_key == type_key)
            .map(|item| item.count)
            .sum()
    }

    /// Returns true when at least `qty` units of `type_key` are held.
    #[must_use]
    pub fn has_stackable(&self, type_key: &str, qty: u32) -> bool {
        self.stack_index
            .get(type_key)
            .and_then(|slot| self.slots.get(slot))
            .is_some_and(|item| item.count >= qty)
    }

    /// Adds `qty` units of a stack-eligible type.
    ///
    /// Increments the existing stack when one exists; otherwise
    /// allocates the smallest free slot. Returns the slot used.
    pub fn add_stackable(&mut self, type_key: &str, name: &str, qty: u32) -> SlotId {
        if let Some(&slot) = self.stack_index.get(type_key) {
            if let Some(item) = self.slots.get_mut(&slot) {
                item.count = item.count.saturating_add(qty);
                return slot;
            }
        }

        let slot = self.lowest_free_slot();
        self.slots.insert(slot, Item::stackable(type_key, name, qty));
        self.stack_index.insert(type_key.to_owned(), slot);
        slot
    }

    /// Adds a unique item in a fresh slot. Returns the slot used.
    ///
    /// Stack-eligible items passed here are routed through the stack
    /// path instead so the one-slot-per-type invariant holds.
    pub fn add_unique(&mut self, item: Item) -> SlotId {
        if item.stackable {
            return self.add_stackable(&item.type_key, &item.name, item.count);
        }
        let slot = self.lowest_free_slot();
        self.slots.insert(slot, item);
        slot
    }

    /// Removes `qty` units from the stack for `type_key`, clamping
    /// at zero. The zero-count record stays in its slot; removing it
    /// is the caller's call via [`Inventory::remove_by_id`].
    ///
    /// # Errors
    ///
    /// [`InventoryError::ItemNotPresent`] when the type has no slot.
    pub fn subtract_stackable(&mut self, type_key: &str, qty: u32) -> InventoryResult<u32> {
        let slot = self
            .stack_index
            .get(type_key)
            .ok_or_else(|| InventoryError::ItemNotPresent {
                type_key: type_key.to_owned(),
            })?;
        let item = self
            .slots
            .get_mut(slot)
            .ok_or_else(|| InventoryError::ItemNotPresent {
                type_key: type_key.to_owned(),
            })?;
        item.count = item.count.saturating_sub(qty);
        Ok(item.count)
    }

    /// Removes a slot outright and returns its item.
    ///
    /// For stack-eligible items the stack-index entry goes with it.
    ///
    /// # Errors
    ///
    /// [`InventoryError::NoSuchSlot`] when the slot is empty.
    pub fn remove_by_id(&mut self, slot: SlotId) -> InventoryResult<Item> {
        let item = self
            .slots
            .remove(&slot)
            .ok_or(InventoryError::NoSuchSlot(slot.raw()))?;
        if item.stackable {
            self.stack_index.remove(&item.type_key);
        }
        Ok(item)
    }

    /// Produces the serialized hand-off structure for the host's
    /// key-value store. The engine itself never performs I/O.
    #[must_use]
    pub fn to_saved(&self) -> SavedInventory {
        SavedInventory {
            slots: self
                .slots
                .iter()
                .map(|(id, item)| (id.raw(), SavedItem::from_item(item)))
                .collect(),
        }
    }

    /// Rebuilds an inventory from the saved form, including the
    /// stack-type index.
    #[must_use]
    pub fn from_saved(saved: &SavedInventory) -> Self {
        let mut inv = Self::new();
        for (raw_id, record) in &saved.slots {
            let slot = SlotId(*raw_id);
            let item = record.to_item();
            if item.stackable {
                inv.stack_index.insert(item.type_key.clone(), slot);
            }
            inv.slots.insert(slot, item);
        }
        inv
    }

    /// Smallest non-negative slot id not currently in use.
    fn lowest_free_slot(&self) -> SlotId {
        let mut candidate = 0u32;
        for id in self.slots.keys() {
            if id.raw() == candidate {
                candidate += 1;
            } else {
                break;
            }
        }
        SlotId(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacking_keeps_one_slot() {
        let mut inv = Inventory::new();
        let slot_a = inv.add_stackable("apple", "Apple", 3);
        let slot_b = inv.add_stackable("apple", "Apple", 2);
        assert_eq!(slot_a, slot_b);
        assert_eq!(inv.count_of("apple"), 5);
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn test_subtract_clamps_and_keeps_slot() {
        let mut inv = Inventory::new();
        let slot = inv.add_stackable("apple", "Apple", 3);
        inv.add_stackable("apple", "Apple", 2);

        let remaining = inv.subtract_stackable("apple", 5).unwrap();
        assert_eq!(remaining, 0);
        // Drained stacks stay until the caller removes them, and the
        // slot id never moved while the count was positive.
        assert_eq!(inv.stack_slot("apple"), Some(slot));
        assert_eq!(inv.get(slot).unwrap().count, 0);
    }

    #[test]
    fn test_subtract_absent_is_an_error() {
        let mut inv = Inventory::new();
        assert_eq!(
            inv.subtract_stackable("ghost", 1),
            Err(InventoryError::ItemNotPresent {
                type_key: "ghost".to_owned()
            })
        );
    }

    #[test]
    fn test_slot_ids_fill_lowest_gap() {
        let mut inv = Inventory::new();
        let a = inv.add_unique(Item::unique("lamp", "Lamp"));
        let b = inv.add_unique(Item::unique("rug", "Rug"));
        let c = inv.add_unique(Item::unique("plant", "Plant"));
        assert_eq!((a, b, c), (SlotId(0), SlotId(1), SlotId(2)));

        inv.remove_by_id(b).unwrap();
        let d = inv.add_unique(Item::unique("clock", "Clock"));
        assert_eq!(d, SlotId(1));
    }

    #[test]
    fn test_remove_clears_stack_index() {
        let mut inv = Inventory::new();
        let slot = inv.add_stackable("apple", "Apple", 1);
        inv.remove_by_id(slot).unwrap();
        assert_eq!(inv.stack_slot("apple"), None);
        // Adding again re-allocates from zero.
        assert_eq!(inv.add_stackable("apple", "Apple", 1), SlotId(0));
    }

    #[test]
    fn test_has_stackable() {
        let mut inv = Inventory::new();
        inv.add_stackable("seed", "Seed", 4);
        assert!(inv.has_stackable("seed", 4));
        assert!(!inv.has_stackable("seed", 5));
        assert!(!inv.has_stackable("ghost", 1));
    }

    #[test]
    fn test_saved_roundtrip_rebuilds_index() {
        let mut inv = Inventory::new();
        inv.add_stackable("apple", "Apple", 7);
        inv.add_unique(
            Item::unique("lamp_blue", "Blue Lamp").with_property("hue", serde_json::json!("blue")),
        );

        let restored = Inventory::from_saved(&inv.to_saved());
        assert_eq!(restored.count_of("apple"), 7);
        assert_eq!(restored.stack_slot("apple"), inv.stack_slot("apple"));
        assert_eq!(restored.len(), 2);
        // The rebuilt index still routes stacking to the same slot.
        let mut restored = restored;
        let slot = restored.add_stackable("apple", "Apple", 1);
        assert_eq!(Some(slot), inv.stack_slot("apple"));
    }
}

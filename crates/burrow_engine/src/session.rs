//! Session state and the persistence hand-off.
//!
//! The session owns everything that outlives a single tick: the
//! entity arena, the inventory, experience, the seeded RNG, and the
//! queue of engine events awaiting the next room update. It is always
//! passed explicitly — no global current-game object.

use burrow_inventory::{Inventory, SavedInventory};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::events::EngineEvent;
use crate::scene::SceneTree;

/// Mutable session state.
pub struct Session {
    /// The entity arena, across all rooms.
    pub scene: SceneTree,
    /// The item collection.
    pub inventory: Inventory,
    /// Experience points.
    pub xp: u64,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) events: Vec<EngineEvent>,
}

impl Session {
    /// Creates a session with a seeded RNG.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            scene: SceneTree::new(),
            inventory: Inventory::new(),
            xp: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// The session RNG, for state-group selection while building
    /// entities.
    #[must_use]
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Engine events queued since the last room update, in order.
    #[must_use]
    pub fn pending_events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Builds the save blob handed to the host's key-value store.
    #[must_use]
    pub fn save(&self, current_room: &str) -> SaveBlob {
        SaveBlob {
            inventory: self.inventory.to_saved(),
            xp: self.xp,
            current_room: current_room.to_owned(),
        }
    }

    /// Restores inventory and progress from a save blob. The caller
    /// re-stages the room named in the blob.
    pub fn restore(&mut self, blob: &SaveBlob) {
        self.inventory = Inventory::from_saved(&blob.inventory);
        self.xp = blob.xp;
    }
}

/// The single structure exchanged with the persistence collaborator.
/// The engine produces and consumes it; all I/O is the host's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveBlob {
    /// Serialized inventory slots.
    pub inventory: SavedInventory,
    /// Experience points.
    pub xp: u64,
    /// Name of the room that was current at save time.
    pub current_room: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_inventory::Item;

    #[test]
    fn test_save_restore_roundtrip() {
        let mut session = Session::new(1);
        session.inventory.add_stackable("apple", "Apple", 4);
        session
            .inventory
            .add_unique(Item::unique("lamp", "Lamp"));
        session.xp = 250;

        let blob = session.save("den");
        let json = serde_json::to_string(&blob).unwrap();
        let back: SaveBlob = serde_json::from_str(&json).unwrap();
        assert_eq!(back, blob);

        let mut restored = Session::new(99);
        restored.restore(&back);
        assert_eq!(restored.xp, 250);
        assert_eq!(restored.inventory.count_of("apple"), 4);
        assert_eq!(restored.inventory.len(), 2);
        assert_eq!(blob.current_room, "den");
    }
}

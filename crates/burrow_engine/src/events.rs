//! Engine events.
//!
//! Animation completions and click reactions are explicit events,
//! pushed onto the session queue and drained by the current room's
//! `update` hook once per tick. No continuation capture, no ambient
//! state.

use burrow_inventory::SlotId;

use crate::scene::EntityId;

/// Something the engine did that room logic may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineEvent {
    /// An animation state ran its frame list to the end.
    ///
    /// Emitted exactly once per activation, before any queued state
    /// starts. `tag` is whatever the caller attached when the state
    /// was set or queued.
    StateCompleted {
        /// Entity whose state finished.
        entity: EntityId,
        /// Name of the finished state.
        state: String,
        /// Caller-supplied completion tag.
        tag: Option<String>,
    },

    /// A button entity was clicked.
    ButtonPressed {
        /// The button.
        entity: EntityId,
    },

    /// A slot in an inventory grid was clicked.
    SlotChosen {
        /// The slot-grid entity.
        grid: EntityId,
        /// The inventory slot the clicked cell displays.
        slot: SlotId,
    },
}

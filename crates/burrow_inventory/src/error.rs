//! Inventory error types.

use thiserror::Error;

/// Errors that can occur in inventory operations.
///
/// These indicate caller mistakes, not user input; they propagate to
/// the immediate caller and are expected to be handled by the room
/// logic that triggered them, never to abort the tick loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// A stack operation referenced a type key with no slot.
    #[error("item not present: {type_key}")]
    ItemNotPresent {
        /// The missing type key.
        type_key: String,
    },

    /// A stack operation referenced an item that is not stack-eligible.
    #[error("item not stackable: {type_key}")]
    NotStackable {
        /// The offending type key.
        type_key: String,
    },

    /// A slot id that does not exist.
    #[error("no such slot: {0}")]
    NoSuchSlot(u32),
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

//! Engine error types.
//!
//! Two classes, handled differently:
//!
//! - runtime invariant violations (undeclared state names, unknown
//!   rooms) return these errors to the immediate caller
//! - configuration errors detected mid-tick (missing sheets, broken
//!   tables at queue-pop time) are logged and degrade locally; they
//!   never surface here

use thiserror::Error;

/// Errors that can occur in engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A state or group name not declared in the entity's table.
    #[error("unknown animation state: {0:?}")]
    UnknownState(String),

    /// A state table that cannot be honored at runtime.
    #[error("invalid state table: {0}")]
    InvalidStateTable(String),

    /// A room name not present in the session graph.
    #[error("unknown room: {0:?}")]
    UnknownRoom(String),

    /// An entity id that is not (or no longer) in the arena.
    #[error("no such entity: {0}")]
    NoSuchEntity(u64),

    /// Engine tuning that cannot be parsed or fails validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

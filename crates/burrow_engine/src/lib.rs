//! # Burrow Engine
//!
//! Retained-mode pixel scene graph and interaction engine for a
//! desktop companion. Entities live in an id-addressed arena, carry
//! animation state machines and spring motion, and are composited
//! once per tick into a fixed-size color grid the host blits.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        ONE TICK                            │
//! ├────────────────────────────────────────────────────────────┤
//! │ Pointer Events → InputRouter → per-kind behavior           │
//! │       ↓                                                    │
//! │ Room update hook ← drained engine events                   │
//! │       ↓                                                    │
//! │ MotionController → AnimationStateMachine → Compositor      │
//! │       ↓                                                    │
//! │ ScreenBuffer → host blit (pixel_size squares)              │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ground rules
//!
//! - Exactly one mutator: all state changes happen inside the tick
//!   or inside the pointer callbacks the tick owner invokes.
//! - Sprite matrices are immutable and shared; the compositor and
//!   hit tester clip silently.
//! - Config errors degrade the picture (transparent fallbacks),
//!   never the tick loop; contract violations return errors to the
//!   immediate caller.

pub mod animation;
pub mod assets;
mod behavior;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod events;
pub mod geom;
pub mod input;
pub mod layout;
pub mod motion;
pub mod room;
pub mod scene;
pub mod session;
pub mod sprite;
pub mod text;

pub use animation::{AnimationStateMachine, StateTable, StateTableConfig};
pub use assets::AssetCatalog;
pub use behavior::sync_slot_grid;
pub use compositor::{collect_sprites, render_room, ScreenBuffer};
pub use config::{EngineConfig, SpringConfig, DEFAULT_GRID_WIDTH, DEFAULT_TICK_RATE};
pub use engine::Engine;
pub use entity::{
    Accessory, CanvasState, Entity, EntityFlags, EntityKind, SlotGridState, TextStamp,
    TooltipState,
};
pub use error::{EngineError, EngineResult};
pub use events::EngineEvent;
pub use geom::{GridPoint, GridRect, Viewport};
pub use input::InputRouter;
pub use layout::{GridLayout, ScrollAxis};
pub use motion::MotionController;
pub use room::{Room, RoomBehavior, RoomCtx, SessionGraph};
pub use scene::{EntityId, SceneTree};
pub use session::{SaveBlob, Session};
pub use sprite::Sprite;
pub use text::GlyphSet;

//! Rooms and the session graph.
//!
//! A room is a named collection of top-level entities plus behavior
//! hooks. Exactly one room is current; a switch is staged and applied
//! between ticks, so the old room's entities vanish from the very
//! next compositor and hit-test pass. Hooks receive the session state
//! as an explicit context value — there is no ambient session.

use burrow_inventory::Inventory;
use rand_chacha::ChaCha8Rng;

use crate::error::{EngineError, EngineResult};
use crate::events::EngineEvent;
use crate::scene::{EntityId, SceneTree};

/// Session state handed to room hooks.
pub struct RoomCtx<'a> {
    /// The entity arena.
    pub scene: &'a mut SceneTree,
    /// The session inventory.
    pub inventory: &'a mut Inventory,
    /// The seeded session RNG.
    pub rng: &'a mut ChaCha8Rng,
    /// Session experience points.
    pub xp: &'a mut u64,
    /// Top-level entity ids of the room the hook belongs to.
    pub roots: Vec<EntityId>,
}

/// Behavior hooks a room may implement. All default to no-ops.
pub trait RoomBehavior {
    /// Runs when the room becomes current.
    fn on_enter(&mut self, ctx: &mut RoomCtx<'_>) {
        let _ = ctx;
    }

    /// Runs when the room stops being current.
    fn on_exit(&mut self, ctx: &mut RoomCtx<'_>) {
        let _ = ctx;
    }

    /// Runs once per tick while current, receiving the engine events
    /// drained since the previous update.
    fn update(&mut self, ctx: &mut RoomCtx<'_>, events: &[EngineEvent]) {
        let _ = (ctx, events);
    }
}

/// A named collection of top-level entities with behavior hooks.
pub struct Room {
    name: String,
    adjacent: Vec<String>,
    entities: Vec<EntityId>,
    behavior: Option<Box<dyn RoomBehavior>>,
}

impl Room {
    /// Creates an empty room.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adjacent: Vec::new(),
            entities: Vec::new(),
            behavior: None,
        }
    }

    /// Declares adjacent room names (informational only; switching
    /// is not restricted to adjacency).
    #[must_use]
    pub fn with_adjacent(mut self, adjacent: Vec<String>) -> Self {
        self.adjacent = adjacent;
        self
    }

    /// Attaches behavior hooks.
    #[must_use]
    pub fn with_behavior(mut self, behavior: Box<dyn RoomBehavior>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// The room name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared adjacent room names.
    #[must_use]
    pub fn adjacent(&self) -> &[String] {
        &self.adjacent
    }

    /// Registers a top-level entity.
    pub fn add_entity(&mut self, id: EntityId) {
        self.entities.push(id);
    }

    /// Top-level entity ids in room order.
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Unregisters a top-level entity (its arena subtree is the
    /// caller's to remove).
    pub fn remove_entity(&mut self, id: EntityId) {
        self.entities.retain(|&e| e != id);
    }
}

/// The named rooms of a session, with one current at a time.
#[derive(Default)]
pub struct SessionGraph {
    rooms: Vec<Room>,
    current: Option<usize>,
    staged: Option<usize>,
}

impl SessionGraph {
    /// Creates an empty graph with no current room.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room. A room with the same name replaces the old one
    /// (with a log line).
    pub fn add_room(&mut self, room: Room) {
        if let Some(existing) = self.rooms.iter().position(|r| r.name == room.name) {
            tracing::warn!(name = %room.name, "replacing existing room");
            self.rooms[existing] = room;
        } else {
            self.rooms.push(room);
        }
    }

    /// Looks up a room by name.
    #[must_use]
    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }

    /// Mutable lookup by name.
    #[must_use]
    pub fn room_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.name == name)
    }

    /// The current room, if one has been activated.
    #[must_use]
    pub fn current(&self) -> Option<&Room> {
        self.current.map(|i| &self.rooms[i])
    }

    /// Mutable access to the current room.
    #[must_use]
    pub fn current_mut(&mut self) -> Option<&mut Room> {
        self.current.map(|i| &mut self.rooms[i])
    }

    /// Stages a switch to `name`. The switch is applied between
    /// ticks, never mid-pass.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownRoom`] when no room has that name.
    pub fn switch_to(&mut self, name: &str) -> EngineResult<()> {
        let index = self
            .rooms
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| EngineError::UnknownRoom(name.to_owned()))?;
        self.staged = Some(index);
        Ok(())
    }

    /// Applies a staged switch, returning `(old, new)` indices when
    /// one happened. Staging the already-current room is a no-op.
    pub(crate) fn apply_staged(&mut self) -> Option<(Option<usize>, usize)> {
        let staged = self.staged.take()?;
        if self.current == Some(staged) {
            return None;
        }
        let old = self.current;
        self.current = Some(staged);
        Some((old, staged))
    }

    /// Takes the behavior box of room `index` for the hook-call
    /// borrow dance.
    pub(crate) fn take_behavior(&mut self, index: usize) -> Option<Box<dyn RoomBehavior>> {
        self.rooms.get_mut(index).and_then(|r| r.behavior.take())
    }

    /// Returns a behavior box taken with
    /// [`SessionGraph::take_behavior`].
    pub(crate) fn put_behavior(&mut self, index: usize, behavior: Option<Box<dyn RoomBehavior>>) {
        if let Some(room) = self.rooms.get_mut(index) {
            room.behavior = behavior;
        }
    }

    /// Index of the current room.
    pub(crate) fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Top-level entity ids of room `index`.
    pub(crate) fn entities_of(&self, index: usize) -> Vec<EntityId> {
        self.rooms
            .get(index)
            .map(|r| r.entities.clone())
            .unwrap_or_default()
    }
}

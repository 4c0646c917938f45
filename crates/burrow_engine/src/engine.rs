//! The fixed-tick driver.
//!
//! One tick = one call to [`Engine::tick`]:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ 1. apply staged room switch (exit/enter hooks)       │
//! │ 2. room update hook, fed the drained event queue     │
//! │ 3. advance motion (spring integration)               │
//! │ 4. advance animation frames (completions -> queue)   │
//! │ 5. composite the room into the screen buffer         │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Pointer events are routed synchronously when the host delivers
//! them; the host, the timer, and the router never run concurrently,
//! so there is exactly one mutator at any instant. Events arriving
//! before the asset preload completes are ignored, never a panic.

use burrow_sprite::SpriteMatrix;

use crate::assets::AssetCatalog;
use crate::behavior::BehaviorCtx;
use crate::compositor::{render_room, ScreenBuffer};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::events::EngineEvent;
use crate::geom::Viewport;
use crate::input::InputRouter;
use crate::room::{Room, RoomCtx, SessionGraph};
use crate::session::{SaveBlob, Session};

/// The engine: session, rooms, router, assets, and the tick loop.
pub struct Engine {
    config: EngineConfig,
    viewport: Viewport,
    catalog: AssetCatalog,
    /// Session state (arena, inventory, progress).
    pub session: Session,
    rooms: SessionGraph,
    router: InputRouter,
    preloaded: bool,
    tick_count: u64,
}

impl Engine {
    /// Creates an engine from config. Assets must be preloaded and a
    /// room staged before the first tick produces anything visible.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let grid = config.grid_width;
        let session = Session::new(config.rng_seed);
        Self {
            config,
            viewport: Viewport::new(grid, grid as f32, grid as f32),
            catalog: AssetCatalog::new(),
            session,
            rooms: SessionGraph::new(),
            router: InputRouter::new(),
            preloaded: false,
            tick_count: 0,
        }
    }

    /// The engine config.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The host-pixel mapping.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The asset catalog.
    #[must_use]
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Ticks completed so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// True once the preload phase has completed.
    #[must_use]
    pub fn is_preloaded(&self) -> bool {
        self.preloaded
    }

    /// Completes the one-time preload phase: every decoded sheet
    /// enters the catalog, and ticking may begin. Must run before
    /// the first tick is scheduled.
    pub fn preload(&mut self, sheets: impl IntoIterator<Item = (String, SpriteMatrix)>) {
        for (name, sheet) in sheets {
            self.catalog.insert_sheet(name, sheet);
        }
        self.preloaded = true;
        tracing::info!(sheets = self.catalog.len(), "asset preload complete");
    }

    /// Registers a room.
    pub fn add_room(&mut self, room: Room) {
        self.rooms.add_room(room);
    }

    /// Mutable access to a room (to register entities).
    #[must_use]
    pub fn room_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.room_mut(name)
    }

    /// Stages a room switch, applied between ticks.
    ///
    /// # Errors
    ///
    /// [`crate::EngineError::UnknownRoom`] when no room has that name.
    pub fn switch_room(&mut self, name: &str) -> EngineResult<()> {
        self.rooms.switch_to(name)
    }

    /// Name of the current room, once one has been activated.
    #[must_use]
    pub fn current_room_name(&self) -> Option<&str> {
        self.rooms.current().map(Room::name)
    }

    /// Host viewport resize: recomputes the pixel mapping.
    pub fn resize(&mut self, view_w: f32, view_h: f32) {
        self.viewport.resize(view_w, view_h);
        tracing::debug!(view_w, view_h, pixel_size = self.viewport.pixel_size(), "viewport resized");
    }

    /// Pointer move in raw host pixels.
    pub fn pointer_moved(&mut self, raw_x: f32, raw_y: f32) {
        if !self.ready_for_input() {
            return;
        }
        let point = self.viewport.to_grid_point(raw_x, raw_y);
        let roots = self.current_roots();
        let mut ctx = BehaviorCtx {
            scene: &mut self.session.scene,
            events: &mut self.session.events,
            rng: &mut self.session.rng,
        };
        self.router.pointer_moved(&mut ctx, &roots, point.x, point.y);
    }

    /// Pointer press in raw host pixels.
    pub fn pointer_down(&mut self, raw_x: f32, raw_y: f32) {
        if !self.ready_for_input() {
            return;
        }
        let point = self.viewport.to_grid_point(raw_x, raw_y);
        let roots = self.current_roots();
        let mut ctx = BehaviorCtx {
            scene: &mut self.session.scene,
            events: &mut self.session.events,
            rng: &mut self.session.rng,
        };
        self.router.pointer_down(&mut ctx, &roots, point.x, point.y);
    }

    /// Pointer release.
    pub fn pointer_up(&mut self) {
        if !self.ready_for_input() {
            return;
        }
        self.router.pointer_up();
    }

    /// Wheel event in raw host pixels; `up` is scroll direction.
    pub fn wheel(&mut self, raw_x: f32, raw_y: f32, up: bool) {
        if !self.ready_for_input() {
            return;
        }
        let point = self.viewport.to_grid_point(raw_x, raw_y);
        let roots = self.current_roots();
        let mut ctx = BehaviorCtx {
            scene: &mut self.session.scene,
            events: &mut self.session.events,
            rng: &mut self.session.rng,
        };
        self.router.wheel(&mut ctx, &roots, point.x, point.y, up);
    }

    /// Runs one tick and returns the composited screen buffer for
    /// the host to blit.
    pub fn tick(&mut self) -> ScreenBuffer {
        let grid = self.config.grid_width as usize;
        if !self.preloaded {
            tracing::warn!("tick before preload completed; rendering blank");
            return ScreenBuffer::new(grid, grid);
        }

        self.apply_room_switch();

        // Feed the events the previous tick produced to the room.
        let events = std::mem::take(&mut self.session.events);
        if let Some(index) = self.rooms.current_index() {
            self.run_room_hook(index, |behavior, ctx| behavior.update(ctx, &events));
        }

        self.advance_motion();
        self.advance_animation();

        let buffer = if let Some(index) = self.rooms.current_index() {
            render_room(
                &self.session.scene,
                &self.rooms.entities_of(index),
                grid,
                grid,
            )
        } else {
            ScreenBuffer::new(grid, grid)
        };

        self.tick_count += 1;
        buffer
    }

    /// Builds the save blob for the persistence collaborator.
    #[must_use]
    pub fn save(&self) -> SaveBlob {
        self.session
            .save(self.current_room_name().unwrap_or_default())
    }

    /// Restores session state from a save blob and stages the room
    /// it names (when that room exists).
    pub fn restore(&mut self, blob: &SaveBlob) {
        self.session.restore(blob);
        if !blob.current_room.is_empty() {
            if let Err(err) = self.rooms.switch_to(&blob.current_room) {
                tracing::warn!(%err, "save blob names a room this session does not have");
            }
        }
    }

    fn ready_for_input(&self) -> bool {
        if self.preloaded {
            true
        } else {
            tracing::debug!("pointer event before preload completed; ignored");
            false
        }
    }

    fn current_roots(&self) -> Vec<crate::scene::EntityId> {
        self.rooms
            .current_index()
            .map(|i| self.rooms.entities_of(i))
            .unwrap_or_default()
    }

    fn apply_room_switch(&mut self) {
        let Some((old, new)) = self.rooms.apply_staged() else {
            return;
        };
        // Stale hover/drag ids must not outlive the old room's pass.
        self.router.forget();
        if let Some(old) = old {
            self.run_room_hook(old, |behavior, ctx| behavior.on_exit(ctx));
        }
        self.run_room_hook(new, |behavior, ctx| behavior.on_enter(ctx));
        if let Some(room) = self.rooms.current() {
            tracing::info!(room = room.name(), "room switched");
        }
    }

    /// Calls one behavior hook with the session threaded in. The
    /// behavior box is taken out of the room for the duration so the
    /// hook can freely touch the graph-owned entity lists.
    fn run_room_hook(
        &mut self,
        index: usize,
        call: impl FnOnce(&mut dyn crate::room::RoomBehavior, &mut RoomCtx<'_>),
    ) {
        let Some(mut behavior) = self.rooms.take_behavior(index) else {
            return;
        };
        let roots = self.rooms.entities_of(index);
        let mut ctx = RoomCtx {
            scene: &mut self.session.scene,
            inventory: &mut self.session.inventory,
            rng: &mut self.session.rng,
            xp: &mut self.session.xp,
            roots,
        };
        call(behavior.as_mut(), &mut ctx);
        self.rooms.put_behavior(index, Some(behavior));
    }

    /// Spring motion for every entity of the current room.
    fn advance_motion(&mut self) {
        let dt = self.config.tick_dt();
        for id in self.current_room_subtree() {
            if let Some(entity) = self.session.scene.entity_mut(id) {
                if entity.motion.is_moving() {
                    let next = entity.motion.update_position((entity.x, entity.y), dt);
                    entity.x = next.0;
                    entity.y = next.1;
                }
            }
        }
    }

    /// Frame advance for every entity of the current room;
    /// completions land on the session event queue.
    fn advance_animation(&mut self) {
        for id in self.current_room_subtree() {
            if let Some(entity) = self.session.scene.entity_mut(id) {
                if let Some(done) = entity.anim.advance_frame(&mut self.session.rng) {
                    self.session.events.push(EngineEvent::StateCompleted {
                        entity: id,
                        state: done.state,
                        tag: done.tag,
                    });
                }
            }
        }
    }

    fn current_room_subtree(&self) -> Vec<crate::scene::EntityId> {
        let mut ids = Vec::new();
        for root in self.current_roots() {
            ids.extend(self.session.scene.subtree_ids(root));
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityKind};
    use burrow_sprite::Pixel;
    use std::sync::Arc;

    fn engine_with_room() -> Engine {
        let mut engine = Engine::new(EngineConfig::default());
        engine.preload(vec![(
            "pet".to_owned(),
            SpriteMatrix::filled(4, 4, Pixel::BLACK).unwrap(),
        )]);
        engine.add_room(Room::new("den"));
        engine.switch_room("den").unwrap();
        engine
    }

    #[test]
    fn test_tick_before_preload_is_blank_and_safe() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.pointer_moved(10.0, 10.0);
        engine.pointer_down(10.0, 10.0);
        let buffer = engine.tick();
        assert!(buffer.is_blank());
        assert_eq!(buffer.width(), 128);
    }

    #[test]
    fn test_room_switch_applies_between_ticks() {
        let mut engine = engine_with_room();
        let frames = engine.catalog().sprites("pet", 4, 4);
        let id = engine
            .session
            .scene
            .insert(Entity::new(EntityKind::Image).with_frames(frames));
        engine.room_mut("den").unwrap().add_entity(id);

        engine.add_room(Room::new("garden"));
        let buffer = engine.tick();
        assert!(!buffer.is_blank());

        // Staged switch: the den is excluded from the very next pass.
        engine.switch_room("garden").unwrap();
        let buffer = engine.tick();
        assert!(buffer.is_blank());
        assert_eq!(engine.current_room_name(), Some("garden"));
    }

    #[test]
    fn test_motion_runs_in_tick() {
        let mut engine = engine_with_room();
        let frames = engine.catalog().sprites("pet", 4, 4);
        let id = engine
            .session
            .scene
            .insert(Entity::new(EntityKind::Image).with_frames(frames));
        engine.room_mut("den").unwrap().add_entity(id);
        engine
            .session
            .scene
            .entity_mut(id)
            .unwrap()
            .motion
            .start_moving_to(20, 0);

        for _ in 0..500 {
            engine.tick();
            if !engine.session.scene.entity(id).unwrap().motion.is_moving() {
                break;
            }
        }
        let entity = engine.session.scene.entity(id).unwrap();
        assert_eq!((entity.x, entity.y), (20, 0));
    }
}

//! Scene-graph nodes.
//!
//! An entity is a positioned, z-ordered node with an animation state
//! machine, a motion controller, behavior flags, and a closed kind
//! variant carrying kind-specific data. Behavior (hover, click,
//! scroll) is resolved per kind in `behavior.rs` — no virtual
//! dispatch, just the tagged variant.

use std::sync::Arc;

use burrow_inventory::SlotId;
use burrow_sprite::{Pixel, SpriteMatrix};

use crate::animation::{AnimationStateMachine, StateTable};
use crate::config::SpringConfig;
use crate::geom::GridPoint;
use crate::layout::GridLayout;
use crate::motion::MotionController;
use crate::scene::EntityId;
use crate::sprite::Sprite;
use crate::text::GlyphSet;

/// Entity behavior flags (bitfield).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityFlags(u32);

impl EntityFlags {
    /// Wheel events under the pointer route here.
    pub const SCROLLABLE: u32 = 1 << 0;
    /// Hover on any descendant also counts as hover on this entity.
    pub const HOVER_WITH_CHILDREN: u32 = 1 << 1;
    /// Children are collected during rendering.
    pub const RENDER_CHILDREN: u32 = 1 << 2;
    /// The hit tester writes pointer coordinates, relative to this
    /// entity, into its state.
    pub const PASS_MOUSE_COORDS: u32 = 1 << 3;

    /// No flags set.
    #[must_use]
    pub const fn none() -> Self {
        Self(0)
    }

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Builder form of [`EntityFlags::set`].
    #[must_use]
    pub const fn with(self, flag: u32) -> Self {
        Self(self.0 | flag)
    }
}

/// An extra sprite a character wears, offset from its anchor.
#[derive(Debug, Clone)]
pub struct Accessory {
    /// Shared pixel data.
    pub matrix: Arc<SpriteMatrix>,
    /// Offset from the character's left edge.
    pub dx: i32,
    /// Offset from the character's top edge.
    pub dy: i32,
    /// Paint-order offset from the character's z.
    pub dz: i32,
}

/// Mutable paint surface for the canvas entity.
#[derive(Debug, Clone)]
pub struct CanvasState {
    width: u32,
    height: u32,
    cells: Vec<Pixel>,
    /// Pixel painted by clicks and drags.
    pub brush: Pixel,
}

impl CanvasState {
    /// Creates a blank canvas.
    #[must_use]
    pub fn new(width: u32, height: u32, brush: Pixel) -> Self {
        Self {
            width,
            height,
            cells: vec![Pixel::Clear; (width * height) as usize],
            brush,
        }
    }

    /// Canvas width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Paints one cell at canvas-local coordinates; out-of-bounds
    /// points are clipped, not an error.
    pub fn paint_point(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.cells[(y as u32 * self.width + x as u32) as usize] = self.brush;
        }
    }

    /// Paints a line of brush cells between two canvas-local points
    /// (inclusive). Integer Bresenham; off-canvas stretches clip.
    pub fn paint_line(&mut self, from: (i32, i32), to: (i32, i32)) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.paint_point(x, y);
            if (x, y) == to {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x += sx;
            }
            if doubled <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Cell at canvas-local coordinates.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.cells[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Wipes the surface back to transparent.
    pub fn wipe(&mut self) {
        self.cells.fill(Pixel::Clear);
    }

    /// Snapshots the surface as a sprite matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Arc<SpriteMatrix> {
        SpriteMatrix::from_rows(
            self.cells
                .chunks_exact(self.width as usize)
                .map(<[Pixel]>::to_vec)
                .collect(),
        )
        .map_or_else(|_| SpriteMatrix::fallback(), Arc::new)
    }
}

/// Text rendered glyph-by-glyph from a font sheet.
#[derive(Debug, Clone)]
pub struct TextStamp {
    /// The string to stamp.
    pub text: String,
    /// Char-to-tile mapping.
    pub glyphs: GlyphSet,
}

/// Inventory display grid: children are generated per occupied slot.
#[derive(Debug, Clone)]
pub struct SlotGridState {
    /// Cell arrangement.
    pub layout: GridLayout,
    /// Slot chosen by the last click, if any.
    pub selected: Option<SlotId>,
    /// Which child entity displays which inventory slot.
    pub(crate) slot_children: Vec<(EntityId, SlotId)>,
}

impl SlotGridState {
    /// Creates an empty slot grid over `layout`.
    #[must_use]
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            selected: None,
            slot_children: Vec::new(),
        }
    }

    /// The inventory slot a child entity displays, if it is one of
    /// this grid's generated cells.
    #[must_use]
    pub fn slot_of_child(&self, child: EntityId) -> Option<SlotId> {
        self.slot_children
            .iter()
            .find(|(id, _)| *id == child)
            .map(|(_, slot)| *slot)
    }
}

/// Hover tooltip: a baked panel toggled by the owner's hover state.
#[derive(Debug, Clone)]
pub struct TooltipState {
    /// Baked panel pixels.
    pub panel: Arc<SpriteMatrix>,
    /// Whether the panel renders (and hit-tests) this tick.
    pub visible: bool,
}

/// The closed set of entity kinds.
#[derive(Debug, Clone)]
pub enum EntityKind {
    /// A static image.
    Image,
    /// An animated character, optionally wearing an accessory.
    Character {
        /// Worn sprite, stacked above the body.
        accessory: Option<Accessory>,
    },
    /// A button; swaps to its `hovered` state on hover.
    Button,
    /// A paintable surface.
    Canvas(CanvasState),
    /// Glyph-stamped text.
    Text(TextStamp),
    /// A grid layout container.
    Layout(GridLayout),
    /// An inventory display grid.
    SlotGrid(SlotGridState),
    /// A hover tooltip panel.
    Tooltip(TooltipState),
}

impl EntityKind {
    /// The layout parameters, for container kinds.
    #[must_use]
    pub fn layout_mut(&mut self) -> Option<&mut GridLayout> {
        match self {
            Self::Layout(layout) => Some(layout),
            Self::SlotGrid(state) => Some(&mut state.layout),
            _ => None,
        }
    }

    /// Shared-reference form of [`EntityKind::layout_mut`].
    #[must_use]
    pub fn layout(&self) -> Option<&GridLayout> {
        match self {
            Self::Layout(layout) => Some(layout),
            Self::SlotGrid(state) => Some(&state.layout),
            _ => None,
        }
    }
}

/// A scene-graph node.
///
/// Identity lives in the arena ([`crate::scene::SceneTree`]); the
/// node itself stores position, paint order, flags, frames, and the
/// embedded animation/motion machinery.
#[derive(Debug)]
pub struct Entity {
    /// Position relative to the parent (grid cells).
    pub x: i32,
    /// Position relative to the parent (grid cells).
    pub y: i32,
    /// Paint order; higher paints on top. Not depth-buffered.
    pub z: i32,
    /// Behavior flags.
    pub flags: EntityFlags,
    /// Frame list the animation machine indexes into.
    pub frames: Vec<Arc<SpriteMatrix>>,
    /// Animation state machine.
    pub anim: AnimationStateMachine,
    /// Spring motion controller.
    pub motion: MotionController,
    /// Kind tag and kind-specific data.
    pub kind: EntityKind,
    /// Last pointer position relative to this entity, written by the
    /// hit tester for `PASS_MOUSE_COORDS` entities.
    pub last_pointer: Option<GridPoint>,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
}

impl Entity {
    /// Creates an entity of `kind` at the origin with no frames (the
    /// 1x1 transparent fallback), a single `default` state, and
    /// default spring tuning.
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            flags: EntityFlags::none(),
            frames: vec![SpriteMatrix::fallback()],
            anim: AnimationStateMachine::new(Arc::new(StateTable::single_default())),
            motion: MotionController::new(SpringConfig::default()),
            kind,
            last_pointer: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Positions the entity (relative to its parent).
    #[must_use]
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Sets the paint order.
    #[must_use]
    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// Sets behavior flags.
    #[must_use]
    pub fn with_flags(mut self, flags: EntityFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the frame list. An empty list is a config error: it is
    /// logged and the transparent fallback substituted so the frame
    /// index invariant holds.
    #[must_use]
    pub fn with_frames(mut self, frames: Vec<Arc<SpriteMatrix>>) -> Self {
        if frames.is_empty() {
            tracing::warn!("entity given an empty frame list; substituting 1x1 transparent");
            self.frames = vec![SpriteMatrix::fallback()];
        } else {
            self.frames = frames;
        }
        self
    }

    /// Replaces the animation machine.
    #[must_use]
    pub fn with_animation(mut self, anim: AnimationStateMachine) -> Self {
        self.anim = anim;
        self
    }

    /// Replaces the motion controller tuning.
    #[must_use]
    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.motion = MotionController::new(spring);
        self
    }

    /// Ids of this entity's children, in insertion order.
    #[must_use]
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Id of this entity's parent, if it is not top-level.
    #[must_use]
    pub const fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// The sprite matrix for the current animation frame. A cursor
    /// beyond the frame list (possible only through config reload)
    /// degrades to the transparent fallback.
    #[must_use]
    pub fn current_frame(&self) -> Arc<SpriteMatrix> {
        self.frames
            .get(self.anim.frame_index())
            .cloned()
            .unwrap_or_else(|| {
                tracing::warn!(
                    frame = self.anim.frame_index(),
                    frames = self.frames.len(),
                    "animation frame out of range; rendering transparent"
                );
                SpriteMatrix::fallback()
            })
    }

    /// Footprint used for hit testing and layout, in grid cells.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        match &self.kind {
            EntityKind::Image | EntityKind::Character { .. } | EntityKind::Button => {
                let frame = self.current_frame();
                (frame.width() as u32, frame.height() as u32)
            }
            EntityKind::Canvas(canvas) => (canvas.width(), canvas.height()),
            EntityKind::Text(stamp) => {
                let chars = stamp.text.chars().count() as u32;
                (
                    chars * stamp.glyphs.glyph_width() as u32,
                    stamp.glyphs.glyph_height() as u32,
                )
            }
            EntityKind::Layout(layout) => layout.computed_size(),
            EntityKind::SlotGrid(state) => state.layout.computed_size(),
            EntityKind::Tooltip(tooltip) => {
                if tooltip.visible {
                    (tooltip.panel.width() as u32, tooltip.panel.height() as u32)
                } else {
                    (0, 0)
                }
            }
        }
    }

    /// Produces this entity's sprites at the given absolute position.
    /// Zero, one, or several: containers yield nothing, a character
    /// also yields its accessory.
    pub fn collect_sprites(&self, abs_x: i32, abs_y: i32, out: &mut Vec<Sprite>) {
        match &self.kind {
            EntityKind::Image | EntityKind::Button => {
                out.push(Sprite::new(self.current_frame(), abs_x, abs_y, self.z));
            }
            EntityKind::Character { accessory } => {
                out.push(Sprite::new(self.current_frame(), abs_x, abs_y, self.z));
                if let Some(worn) = accessory {
                    out.push(Sprite::new(
                        Arc::clone(&worn.matrix),
                        abs_x + worn.dx,
                        abs_y + worn.dy,
                        self.z + worn.dz,
                    ));
                }
            }
            EntityKind::Canvas(canvas) => {
                out.push(Sprite::new(canvas.to_matrix(), abs_x, abs_y, self.z));
            }
            EntityKind::Text(stamp) => {
                let step = stamp.glyphs.glyph_width() as i32;
                for (i, ch) in stamp.text.chars().enumerate() {
                    if let Some(tile) = stamp.glyphs.glyph(ch) {
                        out.push(Sprite::new(
                            Arc::clone(tile),
                            abs_x + i as i32 * step,
                            abs_y,
                            self.z,
                        ));
                    }
                }
            }
            EntityKind::Layout(_) | EntityKind::SlotGrid(_) => {}
            EntityKind::Tooltip(tooltip) => {
                if tooltip.visible {
                    out.push(Sprite::new(
                        Arc::clone(&tooltip.panel),
                        abs_x,
                        abs_y,
                        self.z,
                    ));
                }
            }
        }
    }
}

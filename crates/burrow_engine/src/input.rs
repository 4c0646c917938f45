//! Pointer routing and hit testing.
//!
//! The router turns grid-space pointer events into hover, click,
//! drag, and scroll behavior on the current room's entities. All
//! callbacks run synchronously inside the call — the router is only
//! ever driven by the tick owner, so there is exactly one mutator.

use crate::behavior::{self, BehaviorCtx};
use crate::entity::EntityFlags;
use crate::geom::{GridPoint, GridRect};
use crate::scene::{EntityId, SceneTree};

/// Hover pair: the innermost hovered entity, and its parent when the
/// parent asked to hover with its children.
type HoverPair = (Option<EntityId>, Option<EntityId>);

/// Pointer state machine.
#[derive(Debug, Default)]
pub struct InputRouter {
    hovered: HoverPair,
    drag_target: Option<EntityId>,
    last_point: Option<(i32, i32)>,
    button_down: bool,
}

impl InputRouter {
    /// Creates a router with no pointer history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The innermost entity the pointer is over, from the last move.
    #[must_use]
    pub const fn hovered(&self) -> Option<EntityId> {
        self.hovered.0
    }

    /// The active drag target, if a press is in progress.
    #[must_use]
    pub const fn drag_target(&self) -> Option<EntityId> {
        self.drag_target
    }

    /// Resolves the hit chain at `(px, py)`: every entity enclosing
    /// the point along one branch, innermost first. Top-level
    /// entities and children are tried in descending z; the first
    /// matching branch wins. `PASS_MOUSE_COORDS` entities get the
    /// pointer written into their local state on the way down.
    pub fn resolve_hit(
        scene: &mut SceneTree,
        roots: &[EntityId],
        px: i32,
        py: i32,
    ) -> Vec<EntityId> {
        let mut top_level: Vec<EntityId> = roots.to_vec();
        top_level.sort_by_key(|&id| std::cmp::Reverse(scene.entity(id).map_or(0, |e| e.z)));

        for id in top_level {
            let mut chain = Vec::new();
            if hit_entity(scene, id, 0, 0, px, py, &mut chain) {
                return chain;
            }
        }
        Vec::new()
    }

    /// Pointer move. Fires hover enter/exit when the hover pair
    /// changed, `while_hover` along the chain otherwise, and forwards
    /// drag motion to the active target while the button is held.
    pub(crate) fn pointer_moved(
        &mut self,
        ctx: &mut BehaviorCtx<'_>,
        roots: &[EntityId],
        px: i32,
        py: i32,
    ) {
        let chain = Self::resolve_hit(ctx.scene, roots, px, py);
        let pair = hover_pair_of(ctx.scene, &chain);

        if pair != self.hovered {
            let (old_inner, old_parent) = self.hovered;
            for id in [old_inner, old_parent].into_iter().flatten() {
                behavior::hover_exit(ctx, id);
            }
            for id in [pair.0, pair.1].into_iter().flatten() {
                behavior::hover_enter(ctx, id);
            }
            self.hovered = pair;
        } else {
            for &id in &chain {
                behavior::while_hover(ctx, id);
            }
        }

        if self.button_down {
            if let (Some(target), Some(last)) = (self.drag_target, self.last_point) {
                if chain.first() == Some(&target) {
                    behavior::drag(ctx.scene, target, last, (px, py));
                }
            }
            self.last_point = Some((px, py));
        }
    }

    /// Pointer press. Resolves the chain; when it is non-empty and
    /// no drag is in progress, the innermost entity gets the click
    /// and becomes the drag target.
    pub(crate) fn pointer_down(
        &mut self,
        ctx: &mut BehaviorCtx<'_>,
        roots: &[EntityId],
        px: i32,
        py: i32,
    ) {
        self.button_down = true;
        let chain = Self::resolve_hit(ctx.scene, roots, px, py);
        if let Some(&inner) = chain.first() {
            if self.drag_target.is_none() {
                behavior::click(ctx, inner, px, py);
                self.drag_target = Some(inner);
                self.last_point = Some((px, py));
            }
        }
    }

    /// Pointer release: clears the drag target and stroke memory.
    pub fn pointer_up(&mut self) {
        self.button_down = false;
        self.drag_target = None;
        self.last_point = None;
    }

    /// Wheel event: routed to the topmost entity under the pointer
    /// with the `SCROLLABLE` flag.
    pub(crate) fn wheel(
        &mut self,
        ctx: &mut BehaviorCtx<'_>,
        roots: &[EntityId],
        px: i32,
        py: i32,
        up: bool,
    ) {
        let chain = Self::resolve_hit(ctx.scene, roots, px, py);
        let target = chain
            .iter()
            .copied()
            .find(|&id| {
                ctx.scene
                    .entity(id)
                    .is_some_and(|e| e.flags.has(EntityFlags::SCROLLABLE))
            });
        if let Some(target) = target {
            behavior::scroll(ctx.scene, target, up);
        }
    }

    /// Drops hover/drag references into a room that is going away,
    /// so a stale id never receives a callback after a room switch.
    pub fn forget(&mut self) {
        self.hovered = (None, None);
        self.drag_target = None;
        self.last_point = None;
    }
}

/// Recursive bounds test. Appends the matched branch to `chain`
/// innermost-first and reports whether this entity matched.
fn hit_entity(
    scene: &mut SceneTree,
    id: EntityId,
    ox: i32,
    oy: i32,
    px: i32,
    py: i32,
    chain: &mut Vec<EntityId>,
) -> bool {
    let Some(entity) = scene.entity(id) else {
        return false;
    };
    let (w, h) = entity.size();
    let abs_x = ox + entity.x;
    let abs_y = oy + entity.y;
    if !GridRect::new(abs_x, abs_y, w, h).contains(px, py) {
        return false;
    }

    if entity.flags.has(EntityFlags::PASS_MOUSE_COORDS) {
        if let Some(entity) = scene.entity_mut(id) {
            entity.last_pointer = Some(GridPoint::new(px - abs_x, py - abs_y));
        }
    }

    // Deepest z-ordered child takes priority; first match ends the
    // sibling scan for this branch.
    for child in scene.children_desc_z(id) {
        if hit_entity(scene, child, abs_x, abs_y, px, py, chain) {
            break;
        }
    }

    chain.push(id);
    true
}

/// Derives the hover pair from a resolved chain: the innermost
/// entity, plus its parent when the parent hovers with children.
fn hover_pair_of(scene: &SceneTree, chain: &[EntityId]) -> HoverPair {
    let inner = chain.first().copied();
    let parent = inner
        .and_then(|id| scene.entity(id))
        .and_then(|e| e.parent())
        .filter(|&p| {
            scene
                .entity(p)
                .is_some_and(|e| e.flags.has(EntityFlags::HOVER_WITH_CHILDREN))
        });
    (inner, parent)
}

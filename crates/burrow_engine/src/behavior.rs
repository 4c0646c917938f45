//! Per-kind behavior dispatch.
//!
//! Every hover/click/scroll behavior is a plain match on the closed
//! kind variant, invoked by the input router. Reactions that matter
//! to game logic (button presses, slot choices) surface as events on
//! the session queue instead of captured callbacks.

use std::sync::Arc;

use burrow_inventory::{Inventory, Item};
use burrow_sprite::SpriteMatrix;
use rand_chacha::ChaCha8Rng;

use crate::entity::{Entity, EntityKind};
use crate::events::EngineEvent;
use crate::layout;
use crate::scene::{EntityId, SceneTree};

/// Mutable state the behavior handlers may touch, threaded in
/// explicitly — no ambient session.
pub(crate) struct BehaviorCtx<'a> {
    pub scene: &'a mut SceneTree,
    pub events: &'a mut Vec<EngineEvent>,
    pub rng: &'a mut ChaCha8Rng,
}

/// Hover enter: buttons swap to their `hovered` state, tooltip
/// children become visible.
pub(crate) fn hover_enter(ctx: &mut BehaviorCtx<'_>, id: EntityId) {
    if let Some(entity) = ctx.scene.entity_mut(id) {
        if matches!(entity.kind, EntityKind::Button) {
            if let Err(err) = entity.anim.set_state("hovered", None, ctx.rng) {
                tracing::debug!(?id, %err, "button has no hovered state");
            }
        }
    }
    set_tooltips_visible(ctx.scene, id, true);
}

/// Hover exit: buttons swap back to `default`, tooltips hide.
pub(crate) fn hover_exit(ctx: &mut BehaviorCtx<'_>, id: EntityId) {
    if let Some(entity) = ctx.scene.entity_mut(id) {
        if matches!(entity.kind, EntityKind::Button) {
            if let Err(err) = entity.anim.set_state("default", None, ctx.rng) {
                tracing::debug!(?id, %err, "button has no default state");
            }
        }
    }
    set_tooltips_visible(ctx.scene, id, false);
}

/// Per-tick hover: visible tooltip children of `PASS_MOUSE_COORDS`
/// entities trail the pointer.
pub(crate) fn while_hover(ctx: &mut BehaviorCtx<'_>, id: EntityId) {
    let Some(pointer) = ctx.scene.entity(id).and_then(|e| e.last_pointer) else {
        return;
    };
    for child in ctx.scene.children_of(id) {
        if let Some(entity) = ctx.scene.entity_mut(child) {
            if let EntityKind::Tooltip(tooltip) = &entity.kind {
                if tooltip.visible {
                    entity.x = pointer.x + 1;
                    entity.y = pointer.y + 1;
                }
            }
        }
    }
}

/// Click: canvases paint, buttons report, slot-grid cells select.
pub(crate) fn click(ctx: &mut BehaviorCtx<'_>, id: EntityId, gx: i32, gy: i32) {
    let parent = ctx.scene.entity(id).and_then(Entity::parent);

    match ctx.scene.entity(id).map(|e| &e.kind) {
        Some(EntityKind::Canvas(_)) => {
            let (ax, ay) = ctx.scene.absolute_position(id);
            if let Some(EntityKind::Canvas(canvas)) =
                ctx.scene.entity_mut(id).map(|e| &mut e.kind)
            {
                canvas.paint_point(gx - ax, gy - ay);
            }
        }
        Some(EntityKind::Button) => {
            ctx.events.push(EngineEvent::ButtonPressed { entity: id });
        }
        _ => {}
    }

    // A cell of a slot grid selects its inventory slot.
    if let Some(grid) = parent {
        let slot = ctx.scene.entity(grid).and_then(|e| match &e.kind {
            EntityKind::SlotGrid(state) => state.slot_of_child(id),
            _ => None,
        });
        if let Some(slot) = slot {
            if let Some(EntityKind::SlotGrid(state)) =
                ctx.scene.entity_mut(grid).map(|e| &mut e.kind)
            {
                state.selected = Some(slot);
            }
            ctx.events.push(EngineEvent::SlotChosen { grid, slot });
        }
    }
}

/// Drag: a canvas receives "paint a line from the last point".
pub(crate) fn drag(scene: &mut SceneTree, id: EntityId, from: (i32, i32), to: (i32, i32)) {
    let (ax, ay) = scene.absolute_position(id);
    if let Some(EntityKind::Canvas(canvas)) = scene.entity_mut(id).map(|e| &mut e.kind) {
        canvas.paint_line((from.0 - ax, from.1 - ay), (to.0 - ax, to.1 - ay));
    }
}

/// Scroll: containers move their offset and re-run the layout pass.
pub(crate) fn scroll(scene: &mut SceneTree, id: EntityId, up: bool) {
    let child_count = scene.children_of(id).len();
    let Some(entity) = scene.entity_mut(id) else {
        return;
    };
    let Some(grid) = entity.kind.layout_mut() else {
        return;
    };
    let delta = if up {
        grid.scroll_speed
    } else {
        -grid.scroll_speed
    };
    grid.scroll_by(delta, child_count);
    layout::arrange(scene, id);
}

fn set_tooltips_visible(scene: &mut SceneTree, owner: EntityId, visible: bool) {
    for child in scene.children_of(owner) {
        if let Some(entity) = scene.entity_mut(child) {
            if let EntityKind::Tooltip(tooltip) = &mut entity.kind {
                tooltip.visible = visible;
            }
        }
    }
}

/// Rebuilds a slot grid's children from the inventory: one image
/// cell per occupied slot, in slot order, then a layout pass.
///
/// `icon_for` maps an item to its cell sprite; selection is kept when
/// the selected slot still exists.
pub fn sync_slot_grid(
    scene: &mut SceneTree,
    grid: EntityId,
    inventory: &Inventory,
    icon_for: impl Fn(&Item) -> Arc<SpriteMatrix>,
) {
    // Drop the previous generation of cells.
    let old: Vec<(EntityId, _)> = match scene.entity(grid).map(|e| &e.kind) {
        Some(EntityKind::SlotGrid(state)) => state.slot_children.clone(),
        _ => {
            tracing::warn!(?grid, "sync_slot_grid called on a non-slot-grid entity");
            return;
        }
    };
    for (child, _) in old {
        scene.remove(child);
    }

    let records: Vec<_> = inventory
        .iter()
        .map(|(slot, item)| (slot, icon_for(item)))
        .collect();

    let mut mapping = Vec::with_capacity(records.len());
    for (slot, icon) in records {
        let child = scene.add_child(
            grid,
            Entity::new(EntityKind::Image).with_frames(vec![icon]),
        );
        match child {
            Ok(child) => mapping.push((child, slot)),
            Err(err) => tracing::warn!(%err, "slot grid vanished during sync"),
        }
    }

    if let Some(EntityKind::SlotGrid(state)) = scene.entity_mut(grid).map(|e| &mut e.kind) {
        state.slot_children = mapping;
        if let Some(selected) = state.selected {
            if !state.slot_children.iter().any(|(_, s)| *s == selected) {
                state.selected = None;
            }
        }
    }
    layout::arrange(scene, grid);
}

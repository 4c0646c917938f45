//! The pixel compositor.
//!
//! Once per tick the current room's entity tree is flattened into a
//! sprite list (ancestor offsets applied to children), stable-sorted
//! by ascending z, and painted into the screen buffer. Equal z keeps
//! insertion order, so later sprites win ties. Out-of-bounds cells
//! clip silently — that is normal operation, not an error.

use burrow_sprite::Pixel;

use crate::entity::EntityFlags;
use crate::scene::{EntityId, SceneTree};
use crate::sprite::Sprite;

/// The composited output grid handed to the host each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBuffer {
    width: usize,
    height: usize,
    cells: Vec<Pixel>,
}

impl ScreenBuffer {
    /// Creates an all-transparent buffer.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Pixel::Clear; width * height],
        }
    }

    /// Buffer width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(x, y)`, or `None` out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Iterates rows top to bottom, for the host blit.
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        self.cells.chunks_exact(self.width.max(1))
    }

    /// True when every cell is transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|p| p.is_clear())
    }

    fn paint(&mut self, sprite: &Sprite) {
        for (my, row) in sprite.matrix.rows().enumerate() {
            let y = sprite.y + my as i32;
            if y < 0 || y as usize >= self.height {
                continue;
            }
            for (mx, &px) in row.iter().enumerate() {
                if px.is_clear() {
                    continue;
                }
                let x = sprite.x + mx as i32;
                if x < 0 || x as usize >= self.width {
                    continue;
                }
                self.cells[y as usize * self.width + x as usize] = px;
            }
        }
    }
}

/// Flattens one entity (children first when `RENDER_CHILDREN` is set,
/// then the entity's own sprites) with accumulated ancestor offsets.
fn collect_entity(scene: &SceneTree, id: EntityId, ox: i32, oy: i32, out: &mut Vec<Sprite>) {
    let Some(entity) = scene.entity(id) else {
        return;
    };
    let abs_x = ox + entity.x;
    let abs_y = oy + entity.y;

    if entity.flags.has(EntityFlags::RENDER_CHILDREN) {
        for &child in entity.children() {
            collect_entity(scene, child, abs_x, abs_y, out);
        }
    }
    entity.collect_sprites(abs_x, abs_y, out);
}

/// Collects the flat sprite list for a room, in paint order.
#[must_use]
pub fn collect_sprites(scene: &SceneTree, roots: &[EntityId]) -> Vec<Sprite> {
    let mut sprites = Vec::with_capacity(roots.len() * 2);
    for &root in roots {
        collect_entity(scene, root, 0, 0, &mut sprites);
    }
    // Stable: equal z keeps collection order, later paints on top.
    sprites.sort_by_key(|s| s.z);
    sprites
}

/// Composites a room's entities into a fresh `width x height` buffer.
#[must_use]
pub fn render_room(
    scene: &SceneTree,
    roots: &[EntityId],
    width: usize,
    height: usize,
) -> ScreenBuffer {
    let mut buffer = ScreenBuffer::new(width, height);
    for sprite in collect_sprites(scene, roots) {
        buffer.paint(&sprite);
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityKind};
    use burrow_sprite::{Rgb, SpriteMatrix};
    use std::sync::Arc;

    const RED: Pixel = Pixel::Solid(Rgb::hex(0xff0000));
    const BLUE: Pixel = Pixel::Solid(Rgb::hex(0x0000ff));
    const GREEN: Pixel = Pixel::Solid(Rgb::hex(0x008000));
    const YELLOW: Pixel = Pixel::Solid(Rgb::hex(0xffff00));
    const PINK: Pixel = Pixel::Solid(Rgb::hex(0xffc0cb));
    const CYAN: Pixel = Pixel::Solid(Rgb::hex(0x00ffff));

    fn image_at(matrix: SpriteMatrix, x: i32, y: i32, z: i32) -> Entity {
        Entity::new(EntityKind::Image)
            .with_frames(vec![Arc::new(matrix)])
            .at(x, y)
            .with_z(z)
    }

    #[test]
    fn test_fully_outside_sprite_leaves_buffer_blank() {
        let mut scene = SceneTree::new();
        let matrix = SpriteMatrix::from_rows(vec![vec![RED, BLUE], vec![GREEN, YELLOW]]).unwrap();
        let id = scene.insert(image_at(matrix, 5, 5, 0));

        let buffer = render_room(&scene, &[id], 4, 4);
        assert!(buffer.is_blank());
        assert_eq!(buffer, ScreenBuffer::new(4, 4));
    }

    #[test]
    fn test_partial_overlap_clips() {
        let mut scene = SceneTree::new();
        let matrix =
            SpriteMatrix::from_rows(vec![vec![RED, BLUE, GREEN], vec![YELLOW, PINK, CYAN]])
                .unwrap();
        let id = scene.insert(image_at(matrix, 2, 2, 0));

        let buffer = render_room(&scene, &[id], 4, 4);
        // Only the top-left 2x2 of the sprite lands on screen.
        assert_eq!(buffer.get(2, 2), Some(RED));
        assert_eq!(buffer.get(3, 2), Some(BLUE));
        assert_eq!(buffer.get(2, 3), Some(YELLOW));
        assert_eq!(buffer.get(3, 3), Some(PINK));
        // Everything else stays transparent.
        for y in 0..4 {
            for x in 0..4 {
                if x < 2 || y < 2 {
                    assert_eq!(buffer.get(x, y), Some(Pixel::Clear), "({x},{y})");
                }
            }
        }
    }

    #[test]
    fn test_higher_z_wins_regardless_of_insertion_order() {
        let over = SpriteMatrix::filled(2, 2, BLUE).unwrap();
        let under = SpriteMatrix::filled(2, 2, RED).unwrap();

        for flipped in [false, true] {
            let mut scene = SceneTree::new();
            let mut ids = Vec::new();
            if flipped {
                ids.push(scene.insert(image_at(over.clone(), 1, 1, 5)));
                ids.push(scene.insert(image_at(under.clone(), 0, 0, 1)));
            } else {
                ids.push(scene.insert(image_at(under.clone(), 0, 0, 1)));
                ids.push(scene.insert(image_at(over.clone(), 1, 1, 5)));
            }
            let buffer = render_room(&scene, &ids, 4, 4);
            assert_eq!(buffer.get(1, 1), Some(BLUE), "flipped={flipped}");
            assert_eq!(buffer.get(0, 0), Some(RED));
        }
    }

    #[test]
    fn test_equal_z_later_insertion_wins() {
        let mut scene = SceneTree::new();
        let a = scene.insert(image_at(SpriteMatrix::filled(2, 2, RED).unwrap(), 0, 0, 3));
        let b = scene.insert(image_at(SpriteMatrix::filled(2, 2, GREEN).unwrap(), 0, 0, 3));

        let buffer = render_room(&scene, &[a, b], 4, 4);
        assert_eq!(buffer.get(0, 0), Some(GREEN));
    }

    #[test]
    fn test_transparent_cells_do_not_overwrite() {
        let mut scene = SceneTree::new();
        let base = scene.insert(image_at(SpriteMatrix::filled(2, 2, RED).unwrap(), 0, 0, 0));
        let holed = SpriteMatrix::from_rows(vec![
            vec![Pixel::Clear, BLUE],
            vec![BLUE, Pixel::Clear],
        ])
        .unwrap();
        let top = scene.insert(image_at(holed, 0, 0, 1));

        let buffer = render_room(&scene, &[base, top], 4, 4);
        assert_eq!(buffer.get(0, 0), Some(RED));
        assert_eq!(buffer.get(1, 0), Some(BLUE));
        assert_eq!(buffer.get(0, 1), Some(BLUE));
        assert_eq!(buffer.get(1, 1), Some(RED));
    }

    #[test]
    fn test_child_offsets_accumulate() {
        let mut scene = SceneTree::new();
        let root = scene.insert(
            Entity::new(EntityKind::Image)
                .with_frames(vec![Arc::new(SpriteMatrix::filled(1, 1, RED).unwrap())])
                .at(2, 2)
                .with_flags(crate::entity::EntityFlags::none().with(EntityFlags::RENDER_CHILDREN)),
        );
        scene
            .add_child(
                root,
                image_at(SpriteMatrix::filled(1, 1, BLUE).unwrap(), 1, 0, 1),
            )
            .unwrap();

        let buffer = render_room(&scene, &[root], 6, 6);
        assert_eq!(buffer.get(2, 2), Some(RED));
        assert_eq!(buffer.get(3, 2), Some(BLUE));
    }

    #[test]
    fn test_children_skipped_without_render_children() {
        let mut scene = SceneTree::new();
        let root = scene.insert(image_at(SpriteMatrix::filled(1, 1, RED).unwrap(), 0, 0, 0));
        scene
            .add_child(
                root,
                image_at(SpriteMatrix::filled(1, 1, BLUE).unwrap(), 1, 0, 1),
            )
            .unwrap();

        let buffer = render_room(&scene, &[root], 4, 4);
        assert_eq!(buffer.get(1, 0), Some(Pixel::Clear));
    }
}

//! The per-frame render instruction.

use std::sync::Arc;

use burrow_sprite::SpriteMatrix;

/// A positioned, z-ordered reference to one sprite matrix.
///
/// Entities produce these during sprite collection; positions are
/// absolute grid coordinates (ancestor offsets already applied).
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Shared pixel data.
    pub matrix: Arc<SpriteMatrix>,
    /// Absolute left edge.
    pub x: i32,
    /// Absolute top edge.
    pub y: i32,
    /// Paint order; higher paints later. Not depth-buffered.
    pub z: i32,
}

impl Sprite {
    /// Creates a sprite.
    #[must_use]
    pub fn new(matrix: Arc<SpriteMatrix>, x: i32, y: i32, z: i32) -> Self {
        Self { matrix, x, y, z }
    }
}

//! Grid layout containers.
//!
//! A layout container arranges its child entities into rows and
//! columns of uniform cells, with spacing and a scroll offset along
//! one axis. Child positions are relative to the container; the
//! compositor's ancestor-offset accumulation does the rest.

use crate::scene::{EntityId, SceneTree};

/// Axis a container scrolls along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAxis {
    /// Scroll moves rows.
    #[default]
    Vertical,
    /// Scroll moves columns.
    Horizontal,
}

/// Grid arrangement parameters and scroll state.
#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Fixed column count; `None` derives one from the child count.
    pub columns: Option<usize>,
    /// Cell width in grid cells.
    pub cell_w: u32,
    /// Cell height in grid cells.
    pub cell_h: u32,
    /// Horizontal spacing between cells.
    pub gap_x: u32,
    /// Vertical spacing between cells.
    pub gap_y: u32,
    /// Scroll orientation.
    pub axis: ScrollAxis,
    /// Cells moved per scroll step.
    pub scroll_speed: i32,
    offset: i32,
    computed: (u32, u32),
}

impl GridLayout {
    /// Creates a layout for `cell_w x cell_h` children.
    #[must_use]
    pub fn new(cell_w: u32, cell_h: u32) -> Self {
        Self {
            columns: None,
            cell_w,
            cell_h,
            gap_x: 1,
            gap_y: 1,
            axis: ScrollAxis::Vertical,
            scroll_speed: 2,
            offset: 0,
            computed: (0, 0),
        }
    }

    /// Fixes the column count.
    #[must_use]
    pub const fn with_columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Sets per-axis spacing.
    #[must_use]
    pub const fn with_gap(mut self, gap_x: u32, gap_y: u32) -> Self {
        self.gap_x = gap_x;
        self.gap_y = gap_y;
        self
    }

    /// Sets the scroll orientation.
    #[must_use]
    pub const fn with_axis(mut self, axis: ScrollAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Sets cells moved per scroll step.
    #[must_use]
    pub const fn with_scroll_speed(mut self, speed: i32) -> Self {
        self.scroll_speed = speed;
        self
    }

    /// Current scroll offset along the configured axis.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.offset
    }

    /// Size the container reported after its last arrange pass.
    #[inline]
    #[must_use]
    pub const fn computed_size(&self) -> (u32, u32) {
        self.computed
    }

    /// Effective column count for `n` children: the fixed count, or
    /// the smallest square-ish grid when unset.
    #[must_use]
    pub fn effective_columns(&self, n: usize) -> usize {
        self.columns
            .unwrap_or_else(|| (n as f64).sqrt().ceil() as usize)
            .max(1)
    }

    /// Row count for `n` children: `ceil(n / columns)`.
    #[must_use]
    pub fn rows(&self, n: usize) -> usize {
        n.div_ceil(self.effective_columns(n))
    }

    /// Full content extent `(w, h)` of `n` children, before scroll.
    #[must_use]
    pub fn content_extent(&self, n: usize) -> (u32, u32) {
        if n == 0 {
            return (0, 0);
        }
        let cols = self.effective_columns(n) as u32;
        let rows = self.rows(n) as u32;
        (
            cols * self.cell_w + self.gap_x * (cols - 1),
            rows * self.cell_h + self.gap_y * (rows - 1),
        )
    }

    /// Container-relative position of child `i` of `n`, scroll
    /// offset applied.
    #[must_use]
    pub fn position_of(&self, i: usize, n: usize) -> (i32, i32) {
        let cols = self.effective_columns(n);
        let col = (i % cols) as i32;
        let row = (i / cols) as i32;
        let mut x = col * (self.cell_w + self.gap_x) as i32;
        let mut y = row * (self.cell_h + self.gap_y) as i32;
        match self.axis {
            ScrollAxis::Vertical => y += self.offset,
            ScrollAxis::Horizontal => x += self.offset,
        }
        (x, y)
    }

    /// Moves the scroll offset by `delta` cells, clamped so scrolling
    /// never runs past the first or last cell.
    pub fn scroll_by(&mut self, delta: i32, n: usize) {
        let extent = match self.axis {
            ScrollAxis::Vertical => self.content_extent(n).1.saturating_sub(self.cell_h),
            ScrollAxis::Horizontal => self.content_extent(n).0.saturating_sub(self.cell_w),
        } as i32;
        self.offset = (self.offset + delta).clamp(-extent, 0);
    }

    fn record_computed(&mut self, n: usize) {
        self.computed = self.content_extent(n);
    }
}

/// Runs the layout pass for a container entity: writes every child's
/// relative position and records the container's reported size.
///
/// Non-container entities are left untouched (with a log line).
pub fn arrange(scene: &mut SceneTree, container: EntityId) {
    let children = scene.children_of(container);
    let n = children.len();

    let Some(layout) = scene
        .entity_mut(container)
        .and_then(|e| e.kind.layout_mut())
    else {
        tracing::warn!(?container, "arrange called on a non-container entity");
        return;
    };
    layout.record_computed(n);
    let layout = layout.clone();

    for (i, child) in children.into_iter().enumerate() {
        let (x, y) = layout.position_of(i, n);
        if let Some(entity) = scene.entity_mut(child) {
            entity.x = x;
            entity.y = y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_row_major() {
        let layout = GridLayout::new(4, 4).with_columns(3).with_gap(1, 2);
        assert_eq!(layout.position_of(0, 7), (0, 0));
        assert_eq!(layout.position_of(2, 7), (10, 0));
        assert_eq!(layout.position_of(3, 7), (0, 6));
        assert_eq!(layout.rows(7), 3);
    }

    #[test]
    fn test_auto_columns_square_ish() {
        let layout = GridLayout::new(2, 2);
        assert_eq!(layout.effective_columns(9), 3);
        assert_eq!(layout.effective_columns(10), 4);
        assert_eq!(layout.effective_columns(1), 1);
    }

    #[test]
    fn test_content_extent() {
        let layout = GridLayout::new(4, 4).with_columns(2).with_gap(1, 1);
        // 2 cols x 2 rows of 4-cell cells with 1 gap: 9 x 9.
        assert_eq!(layout.content_extent(4), (9, 9));
        assert_eq!(layout.content_extent(0), (0, 0));
    }

    #[test]
    fn test_scroll_clamps_to_content() {
        let mut layout = GridLayout::new(4, 4).with_columns(1).with_gap(0, 0);
        // 3 rows of height 4: extent 12, scrollable span 8.
        layout.scroll_by(-100, 3);
        assert_eq!(layout.offset(), -8);
        layout.scroll_by(100, 3);
        assert_eq!(layout.offset(), 0);
        layout.scroll_by(-3, 3);
        assert_eq!(layout.offset(), -3);
    }
}

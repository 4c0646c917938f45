//! Matrix composition helpers.
//!
//! These all return new matrices; the inputs stay immutable.

use crate::error::{SpriteError, SpriteResult};
use crate::matrix::SpriteMatrix;
use crate::pixel::Pixel;

/// Paints the non-transparent cells of `top` onto a copy of `base`.
///
/// `(x, y)` positions the top-left corner of `top` within `base`;
/// cells falling outside `base` are clipped.
#[must_use]
pub fn overlay(base: &SpriteMatrix, top: &SpriteMatrix, x: i64, y: i64) -> SpriteMatrix {
    let mut cells: Vec<Pixel> = base.cells().to_vec();
    let (bw, bh) = (base.width() as i64, base.height() as i64);

    for (ty, row) in top.rows().enumerate() {
        let dest_y = y + ty as i64;
        if dest_y < 0 || dest_y >= bh {
            continue;
        }
        for (tx, &px) in row.iter().enumerate() {
            let dest_x = x + tx as i64;
            if dest_x < 0 || dest_x >= bw || px.is_clear() {
                continue;
            }
            cells[(dest_y * bw + dest_x) as usize] = px;
        }
    }

    SpriteMatrix::from_raw(base.width(), base.height(), cells)
}

/// Joins two matrices side by side.
///
/// # Errors
///
/// Returns [`SpriteError::RowCountMismatch`] when the row counts differ.
pub fn concat_horizontal(left: &SpriteMatrix, right: &SpriteMatrix) -> SpriteResult<SpriteMatrix> {
    if left.height() != right.height() {
        return Err(SpriteError::RowCountMismatch {
            left: left.height(),
            right: right.height(),
        });
    }

    let width = left.width() + right.width();
    let mut cells = Vec::with_capacity(width * left.height());
    for (l, r) in left.rows().zip(right.rows()) {
        cells.extend_from_slice(l);
        cells.extend_from_slice(r);
    }
    Ok(SpriteMatrix::from_raw(width, left.height(), cells))
}

/// Returns a copy with every `from` cell replaced by `to`.
#[must_use]
pub fn replace_color(matrix: &SpriteMatrix, from: Pixel, to: Pixel) -> SpriteMatrix {
    let cells = matrix
        .cells()
        .iter()
        .map(|&px| if px == from { to } else { px })
        .collect();
    SpriteMatrix::from_raw(matrix.width(), matrix.height(), cells)
}

/// Generates a button face: a one-cell border around a filled
/// background, with `label` centered on top.
///
/// # Errors
///
/// Returns [`SpriteError::EmptyMatrix`] when `width`/`height` cannot
/// hold a border plus interior (minimum 3x3).
pub fn button_face(
    width: usize,
    height: usize,
    background: Pixel,
    border: Pixel,
    label: &SpriteMatrix,
) -> SpriteResult<SpriteMatrix> {
    if width < 3 || height < 3 {
        return Err(SpriteError::EmptyMatrix);
    }

    let outer = SpriteMatrix::filled(width, height, border)?;
    let inner = SpriteMatrix::filled(width - 2, height - 2, background)?;
    let face = overlay(&outer, &inner, 1, 1);

    let label_x = (width as i64 - label.width() as i64) / 2;
    let label_y = (height as i64 - label.height() as i64) / 2;
    Ok(overlay(&face, label, label_x, label_y))
}

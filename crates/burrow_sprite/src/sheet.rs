//! Sheet slicing.
//!
//! A sprite sheet arrives as one decoded pixel grid and is cut into
//! `tile_w x tile_h` tiles in row-major order. Sheets whose
//! dimensions are not exact multiples of the tile size yield nothing:
//! a trailing partial row or column means the asset is broken, and a
//! partial tile list would silently shift every frame index after it.

use std::sync::Arc;

use crate::matrix::SpriteMatrix;

/// Cuts `sheet` into tiles of `tile_w x tile_h`.
///
/// Returns the tiles left-to-right, top-to-bottom. Returns an empty
/// vec (and logs) when the tile size is zero or does not evenly
/// divide the sheet.
#[must_use]
pub fn slice_sheet(sheet: &SpriteMatrix, tile_w: usize, tile_h: usize) -> Vec<Arc<SpriteMatrix>> {
    if tile_w == 0 || tile_h == 0 {
        tracing::warn!(tile_w, tile_h, "sheet slicer given a zero tile size");
        return Vec::new();
    }
    if sheet.width() % tile_w != 0 || sheet.height() % tile_h != 0 {
        tracing::warn!(
            sheet_w = sheet.width(),
            sheet_h = sheet.height(),
            tile_w,
            tile_h,
            "sheet dimensions are not an exact multiple of the tile size; skipping sheet"
        );
        return Vec::new();
    }

    let cols = sheet.width() / tile_w;
    let rows = sheet.height() / tile_h;
    let mut tiles = Vec::with_capacity(cols * rows);

    for row in 0..rows {
        for col in 0..cols {
            let mut cells = Vec::with_capacity(tile_w * tile_h);
            for sy in 0..tile_h {
                for sx in 0..tile_w {
                    let px = sheet
                        .get(col * tile_w + sx, row * tile_h + sy)
                        .unwrap_or_default();
                    cells.push(px);
                }
            }
            tiles.push(Arc::new(SpriteMatrix::from_raw(tile_w, tile_h, cells)));
        }
    }

    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{Pixel, Rgb};

    const A: Pixel = Pixel::Solid(Rgb::hex(0x111111));
    const B: Pixel = Pixel::Solid(Rgb::hex(0x222222));
    const C: Pixel = Pixel::Solid(Rgb::hex(0x333333));
    const D: Pixel = Pixel::Solid(Rgb::hex(0x444444));

    #[test]
    fn test_slices_row_major() {
        // 4x4 sheet of 2x2 tiles: each quadrant one color.
        let sheet = SpriteMatrix::from_rows(vec![
            vec![A, A, B, B],
            vec![A, A, B, B],
            vec![C, C, D, D],
            vec![C, C, D, D],
        ])
        .unwrap();

        let tiles = slice_sheet(&sheet, 2, 2);
        assert_eq!(tiles.len(), 4);
        assert_eq!(tiles[0].get(0, 0), Some(A));
        assert_eq!(tiles[1].get(0, 0), Some(B));
        assert_eq!(tiles[2].get(0, 0), Some(C));
        assert_eq!(tiles[3].get(0, 0), Some(D));
    }

    #[test]
    fn test_partial_rows_yield_nothing() {
        // Two rows of data with a tile height of four: the trailing
        // partial tile must not produce a corrupted list.
        let sheet = SpriteMatrix::from_rows(vec![vec![A, B, C, D], vec![A, B, C, D]]).unwrap();
        assert!(slice_sheet(&sheet, 2, 4).is_empty());
    }

    #[test]
    fn test_partial_columns_yield_nothing() {
        let sheet = SpriteMatrix::from_rows(vec![
            vec![A, B],
            vec![A, B],
            vec![A, B],
            vec![A, B],
        ])
        .unwrap();
        assert!(slice_sheet(&sheet, 3, 2).is_empty());
    }

    #[test]
    fn test_zero_tile_size_yields_nothing() {
        let sheet = SpriteMatrix::filled(4, 4, A).unwrap();
        assert!(slice_sheet(&sheet, 0, 2).is_empty());
    }
}

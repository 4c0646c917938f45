//! Glyph sheets and text stamping.
//!
//! A glyph set binds a charset string to the tiles of a sliced font
//! sheet, in order. Text renders as one sprite per glyph; helper
//! functions also bake a whole string into a single matrix for
//! button labels and tooltip panels.

use std::collections::HashMap;
use std::sync::Arc;

use burrow_sprite::{concat_horizontal, SpriteMatrix};

/// A char-to-tile mapping over one sliced font sheet.
#[derive(Debug, Clone, Default)]
pub struct GlyphSet {
    glyphs: HashMap<char, Arc<SpriteMatrix>>,
    glyph_w: usize,
    glyph_h: usize,
}

impl GlyphSet {
    /// Binds `charset` characters to `tiles` in order. Charset
    /// characters beyond the tile count are logged and dropped.
    #[must_use]
    pub fn new(tiles: &[Arc<SpriteMatrix>], charset: &str) -> Self {
        let (glyph_w, glyph_h) = tiles
            .first()
            .map_or((0, 0), |t| (t.width(), t.height()));

        let mut glyphs = HashMap::new();
        for (i, ch) in charset.chars().enumerate() {
            match tiles.get(i) {
                Some(tile) => {
                    glyphs.insert(ch, Arc::clone(tile));
                }
                None => {
                    tracing::warn!(
                        charset_len = charset.chars().count(),
                        tiles = tiles.len(),
                        "glyph charset longer than font sheet; truncating"
                    );
                    break;
                }
            }
        }

        Self {
            glyphs,
            glyph_w,
            glyph_h,
        }
    }

    /// Glyph cell width.
    #[inline]
    #[must_use]
    pub const fn glyph_width(&self) -> usize {
        self.glyph_w
    }

    /// Glyph cell height.
    #[inline]
    #[must_use]
    pub const fn glyph_height(&self) -> usize {
        self.glyph_h
    }

    /// Tile for `ch`, if the charset declared it.
    #[must_use]
    pub fn glyph(&self, ch: char) -> Option<&Arc<SpriteMatrix>> {
        self.glyphs.get(&ch)
    }

    /// Bakes `text` into one matrix by concatenating glyphs. Unknown
    /// characters render as blank glyph cells. Returns the 1x1
    /// fallback for empty text or an empty glyph set.
    #[must_use]
    pub fn bake(&self, text: &str) -> Arc<SpriteMatrix> {
        if self.glyph_w == 0 || self.glyph_h == 0 || text.is_empty() {
            return SpriteMatrix::fallback();
        }

        let blank =
            Arc::new(SpriteMatrix::transparent(self.glyph_w, self.glyph_h).unwrap_or_else(|_| {
                // Dimensions checked non-zero above.
                unreachable!("blank glyph dimensions are non-zero")
            }));

        let mut baked: Option<SpriteMatrix> = None;
        for ch in text.chars() {
            let tile = self.glyphs.get(&ch).unwrap_or(&blank);
            baked = Some(match baked {
                None => (**tile).clone(),
                Some(acc) => match concat_horizontal(&acc, tile) {
                    Ok(joined) => joined,
                    Err(err) => {
                        tracing::warn!(%err, ch = %ch, "glyph height mismatch while baking text");
                        acc
                    }
                },
            });
        }

        baked.map_or_else(SpriteMatrix::fallback, Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_sprite::{slice_sheet, Pixel};

    fn font() -> GlyphSet {
        // 2x2 tiles: 'a' solid, 'b' clear.
        let sheet = SpriteMatrix::from_rows(vec![
            vec![Pixel::BLACK, Pixel::BLACK, Pixel::Clear, Pixel::Clear],
            vec![Pixel::BLACK, Pixel::BLACK, Pixel::Clear, Pixel::Clear],
        ])
        .unwrap();
        GlyphSet::new(&slice_sheet(&sheet, 2, 2), "ab")
    }

    #[test]
    fn test_bake_concatenates() {
        let baked = font().bake("ab");
        assert_eq!((baked.width(), baked.height()), (4, 2));
        assert_eq!(baked.get(0, 0), Some(Pixel::BLACK));
        assert_eq!(baked.get(3, 0), Some(Pixel::Clear));
    }

    #[test]
    fn test_unknown_chars_are_blank() {
        let baked = font().bake("a?");
        assert_eq!(baked.width(), 4);
        assert_eq!(baked.get(2, 0), Some(Pixel::Clear));
    }

    #[test]
    fn test_empty_text_falls_back() {
        let baked = font().bake("");
        assert_eq!((baked.width(), baked.height()), (1, 1));
    }
}

//! The asset catalog.
//!
//! Decoded sprite sheets live here, keyed by name. The preload phase
//! fills the catalog before the first tick; after that, sheets are
//! immutable and shared. Asking for a sheet that was never preloaded
//! is a config error: it logs and degrades to the 1x1 transparent
//! fallback so rendering continues.

use std::collections::HashMap;
use std::sync::Arc;

use burrow_sprite::{slice_sheet, SpriteMatrix};

/// Named, decoded sprite sheets.
#[derive(Debug, Default)]
pub struct AssetCatalog {
    sheets: HashMap<String, Arc<SpriteMatrix>>,
}

impl AssetCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of loaded sheets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// True when no sheet is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Stores a decoded sheet under `name`, replacing any previous
    /// sheet with that name.
    pub fn insert_sheet(&mut self, name: impl Into<String>, sheet: SpriteMatrix) {
        let name = name.into();
        tracing::debug!(
            %name,
            w = sheet.width(),
            h = sheet.height(),
            "sheet loaded"
        );
        self.sheets.insert(name, Arc::new(sheet));
    }

    /// The raw sheet under `name`.
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<Arc<SpriteMatrix>> {
        self.sheets.get(name).cloned()
    }

    /// Slices the sheet under `name` into `tile_w x tile_h` frames.
    ///
    /// A missing sheet logs and returns the single-frame transparent
    /// fallback; a sheet whose dimensions do not divide evenly
    /// returns an empty list per the slicer contract.
    #[must_use]
    pub fn sprites(&self, name: &str, tile_w: usize, tile_h: usize) -> Vec<Arc<SpriteMatrix>> {
        match self.sheets.get(name) {
            Some(sheet) => slice_sheet(sheet, tile_w, tile_h),
            None => {
                tracing::error!(%name, "sprite sheet not preloaded; rendering transparent");
                vec![SpriteMatrix::fallback()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_sprite::Pixel;

    #[test]
    fn test_missing_sheet_degrades() {
        let catalog = AssetCatalog::new();
        let frames = catalog.sprites("ghost", 2, 2);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].is_blank());
    }

    #[test]
    fn test_loaded_sheet_slices() {
        let mut catalog = AssetCatalog::new();
        catalog.insert_sheet("pet", SpriteMatrix::filled(4, 2, Pixel::BLACK).unwrap());
        assert_eq!(catalog.sprites("pet", 2, 2).len(), 2);
        assert!(catalog.sheet("pet").is_some());
    }

    #[test]
    fn test_uneven_sheet_yields_empty() {
        let mut catalog = AssetCatalog::new();
        catalog.insert_sheet("broken", SpriteMatrix::filled(4, 2, Pixel::BLACK).unwrap());
        assert!(catalog.sprites("broken", 2, 4).is_empty());
    }
}

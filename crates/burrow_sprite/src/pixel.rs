//! Pixel and color values.
//!
//! A cell is either transparent or a solid 24-bit color. Pixels
//! round-trip through config and save data as lowercase `"#rrggbb"`
//! strings, with `"transparent"` as the clear sentinel.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SpriteError;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a `0xRRGGBB` value.
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    /// Formats as a lowercase `#rrggbb` string.
    #[must_use]
    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A single cell of a sprite matrix or screen buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pixel {
    /// The transparent sentinel. Compositing skips these cells.
    #[default]
    Clear,
    /// A solid color cell.
    Solid(Rgb),
}

impl Pixel {
    /// White.
    pub const WHITE: Self = Self::Solid(Rgb::hex(0x00ff_ffff));
    /// Black.
    pub const BLACK: Self = Self::Solid(Rgb::hex(0x0000_0000));
    /// Off-black used for menu borders.
    pub const OFF_BLACK: Self = Self::Solid(Rgb::hex(0x001f_2021));
    /// Mid grey.
    pub const GREY: Self = Self::Solid(Rgb::hex(0x0080_8080));
    /// Main menu background (blue-purple).
    pub const MENU_BACKGROUND: Self = Self::Solid(Rgb::hex(0x0062_66d1));
    /// Main menu background while hovered (light purple).
    pub const MENU_BACKGROUND_HOVER: Self = Self::Solid(Rgb::hex(0x0088_8dfc));
    /// Main menu highlight.
    pub const MENU_HIGHLIGHT: Self = Self::Solid(Rgb::hex(0x0077_7cff));
    /// Main menu shadow.
    pub const MENU_SHADOW: Self = Self::Solid(Rgb::hex(0x0053_56b2));

    /// Creates a solid pixel from a `0xRRGGBB` value.
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        Self::Solid(Rgb::hex(hex))
    }

    /// Returns true for the transparent sentinel.
    #[inline]
    #[must_use]
    pub const fn is_clear(self) -> bool {
        matches!(self, Self::Clear)
    }

    /// Parses a `"#rrggbb"` or `"transparent"` literal.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::InvalidPixel`] for anything else.
    pub fn parse(s: &str) -> Result<Self, SpriteError> {
        if s == "transparent" {
            return Ok(Self::Clear);
        }
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6)
            .and_then(|h| u32::from_str_radix(h, 16).ok())
            .ok_or_else(|| SpriteError::InvalidPixel(s.to_owned()))?;
        Ok(Self::hex(hex))
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => f.write_str("transparent"),
            Self::Solid(rgb) => f.write_str(&rgb.to_hex_string()),
        }
    }
}

impl Serialize for Pixel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pixel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PixelVisitor;

        impl Visitor<'_> for PixelVisitor {
            type Value = Pixel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"transparent\" or \"#rrggbb\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Pixel, E> {
                Pixel::parse(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(PixelVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let px = Pixel::hex(0x6266d1);
        assert_eq!(px.to_string(), "#6266d1");
        assert_eq!(Pixel::parse("#6266d1").unwrap(), px);
    }

    #[test]
    fn test_transparent_sentinel() {
        assert!(Pixel::Clear.is_clear());
        assert_eq!(Pixel::parse("transparent").unwrap(), Pixel::Clear);
        assert!(!Pixel::WHITE.is_clear());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Pixel::parse("red").is_err());
        assert!(Pixel::parse("#12345").is_err());
        assert!(Pixel::parse("#gggggg").is_err());
    }

    #[test]
    fn test_serde_string_form() {
        let json = serde_json::to_string(&Pixel::hex(0xff0000)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Pixel = serde_json::from_str("\"transparent\"").unwrap();
        assert_eq!(back, Pixel::Clear);
    }
}

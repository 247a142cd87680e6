//! Core types for the rasterizer

use serde::{Deserialize, Serialize};

/// Palette index meaning "transparent, do not draw"
pub const TRANSPARENT: u8 = 255;

/// Number of hues per brightness band
pub const BAND_SIZE: u8 = 64;

/// Number of brightness bands in the palette (base + 3 darker)
pub const BAND_COUNT: u8 = 4;

/// One quantisation step per channel (255 / 3)
pub const CHANNEL_STEP: u8 = 85;

/// RGB colour (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// One quantisation step darker, clamped at zero
    pub const fn darker(self) -> Self {
        Self {
            r: self.r.saturating_sub(CHANNEL_STEP),
            g: self.g.saturating_sub(CHANNEL_STEP),
            b: self.b.saturating_sub(CHANNEL_STEP),
        }
    }

    /// Opaque 4-byte pixel in the requested channel order
    pub fn to_bytes(self, order: ChannelOrder) -> [u8; 4] {
        match order {
            ChannelOrder::Rgba => [self.r, self.g, self.b, 255],
            ChannelOrder::Bgra => [self.b, self.g, self.r, 255],
            ChannelOrder::Abgr => [255, self.b, self.g, self.r],
        }
    }
}

/// Byte order of the true-colour layer handed to the presentation surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// R, G, B, A (macroquad `Texture2D::from_rgba8`)
    #[default]
    Rgba,
    /// B, G, R, A
    Bgra,
    /// A, B, G, R: memory layout of a packed little-endian RGBA8888 surface
    Abgr,
}

/// How the three 2-bit channel levels are packed into a palette index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitLayout {
    /// Red in bits 4-5, green in 2-3, blue in 0-1. Matches the palette.
    #[default]
    RedHigh,
    /// Red in bits 0-1, blue in bits 4-5. Red and blue come out swapped
    /// against the palette; kept for assets tuned against that output.
    Legacy,
}

impl BitLayout {
    /// Pack three 2-bit levels (0-3) into a base-band index
    pub fn pack(self, r: u8, g: u8, b: u8) -> u8 {
        let (r, g, b) = (r & 3, g & 3, b & 3);
        match self {
            BitLayout::RedHigh => (r << 4) | (g << 2) | b,
            BitLayout::Legacy => r | (g << 2) | (b << 4),
        }
    }
}

/// Which primitives add the translation offset to their destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationPolicy {
    /// Region blit, skipped region blit, text and filled rectangle only
    #[default]
    Legacy,
    /// Every primitive
    Uniform,
}

/// Mirroring applied by the region blits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Flip {
    pub fn horizontal(self) -> bool {
        matches!(self, Flip::Horizontal | Flip::Both)
    }

    pub fn vertical(self) -> bool {
        matches!(self, Flip::Vertical | Flip::Both)
    }
}

//! Fixed 256-entry palette
//!
//! Entries 0-63 are the base hues: a 6-bit index split into three 2-bit
//! channel levels (red in the top bits, blue in the bottom bits), each level
//! scaled by 85. Entries 64-255 are three progressively darker copies.

use std::sync::OnceLock;

use super::types::{Color, BAND_COUNT, BAND_SIZE, CHANNEL_STEP};

/// Palette lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [Color; 256],
}

impl Palette {
    /// Build the palette. Pure and deterministic.
    pub fn generate() -> Self {
        let mut entries = [Color::BLACK; 256];
        for i in 0..BAND_SIZE {
            let r = (i >> 4) & 3;
            let g = (i >> 2) & 3;
            let b = i & 3;

            let mut color = Color::new(r * CHANNEL_STEP, g * CHANNEL_STEP, b * CHANNEL_STEP);
            for band in 0..BAND_COUNT {
                entries[(band * BAND_SIZE + i) as usize] = color;
                color = color.darker();
            }
        }
        Self { entries }
    }

    /// Colour for a palette index. Every `u8` is a valid index.
    pub fn rgb(&self, index: u8) -> Color {
        self.entries[index as usize]
    }

    pub fn entries(&self) -> &[Color; 256] {
        &self.entries
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::generate()
    }
}

static PALETTE: OnceLock<Palette> = OnceLock::new();

/// Process-wide palette, generated on first use
pub fn palette() -> &'static Palette {
    PALETTE.get_or_init(|| {
        log::debug!("Generated {}-band palette", BAND_COUNT);
        Palette::generate()
    })
}

//! Pixel sinks and the darkness filter
//!
//! Every primitive writes through a `PixelSink`. The darkened sink shifts
//! each index into a darker palette band. Odd darkness levels sit between
//! two bands and are approximated with a 2x2 checkerboard.

use super::frame::Frame;
use super::types::{BAND_COUNT, BAND_SIZE, TRANSPARENT};

/// Highest darkness level (three full bands, six half-band steps)
pub const MAX_DARKNESS: u8 = 6;

/// Final pixel-write strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PixelSink {
    /// Store the index verbatim
    #[default]
    Plain,
    /// Shift the index into a darker band according to the filter level
    Darkened,
}

/// Darkness parameters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DarknessFilter {
    pub enabled: bool,
    level: u8,
    start: f32,
    end: f32,
    step: f32,
}

impl DarknessFilter {
    /// Enable or disable. Resets the level to 0.
    pub fn configure(&mut self, enabled: bool, start: f32, end: f32) {
        self.enabled = enabled;
        if enabled {
            self.start = start;
            self.end = end;
            self.step = (end - start) / 3.0;
        }
        self.level = 0;
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(MAX_DARKNESS);
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    /// Depth span covered by one full band
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Half-band level for a depth value: 0 at `start`, 6 at `end` and beyond
    pub fn level_for_depth(&self, depth: f32) -> u8 {
        let half_step = self.step / 2.0;
        if depth <= self.start || half_step <= 0.0 || !half_step.is_finite() {
            return 0;
        }
        let level = ((depth - self.start) / half_step).floor();
        level.min(MAX_DARKNESS as f32) as u8
    }

    /// Resolve the level from a depth value
    pub fn set_depth(&mut self, depth: f32) {
        self.level = self.level_for_depth(depth);
    }

    /// Bands to shift the pixel at (x, y). Coordinates are non-negative.
    pub fn band_shift(&self, x: i32, y: i32) -> u8 {
        if !self.enabled || self.level == 0 {
            return 0;
        }
        let level = self.level;
        if level % 2 == 0 {
            (level + 1) / 2
        } else if x % 2 == y % 2 {
            level / 2
        } else {
            (level + 2) / 2
        }
    }

    /// Index `index` shifted `shift` bands darker, stopping at the darkest band
    pub fn darken(index: u8, shift: u8) -> u8 {
        let hue = index % BAND_SIZE;
        let band = (index / BAND_SIZE + shift).min(BAND_COUNT - 1);
        band * BAND_SIZE + hue
    }
}

impl PixelSink {
    /// Write one pixel. The sentinel and out-of-bounds positions are skipped.
    #[inline]
    pub fn put(self, frame: &mut Frame, darkness: &DarknessFilter, x: i32, y: i32, index: u8) {
        if index == TRANSPARENT || !frame.contains(x, y) {
            return;
        }
        let index = match self {
            PixelSink::Plain => index,
            PixelSink::Darkened => DarknessFilter::darken(index, darkness.band_shift(x, y)),
        };
        frame.store(x, y, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn filter(level: u8) -> DarknessFilter {
        let mut f = DarknessFilter::default();
        f.configure(true, 0.0, 3.0);
        f.set_level(level);
        f
    }

    #[test_case(2, 1)]
    #[test_case(4, 2)]
    #[test_case(6, 3)]
    fn test_even_levels_shift_uniformly(level: u8, bands: u8) {
        let f = filter(level);
        for (x, y) in [(0, 0), (1, 0), (0, 1), (5, 8)] {
            assert_eq!(f.band_shift(x, y), bands);
        }
    }

    #[test_case(1, 0, 1)]
    #[test_case(3, 1, 2)]
    #[test_case(5, 2, 3)]
    fn test_odd_levels_checkerboard(level: u8, same: u8, other: u8) {
        let f = filter(level);
        assert_eq!(f.band_shift(0, 0), same);
        assert_eq!(f.band_shift(1, 1), same);
        assert_eq!(f.band_shift(1, 0), other);
        assert_eq!(f.band_shift(2, 3), other);
    }

    #[test]
    fn test_disabled_or_zero_level() {
        let mut f = filter(4);
        f.enabled = false;
        assert_eq!(f.band_shift(0, 0), 0);
        assert_eq!(filter(0).band_shift(1, 0), 0);
    }

    #[test]
    fn test_configure_resets_level() {
        let mut f = filter(5);
        f.configure(true, 10.0, 40.0);
        assert_eq!(f.level(), 0);
        assert!((f.step() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_level_clamps() {
        assert_eq!(filter(9).level(), MAX_DARKNESS);
    }

    #[test]
    fn test_level_for_depth() {
        let mut f = DarknessFilter::default();
        f.configure(true, 10.0, 40.0);
        assert_eq!(f.level_for_depth(5.0), 0);
        assert_eq!(f.level_for_depth(10.0), 0);
        assert_eq!(f.level_for_depth(14.0), 0);
        assert_eq!(f.level_for_depth(15.0), 1);
        assert_eq!(f.level_for_depth(24.0), 2);
        assert_eq!(f.level_for_depth(39.0), 5);
        assert_eq!(f.level_for_depth(100.0), 6);
        f.set_depth(26.0);
        assert_eq!(f.level(), 3);
    }

    #[test]
    fn test_darken_saturates_at_last_band() {
        assert_eq!(DarknessFilter::darken(5, 1), 69);
        assert_eq!(DarknessFilter::darken(5, 3), 197);
        assert_eq!(DarknessFilter::darken(69, 3), 197);
        assert_eq!(DarknessFilter::darken(63, 3), 255);
    }

    #[test]
    fn test_sink_skips_sentinel_and_bounds() {
        let mut fr = Frame::new(2, 2).unwrap();
        let f = filter(2);
        PixelSink::Darkened.put(&mut fr, &f, 0, 0, TRANSPARENT);
        PixelSink::Plain.put(&mut fr, &f, -1, 0, 3);
        assert!(fr.indices().iter().all(|&i| i == 0));

        PixelSink::Plain.put(&mut fr, &f, 0, 0, 3);
        PixelSink::Darkened.put(&mut fr, &f, 1, 0, 3);
        assert_eq!(fr.index_at(0, 0), Some(3));
        assert_eq!(fr.index_at(1, 0), Some(67));
    }
}

//! Palette-indexed bitmaps
//!
//! Decoded once from a true-colour image. Each pixel is a base-band hue
//! (0-63) or the transparent sentinel. Darker bands never live in an asset;
//! they are produced at draw time by the darkness filter.

use std::path::Path;

use super::error::RasterError;
use super::types::{BitLayout, BAND_SIZE, CHANNEL_STEP, TRANSPARENT};

/// Quantise one RGBA pixel to a base-band index or the sentinel
pub fn quantize(r: u8, g: u8, b: u8, a: u8, layout: BitLayout) -> u8 {
    if a != 255 {
        return TRANSPARENT;
    }
    layout.pack(r / CHANNEL_STEP, g / CHANNEL_STEP, b / CHANNEL_STEP)
}

/// Immutable indexed image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedBitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
    name: String,
}

impl IndexedBitmap {
    /// Wrap already-indexed data, checking every value is a base hue or the sentinel
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, RasterError> {
        let expected = width
            .checked_mul(height)
            .ok_or(RasterError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(RasterError::BufferSize { expected, actual: data.len() });
        }
        if let Some(offset) = data.iter().position(|&i| i >= BAND_SIZE && i != TRANSPARENT) {
            return Err(RasterError::InvalidIndex { index: data[offset], offset });
        }
        Ok(Self { width, height, data, name: String::new() })
    }

    /// Decode tightly packed 8-bit RGBA pixels
    pub fn from_rgba(
        width: usize,
        height: usize,
        rgba: &[u8],
        layout: BitLayout,
    ) -> Result<Self, RasterError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(RasterError::InvalidDimensions { width, height })?;
        if rgba.len() != expected {
            return Err(RasterError::BufferSize { expected, actual: rgba.len() });
        }

        let data = rgba
            .chunks_exact(4)
            .map(|p| quantize(p[0], p[1], p[2], p[3], layout))
            .collect();

        Ok(Self { width, height, data, name: String::new() })
    }

    pub fn from_image(img: &image::RgbaImage, layout: BitLayout) -> Result<Self, RasterError> {
        let (width, height) = img.dimensions();
        Self::from_rgba(width as usize, height as usize, img.as_raw(), layout)
    }

    /// Decode from encoded image bytes (PNG, BMP, JPEG)
    pub fn from_bytes(bytes: &[u8], name: String, layout: BitLayout) -> Result<Self, RasterError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let mut bmp = Self::from_image(&img, layout)?;
        bmp.name = name;
        Ok(bmp)
    }

    /// Load and decode an image file
    pub fn load<P: AsRef<Path>>(path: P, layout: BitLayout) -> Result<Self, RasterError> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba8();
        let mut bmp = Self::from_image(&img, layout)?;
        bmp.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        log::info!("Loaded bitmap: {} ({}x{})", bmp.name, bmp.width, bmp.height);
        Ok(bmp)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Index at (x, y); out-of-range reads are transparent
    pub fn get_pixel(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return TRANSPARENT;
        }
        self.data[y as usize * self.width + x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::palette::Palette;
    use test_case::test_case;

    #[test_case(0; "fully transparent")]
    #[test_case(128; "half alpha")]
    #[test_case(254; "almost opaque")]
    fn test_partial_alpha_is_transparent(alpha: u8) {
        assert_eq!(quantize(200, 10, 90, alpha, BitLayout::RedHigh), TRANSPARENT);
        assert_eq!(quantize(200, 10, 90, alpha, BitLayout::Legacy), TRANSPARENT);
    }

    #[test]
    fn test_opaque_is_base_band() {
        for v in (0..=255u16).step_by(17) {
            let v = v as u8;
            for layout in [BitLayout::RedHigh, BitLayout::Legacy] {
                assert!(quantize(v, 255 - v, v / 2, 255, layout) < 64);
            }
        }
        assert_eq!(quantize(255, 255, 255, 255, BitLayout::RedHigh), 63);
    }

    #[test]
    fn test_roundtrip_within_one_step() {
        let palette = Palette::generate();
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(51) {
                for b in (0..=255u16).step_by(85) {
                    let index = quantize(r as u8, g as u8, b as u8, 255, BitLayout::RedHigh);
                    let c = palette.rgb(index);
                    assert!((c.r as i32 - r as i32).abs() < 85);
                    assert!((c.g as i32 - g as i32).abs() < 85);
                    assert!((c.b as i32 - b as i32).abs() < 85);
                }
            }
        }
    }

    #[test]
    fn test_legacy_layout_swaps_red_and_blue() {
        let palette = Palette::generate();
        let index = quantize(255, 0, 0, 255, BitLayout::Legacy);
        let c = palette.rgb(index);
        assert_eq!((c.r, c.g, c.b), (0, 0, 255));
    }

    #[test]
    #[rustfmt::skip]
    fn test_from_rgba() {
        let rgba = [
            255, 0, 0, 255, /**/ 0, 0, 0, 0,
            0, 255, 0, 255, /**/ 255, 255, 255, 255,
        ];
        let bmp = IndexedBitmap::from_rgba(2, 2, &rgba, BitLayout::RedHigh).unwrap();
        assert_eq!(bmp.data(), &[48, TRANSPARENT, 12, 63]);
        assert_eq!(bmp.get_pixel(1, 1), 63);
        assert_eq!(bmp.get_pixel(2, 0), TRANSPARENT);
        assert_eq!(bmp.get_pixel(-1, 0), TRANSPARENT);
    }

    #[test]
    fn test_from_rgba_size_mismatch() {
        let err = IndexedBitmap::from_rgba(2, 2, &[0; 12], BitLayout::RedHigh).unwrap_err();
        assert!(matches!(err, RasterError::BufferSize { expected: 16, actual: 12 }));
    }

    #[test]
    fn test_new_rejects_dark_band() {
        let err = IndexedBitmap::new(2, 1, vec![3, 70]).unwrap_err();
        assert!(matches!(err, RasterError::InvalidIndex { index: 70, offset: 1 }));
        assert!(IndexedBitmap::new(2, 1, vec![63, TRANSPARENT]).is_ok());
    }

    #[test]
    fn test_from_image() {
        let mut img = image::RgbaImage::new(3, 1);
        img.put_pixel(0, 0, image::Rgba([0, 0, 255, 255]));
        img.put_pixel(2, 0, image::Rgba([90, 90, 90, 255]));
        let bmp = IndexedBitmap::from_image(&img, BitLayout::RedHigh).unwrap();
        assert_eq!(bmp.width(), 3);
        assert_eq!(bmp.data(), &[3, TRANSPARENT, 21]);
    }
}

//! Indexed frame buffer
//!
//! All primitives write palette indices into `indices`. Once per frame,
//! after drawing, `rebuild` expands them through the palette into the
//! true-colour `pixels` layer that gets presented.

use super::error::{alloc_buffer, RasterError};
use super::palette::Palette;
use super::types::ChannelOrder;

/// Indexed-colour canvas plus its derived true-colour layer
pub struct Frame {
    width: usize,
    height: usize,
    indices: Vec<u8>, // one palette index per pixel
    pixels: Vec<u8>,  // 4 bytes per pixel
}

impl Frame {
    /// Allocate a frame. The indexed layer starts at index 0.
    pub fn new(width: usize, height: usize) -> Result<Self, RasterError> {
        let size = width
            .checked_mul(height)
            .filter(|&s| s > 0)
            .ok_or(RasterError::InvalidDimensions { width, height })?;
        let rgba_size = size
            .checked_mul(4)
            .ok_or(RasterError::InvalidDimensions { width, height })?;

        let indices = alloc_buffer(size, 0, width, height)?;
        let pixels = alloc_buffer(rgba_size, 255, width, height)?;
        log::debug!("Created {}x{} frame", width, height);

        Ok(Self { width, height, indices, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> usize {
        self.width * self.height
    }

    /// Fill the indexed layer with one index
    pub fn clear(&mut self, index: u8) {
        self.indices.fill(index);
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// True-colour layer as of the last `rebuild`
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn index_at(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.indices[y * self.width + x])
        } else {
            None
        }
    }

    /// Store an index, discarding out-of-bounds writes
    pub(crate) fn store(&mut self, x: i32, y: i32, index: u8) {
        if self.contains(x, y) {
            self.indices[y as usize * self.width + x as usize] = index;
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Expand every index through the palette into the true-colour layer
    pub fn rebuild(&mut self, palette: &Palette, order: ChannelOrder) {
        for (px, &index) in self.pixels.chunks_exact_mut(4).zip(&self.indices) {
            px.copy_from_slice(&palette.rgb(index).to_bytes(order));
        }
    }
}

/// Copy the indexed layer of `src` into `dst`. No-op when sizes differ.
pub fn copy_frame(src: &Frame, dst: &mut Frame) {
    if src.width != dst.width || src.height != dst.height {
        log::debug!(
            "Skipped frame copy: {}x{} into {}x{}",
            src.width,
            src.height,
            dst.width,
            dst.height
        );
        return;
    }
    dst.indices.copy_from_slice(&src.indices);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::types::Color;

    #[test]
    fn test_new_starts_at_zero() {
        let fr = Frame::new(4, 3).unwrap();
        assert_eq!((fr.width(), fr.height()), (4, 3));
        assert_eq!(fr.size(), 12);
        assert!(fr.indices().iter().all(|&i| i == 0));
        assert_eq!(fr.pixels().len(), 48);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            Frame::new(0, 10),
            Err(RasterError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_clear() {
        let mut fr = Frame::new(3, 3).unwrap();
        fr.clear(255);
        assert!(fr.indices().iter().all(|&i| i == 255));
    }

    #[test]
    fn test_store_clips() {
        let mut fr = Frame::new(2, 2).unwrap();
        fr.store(-1, 0, 5);
        fr.store(2, 0, 5);
        fr.store(0, 2, 5);
        assert!(fr.indices().iter().all(|&i| i == 0));
        fr.store(1, 1, 5);
        assert_eq!(fr.index_at(1, 1), Some(5));
        assert_eq!(fr.index_at(2, 1), None);
    }

    #[test]
    fn test_rebuild_channel_order() {
        let palette = Palette::generate();
        let mut fr = Frame::new(2, 1).unwrap();
        fr.store(0, 0, 0b11_00_00);
        fr.store(1, 0, 0b11_00_00 + 64);

        fr.rebuild(&palette, ChannelOrder::Rgba);
        assert_eq!(&fr.pixels()[..4], &[255, 0, 0, 255]);
        assert_eq!(&fr.pixels()[4..], &[170, 0, 0, 255]);

        fr.rebuild(&palette, ChannelOrder::Bgra);
        assert_eq!(&fr.pixels()[..4], &[0, 0, 255, 255]);

        let expected = Color::new(170, 0, 0).to_bytes(ChannelOrder::Abgr);
        fr.rebuild(&palette, ChannelOrder::Abgr);
        assert_eq!(&fr.pixels()[4..], &expected);
    }

    #[test]
    fn test_copy_frame() {
        let mut a = Frame::new(2, 2).unwrap();
        a.clear(7);
        let mut b = Frame::new(2, 2).unwrap();
        copy_frame(&a, &mut b);
        assert_eq!(b.indices(), &[7, 7, 7, 7]);
    }

    #[test]
    fn test_copy_frame_size_mismatch_is_noop() {
        let mut a = Frame::new(2, 2).unwrap();
        a.clear(7);
        let mut b = Frame::new(3, 2).unwrap();
        copy_frame(&a, &mut b);
        assert!(b.indices().iter().all(|&i| i == 0));
    }
}

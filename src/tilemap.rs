//! Tile maps
//!
//! Binary layout: 1 magic byte (ignored), layer count (u8), name length
//! (u8), name bytes, width and height (little-endian i32), then one byte per
//! tile per layer, row-major. Tile id 0 is empty; id `n` draws tileset cell
//! `n - 1`.

use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::rasterizer::{Canvas, Flip, IndexedBitmap, RasterError};
use crate::reader::ByteReader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tilemap {
    pub name: String,
    pub width: usize,
    pub height: usize,
    layers: Vec<Vec<u8>>,
}

impl Tilemap {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RasterError> {
        let mut r = ByteReader::new(bytes);
        r.u8("magic")?;
        let layer_count = r.u8("layer count")? as usize;
        let name_len = r.u8("name length")? as usize;
        let name = String::from_utf8_lossy(r.take(name_len, "name")?).into_owned();
        let width = r.count("width")?;
        let height = r.count("height")?;

        let size = width
            .checked_mul(height)
            .ok_or(RasterError::InvalidDimensions { width, height })?;
        let mut layers = Vec::with_capacity(layer_count);
        for _ in 0..layer_count {
            layers.push(r.take(size, "layer")?.to_vec());
        }

        Ok(Self { name, width, height, layers })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RasterError> {
        let map = Self::from_bytes(&fs::read(path.as_ref())?)?;
        log::info!(
            "Loaded tilemap: {} ({}x{}, {} layers)",
            map.name,
            map.width,
            map.height,
            map.layers.len()
        );
        Ok(map)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn get_tile(&self, layer: usize, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.layers.get(layer).map(|l| l[y * self.width + x])
    }
}

/// Load a tilemap file
pub fn load_tilemap<P: AsRef<Path>>(path: P) -> Result<Tilemap, RasterError> {
    Tilemap::load(path)
}

/// Tiles along one axis that can land in `0..limit` once shifted by `offset`
fn visible_tiles(offset: i32, tile: i32, limit: i32, count: usize) -> Range<usize> {
    let (offset, tile) = (offset as i64, tile as i64);
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let first = (-offset / tile).clamp(0, count);
    let last = ((limit as i64 - offset) / tile + 1).clamp(0, count);
    first as usize..last as usize
}

impl<'a> Canvas<'a> {
    /// Draw one layer with `tile_w` x `tile_h` cells from `tileset`.
    /// Camera-relative: the current translation offset applies, and tiles
    /// outside the canvas are skipped.
    pub fn draw_tilemap_layer(
        &mut self,
        map: &Tilemap,
        layer: usize,
        tileset: &IndexedBitmap,
        tile_w: i32,
        tile_h: i32,
    ) {
        if tile_w <= 0 || tile_h <= 0 || layer >= map.layer_count() {
            return;
        }
        let columns = i32::try_from(tileset.width()).unwrap_or(i32::MAX) / tile_w;
        if columns == 0 {
            return;
        }
        let (ox, oy) = self.offset(true);
        let rows = visible_tiles(oy, tile_h, self.height(), map.height);
        let cols = visible_tiles(ox, tile_w, self.width(), map.width);

        for ty in rows {
            for tx in cols.clone() {
                let id = match map.get_tile(layer, tx, ty) {
                    Some(0) | None => continue,
                    Some(id) => id as i32 - 1,
                };
                let sx = (id % columns) * tile_w;
                let sy = (id / columns) * tile_h;
                let dx = (tx as i32).saturating_mul(tile_w);
                let dy = (ty as i32).saturating_mul(tile_h);
                self.draw_bitmap_region(tileset, sx, sy, tile_w, tile_h, dx, dy, Flip::None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Frame, RenderContext, TRANSPARENT};

    fn encode(name: &str, w: i32, h: i32, layers: &[&[u8]]) -> Vec<u8> {
        let mut out = vec![b'T', layers.len() as u8, name.len() as u8];
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&w.to_le_bytes());
        out.extend_from_slice(&h.to_le_bytes());
        for l in layers {
            out.extend_from_slice(l);
        }
        out
    }

    /// 2x2 tileset of 2x2 tiles, tile n filled with hue n + 1
    #[rustfmt::skip]
    fn tileset() -> IndexedBitmap {
        IndexedBitmap::new(4, 4, vec![
            1, 1, 2, 2,
            1, 1, 2, 2,
            3, 3, 4, 4,
            3, 3, 4, 4,
        ])
        .unwrap()
    }

    #[test]
    fn test_from_bytes() {
        let bytes = encode("cave", 3, 2, &[&[0, 1, 2, 3, 4, 0], &[9; 6]]);
        let map = Tilemap::from_bytes(&bytes).unwrap();
        assert_eq!(map.name, "cave");
        assert_eq!((map.width, map.height), (3, 2));
        assert_eq!(map.layer_count(), 2);
        assert_eq!(map.get_tile(0, 1, 1), Some(4));
        assert_eq!(map.get_tile(1, 2, 1), Some(9));
        assert_eq!(map.get_tile(0, 3, 0), None);
        assert_eq!(map.get_tile(2, 0, 0), None);
    }

    #[test]
    fn test_truncated_layer() {
        let bytes = encode("x", 4, 4, &[&[0; 10]]);
        assert!(matches!(Tilemap::from_bytes(&bytes), Err(RasterError::FormatError(_))));
    }

    #[test]
    fn test_draw_layer() {
        let map = Tilemap::from_bytes(&encode("m", 2, 1, &[&[4, 0]])).unwrap();
        let mut ctx = RenderContext::default();
        let mut fr = Frame::new(4, 2).unwrap();
        fr.clear(TRANSPARENT);
        ctx.bind(&mut fr).draw_tilemap_layer(&map, 0, &tileset(), 2, 2);
        assert_eq!(fr.indices(), &[4, 4, TRANSPARENT, TRANSPARENT, 4, 4, TRANSPARENT, TRANSPARENT]);
    }

    #[test]
    fn test_draw_layer_with_camera() {
        let map = Tilemap::from_bytes(&encode("m", 3, 1, &[&[1, 2, 3]])).unwrap();
        let mut ctx = RenderContext::default();
        ctx.set_translation(-2, 0);
        let mut fr = Frame::new(4, 2).unwrap();
        fr.clear(TRANSPARENT);
        ctx.bind(&mut fr).draw_tilemap_layer(&map, 0, &tileset(), 2, 2);
        assert_eq!(fr.indices(), &[2, 2, 3, 3, 2, 2, 3, 3]);
    }

    #[test]
    fn test_far_camera_draws_nothing() {
        let map = Tilemap::from_bytes(&encode("m", 3, 1, &[&[1, 2, 3]])).unwrap();
        let mut ctx = RenderContext::default();
        let mut fr = Frame::new(4, 2).unwrap();
        fr.clear(TRANSPARENT);
        for (x, y) in [(i32::MIN, 0), (i32::MAX, 0), (0, i32::MIN), (i32::MAX, i32::MAX)] {
            ctx.set_translation(x, y);
            ctx.bind(&mut fr).draw_tilemap_layer(&map, 0, &tileset(), 2, 2);
        }
        assert!(fr.indices().iter().all(|&i| i == TRANSPARENT));
    }
}

//! Demo scene for the viewer
//!
//! Builds its bitmaps procedurally so the viewer runs without asset files,
//! then exercises every primitive once per frame.

use indexed_raster::mesh::{Mesh, MeshTransform};
use indexed_raster::rasterizer::{
    BitLayout, Canvas, Flip, IndexedBitmap, RasterError, Vec3, FONT_GRID,
};
use indexed_raster::scene::Scene;

const YELLOW: u8 = 0b11_11_00;
const CYAN: u8 = 0b00_11_11;
const WHITE: u8 = 0b11_11_11;
const GLYPH: usize = 6;

/// Two-hue checkerboard, decoded from true colour like any loaded asset
fn checker(size: usize, layout: BitLayout) -> Result<IndexedBitmap, RasterError> {
    let mut rgba = Vec::with_capacity(size * size * 4);
    for y in 0..size {
        for x in 0..size {
            let px: [u8; 4] = if ((x / 8) + (y / 8)) % 2 == 0 {
                [40, 40, 160, 255]
            } else {
                [20, 100, 200, 255]
            };
            rgba.extend_from_slice(&px);
        }
    }
    IndexedBitmap::from_rgba(size, size, &rgba, layout)
}

/// Diamond sprite with transparent corners
fn diamond(size: usize, layout: BitLayout) -> Result<IndexedBitmap, RasterError> {
    let half = size as i32 / 2;
    let mut rgba = Vec::with_capacity(size * size * 4);
    for y in 0..size as i32 {
        for x in 0..size as i32 {
            let d = (x - half).abs() + (y - half).abs();
            let px: [u8; 4] = match d {
                d if d > half => [0, 0, 0, 0],
                d if d > half - 3 => [255, 170, 0, 255],
                _ => [255, 255, 85, 255],
            };
            rgba.extend_from_slice(&px);
        }
    }
    IndexedBitmap::from_rgba(size, size, &rgba, layout)
}

/// Blocky stand-in font: each glyph is a 5x5 pattern derived from its code
fn block_font() -> Result<IndexedBitmap, RasterError> {
    let side = GLYPH * FONT_GRID as usize;
    let mut data = vec![255u8; side * side];
    for c in 33u32..127 {
        let mut bits = c.wrapping_mul(2_654_435_761) >> 7;
        let (cx, cy) = ((c as usize % 16) * GLYPH, (c as usize / 16) * GLYPH);
        for gy in 0..5 {
            for gx in 0..3 {
                if bits & 1 == 1 {
                    // Mirror the left half for a symmetric glyph
                    data[(cy + gy) * side + cx + gx] = WHITE;
                    data[(cy + gy) * side + cx + 4 - gx] = WHITE;
                }
                bits >>= 1;
            }
        }
    }
    IndexedBitmap::new(side, side, data)
}

pub struct DemoScene {
    time: f32,
    layout: BitLayout,
    background: Option<IndexedBitmap>,
    sprite: Option<IndexedBitmap>,
    font: Option<IndexedBitmap>,
    cube: Option<Mesh>,
}

impl DemoScene {
    pub fn new(layout: BitLayout, font: Option<IndexedBitmap>) -> Self {
        Self {
            time: 0.0,
            layout,
            background: None,
            sprite: None,
            font,
            cube: None,
        }
    }
}

impl Scene for DemoScene {
    fn init(&mut self) -> Result<(), String> {
        self.background = Some(checker(32, self.layout).map_err(|e| e.to_string())?);
        self.sprite = Some(diamond(16, self.layout).map_err(|e| e.to_string())?);
        if self.font.is_none() {
            self.font = Some(block_font().map_err(|e| e.to_string())?);
        }
        self.cube = Some(Mesh::cube([48, 12, 3, 60, 51, 15]).map_err(|e| e.to_string())?);
        log::info!("Demo scene ready");
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        self.time += dt;
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        let (Some(bg), Some(sprite), Some(font), Some(cube)) =
            (&self.background, &self.sprite, &self.font, &self.cube)
        else {
            return;
        };
        let t = self.time;
        let (w, h) = (canvas.width(), canvas.height());

        canvas.set_darkness(false, 0.0, 0.0);
        canvas.set_translation(0, 0);
        canvas.clear(0);

        canvas.draw_rotated_bitmap_area(bg, t * 0.5, t * 0.3, t * 0.01);

        // Cube darkens with depth
        canvas.set_darkness(true, 4.0, 6.5);
        let transform = MeshTransform {
            position: Vec3::new(0.0, 0.0, 1.0),
            rotation_y: t * 0.02,
            rotation_x: t * 0.013,
            ..Default::default()
        };
        canvas.draw_mesh(cube, &transform);

        // Dither ramp: one swatch per darkness level
        canvas.set_darkness(true, 0.0, 1.0);
        for level in 0..=6u8 {
            canvas.set_darkness_level(level);
            canvas.fill_rect(8 + level as i32 * 14, h - 20, 12, 12, YELLOW);
        }
        canvas.set_darkness(false, 0.0, 0.0);

        for i in 0..8 {
            let a = t * 0.01 + i as f32 * std::f32::consts::FRAC_PI_4;
            let (x, y) = (w - 40 + (a.cos() * 30.0) as i32, 40 + (a.sin() * 30.0) as i32);
            canvas.draw_line(w - 40, 40, x, y, CYAN);
        }
        canvas.draw_triangle(10, 60, 50, 40, 30, 100, 0b11_00_00);

        canvas.draw_bitmap(sprite, 10, 10);
        canvas.draw_inverted_bitmap(sprite, 30, 10);
        canvas.draw_bitmap_region(sprite, 0, 0, 8, 16, 50, 10, Flip::Horizontal);
        canvas.draw_bitmap_region(sprite, 0, 0, 16, 8, 62, 10, Flip::Vertical);

        let period = 1 + ((t / 20.0) as i32 % 4);
        canvas.draw_skipped_bitmap_region(sprite, 0, 0, 16, 16, 82, 10, period, period, Flip::None);

        let grow = 16 + ((t * 0.05).sin() * 8.0) as i32;
        canvas.draw_scaled_bitmap_region(sprite, 0, 0, 16, 16, 104, 10, grow, grow);

        // Camera-relative row
        canvas.set_translation(((t * 0.03).sin() * 12.0) as i32, 0);
        for i in 0..4 {
            canvas.draw_bitmap_region(sprite, 0, 0, 16, 16, 20 + i * 20, 130, Flip::None);
        }
        canvas.set_translation(0, 0);

        canvas.draw_str(font, "INDEXED RASTER\npalette demo", w / 2, 4, 0, GLYPH as i32 + 2, true);
    }

    fn destroy(&mut self) {
        log::info!("Demo scene closed after {:.0} ticks", self.time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexed_raster::rasterizer::{Frame, RenderContext};

    #[test]
    fn test_demo_draws_without_assets() {
        let mut scene = DemoScene::new(BitLayout::RedHigh, None);
        scene.init().unwrap();
        scene.update(30.0);

        let mut frame = Frame::new(160, 120).unwrap();
        let mut ctx = RenderContext::default();
        scene.draw(&mut ctx.bind(&mut frame));
        assert!(frame.indices().iter().any(|&i| i == YELLOW));
        assert!(!ctx.darkness().enabled);
    }

    #[test]
    fn test_procedural_assets_are_base_band() {
        for bmp in [checker(16, BitLayout::Legacy), diamond(9, BitLayout::RedHigh), block_font()] {
            let bmp = bmp.unwrap();
            assert!(bmp.data().iter().all(|&i| i < 64 || i == 255));
        }
    }
}

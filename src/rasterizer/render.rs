//! Render state and drawing primitives
//!
//! `RenderContext` holds the state that persists between draw calls: the
//! active pixel sink, darkness parameters and translation offset. Binding a
//! frame yields a `Canvas`, through which every primitive writes.

use std::ops::Range;

use super::bitmap::IndexedBitmap;
use super::darkness::{DarknessFilter, PixelSink};
use super::frame::Frame;
use super::math::{Mat2, Vec2};
use super::palette::palette;
use super::types::{ChannelOrder, Flip, TranslationPolicy, TRANSPARENT};

/// Glyph grid of a bitmap font (16 x 16 cells)
pub const FONT_GRID: i32 = 16;

/// Persistent draw state
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    sink: PixelSink,
    darkness: DarknessFilter,
    trans_x: i32,
    trans_y: i32,
    pub translation_policy: TranslationPolicy,
    pub channel_order: ChannelOrder,
}

impl RenderContext {
    pub fn new(translation_policy: TranslationPolicy, channel_order: ChannelOrder) -> Self {
        Self {
            translation_policy,
            channel_order,
            ..Default::default()
        }
    }

    /// Make `frame` the write target for the returned canvas
    pub fn bind<'a>(&'a mut self, frame: &'a mut Frame) -> Canvas<'a> {
        Canvas { frame, ctx: self }
    }

    pub fn set_translation(&mut self, x: i32, y: i32) {
        self.trans_x = x;
        self.trans_y = y;
    }

    pub fn translation(&self) -> (i32, i32) {
        (self.trans_x, self.trans_y)
    }

    /// Enable or disable darkness. Selects the sink and resets the level to 0.
    pub fn set_darkness(&mut self, enabled: bool, start: f32, end: f32) {
        self.darkness.configure(enabled, start, end);
        self.sink = if enabled { PixelSink::Darkened } else { PixelSink::Plain };
    }

    pub fn set_darkness_level(&mut self, level: u8) {
        self.darkness.set_level(level);
    }

    /// Drive the darkness level from a depth value between start and end
    pub fn set_depth(&mut self, depth: f32) {
        self.darkness.set_depth(depth);
    }

    pub fn darkness(&self) -> &DarknessFilter {
        &self.darkness
    }

    pub fn sink(&self) -> PixelSink {
        self.sink
    }

    /// Rebuild the true-colour layer of `frame` and return it for presentation
    pub fn present<'f>(&self, frame: &'f mut Frame) -> &'f [u8] {
        frame.rebuild(palette(), self.channel_order);
        frame.pixels()
    }
}

/// A frame bound to a render context
pub struct Canvas<'a> {
    frame: &'a mut Frame,
    ctx: &'a mut RenderContext,
}

impl<'a> Canvas<'a> {
    pub fn width(&self) -> i32 {
        self.frame.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.frame.height() as i32
    }

    pub fn frame(&self) -> &Frame {
        self.frame
    }

    pub fn context(&self) -> &RenderContext {
        self.ctx
    }

    pub fn context_mut(&mut self) -> &mut RenderContext {
        self.ctx
    }

    pub fn set_translation(&mut self, x: i32, y: i32) {
        self.ctx.set_translation(x, y);
    }

    pub fn set_darkness(&mut self, enabled: bool, start: f32, end: f32) {
        self.ctx.set_darkness(enabled, start, end);
    }

    pub fn set_darkness_level(&mut self, level: u8) {
        self.ctx.set_darkness_level(level);
    }

    /// Fill the bound frame with one index (bypasses the sink)
    pub fn clear(&mut self, index: u8) {
        self.frame.clear(index);
    }

    /// Write one pixel through the active sink
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, index: u8) {
        self.ctx.sink.put(self.frame, &self.ctx.darkness, x, y, index);
    }

    /// Translation for a primitive. `camera_relative` primitives always
    /// apply it; the rest only under the uniform policy.
    pub(crate) fn offset(&self, camera_relative: bool) -> (i32, i32) {
        if camera_relative || self.ctx.translation_policy == TranslationPolicy::Uniform {
            (self.ctx.trans_x, self.ctx.trans_y)
        } else {
            (0, 0)
        }
    }

    /// Draw a whole bitmap, unscaled
    pub fn draw_bitmap(&mut self, b: &IndexedBitmap, dx: i32, dy: i32) {
        let (ox, oy) = self.offset(false);
        self.blit(b, dx.saturating_add(ox), dy.saturating_add(oy), |index| index);
    }

    /// Draw a whole bitmap with every hue complemented (6-bit negative).
    /// Transparent pixels stay transparent.
    pub fn draw_inverted_bitmap(&mut self, b: &IndexedBitmap, dx: i32, dy: i32) {
        let (ox, oy) = self.offset(false);
        self.blit(b, dx.saturating_add(ox), dy.saturating_add(oy), |index| {
            if index == TRANSPARENT {
                TRANSPARENT
            } else {
                !index & 0b0011_1111
            }
        });
    }

    fn blit(&mut self, b: &IndexedBitmap, dx: i32, dy: i32, map: impl Fn(u8) -> u8) {
        let (w, h) = (extent(b.width()), extent(b.height()));
        for py in visible_span(dy, h, self.height(), false) {
            for px in visible_span(dx, w, self.width(), false) {
                let index = map(b.get_pixel(px, py));
                self.put_pixel(place(dx, w, px, false), place(dy, h, py, false), index);
            }
        }
    }

    /// Draw the source rectangle (sx, sy, sw, sh) at (dx, dy)
    pub fn draw_bitmap_region(
        &mut self,
        b: &IndexedBitmap,
        sx: i32,
        sy: i32,
        sw: i32,
        sh: i32,
        dx: i32,
        dy: i32,
        flip: Flip,
    ) {
        self.draw_skipped_bitmap_region(b, sx, sy, sw, sh, dx, dy, 0, 0, flip);
    }

    /// Region blit that leaves every `skipx`-th column and `skipy`-th row
    /// of the source rectangle untouched (counting from 0). A period of 0
    /// disables skipping on that axis.
    pub fn draw_skipped_bitmap_region(
        &mut self,
        b: &IndexedBitmap,
        sx: i32,
        sy: i32,
        sw: i32,
        sh: i32,
        dx: i32,
        dy: i32,
        skipx: i32,
        skipy: i32,
        flip: Flip,
    ) {
        let (ox, oy) = self.offset(true);
        let (dx, dy) = (dx.saturating_add(ox), dy.saturating_add(oy));

        for j in visible_span(dy, sh, self.height(), flip.vertical()) {
            if skipy > 0 && j % skipy == 0 {
                continue;
            }
            let y = place(dy, sh, j, flip.vertical());
            for i in visible_span(dx, sw, self.width(), flip.horizontal()) {
                if skipx > 0 && i % skipx == 0 {
                    continue;
                }
                let x = place(dx, sw, i, flip.horizontal());
                let index = b.get_pixel(sx.saturating_add(i), sy.saturating_add(j));
                self.put_pixel(x, y, index);
            }
        }
    }

    /// Nearest-neighbour resample of (sx, sy, sw, sh) into (dx, dy, dw, dh)
    pub fn draw_scaled_bitmap_region(
        &mut self,
        b: &IndexedBitmap,
        sx: i32,
        sy: i32,
        sw: i32,
        sh: i32,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
    ) {
        if sw <= 0 || sh <= 0 || dw <= 0 || dh <= 0 {
            return;
        }
        let (ox, oy) = self.offset(false);
        let (dx, dy) = (dx.saturating_add(ox), dy.saturating_add(oy));

        let step_x = sw as f32 / dw as f32;
        let step_y = sh as f32 / dh as f32;
        let last_sx = sx.saturating_add(sw - 1);
        let last_sy = sy.saturating_add(sh - 1);

        // Rows and columns off the canvas only advance the source accumulators
        let first_x = dx.max(0);
        let first_y = dy.max(0);
        let start_x = sx as f32 + step_x * (first_x as f32 - dx as f32);
        let end_x = dx.saturating_add(dw).min(self.width());
        let end_y = dy.saturating_add(dh).min(self.height());

        let mut pyf = sy as f32 + step_y * (first_y as f32 - dy as f32);
        for y in first_y..end_y {
            let py = (pyf as i32).min(last_sy);
            let mut pxf = start_x;
            for x in first_x..end_x {
                let px = (pxf as i32).min(last_sx);
                self.put_pixel(x, y, b.get_pixel(px, py));
                pxf += step_x;
            }
            pyf += step_y;
        }
    }

    /// Fill the whole canvas by sampling `b` through the inverse of a
    /// rotation about the canvas centre. Texture coordinates wrap.
    pub fn draw_rotated_bitmap_area(&mut self, b: &IndexedBitmap, trx: f32, try_: f32, angle: f32) {
        let (bw, bh) = (extent(b.width()), extent(b.height()));
        if bw == 0 || bh == 0 {
            return;
        }
        let Some(inv) = Mat2::rotation(angle).inverse() else {
            return;
        };
        let (ox, oy) = self.offset(false);
        let cx = (self.width() / 2) as f32 + ox as f32;
        let cy = (self.height() / 2) as f32 + oy as f32;
        let shift = Vec2::new(trx, try_);

        for y in 0..self.height() {
            for x in 0..self.width() {
                let local = Vec2::new(x as f32 - cx, y as f32 - cy);
                let t = inv.transform(local) + shift;
                let tx = (t.x as i32).rem_euclid(bw);
                let ty = (t.y as i32).rem_euclid(bh);
                self.put_pixel(x, y, b.get_pixel(tx, ty));
            }
        }
    }

    /// Render bytes with a 16x16-glyph bitmap font. Stops at a NUL byte;
    /// `\n` moves down by `yoff` and back to `dx`. With `center`, the first
    /// line is shifted left by half the text length.
    pub fn draw_text(
        &mut self,
        font: &IndexedBitmap,
        text: &[u8],
        dx: i32,
        dy: i32,
        xoff: i32,
        yoff: i32,
        center: bool,
    ) {
        let cw = extent(font.width()) / FONT_GRID;
        let ch = extent(font.height()) / FONT_GRID;
        let advance = cw.saturating_add(xoff);
        let len = text.iter().position(|&c| c == 0).unwrap_or(text.len());

        let mut x = dx;
        let mut y = dy;
        if center {
            let half = extent(len.div_ceil(2));
            x = x.saturating_sub(half.saturating_mul(advance));
        }

        for &c in &text[..len] {
            if c == b'\n' {
                x = dx;
                y = y.saturating_add(yoff);
                continue;
            }
            let sx = c as i32 % FONT_GRID;
            let sy = c as i32 / FONT_GRID;
            self.draw_bitmap_region(font, sx * cw, sy * ch, cw, ch, x, y, Flip::None);
            x = x.saturating_add(advance);
        }
    }

    pub fn draw_str(
        &mut self,
        font: &IndexedBitmap,
        text: &str,
        dx: i32,
        dy: i32,
        xoff: i32,
        yoff: i32,
        center: bool,
    ) {
        self.draw_text(font, text.as_bytes(), dx, dy, xoff, yoff, center);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, index: u8) {
        let (ox, oy) = self.offset(true);
        let (x, y) = (x.saturating_add(ox), y.saturating_add(oy));
        let (x0, x1) = (x.max(0), x.saturating_add(w).min(self.width()));
        let (y0, y1) = (y.max(0), y.saturating_add(h).min(self.height()));
        for py in y0..y1 {
            for px in x0..x1 {
                self.put_pixel(px, py, index);
            }
        }
    }

    /// Bresenham line, both endpoints inclusive
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: u8) {
        let (ox, oy) = self.offset(false);
        let (ox, oy) = (ox as i64, oy as i64);
        let (mut x1, mut y1) = (x1 as i64 + ox, y1 as i64 + oy);
        let (x2, y2) = (x2 as i64 + ox, y2 as i64 + oy);

        let dx = (x2 - x1).abs();
        let dy = (y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = (if dx > dy { dx } else { -dy }) / 2;

        loop {
            if let (Ok(x), Ok(y)) = (i32::try_from(x1), i32::try_from(y1)) {
                self.put_pixel(x, y, color);
            }
            if x1 == x2 && y1 == y2 {
                break;
            }
            let e2 = err;
            if e2 > -dx {
                err -= dy;
                x1 += sx;
            }
            if e2 < dy {
                err += dx;
                y1 += sy;
            }
        }
    }
}

/// Length of a bitmap axis in destination units
fn extent(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Offsets `k` in `0..len` whose destination (see `place`) lies in `0..limit`
fn visible_span(d: i32, len: i32, limit: i32, reversed: bool) -> Range<i32> {
    let (d, len, limit) = (d as i64, (len as i64).max(0), limit as i64);
    let (lo, hi) = if reversed {
        (d + len - limit, d + len)
    } else {
        (-d, limit - d)
    };
    (lo.clamp(0, len) as i32)..(hi.clamp(0, len) as i32)
}

/// Destination of offset `k` along a span of `len` starting at `d`
fn place(d: i32, len: i32, k: i32, reversed: bool) -> i32 {
    let p = if reversed {
        d as i64 + len as i64 - 1 - k as i64
    } else {
        d as i64 + k as i64
    };
    p as i32
}

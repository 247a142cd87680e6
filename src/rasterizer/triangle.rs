//! Flat triangle scan-fill
//!
//! Edge-stepping from the topmost vertex. The two remaining vertices are
//! assigned to the left and right chains by a split policy; when the
//! accumulated left edge overtakes the right one by more than a pixel the
//! assignment was wrong, and the fill restarts with the next policy.
//!
//! Coverage follows a top-left rule: scanline `y` covers
//! `ceil(left) <= x < ceil(right)`, rows `min_y <= y < max_y`.

use super::math::Point;
use super::render::Canvas;

/// How far the left chain may pass the right one before a split is rejected
const DIVERGENCE: f32 = 1.0;

/// How the two non-pivot vertices are assigned to the left/right chains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Left/right from the winding around the pivot
    ByWinding,
    /// Caller's vertex order
    AsGiven,
    /// Caller's vertex order reversed
    Swapped,
}

impl SplitPolicy {
    pub const ATTEMPTS: [SplitPolicy; 3] = [
        SplitPolicy::ByWinding,
        SplitPolicy::AsGiven,
        SplitPolicy::Swapped,
    ];

    fn order(self, pivot: Point, a: Point, b: Point) -> (Point, Point) {
        match self {
            // y grows downwards: a positive cross product puts `a` on the right
            SplitPolicy::ByWinding if cross(pivot, a, b) > 0 => (b, a),
            SplitPolicy::ByWinding | SplitPolicy::AsGiven => (a, b),
            SplitPolicy::Swapped => (b, a),
        }
    }
}

/// z of (a - pivot) x (b - pivot)
fn cross(pivot: Point, a: Point, b: Point) -> i64 {
    let (ax, ay) = (a.x as i64 - pivot.x as i64, a.y as i64 - pivot.y as i64);
    let (bx, by) = (b.x as i64 - pivot.x as i64, b.y as i64 - pivot.y as i64);
    ax * by - ay * bx
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanOutcome {
    Filled,
    Diverged,
}

/// x-step per scanline along `from -> to`
fn edge_step(from: Point, to: Point) -> f32 {
    if to.y != from.y {
        (to.x as f32 - from.x as f32) / (to.y as f32 - from.y as f32)
    } else {
        0.0
    }
}

/// One side of the triangle: pivot -> near vertex, then near -> far
struct Chain {
    near: Point,
    far: Point,
    x: f32,
    step: f32,
    switched: bool,
}

impl Chain {
    /// Chain positioned on scanline `top` (at or below the pivot)
    fn new(pivot: Point, near: Point, far: Point, top: i32) -> Self {
        if near.y > top {
            let step = edge_step(pivot, near);
            let x = pivot.x as f32 + step * (top as f32 - pivot.y as f32);
            Self { near, far, x, step, switched: false }
        } else {
            // Flat top, or the near vertex lies above the first visible row
            let step = edge_step(near, far);
            let x = near.x as f32 + step * (top as f32 - near.y as f32);
            Self { near, far, x, step, switched: true }
        }
    }

    /// Move onto the lower edge once the scanline reaches the near vertex
    fn update(&mut self, y: i32) {
        if !self.switched && y >= self.near.y {
            self.x = self.near.x as f32;
            self.step = edge_step(self.near, self.far);
            self.switched = true;
        }
    }

    fn advance(&mut self) {
        self.x += self.step;
    }
}

impl<'a> Canvas<'a> {
    /// Fill a triangle with one colour index
    pub fn draw_triangle(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        color: u8,
    ) {
        let (ox, oy) = self.offset(false);
        let pts = [
            Point::new(x1.saturating_add(ox), y1.saturating_add(oy)),
            Point::new(x2.saturating_add(ox), y2.saturating_add(oy)),
            Point::new(x3.saturating_add(ox), y3.saturating_add(oy)),
        ];

        let min_x = pts.iter().map(|p| p.x).min().unwrap_or(0);
        let max_x = pts.iter().map(|p| p.x).max().unwrap_or(0);
        let min_y = pts.iter().map(|p| p.y).min().unwrap_or(0);
        let max_y = pts.iter().map(|p| p.y).max().unwrap_or(0);

        if max_x < 0
            || min_x >= self.width()
            || max_y < 0
            || min_y >= self.height()
            || max_y == min_y
        {
            return;
        }

        // Pivot is the first vertex on the top row; the others keep caller order
        let pivot_idx = pts.iter().position(|p| p.y == min_y).unwrap_or(0);
        let pivot = pts[pivot_idx];
        let rest: Vec<Point> = pts
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != pivot_idx)
            .map(|(_, p)| *p)
            .collect();

        let last = SplitPolicy::ATTEMPTS.len() - 1;
        for (attempt, policy) in SplitPolicy::ATTEMPTS.into_iter().enumerate() {
            let (left, right) = policy.order(pivot, rest[0], rest[1]);
            let check = attempt < last;
            if self.scan_triangle(pivot, left, right, max_y, color, check) == ScanOutcome::Filled {
                return;
            }
            log::trace!("Triangle split {:?} diverged, retrying", policy);
        }
    }

    fn scan_triangle(
        &mut self,
        pivot: Point,
        left: Point,
        right: Point,
        max_y: i32,
        color: u8,
        check_divergence: bool,
    ) -> ScanOutcome {
        // Rows above the canvas are stepped over in one go
        let top = pivot.y.max(0);
        let bottom = max_y.min(self.height());
        let mut l = Chain::new(pivot, left, right, top);
        let mut r = Chain::new(pivot, right, left, top);

        for y in top..bottom {
            l.update(y);
            r.update(y);

            if check_divergence && l.x - r.x > DIVERGENCE {
                return ScanOutcome::Diverged;
            }

            let start = (l.x.ceil() as i32).max(0);
            let end = (r.x.ceil() as i32).min(self.width());
            for x in start..end {
                self.put_pixel(x, y, color);
            }

            l.advance();
            r.advance();
        }
        ScanOutcome::Filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::frame::Frame;
    use crate::rasterizer::render::tests::blank;
    use crate::rasterizer::render::RenderContext;
    use crate::rasterizer::types::TRANSPARENT;
    use test_case::test_case;

    fn filled(fr: &Frame) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..fr.height() {
            for x in 0..fr.width() {
                if fr.index_at(x, y) != Some(TRANSPARENT) {
                    out.push((x as i32, y as i32));
                }
            }
        }
        out
    }

    fn right_isoceles() -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..10 {
            for x in 0..10 - y {
                out.push((x, y));
            }
        }
        out
    }

    #[test_case((0, 0), (10, 0), (0, 10); "given order")]
    #[test_case((10, 0), (0, 10), (0, 0); "rotated order")]
    #[test_case((0, 10), (0, 0), (10, 0); "pivot last")]
    fn test_right_isoceles(a: (i32, i32), b: (i32, i32), c: (i32, i32)) {
        let mut ctx = RenderContext::default();
        let mut fr = blank(20, 20);
        ctx.bind(&mut fr).draw_triangle(a.0, a.1, b.0, b.1, c.0, c.1, 4);
        assert_eq!(filled(&fr), right_isoceles());
    }

    #[test]
    fn test_wrong_split_diverges() {
        // (8, 1) belongs on the right; on the left it overtakes at y = 1
        let mut ctx = RenderContext::default();
        let mut fr = blank(12, 12);
        let (pivot, a, b) = (Point::new(0, 0), Point::new(10, 10), Point::new(8, 1));
        let outcome = ctx.bind(&mut fr).scan_triangle(pivot, b, a, 10, 2, true);
        assert_eq!(outcome, ScanOutcome::Diverged);
        assert_eq!(SplitPolicy::ByWinding.order(pivot, a, b), (a, b));
        assert_eq!(SplitPolicy::ByWinding.order(pivot, b, a), (a, b));
    }

    #[test]
    fn test_split_spans() {
        let mut ctx = RenderContext::default();
        let mut fr = blank(12, 12);
        ctx.bind(&mut fr).draw_triangle(0, 0, 10, 10, 8, 1, 2);

        let px = filled(&fr);
        assert!(px.contains(&(5, 5)));
        assert!(px.contains(&(8, 2)));
        assert!(!px.contains(&(2, 6)));
        // Every row spans ceil(y) .. ceil(8 + (y - 1) * 2 / 9)
        for y in 1..10 {
            let right = (8.0 + (y - 1) as f32 * (2.0 / 9.0)).ceil() as i32;
            let row: Vec<i32> = px.iter().filter(|p| p.1 == y).map(|p| p.0).collect();
            assert_eq!(row, (y..right).collect::<Vec<_>>(), "row {}", y);
        }
    }

    #[test_case((0, 0), (40, 40), (30, 29); "given order")]
    #[test_case((40, 40), (30, 29), (0, 0); "pivot last")]
    #[test_case((30, 29), (0, 0), (40, 40); "pivot middle")]
    #[test_case((0, 0), (30, 29), (40, 40); "far vertex last")]
    fn test_sliver_keeps_one_pixel_per_row(a: (i32, i32), b: (i32, i32), c: (i32, i32)) {
        let mut ctx = RenderContext::default();
        let mut fr = blank(64, 64);
        ctx.bind(&mut fr).draw_triangle(a.0, a.1, b.0, b.1, c.0, c.1, 6);
        let expected: Vec<(i32, i32)> = (1..40).map(|y| (y, y)).collect();
        assert_eq!(filled(&fr), expected);
    }

    #[test]
    fn test_small_sliver() {
        let mut ctx = RenderContext::default();
        let mut fr = blank(8, 8);
        ctx.bind(&mut fr).draw_triangle(0, 0, 3, 3, 2, 1, 6);
        assert_eq!(filled(&fr), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_huge_coordinates() {
        let mut ctx = RenderContext::default();
        let mut fr = blank(8, 8);
        {
            let mut c = ctx.bind(&mut fr);
            // Hypotenuse x + y = -1 misses the canvas
            c.draw_triangle(i32::MIN, i32::MIN, i32::MAX, i32::MIN, i32::MIN, i32::MAX, 1);
            c.draw_triangle(i32::MAX - 2, 0, i32::MAX, 0, i32::MAX, 5, 1);
        }
        assert!(filled(&fr).is_empty());

        let big = 1 << 30;
        ctx.bind(&mut fr).draw_triangle(-big, -10, big, -10, 0, big, 1);
        assert_eq!(filled(&fr).len(), 64);
    }

    #[test]
    fn test_translation_saturates() {
        let mut ctx = RenderContext::default();
        ctx.translation_policy = crate::rasterizer::types::TranslationPolicy::Uniform;
        ctx.set_translation(i32::MAX, i32::MAX);
        let mut fr = blank(8, 8);
        ctx.bind(&mut fr).draw_triangle(0, 0, 5, 0, 0, 5, 1);
        assert!(filled(&fr).is_empty());
    }

    #[test]
    fn test_same_result_regardless_of_vertex_order() {
        let mut ctx = RenderContext::default();
        let mut a = blank(16, 16);
        ctx.bind(&mut a).draw_triangle(0, 0, 10, 10, 8, 1, 2);
        let mut b = blank(16, 16);
        ctx.bind(&mut b).draw_triangle(0, 0, 8, 1, 10, 10, 2);
        assert_eq!(a.indices(), b.indices());
    }

    #[test]
    fn test_flat_bottom() {
        let mut ctx = RenderContext::default();
        let mut fr = blank(10, 10);
        ctx.bind(&mut fr).draw_triangle(4, 0, 0, 4, 8, 4, 1);
        let rows: Vec<usize> = (0..5)
            .map(|y| filled(&fr).iter().filter(|p| p.1 == y).count())
            .collect();
        assert_eq!(rows, vec![0, 2, 4, 6, 0]);
    }

    #[test]
    fn test_degenerate_and_offscreen_rejected() {
        let mut ctx = RenderContext::default();
        let mut fr = blank(10, 10);
        {
            let mut c = ctx.bind(&mut fr);
            c.draw_triangle(0, 3, 5, 3, 9, 3, 1);
            c.draw_triangle(-20, 0, -10, 5, -15, 9, 1);
            c.draw_triangle(0, 10, 5, 15, 9, 12, 1);
        }
        assert!(filled(&fr).is_empty());
    }

    #[test]
    fn test_clipped_to_canvas() {
        let mut ctx = RenderContext::default();
        let mut fr = blank(8, 8);
        ctx.bind(&mut fr).draw_triangle(-10, -10, 30, -10, -10, 30, 3);
        // Hypotenuse x + y = 20 lies outside the canvas: everything is covered
        assert_eq!(filled(&fr).len(), 64);
    }

    #[test]
    fn test_no_overdraw_with_darkness() {
        let mut ctx = RenderContext::default();
        ctx.set_darkness(true, 0.0, 1.0);
        ctx.set_darkness_level(2);
        let mut fr = blank(20, 20);
        ctx.bind(&mut fr).draw_triangle(0, 0, 10, 0, 0, 10, 7);
        assert!(fr.indices().iter().all(|&i| i == TRANSPARENT || i == 7 + 64));
    }
}

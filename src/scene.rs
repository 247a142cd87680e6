//! Scene interface
//!
//! A scene owns its gameplay state and draws through a bound canvas. The
//! loop calls `update` at a fixed step, then clears, draws, rebuilds and
//! presents the frame.

use crate::rasterizer::Canvas;

pub trait Scene {
    /// Called once before the first update
    fn init(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Advance by `dt`, in units of 1/60 s
    fn update(&mut self, dt: f32);

    /// Draw the current state. Set darkness and translation explicitly:
    /// they persist from whatever drew last.
    fn draw(&mut self, canvas: &mut Canvas);

    fn destroy(&mut self) {}
}

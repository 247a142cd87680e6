//! Indexed-colour software rasterizer
//!
//! Features:
//! - Fixed 256-entry palette: 64 hues in 4 brightness bands
//! - Bitmap blits with flip, scale, skip and rotation
//! - Bresenham lines and edge-stepping triangle fill
//! - Darkness filter with checkerboard dithering between bands

mod bitmap;
mod darkness;
mod error;
mod frame;
mod math;
mod palette;
mod render;
mod triangle;
mod types;

pub use bitmap::*;
pub use darkness::*;
pub use error::RasterError;
pub use frame::*;
pub use math::*;
pub use palette::*;
pub use render::*;
pub use triangle::SplitPolicy;
pub use types::*;

/// Default canvas dimensions
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;

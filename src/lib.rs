//! Indexed-colour software rasterizer
//!
//! A 256-colour palette-indexed frame buffer with bitmap blits, text,
//! lines, triangles and a dithered darkness filter. The finished frame is
//! expanded through the palette into a true-colour buffer for display.

pub mod config;
pub mod mesh;
pub mod rasterizer;
pub mod scene;
pub mod tilemap;

mod reader;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

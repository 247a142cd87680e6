//! Mesh module - flat-coloured triangle meshes
//!
//! Loaded from a compact binary format and drawn with the triangle
//! rasterizer, one palette colour per face.

mod draw;
mod model;

pub use draw::*;
pub use model::*;

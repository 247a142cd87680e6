//! Vector math for the rasterizer
//!
//! Small value types only: 2D/3D float vectors, an integer screen point
//! and the 2x2 matrix used by the rotated background blit.

use std::ops::{Add, Mul, Sub};
use serde::{Deserialize, Serialize};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction. A zero vector stays zero.
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Rotate around the Y axis, then the X axis
    pub fn rotate_yx(self, angle_y: f32, angle_x: f32) -> Vec3 {
        let (sy, cy) = angle_y.sin_cos();
        let x = self.x * cy + self.z * sy;
        let z = -self.x * sy + self.z * cy;

        let (sx, cx) = angle_x.sin_cos();
        Vec3 {
            x,
            y: self.y * cx - z * sx,
            z: self.y * sx + z * cx,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// 2D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

/// Integer screen coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Column-major 2x2 matrix: `[m11 m21; m12 m22]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat2 {
    pub m11: f32,
    pub m21: f32,
    pub m12: f32,
    pub m22: f32,
}

impl Mat2 {
    pub fn rotation(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self { m11: c, m21: -s, m12: s, m22: c }
    }

    pub fn determinant(&self) -> f32 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// Inverse matrix, or `None` when singular
    pub fn inverse(&self) -> Option<Mat2> {
        let det = self.determinant();
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Mat2 {
            m11: inv * self.m22,
            m21: inv * -self.m21,
            m12: inv * -self.m12,
            m22: inv * self.m11,
        })
    }

    pub fn transform(&self, v: Vec2) -> Vec2 {
        Vec2 {
            x: self.m11 * v.x + self.m21 * v.y,
            y: self.m12 * v.x + self.m22 * v.y,
        }
    }
}

/// Project a camera-space point to screen coordinates.
/// Returned `z` is the depth used for sorting and darkness.
pub fn project(v: Vec3, distance: f32, width: usize, height: usize) -> Vec3 {
    const SCALE: f32 = 0.75;

    let us = distance - 1.0;
    let vs = (width.min(height) as f32 / 2.0) * SCALE;

    let denom = v.z + distance;
    if denom.abs() < 0.001 {
        return Vec3::new(width as f32 / 2.0, height as f32 / 2.0, distance);
    }

    Vec3 {
        x: ((v.x * us) / denom * vs + width as f32 / 2.0).floor(),
        y: ((v.y * us) / denom * vs + height as f32 / 2.0).floor(),
        z: (v.z * us) / denom + distance,
    }
}

//! Flat-shaded mesh drawing
//!
//! Vertices are transformed and projected, back faces culled, and the
//! remaining faces filled far-to-near with the triangle rasterizer. With
//! darkness enabled each face's depth drives the darkness level.

use super::model::Mesh;
use crate::rasterizer::{project, Canvas, Vec3};

/// Placement of a mesh in front of the camera
#[derive(Debug, Clone, Copy)]
pub struct MeshTransform {
    pub position: Vec3,
    pub rotation_y: f32,
    pub rotation_x: f32,
    pub scale: f32,
    /// Camera distance used by the projection
    pub distance: f32,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation_y: 0.0,
            rotation_x: 0.0,
            scale: 1.0,
            distance: 5.0,
        }
    }
}

impl MeshTransform {
    fn apply(&self, v: Vec3) -> Vec3 {
        v.scale(self.scale).rotate_yx(self.rotation_y, self.rotation_x) + self.position
    }
}

/// Projected face ready for rasterization
struct Surface {
    points: [Vec3; 3],
    depth: f32,
    color: u8,
}

impl<'a> Canvas<'a> {
    /// Draw a mesh. Leaves the darkness level at that of the nearest face.
    pub fn draw_mesh(&mut self, mesh: &Mesh, transform: &MeshTransform) {
        const NEAR: f32 = 0.1;

        let (w, h) = (self.width() as usize, self.height() as usize);
        let camera_space: Vec<Vec3> = mesh.vertices().iter().map(|&v| transform.apply(v)).collect();

        let mut surfaces: Vec<Surface> = Vec::with_capacity(mesh.face_count());
        for (face, idx) in mesh.indices().chunks_exact(3).enumerate() {
            let cv = [camera_space[idx[0]], camera_space[idx[1]], camera_space[idx[2]]];
            if cv.iter().any(|v| v.z + transform.distance <= NEAR) {
                continue;
            }

            // Back faces point away from the camera (+Z)
            let normal = mesh.normals()[face].rotate_yx(transform.rotation_y, transform.rotation_x);
            if normal.z > 0.0 {
                continue;
            }

            let points = cv.map(|v| project(v, transform.distance, w, h));
            let depth = (points[0].z + points[1].z + points[2].z) / 3.0;
            surfaces.push(Surface { points, depth, color: mesh.colors()[face] });
        }

        surfaces.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        let shade = self.context().darkness().enabled;
        for s in &surfaces {
            if shade {
                self.context_mut().set_depth(s.depth);
            }
            let [a, b, c] = s.points.map(|p| (p.x as i32, p.y as i32));
            self.draw_triangle(a.0, a.1, b.0, b.1, c.0, c.1, s.color);
        }
    }
}

//! Mesh data and the binary mesh format
//!
//! Layout (little-endian):
//! - 1 magic byte (ignored)
//! - i32 counts: vertex values, index values, normal values, uv values
//! - i32 vertex values, fixed point x1000, three per vertex
//! - i32 index values, one (vertex, uv, normal) triplet per corner, 1-based
//! - i32 normal values, fixed point x1000, three per normal
//! - i32 uv values (unused)

use std::fs;
use std::path::Path;

use crate::rasterizer::{RasterError, Vec3, BAND_SIZE};
use crate::reader::ByteReader;

/// Colour index of faces without an explicit colour
pub const DEFAULT_FACE_COLOR: u8 = 0b0011_0101;

/// Fixed-point scale of vertex and normal values in mesh files
const FIXED_POINT: f32 = 1000.0;

/// Triangle mesh with one colour and one normal per face
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    indices: Vec<usize>,
    normals: Vec<Vec3>,
    colors: Vec<u8>,
}

impl Mesh {
    /// Build a mesh. `indices` holds three vertex indices per face. Face
    /// normals are computed from the winding when `normals` is `None`.
    pub fn new(
        vertices: Vec<Vec3>,
        indices: Vec<usize>,
        colors: Option<Vec<u8>>,
        normals: Option<Vec<Vec3>>,
    ) -> Result<Self, RasterError> {
        if indices.len() % 3 != 0 {
            return Err(RasterError::FormatError(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= vertices.len()) {
            return Err(RasterError::FormatError(format!(
                "vertex index {} out of range ({} vertices)",
                bad,
                vertices.len()
            )));
        }
        let face_count = indices.len() / 3;

        let colors = match colors {
            Some(c) if c.len() != face_count => {
                return Err(RasterError::FormatError(format!(
                    "{} colours for {} faces",
                    c.len(),
                    face_count
                )));
            }
            Some(c) => {
                if let Some(offset) = c.iter().position(|&i| i >= BAND_SIZE) {
                    return Err(RasterError::InvalidIndex { index: c[offset], offset });
                }
                c
            }
            None => vec![DEFAULT_FACE_COLOR; face_count],
        };

        let normals = match normals {
            Some(n) if n.len() != face_count => {
                return Err(RasterError::FormatError(format!(
                    "{} normals for {} faces",
                    n.len(),
                    face_count
                )));
            }
            Some(n) => n,
            None => indices
                .chunks_exact(3)
                .map(|f| {
                    let (a, b, c) = (vertices[f[0]], vertices[f[1]], vertices[f[2]]);
                    (b - a).cross(c - a).normalize()
                })
                .collect(),
        };

        Ok(Self { vertices, indices, normals, colors })
    }

    /// Parse the binary mesh format
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RasterError> {
        let mut r = ByteReader::new(bytes);
        r.u8("magic")?;
        let vcount = r.count("vertex count")?;
        let icount = r.count("index count")?;
        let ncount = r.count("normal count")?;
        let uvcount = r.count("uv count")?;

        let raw_vertices = r.i32_array(vcount, "vertices")?;
        let raw_indices = r.i32_array(icount, "indices")?;
        let raw_normals = r.i32_array(ncount, "normals")?;
        r.i32_array(uvcount, "uvs")?;

        let vertices: Vec<Vec3> = raw_vertices
            .chunks_exact(3)
            .map(|v| fixed_vec3(v[0], v[1], v[2]))
            .collect();
        let normal_table: Vec<Vec3> = raw_normals
            .chunks_exact(3)
            .map(|n| fixed_vec3(n[0], n[1], n[2]))
            .collect();

        // Each corner is (vertex, uv, normal)
        let corners: Vec<&[i32]> = raw_indices.chunks_exact(3).collect();
        let mut indices = Vec::with_capacity(corners.len());
        for c in &corners {
            indices.push(one_based(c[0], "vertex")?);
        }

        // A face takes the normal of its first corner
        let normals = if normal_table.is_empty() {
            None
        } else {
            let mut n = Vec::with_capacity(corners.len() / 3);
            for face in corners.chunks_exact(3) {
                let idx = one_based(face[0][2], "normal")?;
                let normal = normal_table.get(idx).copied().ok_or_else(|| {
                    RasterError::FormatError(format!("normal index {} out of range", idx + 1))
                })?;
                n.push(normal);
            }
            Some(n)
        };

        Self::new(vertices, indices, None, normals)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RasterError> {
        let path = path.as_ref();
        let mesh = Self::from_bytes(&fs::read(path)?)?;
        log::info!(
            "Loaded mesh: {} ({} vertices, {} faces)",
            path.display(),
            mesh.vertices.len(),
            mesh.face_count()
        );
        Ok(mesh)
    }

    /// Unit cube (-1..1) with one hue per side
    pub fn cube(side_colors: [u8; 6]) -> Result<Self, RasterError> {
        let vertices = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ];

        // Two triangles per side, wound so the normal points outwards
        let sides: [[usize; 4]; 6] = [
            [0, 3, 2, 1], // Front (-Z)
            [5, 6, 7, 4], // Back (+Z)
            [4, 7, 3, 0], // Left
            [1, 2, 6, 5], // Right
            [4, 0, 1, 5], // Top (-Y)
            [3, 7, 6, 2], // Bottom (+Y)
        ];

        let mut indices = Vec::with_capacity(36);
        let mut colors = Vec::with_capacity(12);
        for (side, &[a, b, c, d]) in sides.iter().enumerate() {
            indices.extend_from_slice(&[a, b, c, a, c, d]);
            colors.extend_from_slice(&[side_colors[side]; 2]);
        }

        Self::new(vertices, indices, Some(colors), None)
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn colors(&self) -> &[u8] {
        &self.colors
    }

    /// Recolour one face; the index must be a base-band hue
    pub fn set_face_color(&mut self, face: usize, color: u8) {
        if color < BAND_SIZE {
            if let Some(c) = self.colors.get_mut(face) {
                *c = color;
            }
        }
    }
}

fn fixed_vec3(x: i32, y: i32, z: i32) -> Vec3 {
    Vec3::new(x as f32 / FIXED_POINT, y as f32 / FIXED_POINT, z as f32 / FIXED_POINT)
}

fn one_based(i: i32, what: &str) -> Result<usize, RasterError> {
    i.checked_sub(1)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| RasterError::FormatError(format!("{} index {} is not 1-based", what, i)))
}

/// Load a mesh file
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh, RasterError> {
    Mesh::load(path)
}

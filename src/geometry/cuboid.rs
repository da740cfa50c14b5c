//! Procedural box geometry

use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Vec2, Vec3};

use crate::backend::types::{ContentKey, Vertex};
use crate::backend::Allocator;
use crate::error::GeometryResult;
use crate::resources::{VertexBuffer, VertexBufferBuilder};

/// Outward normal, tangent (U axis) and bitangent (V axis) of each face.
/// `tangent × bitangent == normal`, so faces wind counter-clockwise seen from
/// outside.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// Face corners in (u, v) sign order, with their texture coordinates
const CORNERS: [(f32, f32, Vec2); 4] = [
    (-1.0, -1.0, Vec2::new(0.0, 1.0)),
    (1.0, -1.0, Vec2::new(1.0, 1.0)),
    (1.0, 1.0, Vec2::new(1.0, 0.0)),
    (-1.0, 1.0, Vec2::new(0.0, 0.0)),
];

pub const CUBOID_VERTEX_COUNT: usize = 24;
pub const CUBOID_INDEX_COUNT: usize = 36;

static NEXT_CUBOID_ID: AtomicU64 = AtomicU64::new(1);

/// Axis-aligned box centered at the origin.
///
/// `size` is the full extent along each axis, so positions lie in
/// `[-size / 2, size / 2]`. Zero or negative components are not rejected;
/// they produce a flat or inside-out box.
#[derive(Debug)]
pub struct CuboidGeometry {
    id: u64,
    size: Vec3,
    version: u64,
}

impl Default for CuboidGeometry {
    fn default() -> Self {
        Self::new(Vec3::ONE)
    }
}

impl CuboidGeometry {
    pub fn new(size: Vec3) -> Self {
        Self {
            id: NEXT_CUBOID_ID.fetch_add(1, Ordering::Relaxed),
            size,
            version: 0,
        }
    }

    /// Process-unique identity, stable across `set_size`
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Takes effect on the next [`vertex_buffer`](Self::vertex_buffer) call.
    pub fn set_size(&mut self, size: Vec3) {
        self.size = size;
        self.version += 1;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Generate the 24 vertices and 36 indices on the CPU.
    pub fn builder(&self) -> VertexBufferBuilder<Vertex> {
        let half = self.size * 0.5;
        let mut vertices = Vec::with_capacity(CUBOID_VERTEX_COUNT);
        let mut indices = Vec::with_capacity(CUBOID_INDEX_COUNT);

        for (face, (normal, tangent, bitangent)) in FACES.into_iter().enumerate() {
            let base = (face * CORNERS.len()) as u16;
            for (u, v, uv) in CORNERS {
                vertices.push(Vertex {
                    position: (normal + tangent * u + bitangent * v) * half,
                    normal,
                    uv,
                    tangent: tangent.extend(1.0),
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        VertexBufferBuilder::new()
            .with_vertices(vertices)
            .with_indices_u16(indices)
            .with_label("cuboid")
    }

    /// Identifies the current contents to a memoizing allocator
    pub fn content_key(&self) -> ContentKey {
        ContentKey {
            source: self.id,
            version: self.version,
        }
    }

    pub fn vertex_buffer(&self, allocator: &dyn Allocator) -> GeometryResult<VertexBuffer> {
        log::trace!("Generating cuboid of size {}", self.size);
        Ok(self
            .builder()
            .with_content_key(self.content_key())
            .build(allocator)?)
    }
}

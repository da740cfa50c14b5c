//! Geometry wrapping an already-built vertex buffer

use crate::backend::Allocator;
use crate::error::GeometryResult;
use crate::resources::VertexBuffer;

/// Pass-through geometry for externally supplied vertex data, e.g. an
/// imported mesh primitive.
#[derive(Debug, Default)]
pub struct VertexBufferGeometry {
    vertex_buffer: VertexBuffer,
    version: u64,
}

impl VertexBufferGeometry {
    pub fn new(vertex_buffer: VertexBuffer) -> Self {
        Self {
            vertex_buffer,
            version: 0,
        }
    }

    /// Replace the wrapped buffer wholesale.
    pub fn set_vertex_buffer(&mut self, vertex_buffer: VertexBuffer) {
        self.vertex_buffer = vertex_buffer;
        self.version += 1;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Device buffers are resident from creation, so this hands back the
    /// wrapped buffer without touching the allocator.
    pub fn vertex_buffer(&self, _allocator: &dyn Allocator) -> GeometryResult<VertexBuffer> {
        Ok(self.vertex_buffer.clone())
    }
}

//! Shared helpers for geometry integration tests.

use std::sync::Arc;

use scene_geometry::backend::{IndexFormat, Vertex, VertexFormat};
use scene_geometry::importer::{AttributeSemantic, AttributeStream, IndicesRecord};
use scene_geometry::{HostAllocator, MeshPrimitive, SceneContext, VertexBuffer};

/// Install the test logger once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A scene context over a fresh host allocator, plus a handle to read back
/// what it allocated.
pub fn host_context() -> (SceneContext, Arc<HostAllocator>) {
    init_logging();
    let allocator = Arc::new(HostAllocator::new());
    (SceneContext::new(allocator.clone()), allocator)
}

/// Read back the interleaved vertices of a host-allocated vertex buffer.
pub fn read_vertices(allocator: &HostAllocator, vertex_buffer: &VertexBuffer) -> Vec<Vertex> {
    let Some(view) = &vertex_buffer.vertices else {
        return Vec::new();
    };
    let bytes = allocator.read_view(view).expect("vertex buffer not found");
    bytes
        .chunks_exact(std::mem::size_of::<Vertex>())
        .map(bytemuck::pod_read_unaligned)
        .collect()
}

/// Read back indices widened to u32.
pub fn read_indices(allocator: &HostAllocator, vertex_buffer: &VertexBuffer) -> Vec<u32> {
    let Some(indices) = &vertex_buffer.indices else {
        return Vec::new();
    };
    let bytes = allocator
        .read_view(&indices.view)
        .expect("index buffer not found");
    match indices.format {
        IndexFormat::Uint16 => bytes
            .chunks_exact(2)
            .map(|b| u32::from(u16::from_le_bytes([b[0], b[1]])))
            .collect(),
        IndexFormat::Uint32 => bytes
            .chunks_exact(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
    }
}

/// A unit quad as an imported primitive with position, normal and UV streams.
pub fn quad_primitive() -> MeshPrimitive {
    MeshPrimitive::new(4)
        .with_attribute(AttributeStream::from_f32(
            AttributeSemantic::Position,
            VertexFormat::Float32x3,
            &[
                -0.5, -0.5, 0.0, 0.5, -0.5, 0.0, 0.5, 0.5, 0.0, -0.5, 0.5, 0.0,
            ],
        ))
        .with_attribute(AttributeStream::from_f32(
            AttributeSemantic::Normal,
            VertexFormat::Float32x3,
            &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        ))
        .with_attribute(AttributeStream::from_f32(
            AttributeSemantic::TexCoord,
            VertexFormat::Float32x2,
            &[0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
        ))
        .with_indices(IndicesRecord::from_u16(&[0, 1, 2, 0, 2, 3]))
        .with_label("quad")
}

//! Draw binding shared by every geometry variant

use glam::Mat4;

use crate::backend::types::ObjectUniform;
use crate::render::{Command, OBJECT_UNIFORM_SLOT};
use crate::resources::{HostBuffer, VertexBuffer};

/// Write the per-object uniform for `transform` into `host_buffer` and bind
/// it, together with `vertex_buffer`, into `command`.
pub(crate) fn bind_vertex_buffer(
    vertex_buffer: VertexBuffer,
    host_buffer: &mut HostBuffer,
    transform: &Mat4,
    command: &mut Command,
) {
    let uniform = ObjectUniform::from_model(*transform);
    let allocation = host_buffer.emplace_uniform(&uniform);

    log::trace!(
        "Binding {} elements ({:?}) with object uniform at offset {}",
        vertex_buffer.element_count(),
        vertex_buffer.topology,
        allocation.offset
    );

    command.bind_vertices(vertex_buffer);
    command.bind_uniform(OBJECT_UNIFORM_SLOT, allocation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_binds_vertices_and_uniform() {
        let mut host_buffer = HostBuffer::new();
        let mut command = Command::new();
        let transform = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));

        bind_vertex_buffer(
            VertexBuffer::default(),
            &mut host_buffer,
            &transform,
            &mut command,
        );

        assert_eq!(command.vertex_buffer, Some(VertexBuffer::default()));
        let allocation = command.uniform(OBJECT_UNIFORM_SLOT).unwrap();
        let uniform: ObjectUniform = host_buffer.read_uniform(&allocation).unwrap();
        assert_eq!(uniform.model, transform);
    }
}

//! Validation and interleaving of mesh primitive records.

use glam::{Vec2, Vec3, Vec4};

use crate::backend::types::{IndexFormat, Vertex, VertexFormat};
use crate::error::MeshDecodeError;
use crate::resources::VertexBufferBuilder;

use super::mesh_primitive::{
    AttributeSemantic, AttributeStream, MeshPrimitive, index_format_from_tag, topology_from_tag,
    vertex_format_from_tag,
};

const SEMANTIC_COUNT: usize = 4;

/// Format each semantic must be stored in
fn required_format(semantic: AttributeSemantic) -> VertexFormat {
    match semantic {
        AttributeSemantic::Position | AttributeSemantic::Normal => VertexFormat::Float32x3,
        AttributeSemantic::TexCoord => VertexFormat::Float32x2,
        AttributeSemantic::Tangent => VertexFormat::Float32x4,
    }
}

/// Little-endian f32 components of one attribute element
fn read_f32s<const N: usize>(bytes: &[u8]) -> [f32; N] {
    let mut out = [0.0; N];
    for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = f32::from_le_bytes(bytemuck::pod_read_unaligned(chunk));
    }
    out
}

fn check_index_range(
    indices: impl Iterator<Item = u32>,
    vertex_count: u32,
) -> Result<(), MeshDecodeError> {
    for (position, index) in indices.enumerate() {
        if index >= vertex_count {
            return Err(MeshDecodeError::IndexOutOfRange {
                position,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}

impl MeshPrimitive {
    /// Validate the record and interleave its attributes into [`Vertex`]es.
    ///
    /// Position is required. Missing normals default to +Z, missing texture
    /// coordinates to zero, and missing tangents to +X. Nothing is uploaded;
    /// the returned builder does that through an allocator.
    pub fn decode(&self) -> Result<VertexBufferBuilder<Vertex>, MeshDecodeError> {
        let topology = topology_from_tag(self.topology)?;
        let vertex_count = self.vertex_count as usize;

        let mut streams: [Option<&AttributeStream>; SEMANTIC_COUNT] = [None; SEMANTIC_COUNT];
        for stream in &self.attributes {
            let semantic = AttributeSemantic::try_from(stream.semantic)?;
            let format = vertex_format_from_tag(stream.format)?;
            if format != required_format(semantic) {
                return Err(MeshDecodeError::UnsupportedAttributeFormat { semantic, format });
            }

            let expected = vertex_count * format.size() as usize;
            if stream.data.len() != expected {
                return Err(MeshDecodeError::AttributeSizeMismatch {
                    semantic,
                    vertex_count: self.vertex_count,
                    expected,
                    actual: stream.data.len(),
                });
            }

            let slot = &mut streams[semantic.tag() as usize];
            if slot.is_some() {
                return Err(MeshDecodeError::DuplicateAttribute(semantic));
            }
            *slot = Some(stream);
        }

        let positions = streams[AttributeSemantic::Position.tag() as usize]
            .ok_or(MeshDecodeError::MissingPosition)?;

        let mut vertices = vec![
            Vertex {
                position: Vec3::ZERO,
                normal: Vec3::Z,
                uv: Vec2::ZERO,
                tangent: Vec4::new(1.0, 0.0, 0.0, 1.0),
            };
            vertex_count
        ];

        for (vertex, bytes) in vertices.iter_mut().zip(positions.data.chunks_exact(12)) {
            vertex.position = Vec3::from_array(read_f32s(bytes));
        }
        if let Some(normals) = streams[AttributeSemantic::Normal.tag() as usize] {
            for (vertex, bytes) in vertices.iter_mut().zip(normals.data.chunks_exact(12)) {
                vertex.normal = Vec3::from_array(read_f32s(bytes));
            }
        }
        if let Some(uvs) = streams[AttributeSemantic::TexCoord.tag() as usize] {
            for (vertex, bytes) in vertices.iter_mut().zip(uvs.data.chunks_exact(8)) {
                vertex.uv = Vec2::from_array(read_f32s(bytes));
            }
        }
        if let Some(tangents) = streams[AttributeSemantic::Tangent.tag() as usize] {
            for (vertex, bytes) in vertices.iter_mut().zip(tangents.data.chunks_exact(16)) {
                vertex.tangent = Vec4::from_array(read_f32s(bytes));
            }
        }

        let mut builder = VertexBufferBuilder::new()
            .with_vertices(vertices)
            .with_topology(topology);

        let element_count = match &self.indices {
            Some(indices) => {
                let format = index_format_from_tag(indices.index_type)?;
                let expected = indices.count as usize * format.size() as usize;
                if indices.data.len() != expected {
                    return Err(MeshDecodeError::IndexSizeMismatch {
                        count: indices.count,
                        expected,
                        actual: indices.data.len(),
                    });
                }

                match format {
                    IndexFormat::Uint16 => {
                        let values: Vec<u16> = indices
                            .data
                            .chunks_exact(2)
                            .map(|bytes| u16::from_le_bytes(bytemuck::pod_read_unaligned(bytes)))
                            .collect();
                        check_index_range(values.iter().map(|&i| u32::from(i)), self.vertex_count)?;
                        builder = builder.with_indices_u16(values);
                    }
                    IndexFormat::Uint32 => {
                        let values: Vec<u32> = indices
                            .data
                            .chunks_exact(4)
                            .map(|bytes| u32::from_le_bytes(bytemuck::pod_read_unaligned(bytes)))
                            .collect();
                        check_index_range(values.iter().copied(), self.vertex_count)?;
                        builder = builder.with_indices_u32(values);
                    }
                }
                indices.count
            }
            None => self.vertex_count,
        };

        if let Some(per_primitive) = topology.vertices_per_primitive() {
            if element_count % per_primitive != 0 {
                return Err(MeshDecodeError::IncompletePrimitive {
                    count: element_count,
                    topology,
                });
            }
        }

        if let Some(label) = &self.label {
            builder = builder.with_label(label.clone());
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::PrimitiveTopology;
    use crate::importer::IndicesRecord;

    fn triangle() -> MeshPrimitive {
        MeshPrimitive::new(3)
            .with_attribute(AttributeStream::from_f32(
                AttributeSemantic::Position,
                VertexFormat::Float32x3,
                &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            ))
            .with_attribute(AttributeStream::from_f32(
                AttributeSemantic::Normal,
                VertexFormat::Float32x3,
                &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            ))
            .with_attribute(AttributeStream::from_f32(
                AttributeSemantic::TexCoord,
                VertexFormat::Float32x2,
                &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            ))
            .with_indices(IndicesRecord::from_u16(&[0, 1, 2]))
    }

    #[test]
    fn test_decode_interleaves_attributes() {
        let builder = triangle().decode().unwrap();
        let vertices = builder.vertices();

        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, Vec3::X);
        assert_eq!(vertices[2].uv, Vec2::Y);
        assert_eq!(vertices[0].normal, Vec3::Z);
        assert_eq!(vertices[0].tangent, Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(builder.indices(), Some(vec![0, 1, 2]));
        assert_eq!(builder.topology(), PrimitiveTopology::TriangleList);
    }

    #[test]
    fn test_missing_optional_attributes_use_defaults() {
        let primitive = MeshPrimitive::new(1).with_attribute(AttributeStream::from_f32(
            AttributeSemantic::Position,
            VertexFormat::Float32x3,
            &[1.0, 2.0, 3.0],
        ));
        let builder = primitive
            .with_topology(PrimitiveTopology::PointList)
            .decode()
            .unwrap();
        assert_eq!(builder.vertices()[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(builder.vertices()[0].normal, Vec3::Z);
        assert_eq!(builder.indices(), None);
    }

    #[test]
    fn test_missing_position() {
        let mut primitive = triangle();
        primitive.attributes.remove(0);
        assert_eq!(primitive.decode().unwrap_err(), MeshDecodeError::MissingPosition);
    }

    #[test]
    fn test_duplicate_attribute() {
        let primitive = triangle().with_attribute(AttributeStream::from_f32(
            AttributeSemantic::Normal,
            VertexFormat::Float32x3,
            &[0.0; 9],
        ));
        assert_eq!(
            primitive.decode().unwrap_err(),
            MeshDecodeError::DuplicateAttribute(AttributeSemantic::Normal)
        );
    }

    #[test]
    fn test_wrong_attribute_format() {
        let mut primitive = triangle();
        primitive.attributes[2] = AttributeStream::from_f32(
            AttributeSemantic::TexCoord,
            VertexFormat::Float32x3,
            &[0.0; 9],
        );
        assert_eq!(
            primitive.decode().unwrap_err(),
            MeshDecodeError::UnsupportedAttributeFormat {
                semantic: AttributeSemantic::TexCoord,
                format: VertexFormat::Float32x3,
            }
        );
    }

    #[test]
    fn test_attribute_size_mismatch() {
        let mut primitive = triangle();
        primitive.vertex_count = 4;
        assert!(matches!(
            primitive.decode().unwrap_err(),
            MeshDecodeError::AttributeSizeMismatch {
                semantic: AttributeSemantic::Position,
                expected: 48,
                actual: 36,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_semantic_tag() {
        let mut primitive = triangle();
        primitive.attributes[1].semantic = 17;
        assert_eq!(
            primitive.decode().unwrap_err(),
            MeshDecodeError::UnknownSemantic(17)
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let primitive = triangle().with_indices(IndicesRecord::from_u32(&[0, 1, 3]));
        assert_eq!(
            primitive.decode().unwrap_err(),
            MeshDecodeError::IndexOutOfRange {
                position: 2,
                index: 3,
                vertex_count: 3,
            }
        );
    }

    #[test]
    fn test_decode_u32_indices() {
        let primitive = triangle().with_indices(IndicesRecord::from_u32(&[2, 1, 0]));
        let builder = primitive.decode().unwrap();
        assert_eq!(builder.indices(), Some(vec![2, 1, 0]));
        assert_eq!(builder.index_count(), 3);
    }

    #[test]
    fn test_index_size_mismatch() {
        let mut indices = IndicesRecord::from_u16(&[0, 1, 2]);
        indices.count = 6;
        let primitive = triangle().with_indices(indices);
        assert_eq!(
            primitive.decode().unwrap_err(),
            MeshDecodeError::IndexSizeMismatch {
                count: 6,
                expected: 12,
                actual: 6,
            }
        );
    }

    #[test]
    fn test_unknown_index_type() {
        let mut indices = IndicesRecord::from_u16(&[0, 1, 2]);
        indices.index_type = 5;
        let primitive = triangle().with_indices(indices);
        assert_eq!(
            primitive.decode().unwrap_err(),
            MeshDecodeError::UnknownIndexType(5)
        );
    }

    #[test]
    fn test_incomplete_triangle_list() {
        let primitive = triangle().with_indices(IndicesRecord::from_u16(&[0, 1]));
        assert_eq!(
            primitive.decode().unwrap_err(),
            MeshDecodeError::IncompletePrimitive {
                count: 2,
                topology: PrimitiveTopology::TriangleList,
            }
        );
    }

    #[test]
    fn test_strip_accepts_any_count() {
        let primitive = triangle()
            .with_indices(IndicesRecord::from_u16(&[0, 1, 2, 1]))
            .with_topology(PrimitiveTopology::TriangleStrip);
        assert!(primitive.decode().is_ok());
    }

    #[test]
    fn test_unknown_topology() {
        let mut primitive = triangle();
        primitive.topology = 9;
        assert_eq!(
            primitive.decode().unwrap_err(),
            MeshDecodeError::UnknownTopology(9)
        );
    }
}

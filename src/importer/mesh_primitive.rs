//! Serialized mesh primitive records.
//!
//! These mirror the wire layout of one drawable sub-mesh in an imported scene
//! asset. Enumerations are kept as raw tags so a record can carry values this
//! crate does not understand; [`MeshPrimitive::decode`] rejects them.

use crate::backend::types::{IndexFormat, PrimitiveTopology, VertexFormat};
use crate::error::MeshDecodeError;

/// Meaning of a vertex attribute stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeSemantic {
    Position,
    Normal,
    TexCoord,
    Tangent,
}

impl AttributeSemantic {
    pub fn tag(&self) -> u32 {
        match self {
            AttributeSemantic::Position => 0,
            AttributeSemantic::Normal => 1,
            AttributeSemantic::TexCoord => 2,
            AttributeSemantic::Tangent => 3,
        }
    }
}

impl TryFrom<u32> for AttributeSemantic {
    type Error = MeshDecodeError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(AttributeSemantic::Position),
            1 => Ok(AttributeSemantic::Normal),
            2 => Ok(AttributeSemantic::TexCoord),
            3 => Ok(AttributeSemantic::Tangent),
            other => Err(MeshDecodeError::UnknownSemantic(other)),
        }
    }
}

pub(crate) fn vertex_format_tag(format: VertexFormat) -> u32 {
    match format {
        VertexFormat::Float32 => 0,
        VertexFormat::Float32x2 => 1,
        VertexFormat::Float32x3 => 2,
        VertexFormat::Float32x4 => 3,
        VertexFormat::Uint32 => 4,
        VertexFormat::Sint32 => 5,
    }
}

pub(crate) fn vertex_format_from_tag(tag: u32) -> Result<VertexFormat, MeshDecodeError> {
    match tag {
        0 => Ok(VertexFormat::Float32),
        1 => Ok(VertexFormat::Float32x2),
        2 => Ok(VertexFormat::Float32x3),
        3 => Ok(VertexFormat::Float32x4),
        4 => Ok(VertexFormat::Uint32),
        5 => Ok(VertexFormat::Sint32),
        other => Err(MeshDecodeError::UnknownVertexFormat(other)),
    }
}

pub(crate) fn index_format_tag(format: IndexFormat) -> u32 {
    match format {
        IndexFormat::Uint16 => 0,
        IndexFormat::Uint32 => 1,
    }
}

pub(crate) fn index_format_from_tag(tag: u32) -> Result<IndexFormat, MeshDecodeError> {
    match tag {
        0 => Ok(IndexFormat::Uint16),
        1 => Ok(IndexFormat::Uint32),
        other => Err(MeshDecodeError::UnknownIndexType(other)),
    }
}

pub(crate) fn topology_tag(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::TriangleList => 0,
        PrimitiveTopology::TriangleStrip => 1,
        PrimitiveTopology::LineList => 2,
        PrimitiveTopology::LineStrip => 3,
        PrimitiveTopology::PointList => 4,
    }
}

pub(crate) fn topology_from_tag(tag: u32) -> Result<PrimitiveTopology, MeshDecodeError> {
    match tag {
        0 => Ok(PrimitiveTopology::TriangleList),
        1 => Ok(PrimitiveTopology::TriangleStrip),
        2 => Ok(PrimitiveTopology::LineList),
        3 => Ok(PrimitiveTopology::LineStrip),
        4 => Ok(PrimitiveTopology::PointList),
        other => Err(MeshDecodeError::UnknownTopology(other)),
    }
}

/// One tightly packed, little-endian attribute stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeStream {
    pub semantic: u32,
    pub format: u32,
    pub data: Vec<u8>,
}

impl AttributeStream {
    pub fn new(semantic: AttributeSemantic, format: VertexFormat, data: Vec<u8>) -> Self {
        Self {
            semantic: semantic.tag(),
            format: vertex_format_tag(format),
            data,
        }
    }

    /// Stream of f32 components
    pub fn from_f32(semantic: AttributeSemantic, format: VertexFormat, values: &[f32]) -> Self {
        Self::new(
            semantic,
            format,
            values.iter().flat_map(|value| value.to_le_bytes()).collect(),
        )
    }
}

/// Index blob of a primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicesRecord {
    pub index_type: u32,
    pub count: u32,
    pub data: Vec<u8>,
}

impl IndicesRecord {
    pub fn from_u16(indices: &[u16]) -> Self {
        Self {
            index_type: index_format_tag(IndexFormat::Uint16),
            count: indices.len() as u32,
            data: indices.iter().flat_map(|index| index.to_le_bytes()).collect(),
        }
    }

    pub fn from_u32(indices: &[u32]) -> Self {
        Self {
            index_type: index_format_tag(IndexFormat::Uint32),
            count: indices.len() as u32,
            data: indices.iter().flat_map(|index| index.to_le_bytes()).collect(),
        }
    }
}

/// A serialized drawable sub-mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshPrimitive {
    pub vertex_count: u32,
    pub attributes: Vec<AttributeStream>,
    pub indices: Option<IndicesRecord>,
    pub topology: u32,
    pub label: Option<String>,
}

impl MeshPrimitive {
    pub fn new(vertex_count: u32) -> Self {
        Self {
            vertex_count,
            attributes: Vec::new(),
            indices: None,
            topology: topology_tag(PrimitiveTopology::TriangleList),
            label: None,
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeStream) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_indices(mut self, indices: IndicesRecord) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology_tag(topology);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

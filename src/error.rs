//! Error types for geometry materialization and mesh import.

use thiserror::Error;

use crate::backend::types::{PrimitiveTopology, VertexFormat};
use crate::importer::AttributeSemantic;

/// Failure reported by an [`Allocator`](crate::backend::Allocator).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Out of device memory: requested {requested} bytes")]
    OutOfMemory { requested: u64 },
    #[error("Allocator rejected buffer request: {0}")]
    Rejected(String),
}

pub type AllocationResult<T> = Result<T, AllocationError>;

/// A serialized mesh primitive could not be turned into a vertex buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshDecodeError {
    #[error("Mesh primitive has no position attribute")]
    MissingPosition,
    #[error("Unknown vertex attribute semantic tag {0}")]
    UnknownSemantic(u32),
    #[error("Unknown vertex format tag {0}")]
    UnknownVertexFormat(u32),
    #[error("Attribute {semantic:?} cannot be stored as {format:?}")]
    UnsupportedAttributeFormat {
        semantic: AttributeSemantic,
        format: VertexFormat,
    },
    #[error("Attribute {0:?} appears more than once")]
    DuplicateAttribute(AttributeSemantic),
    #[error(
        "Attribute {semantic:?} holds {actual} bytes, expected {expected} for {vertex_count} vertices"
    )]
    AttributeSizeMismatch {
        semantic: AttributeSemantic,
        vertex_count: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Unknown index type tag {0}")]
    UnknownIndexType(u32),
    #[error("Index data holds {actual} bytes, expected {expected} for {count} indices")]
    IndexSizeMismatch {
        count: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: u32,
    },
    #[error("Unknown primitive topology tag {0}")]
    UnknownTopology(u32),
    #[error("{count} elements do not form whole {topology:?} primitives")]
    IncompletePrimitive {
        count: u32,
        topology: PrimitiveTopology,
    },
}

/// Umbrella error for geometry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error("Malformed mesh data: {0}")]
    MalformedMeshData(#[from] MeshDecodeError),
}

pub type GeometryResult<T> = Result<T, GeometryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AllocationError::OutOfMemory { requested: 1024 };
        assert_eq!(
            err.to_string(),
            "Out of device memory: requested 1024 bytes"
        );

        let err: GeometryError = MeshDecodeError::MissingPosition.into();
        assert_eq!(
            err.to_string(),
            "Malformed mesh data: Mesh primitive has no position attribute"
        );
    }

    #[test]
    fn test_allocation_error_is_transparent() {
        let err: GeometryError = AllocationError::Rejected("too large".into()).into();
        assert_eq!(
            err.to_string(),
            "Allocator rejected buffer request: too large"
        );
        assert!(matches!(err, GeometryError::Allocation(_)));
    }
}

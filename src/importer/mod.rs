//! Import of serialized mesh primitives.
//!
//! The binary scene format is parsed elsewhere; this module takes the parsed
//! [`MeshPrimitive`] record, validates it, and interleaves it into the
//! standard [`Vertex`](crate::backend::Vertex) layout.

mod decode;
mod mesh_primitive;

pub use mesh_primitive::{AttributeSemantic, AttributeStream, IndicesRecord, MeshPrimitive};

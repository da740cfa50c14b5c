//! Scene Geometry - renderable mesh geometry for a real-time 3D scene renderer
//!
//! Geometry comes in two forms that the render-pass encoder treats alike:
//! - **Cuboids**: boxes generated on demand from a size
//! - **Vertex buffers**: externally built data, e.g. imported mesh primitives
//!
//! # Features
//! - Vertex buffer materialization through a pluggable [`Allocator`], with
//!   uploads keyed on content version so [`CachingAllocator`] can reuse them
//! - Per-draw binding of vertices and object uniforms into a [`Command`]
//! - Validated import of serialized [`MeshPrimitive`] records
//! - Host-memory allocator for headless use, wgpu allocator behind `wgpu-backend`
//!
//! # Example
//!
//! ```ignore
//! let context = SceneContext::new(Arc::new(HostAllocator::new()));
//! let mut host_buffer = context.create_host_buffer();
//!
//! let cube = Geometry::make_cuboid(Vec3::splat(2.0));
//! let mut command = Command::new().with_label("cube");
//! cube.bind_to_command(&context, &mut host_buffer, &Mat4::IDENTITY, &mut command)?;
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod geometry;
pub mod importer;
pub mod render;
pub mod resources;

pub use backend::{Allocator, CachingAllocator, HostAllocator};
#[cfg(feature = "wgpu-backend")]
pub use backend::WgpuAllocator;
pub use config::RenderConfig;
pub use error::{AllocationError, GeometryError, GeometryResult, MeshDecodeError};
pub use geometry::{CuboidGeometry, Geometry, GeometryType, SharedGeometry, VertexBufferGeometry};
pub use importer::MeshPrimitive;
pub use render::{Command, SceneContext};
pub use resources::{HostBuffer, VertexBuffer, VertexBufferBuilder};

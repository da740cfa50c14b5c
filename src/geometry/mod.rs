//! Renderable mesh geometry.
//!
//! [`Geometry`] is a closed union over the two ways a mesh can come about:
//!
//! - [`CuboidGeometry`] - generated on demand from a size
//! - [`VertexBufferGeometry`] - wraps vertex data built elsewhere
//!
//! Both produce a [`VertexBuffer`] through an allocator and bind themselves
//! into a draw [`Command`] the same way.
//!
//! # Sharing
//!
//! Scene nodes hold geometry through [`SharedGeometry`]. Handles alias: a
//! `set_size` or `set_vertex_buffer` through one handle is seen by every
//! other holder. There is no internal synchronization beyond the lock guarding
//! each access, so do not mutate a geometry while another thread is binding it.

mod binding;
mod cuboid;
mod vertex_buffer;

use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::backend::Allocator;
use crate::error::GeometryResult;
use crate::importer::MeshPrimitive;
use crate::render::{Command, SceneContext};
use crate::resources::{HostBuffer, VertexBuffer};

pub use cuboid::{CUBOID_INDEX_COUNT, CUBOID_VERTEX_COUNT, CuboidGeometry};
pub use vertex_buffer::VertexBufferGeometry;

/// Which concrete geometry an instance is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Cuboid,
    VertexBuffer,
}

/// Mesh geometry; exactly one variant at all times.
#[derive(Debug)]
pub enum Geometry {
    Cuboid(CuboidGeometry),
    VertexBuffer(VertexBufferGeometry),
}

impl Geometry {
    /// Box of the given full extent, centered at the origin.
    pub fn make_cuboid(size: Vec3) -> SharedGeometry {
        log::debug!("Creating cuboid geometry of size {}", size);
        SharedGeometry::new(Geometry::Cuboid(CuboidGeometry::new(size)))
    }

    /// Geometry wrapping `vertex_buffer` as-is.
    pub fn make_vertex_buffer(vertex_buffer: VertexBuffer) -> SharedGeometry {
        log::debug!(
            "Creating vertex buffer geometry with {} vertices",
            vertex_buffer.vertex_count
        );
        SharedGeometry::new(Geometry::VertexBuffer(VertexBufferGeometry::new(
            vertex_buffer,
        )))
    }

    /// Decode an imported mesh primitive, upload it through `allocator`, and
    /// wrap the result.
    ///
    /// The record is fully validated before anything is allocated; malformed
    /// input yields [`GeometryError::MalformedMeshData`](crate::GeometryError::MalformedMeshData).
    pub fn make_from_mesh_primitive(
        primitive: &MeshPrimitive,
        allocator: &dyn Allocator,
    ) -> GeometryResult<SharedGeometry> {
        let builder = primitive.decode().inspect_err(|err| {
            log::warn!("Rejected mesh primitive {:?}: {}", primitive.label, err);
        })?;
        let vertex_buffer = builder.build(allocator)?;
        Ok(Self::make_vertex_buffer(vertex_buffer))
    }

    /// Variant tag. Never changes over the life of the instance.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Cuboid(_) => GeometryType::Cuboid,
            Geometry::VertexBuffer(_) => GeometryType::VertexBuffer,
        }
    }

    /// Content version, bumped by every mutation.
    ///
    /// Cuboid uploads carry it in their [`ContentKey`](crate::backend::ContentKey),
    /// so a memoizing allocator such as [`CachingAllocator`](crate::CachingAllocator)
    /// skips re-uploading an unchanged box. Geometry itself keeps no cache.
    pub fn version(&self) -> u64 {
        match self {
            Geometry::Cuboid(cuboid) => cuboid.version(),
            Geometry::VertexBuffer(wrapper) => wrapper.version(),
        }
    }

    /// Materialize the current state as a vertex buffer.
    ///
    /// Allocation failures are returned as-is; nothing is retried.
    pub fn vertex_buffer(&self, allocator: &dyn Allocator) -> GeometryResult<VertexBuffer> {
        match self {
            Geometry::Cuboid(cuboid) => cuboid.vertex_buffer(allocator),
            Geometry::VertexBuffer(wrapper) => wrapper.vertex_buffer(allocator),
        }
    }

    /// Bind this geometry into `command` for one draw.
    ///
    /// Uploads through the context's allocator, emplaces the object uniform
    /// for `transform` into `host_buffer`, and records both bindings. The
    /// geometry itself is left untouched.
    pub fn bind_to_command(
        &self,
        scene_context: &SceneContext,
        host_buffer: &mut HostBuffer,
        transform: &Mat4,
        command: &mut Command,
    ) -> GeometryResult<()> {
        let vertex_buffer = self.vertex_buffer(scene_context.allocator())?;
        binding::bind_vertex_buffer(vertex_buffer, host_buffer, transform, command);
        Ok(())
    }

    pub fn as_cuboid(&self) -> Option<&CuboidGeometry> {
        match self {
            Geometry::Cuboid(cuboid) => Some(cuboid),
            _ => None,
        }
    }

    pub fn as_cuboid_mut(&mut self) -> Option<&mut CuboidGeometry> {
        match self {
            Geometry::Cuboid(cuboid) => Some(cuboid),
            _ => None,
        }
    }

    pub fn as_vertex_buffer(&self) -> Option<&VertexBufferGeometry> {
        match self {
            Geometry::VertexBuffer(wrapper) => Some(wrapper),
            _ => None,
        }
    }

    pub fn as_vertex_buffer_mut(&mut self) -> Option<&mut VertexBufferGeometry> {
        match self {
            Geometry::VertexBuffer(wrapper) => Some(wrapper),
            _ => None,
        }
    }
}

impl From<CuboidGeometry> for Geometry {
    fn from(cuboid: CuboidGeometry) -> Self {
        Geometry::Cuboid(cuboid)
    }
}

impl From<VertexBufferGeometry> for Geometry {
    fn from(wrapper: VertexBufferGeometry) -> Self {
        Geometry::VertexBuffer(wrapper)
    }
}

/// Reference-counted handle to a [`Geometry`] shared between scene nodes.
///
/// Cloning shares the same geometry; see the module docs on aliasing.
#[derive(Debug, Clone)]
pub struct SharedGeometry(Arc<RwLock<Geometry>>);

impl SharedGeometry {
    pub fn new(geometry: impl Into<Geometry>) -> Self {
        Self(Arc::new(RwLock::new(geometry.into())))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Geometry> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Geometry> {
        self.0.write()
    }

    /// Whether two handles refer to the same geometry
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.read().geometry_type()
    }

    pub fn version(&self) -> u64 {
        self.read().version()
    }

    /// Resize a cuboid. Returns `false` if this is not a cuboid.
    pub fn set_size(&self, size: Vec3) -> bool {
        match self.write().as_cuboid_mut() {
            Some(cuboid) => {
                cuboid.set_size(size);
                true
            }
            None => false,
        }
    }

    /// Replace a wrapped vertex buffer. Returns `false` if this geometry does
    /// not wrap one.
    pub fn set_vertex_buffer(&self, vertex_buffer: VertexBuffer) -> bool {
        match self.write().as_vertex_buffer_mut() {
            Some(wrapper) => {
                wrapper.set_vertex_buffer(vertex_buffer);
                true
            }
            None => false,
        }
    }

    pub fn vertex_buffer(&self, allocator: &dyn Allocator) -> GeometryResult<VertexBuffer> {
        self.read().vertex_buffer(allocator)
    }

    pub fn bind_to_command(
        &self,
        scene_context: &SceneContext,
        host_buffer: &mut HostBuffer,
        transform: &Mat4,
        command: &mut Command,
    ) -> GeometryResult<()> {
        self.read()
            .bind_to_command(scene_context, host_buffer, transform, command)
    }
}

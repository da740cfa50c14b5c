//! Allocator abstraction
//!
//! Geometry never touches raw device memory; every buffer it produces goes
//! through an [`Allocator`].

use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use crate::backend::types::*;
use crate::error::AllocationResult;

/// Handle to a device buffer, unique within the allocator that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub(crate) u64);

impl BufferHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Storage that takes buffers back once their last owner lets go
pub trait BufferRelease: Send + Sync {
    fn release_buffer(&self, handle: BufferHandle);
}

/// A buffer living in device memory.
///
/// The allocator owns the memory; dropping the last `DeviceBuffer` for a
/// handle returns it to the allocator. Outliving the allocator is fine, the
/// release is then skipped.
#[derive(Debug)]
pub struct DeviceBuffer {
    handle: BufferHandle,
    size: u64,
    usage: BufferUsage,
    release: Weak<dyn BufferRelease>,
}

impl DeviceBuffer {
    pub(crate) fn new(
        handle: BufferHandle,
        size: u64,
        usage: BufferUsage,
        release: Weak<dyn BufferRelease>,
    ) -> Self {
        Self {
            handle,
            size,
            usage,
            release,
        }
    }

    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }
}

impl Drop for DeviceBuffer {
    fn drop(&mut self) {
        if let Some(release) = self.release.upgrade() {
            release.release_buffer(self.handle);
        }
    }
}

impl PartialEq for DeviceBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle && self.size == other.size && self.usage == other.usage
    }
}

impl Eq for DeviceBuffer {}

impl Hash for DeviceBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
        self.size.hash(state);
        self.usage.hash(state);
    }
}

/// GPU memory allocator consumed by geometry.
///
/// Methods take `&self` so one allocator can be shared by a scene context and
/// every geometry that uploads through it; implementations synchronize
/// internally.
///
/// Requests whose descriptor carries a [`ContentKey`] may be answered with a
/// buffer handed out earlier for the same key and usage. See
/// [`CachingAllocator`](crate::backend::CachingAllocator).
pub trait Allocator: Send + Sync {
    /// Get the allocator name
    fn name(&self) -> &'static str;

    /// Create a buffer holding `data`. `desc.size` must equal `data.len()`.
    fn create_buffer_init(
        &self,
        desc: &BufferDescriptor,
        data: &[u8],
    ) -> AllocationResult<Arc<DeviceBuffer>>;
}

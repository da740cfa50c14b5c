//! Memoizing allocator.
//!
//! Wraps another [`Allocator`] and reuses buffers for requests carrying a
//! [`ContentKey`]. Each source keeps at most one cached buffer per usage: a
//! request with a newer version replaces the entry, and the old buffer is
//! released as soon as nothing else holds it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::traits::{Allocator, DeviceBuffer};
use crate::backend::types::{BufferDescriptor, BufferUsage};
use crate::error::AllocationResult;

struct CachedBuffer {
    version: u64,
    buffer: Arc<DeviceBuffer>,
}

/// Allocator that memoizes uploads by content key
pub struct CachingAllocator<A: Allocator> {
    inner: A,
    cache: Mutex<HashMap<(u64, BufferUsage), CachedBuffer>>,
}

impl<A: Allocator> CachingAllocator<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped allocator
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Number of cached buffers
    pub fn cached_count(&self) -> usize {
        self.cache.lock().len()
    }

    /// Drop entries no one outside the cache still holds.
    ///
    /// Call once per frame, after the frame's commands are gone, to release
    /// buffers of geometry that was dropped or stopped being drawn.
    pub fn evict_unused(&self) -> usize {
        let mut cache = self.cache.lock();
        let before = cache.len();
        cache.retain(|_, cached| Arc::strong_count(&cached.buffer) > 1);
        let evicted = before - cache.len();
        if evicted > 0 {
            log::trace!("CachingAllocator: evicted {} unused buffers", evicted);
        }
        evicted
    }

    /// Drop every cached buffer
    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

impl<A: Allocator> Allocator for CachingAllocator<A> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn create_buffer_init(
        &self,
        desc: &BufferDescriptor,
        data: &[u8],
    ) -> AllocationResult<Arc<DeviceBuffer>> {
        let Some(key) = desc.content_key else {
            return self.inner.create_buffer_init(desc, data);
        };

        let slot = (key.source, desc.usage);
        if let Some(cached) = self.cache.lock().get(&slot) {
            if cached.version == key.version && cached.buffer.size() == desc.size {
                log::trace!("CachingAllocator: reusing {:?} v{}", desc.label, key.version);
                return Ok(cached.buffer.clone());
            }
        }

        let buffer = self.inner.create_buffer_init(desc, data)?;
        let stale = self.cache.lock().insert(
            slot,
            CachedBuffer {
                version: key.version,
                buffer: buffer.clone(),
            },
        );
        // Release outside the lock
        drop(stale);
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::ContentKey;
    use crate::backend::HostAllocator;

    fn keyed(size: u64, source: u64, version: u64) -> BufferDescriptor {
        BufferDescriptor::new(size, BufferUsage::VERTEX)
            .with_content_key(ContentKey { source, version })
    }

    #[test]
    fn test_same_key_reuses_buffer() {
        let allocator = CachingAllocator::new(HostAllocator::new());
        let a = allocator.create_buffer_init(&keyed(4, 1, 0), &[1; 4]).unwrap();
        let b = allocator.create_buffer_init(&keyed(4, 1, 0), &[1; 4]).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(allocator.inner().buffers_created(), 1);
    }

    #[test]
    fn test_new_version_replaces_entry() {
        let allocator = CachingAllocator::new(HostAllocator::new());
        let old = allocator.create_buffer_init(&keyed(4, 1, 0), &[1; 4]).unwrap();
        let new = allocator.create_buffer_init(&keyed(4, 1, 1), &[2; 4]).unwrap();

        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(allocator.cached_count(), 1);

        drop(old);
        assert_eq!(allocator.inner().allocation_count(), 1);
    }

    #[test]
    fn test_unkeyed_requests_pass_through() {
        let allocator = CachingAllocator::new(HostAllocator::new());
        let desc = BufferDescriptor::new(4, BufferUsage::VERTEX);
        let _a = allocator.create_buffer_init(&desc, &[0; 4]).unwrap();
        let _b = allocator.create_buffer_init(&desc, &[0; 4]).unwrap();

        assert_eq!(allocator.cached_count(), 0);
        assert_eq!(allocator.inner().buffers_created(), 2);
    }

    #[test]
    fn test_evict_unused() {
        let allocator = CachingAllocator::new(HostAllocator::new());
        let held = allocator.create_buffer_init(&keyed(4, 1, 0), &[0; 4]).unwrap();
        allocator.create_buffer_init(&keyed(4, 2, 0), &[0; 4]).unwrap();

        assert_eq!(allocator.evict_unused(), 1);
        assert_eq!(allocator.cached_count(), 1);
        assert_eq!(allocator.inner().allocation_count(), 1);

        drop(held);
        allocator.clear();
        assert_eq!(allocator.inner().allocation_count(), 0);
    }
}

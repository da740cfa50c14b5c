//! Host-memory allocator.
//!
//! Keeps every buffer in system memory. Useful for tests, tools, and headless
//! runs where no GPU is available, and it supports reading buffers back.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::backend::traits::{Allocator, BufferHandle, BufferRelease, DeviceBuffer};
use crate::backend::types::BufferDescriptor;
use crate::error::{AllocationError, AllocationResult};
use crate::resources::BufferView;

#[derive(Default)]
struct HostAllocatorState {
    buffers: HashMap<u64, Vec<u8>>,
    next_buffer_id: u64,
    allocated_bytes: u64,
    buffers_created: u64,
}

#[derive(Default)]
struct HostStore {
    state: Mutex<HostAllocatorState>,
}

impl BufferRelease for HostStore {
    fn release_buffer(&self, handle: BufferHandle) {
        let mut state = self.state.lock();
        if let Some(data) = state.buffers.remove(&handle.id()) {
            state.allocated_bytes -= data.len() as u64;
            log::trace!("HostAllocator: released buffer {}", handle.id());
        }
    }
}

/// Allocator backed by host memory, with an optional byte budget.
///
/// The budget applies to live bytes: dropped buffers give their bytes back.
#[derive(Default)]
pub struct HostAllocator {
    store: Arc<HostStore>,
    budget: Option<u64>,
}

impl HostAllocator {
    /// Create an allocator without a memory limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator that reports out-of-memory once `budget` bytes
    /// are live.
    pub fn with_budget(budget: u64) -> Self {
        Self {
            store: Arc::default(),
            budget: Some(budget),
        }
    }

    /// Number of buffers currently alive.
    pub fn allocation_count(&self) -> usize {
        self.store.state.lock().buffers.len()
    }

    /// Bytes held by live buffers.
    pub fn allocated_bytes(&self) -> u64 {
        self.store.state.lock().allocated_bytes
    }

    /// Number of buffers ever created, released ones included.
    pub fn buffers_created(&self) -> u64 {
        self.store.state.lock().buffers_created
    }

    /// Copy out the full contents of a buffer created by this allocator.
    pub fn read_buffer(&self, buffer: &DeviceBuffer) -> Option<Vec<u8>> {
        self.store
            .state
            .lock()
            .buffers
            .get(&buffer.handle().id())
            .cloned()
    }

    /// Copy out the bytes covered by a view.
    pub fn read_view(&self, view: &BufferView) -> Option<Vec<u8>> {
        let state = self.store.state.lock();
        let data = state.buffers.get(&view.buffer.handle().id())?;
        let start = usize::try_from(view.offset).ok()?;
        let end = start.checked_add(usize::try_from(view.length).ok()?)?;
        data.get(start..end).map(|bytes| bytes.to_vec())
    }
}

impl Allocator for HostAllocator {
    fn name(&self) -> &'static str {
        "Host Allocator"
    }

    fn create_buffer_init(
        &self,
        desc: &BufferDescriptor,
        data: &[u8],
    ) -> AllocationResult<Arc<DeviceBuffer>> {
        if desc.size != data.len() as u64 {
            return Err(AllocationError::Rejected(format!(
                "descriptor size {} does not match {} bytes of data",
                desc.size,
                data.len()
            )));
        }

        let mut state = self.store.state.lock();
        if let Some(budget) = self.budget {
            if state.allocated_bytes + desc.size > budget {
                log::trace!(
                    "HostAllocator: budget exhausted creating {:?} ({} of {} bytes used)",
                    desc.label,
                    state.allocated_bytes,
                    budget
                );
                return Err(AllocationError::OutOfMemory {
                    requested: desc.size,
                });
            }
        }

        state.next_buffer_id += 1;
        let id = state.next_buffer_id;
        state.buffers.insert(id, data.to_vec());
        state.allocated_bytes += desc.size;
        state.buffers_created += 1;

        log::trace!(
            "HostAllocator: creating buffer {:?} (size: {})",
            desc.label,
            desc.size
        );
        let store: Weak<HostStore> = Arc::downgrade(&self.store);
        let release: Weak<dyn BufferRelease> = store;
        Ok(Arc::new(DeviceBuffer::new(
            BufferHandle(id),
            desc.size,
            desc.usage,
            release,
        )))
    }
}

//! wgpu allocator implementation

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use wgpu::util::DeviceExt;

use crate::backend::traits::*;
use crate::backend::types::*;
use crate::error::{AllocationError, AllocationResult};

#[derive(Default)]
struct WgpuBufferStore {
    buffers: Mutex<HashMap<u64, Arc<wgpu::Buffer>>>,
}

impl BufferRelease for WgpuBufferStore {
    fn release_buffer(&self, handle: BufferHandle) {
        if let Some(buffer) = self.buffers.lock().remove(&handle.id()) {
            buffer.destroy();
        }
    }
}

/// Allocator creating buffers on a wgpu device
pub struct WgpuAllocator {
    device: Arc<wgpu::Device>,
    store: Arc<WgpuBufferStore>,
    next_buffer_id: Mutex<u64>,
}

impl WgpuAllocator {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            device,
            store: Arc::default(),
            next_buffer_id: Mutex::new(1),
        }
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    /// Look up the wgpu buffer behind a live device buffer
    pub fn buffer(&self, buffer: &DeviceBuffer) -> Option<Arc<wgpu::Buffer>> {
        self.store
            .buffers
            .lock()
            .get(&buffer.handle().id())
            .cloned()
    }

    fn convert_buffer_usage(usage: BufferUsage) -> wgpu::BufferUsages {
        let mut result = wgpu::BufferUsages::empty();
        if usage.contains(BufferUsage::COPY_DST) {
            result |= wgpu::BufferUsages::COPY_DST;
        }
        if usage.contains(BufferUsage::INDEX) {
            result |= wgpu::BufferUsages::INDEX;
        }
        if usage.contains(BufferUsage::VERTEX) {
            result |= wgpu::BufferUsages::VERTEX;
        }
        result
    }
}

impl Allocator for WgpuAllocator {
    fn name(&self) -> &'static str {
        "wgpu Allocator"
    }

    fn create_buffer_init(
        &self,
        desc: &BufferDescriptor,
        data: &[u8],
    ) -> AllocationResult<Arc<DeviceBuffer>> {
        let max_size = self.device.limits().max_buffer_size;
        if desc.size > max_size {
            return Err(AllocationError::Rejected(format!(
                "buffer of {} bytes exceeds device limit of {} bytes",
                desc.size, max_size
            )));
        }

        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: desc.label.as_deref(),
                contents: data,
                usage: Self::convert_buffer_usage(desc.usage),
            });
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            log::warn!("wgpu buffer {:?} allocation failed: {}", desc.label, error);
            return Err(AllocationError::OutOfMemory {
                requested: desc.size,
            });
        }

        let id = {
            let mut next = self.next_buffer_id.lock();
            let id = *next;
            *next += 1;
            id
        };
        self.store.buffers.lock().insert(id, Arc::new(buffer));

        let store: Weak<WgpuBufferStore> = Arc::downgrade(&self.store);
        let release: Weak<dyn BufferRelease> = store;
        Ok(Arc::new(DeviceBuffer::new(
            BufferHandle(id),
            data.len() as u64,
            desc.usage,
            release,
        )))
    }
}

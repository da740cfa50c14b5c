//! Transient per-frame host buffer.
//!
//! Per-draw uniform data (transforms, normal matrices) is emplaced into one
//! CPU-side scratch buffer each frame. The frame's staging step copies the
//! whole buffer to the device once; commands refer to their uniforms by the
//! returned [`HostAllocation`] offsets.
//!
//! # Example
//!
//! ```ignore
//! let mut host_buffer = HostBuffer::new();
//! let allocation = host_buffer.emplace_uniform(&ObjectUniform::from_model(transform));
//! command.bind_uniform(OBJECT_UNIFORM_SLOT, allocation);
//!
//! // After the frame has been submitted
//! host_buffer.reset();
//! ```

use bytemuck::Pod;

use crate::config::RenderConfig;

/// A sub-allocation from a host buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostAllocation {
    /// Byte offset into the host buffer.
    pub offset: u64,
    /// Size of the allocation in bytes.
    pub size: u64,
    /// Frame generation the allocation belongs to.
    pub generation: u64,
}

impl HostAllocation {
    /// Get the end offset (offset + size).
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

/// CPU-writable scratch memory scoped to a single frame.
///
/// `HostBuffer` is NOT thread-safe; the thread building the frame owns it.
#[derive(Debug)]
pub struct HostBuffer {
    data: Vec<u8>,
    alignment: u64,
    generation: u64,
}

impl Default for HostBuffer {
    fn default() -> Self {
        Self::with_config(&RenderConfig::default())
    }
}

impl HostBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host buffer using the uniform alignment and initial capacity
    /// from `config`.
    pub fn with_config(config: &RenderConfig) -> Self {
        debug_assert!(
            config.uniform_alignment.is_power_of_two(),
            "uniform alignment must be a power of two"
        );
        Self {
            data: Vec::with_capacity(config.host_buffer_capacity),
            alignment: config.uniform_alignment,
            generation: 0,
        }
    }

    /// Alignment applied to uniform emplacements.
    pub fn alignment(&self) -> u64 {
        self.alignment
    }

    /// Current frame generation; bumped by [`reset`](Self::reset).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bytes written this frame, including alignment padding.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Everything written this frame, ready for a single upload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Copy `bytes` in at the next offset aligned to `alignment`.
    pub fn emplace(&mut self, bytes: &[u8], alignment: u64) -> HostAllocation {
        let alignment = alignment.max(1);
        let offset = (self.data.len() as u64).next_multiple_of(alignment);
        self.data.resize(offset as usize, 0);
        self.data.extend_from_slice(bytes);
        HostAllocation {
            offset,
            size: bytes.len() as u64,
            generation: self.generation,
        }
    }

    /// Emplace a uniform block at the configured uniform alignment.
    pub fn emplace_uniform<T: Pod>(&mut self, value: &T) -> HostAllocation {
        self.emplace(bytemuck::bytes_of(value), self.alignment)
    }

    /// Bytes of an allocation made during the current frame.
    pub fn read(&self, allocation: &HostAllocation) -> Option<&[u8]> {
        if allocation.generation != self.generation {
            return None;
        }
        self.data
            .get(allocation.offset as usize..allocation.end() as usize)
    }

    /// Read back a uniform written during the current frame.
    pub fn read_uniform<T: Pod>(&self, allocation: &HostAllocation) -> Option<T> {
        let bytes = self.read(allocation)?;
        (bytes.len() == std::mem::size_of::<T>()).then(|| bytemuck::pod_read_unaligned(bytes))
    }

    /// Discard this frame's contents. Allocations handed out earlier become
    /// unreadable.
    pub fn reset(&mut self) {
        self.data.clear();
        self.generation += 1;
    }
}

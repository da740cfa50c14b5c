//! Rendering configuration shared by the scene context and per-frame buffers.

/// Configuration for per-frame geometry binding.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Alignment of uniform blocks emplaced into a host buffer, in bytes.
    /// Must be a power of two.
    pub uniform_alignment: u64,
    /// Initial capacity reserved by freshly created host buffers, in bytes.
    pub host_buffer_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            uniform_alignment: 256,
            host_buffer_capacity: 64 * 1024,
        }
    }
}

//! Resource management: vertex buffers and per-frame host memory

pub mod host_buffer;
pub mod vertex_buffer;

pub use host_buffer::{HostAllocation, HostBuffer};
pub use vertex_buffer::{BufferView, IndexBinding, VertexBuffer, VertexBufferBuilder};

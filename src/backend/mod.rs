//! Backend abstraction layer
//!
//! Provides the allocator interface geometry uploads through, the host-memory
//! allocator, a memoizing wrapper, and (behind `wgpu-backend`) an allocator
//! over a wgpu device.

pub mod caching;
pub mod host;
pub mod traits;
pub mod types;

#[cfg(feature = "wgpu-backend")]
pub mod wgpu_backend;

pub use caching::CachingAllocator;
pub use host::HostAllocator;
pub use traits::*;
pub use types::*;

#[cfg(feature = "wgpu-backend")]
pub use wgpu_backend::WgpuAllocator;

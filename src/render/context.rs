//! Scene-wide rendering context

use std::sync::Arc;

use crate::backend::Allocator;
use crate::config::RenderConfig;
use crate::resources::HostBuffer;

/// Shared state geometry needs while binding draws: the resource allocator
/// and the rendering configuration.
#[derive(Clone)]
pub struct SceneContext {
    allocator: Arc<dyn Allocator>,
    config: RenderConfig,
}

impl SceneContext {
    pub fn new(allocator: Arc<dyn Allocator>) -> Self {
        Self::with_config(allocator, RenderConfig::default())
    }

    pub fn with_config(allocator: Arc<dyn Allocator>, config: RenderConfig) -> Self {
        log::debug!(
            "Scene context created with {} (uniform alignment {})",
            allocator.name(),
            config.uniform_alignment
        );
        Self { allocator, config }
    }

    /// Allocator used for geometry uploads
    pub fn allocator(&self) -> &dyn Allocator {
        self.allocator.as_ref()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Create a host buffer matching this context's configuration
    pub fn create_host_buffer(&self) -> HostBuffer {
        HostBuffer::with_config(&self.config)
    }
}

impl std::fmt::Debug for SceneContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneContext")
            .field("allocator", &self.allocator.name())
            .field("config", &self.config)
            .finish()
    }
}

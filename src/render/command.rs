//! Draw command records

use crate::resources::{HostAllocation, VertexBuffer};

/// Shader uniform slot a command binds host data to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformSlot {
    pub name: &'static str,
    pub group: u32,
    pub binding: u32,
}

/// Per-object uniform block of the scene vertex shader:
/// `@group(1) @binding(0) var<uniform> object: ObjectUniforms;`
pub const OBJECT_UNIFORM_SLOT: UniformSlot = UniformSlot {
    name: "object",
    group: 1,
    binding: 0,
};

/// A uniform slot bound to a host buffer allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformBinding {
    pub slot: UniformSlot,
    pub allocation: HostAllocation,
}

/// One draw call's bindings, recorded before submission.
///
/// The command references vertex data through the shared buffers in
/// [`VertexBuffer`]; it never owns device memory.
#[derive(Debug, Clone, Default)]
pub struct Command {
    pub label: Option<String>,
    pub vertex_buffer: Option<VertexBuffer>,
    pub uniforms: Vec<UniformBinding>,
    pub instance_count: u32,
}

impl Command {
    pub fn new() -> Self {
        Self {
            instance_count: 1,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Bind vertices (and indices, if any). Replaces a previous binding.
    pub fn bind_vertices(&mut self, vertex_buffer: VertexBuffer) {
        self.vertex_buffer = Some(vertex_buffer);
    }

    /// Bind a uniform allocation to a slot. Rebinding a slot replaces it.
    pub fn bind_uniform(&mut self, slot: UniformSlot, allocation: HostAllocation) {
        match self.uniforms.iter_mut().find(|binding| binding.slot == slot) {
            Some(binding) => binding.allocation = allocation,
            None => self.uniforms.push(UniformBinding { slot, allocation }),
        }
    }

    pub fn uniform(&self, slot: UniformSlot) -> Option<HostAllocation> {
        self.uniforms
            .iter()
            .find(|binding| binding.slot == slot)
            .map(|binding| binding.allocation)
    }

    /// Number of indices (or vertices, for non-indexed buffers) the draw covers
    pub fn element_count(&self) -> u32 {
        self.vertex_buffer
            .as_ref()
            .map_or(0, |vertex_buffer| vertex_buffer.element_count())
    }

    /// Whether the command has vertices to draw
    pub fn is_drawable(&self) -> bool {
        self.instance_count > 0 && self.element_count() > 0
    }
}

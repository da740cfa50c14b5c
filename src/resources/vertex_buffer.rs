//! Vertex buffer values and the builder that uploads them

use std::sync::Arc;

use bytemuck::Pod;

use crate::backend::traits::{Allocator, DeviceBuffer};
use crate::backend::types::{
    BufferDescriptor, BufferUsage, ContentKey, IndexFormat, PrimitiveTopology,
};
use crate::error::AllocationResult;

/// A byte range of a device buffer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferView {
    pub buffer: Arc<DeviceBuffer>,
    pub offset: u64,
    pub length: u64,
}

impl BufferView {
    /// View covering a whole buffer
    pub fn whole(buffer: Arc<DeviceBuffer>) -> Self {
        let length = buffer.size();
        Self {
            buffer,
            offset: 0,
            length,
        }
    }
}

/// Index data bound alongside a vertex buffer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexBinding {
    pub view: BufferView,
    pub format: IndexFormat,
    pub count: u32,
}

/// GPU-consumable interleaved vertex data plus optional indices.
///
/// Cloning is cheap: buffers are shared by reference count, and the device
/// memory goes back to the allocator once the last clone is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VertexBuffer {
    /// Interleaved vertex attributes, `None` for an empty buffer.
    pub vertices: Option<BufferView>,
    pub vertex_count: u32,
    pub indices: Option<IndexBinding>,
    pub topology: PrimitiveTopology,
}

impl VertexBuffer {
    pub fn new(vertices: BufferView, vertex_count: u32) -> Self {
        Self {
            vertices: Some(vertices),
            vertex_count,
            indices: None,
            topology: PrimitiveTopology::TriangleList,
        }
    }

    pub fn with_indices(mut self, view: BufferView, format: IndexFormat, count: u32) -> Self {
        self.indices = Some(IndexBinding {
            view,
            format,
            count,
        });
        self
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.as_ref().map_or(0, |indices| indices.count)
    }

    pub fn index_format(&self) -> Option<IndexFormat> {
        self.indices.as_ref().map(|indices| indices.format)
    }

    /// Number of elements a draw of this buffer covers
    pub fn element_count(&self) -> u32 {
        match &self.indices {
            Some(indices) => indices.count,
            None => self.vertex_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }
}

#[derive(Debug, Clone, Default)]
enum IndexData {
    #[default]
    None,
    U16(Vec<u16>),
    U32(Vec<u32>),
}

/// Collects typed vertices and indices on the CPU and uploads them into a
/// [`VertexBuffer`].
///
/// # Example
///
/// ```ignore
/// let vertex_buffer = VertexBufferBuilder::new()
///     .with_vertices(vertices)
///     .with_indices_u16(indices)
///     .with_label("cuboid")
///     .build(&allocator)?;
/// ```
#[derive(Debug, Clone)]
pub struct VertexBufferBuilder<V: Pod> {
    vertices: Vec<V>,
    indices: IndexData,
    topology: PrimitiveTopology,
    label: Option<String>,
    content_key: Option<ContentKey>,
}

impl<V: Pod> Default for VertexBufferBuilder<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            indices: IndexData::None,
            topology: PrimitiveTopology::TriangleList,
            label: None,
            content_key: None,
        }
    }
}

impl<V: Pod> VertexBufferBuilder<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vertices(mut self, vertices: Vec<V>) -> Self {
        self.vertices = vertices;
        self
    }

    pub fn add_vertices(&mut self, vertices: impl IntoIterator<Item = V>) -> &mut Self {
        self.vertices.extend(vertices);
        self
    }

    pub fn with_indices_u16(mut self, indices: Vec<u16>) -> Self {
        self.indices = IndexData::U16(indices);
        self
    }

    pub fn with_indices_u32(mut self, indices: Vec<u32>) -> Self {
        self.indices = IndexData::U32(indices);
        self
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Tag both uploads with `key` so a memoizing allocator can reuse them.
    pub fn with_content_key(mut self, key: ContentKey) -> Self {
        self.content_key = Some(key);
        self
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        match &self.indices {
            IndexData::None => 0,
            IndexData::U16(indices) => indices.len(),
            IndexData::U32(indices) => indices.len(),
        }
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Index values widened to u32
    pub fn indices(&self) -> Option<Vec<u32>> {
        match &self.indices {
            IndexData::None => None,
            IndexData::U16(indices) => Some(indices.iter().map(|&i| u32::from(i)).collect()),
            IndexData::U32(indices) => Some(indices.clone()),
        }
    }

    /// Upload vertices and indices through `allocator`.
    ///
    /// Either both uploads succeed or neither buffer stays alive.
    pub fn build(&self, allocator: &dyn Allocator) -> AllocationResult<VertexBuffer> {
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&self.vertices);
        let vertex_desc = self.descriptor(vertex_bytes.len(), BufferUsage::VERTEX, "vertices");
        let vertex_buffer = allocator.create_buffer_init(&vertex_desc, vertex_bytes)?;

        let mut result = VertexBuffer::new(
            BufferView::whole(vertex_buffer),
            self.vertices.len() as u32,
        )
        .with_topology(self.topology);

        let index_upload = match &self.indices {
            IndexData::None => None,
            IndexData::U16(indices) => Some((
                bytemuck::cast_slice::<u16, u8>(indices),
                IndexFormat::Uint16,
                indices.len(),
            )),
            IndexData::U32(indices) => Some((
                bytemuck::cast_slice::<u32, u8>(indices),
                IndexFormat::Uint32,
                indices.len(),
            )),
        };

        if let Some((index_bytes, format, count)) = index_upload {
            let index_desc = self.descriptor(index_bytes.len(), BufferUsage::INDEX, "indices");
            // On failure `result` drops here and releases the vertex upload
            let index_buffer = allocator.create_buffer_init(&index_desc, index_bytes)?;
            result = result.with_indices(BufferView::whole(index_buffer), format, count as u32);
        }

        log::trace!(
            "Uploaded vertex buffer {:?}: {} vertices, {} indices via {}",
            self.label,
            result.vertex_count,
            result.index_count(),
            allocator.name()
        );
        Ok(result)
    }

    fn descriptor(&self, size: usize, usage: BufferUsage, suffix: &str) -> BufferDescriptor {
        let mut desc = BufferDescriptor::new(size as u64, usage | BufferUsage::COPY_DST);
        desc.content_key = self.content_key;
        match &self.label {
            Some(label) => desc.with_label(format!("{label} {suffix}")),
            None => desc,
        }
    }
}

/// GPU-bound resources referenced by scene nodes.
///
/// Resources live in a SlotMap owned by the SceneGraph. Freeing a resource
/// removes it from the map, so a second free of the same key finds nothing
/// and is a no-op. Several nodes may share one resource key.

use slotmap::new_key_type;

new_key_type! {
    /// Stable key for a GPU resource within a SceneGraph.
    pub struct ResourceKey;
}

/// Category of GPU-side allocation backing a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Vertex/index buffers
    Geometry,
    /// Pipeline state + uniform parameters
    Material,
    /// Sampled image
    Texture,
}

/// A GPU-bound resource handle.
///
/// The bridge never touches GPU memory itself; releasing a resource means
/// handing it back to the renderer (`Renderer::release_resource`).
#[derive(Debug, Clone, PartialEq)]
pub struct GpuResource {
    pub kind: ResourceKind,
    pub label: String,
    /// Approximate GPU memory size, informational only
    pub byte_size: u64,
}

impl GpuResource {
    pub fn new(kind: ResourceKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            byte_size: 0,
        }
    }

    /// Same resource with an explicit size
    pub fn with_size(mut self, byte_size: u64) -> Self {
        self.byte_size = byte_size;
        self
    }
}

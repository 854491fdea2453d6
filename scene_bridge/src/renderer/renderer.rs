/// Renderer trait - the 3D engine boundary

use crate::error::Result;
use crate::scene::{GpuResource, NodeKey, ResourceKey, SceneGraph};

// ============================================================================
// Statistics
// ============================================================================

/// Renderer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Successful draw calls since creation
    pub frames_rendered: u64,
    /// GPU resources handed back through `release_resource`
    pub resources_released: u64,
    /// `dispose()` has been called
    pub disposed: bool,
    /// The graphics context was forcibly lost
    pub context_lost: bool,
}

// ============================================================================
// Renderer traits
// ============================================================================

/// Main renderer trait
///
/// Implemented by backend renderers. The bridge drives it once per frame
/// and hands GPU resources back to it when scene nodes are disposed.
pub trait Renderer {
    /// Draw `scene` from `camera`'s point of view
    ///
    /// # Arguments
    ///
    /// * `scene` - Scene graph to draw
    /// * `camera` - Active camera node, `None` when no camera is registered
    fn render(&mut self, scene: &SceneGraph, camera: Option<NodeKey>) -> Result<()>;

    /// Release the GPU allocation backing `resource`
    ///
    /// Called exactly once per resource key.
    fn release_resource(&mut self, key: ResourceKey, resource: &GpuResource);

    /// Release the renderer instance itself
    fn dispose(&mut self);

    /// Capability query: `Some` only for GPU-backed renderers that own a
    /// render-list cache and a loseable graphics context
    fn context_loss(&mut self) -> Option<&mut dyn SupportsContextLoss> {
        None
    }

    /// Current statistics
    fn stats(&self) -> RendererStats;
}

/// Capability implemented by GPU-accelerated renderers only
pub trait SupportsContextLoss {
    /// Drop the cached per-frame render lists
    fn dispose_render_lists(&mut self);

    /// Force the underlying graphics context to be lost
    fn force_context_loss(&mut self);
}

// ============================================================================
// Renderer slot
// ============================================================================

/// Owner of the context's renderer instance.
///
/// Tracks whether the instance has been released so a forced dispose only
/// reaches the backend once.
pub struct RendererSlot {
    instance: Box<dyn Renderer>,
    released: bool,
}

impl RendererSlot {
    pub fn new(instance: Box<dyn Renderer>) -> Self {
        Self {
            instance,
            released: false,
        }
    }

    pub fn get(&self) -> &dyn Renderer {
        self.instance.as_ref()
    }

    pub fn get_mut(&mut self) -> &mut dyn Renderer {
        self.instance.as_mut()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Hand a freed resource back to the backend.
    ///
    /// After the instance has been released there is nothing left to return
    /// resources to, so the call is dropped.
    pub fn release_resource(&mut self, key: ResourceKey, resource: &GpuResource) {
        if !self.released {
            self.instance.release_resource(key, resource);
        }
    }

    /// Release the instance: `dispose()`, then for GPU-backed renderers the
    /// render-list cache and the graphics context.
    ///
    /// Returns false if it was already released.
    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.instance.dispose();
        if let Some(gpu) = self.instance.context_loss() {
            gpu.dispose_render_lists();
            gpu.force_context_loss();
        }
        self.released = true;
        true
    }
}

/// Headless renderer (no GPU required)
///
/// Walks the visible part of the scene on each frame and keeps counters.
/// Useful for servers, CI and for exercising canvases in tests. It does not
/// own a graphics context, so it does not expose `SupportsContextLoss`.

use glam::Mat4;
use crate::camera::Camera;
use crate::error::Result;
use crate::scene::{GpuResource, NodeFlags, NodeKey, ResourceKey, SceneGraph};
use crate::bridge_bail;
use super::renderer::{Renderer, RendererStats};

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    stats: RendererStats,
    /// Visible nodes reached during the last frame (root excluded)
    last_visible_nodes: usize,
    /// Projection * view of the camera used for the last frame
    last_view_projection: Option<Mat4>,
    released: Vec<(ResourceKey, GpuResource)>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_visible_nodes(&self) -> usize {
        self.last_visible_nodes
    }

    pub fn last_view_projection(&self) -> Option<Mat4> {
        self.last_view_projection
    }

    /// Resources released so far, in release order
    pub fn released_resources(&self) -> &[(ResourceKey, GpuResource)] {
        &self.released
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, scene: &SceneGraph, camera: Option<NodeKey>) -> Result<()> {
        if self.stats.disposed {
            bridge_bail!("scenebridge::HeadlessRenderer", BackendError,
                "render called on a disposed renderer");
        }
        let view_projection = match camera {
            Some(key) => match scene.node(key).and_then(|n| n.camera()) {
                Some(camera) => {
                    let view = Camera::view_matrix_from_world(&scene.world_matrix(key));
                    Some(camera.projection_matrix() * view)
                }
                None => bridge_bail!("scenebridge::HeadlessRenderer", InvalidNode,
                    "active camera {:?} is not a camera node", key),
            },
            None => None,
        };

        // Invisible nodes hide their whole subtree
        let mut visible = 0;
        let mut stack: Vec<NodeKey> = scene.children(scene.root()).to_vec();
        while let Some(key) = stack.pop() {
            let Some(node) = scene.node(key) else { continue };
            if !node.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            visible += 1;
            stack.extend_from_slice(node.children());
        }

        self.last_visible_nodes = visible;
        self.last_view_projection = view_projection;
        self.stats.frames_rendered += 1;
        Ok(())
    }

    fn release_resource(&mut self, key: ResourceKey, resource: &GpuResource) {
        self.stats.resources_released += 1;
        self.released.push((key, resource.clone()));
    }

    fn dispose(&mut self) {
        self.stats.disposed = true;
    }

    fn stats(&self) -> RendererStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "headless_renderer_tests.rs"]
mod tests;

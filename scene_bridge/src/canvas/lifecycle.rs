//! Lifecycle and disposal: releases everything reachable from the scene root.

use crate::context::RenderContext;
use crate::scene::NodeKey;
use crate::bridge_debug;

/// What a dispose pass released
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisposeReport {
    pub nodes_removed: usize,
    pub resources_freed: usize,
    pub cameras_deregistered: usize,
    /// The renderer instance was released by this pass
    pub renderer_released: bool,
}

impl DisposeReport {
    fn absorb(&mut self, other: DisposeReport) {
        self.nodes_removed += other.nodes_removed;
        self.resources_freed += other.resources_freed;
        self.cameras_deregistered += other.cameras_deregistered;
        self.renderer_released |= other.renderer_released;
    }

    /// Nothing was released
    pub fn is_noop(&self) -> bool {
        *self == DisposeReport::default()
    }
}

/// Release every resource reachable from the scene root and empty the root.
///
/// With `force`, the renderer instance is released too (once); GPU-backed
/// renderers additionally drop their render lists and lose their context.
/// The root is re-stamped with a marker referencing `context` in all cases.
/// Never fails; calling it again on an emptied scene changes nothing.
pub fn dispose(context: &mut RenderContext, force: bool) -> DisposeReport {
    let mut report = DisposeReport::default();

    let root = context.scene.root();
    for child in context.scene.children(root).to_vec() {
        report.absorb(release_subtree(context, child));
    }

    if force {
        report.renderer_released = context.renderer.release();
    }

    let marker = context.root_marker();
    context.scene.set_root_marker(marker);

    bridge_debug!("scenebridge::Lifecycle",
        "Disposed (force: {}): {} node(s), {} resource(s), {} camera(s)",
        force, report.nodes_removed, report.resources_freed, report.cameras_deregistered);
    report
}

/// Remove `node` with its subtree: deregister cameras found in it and free
/// the resources its nodes reference. Resources already freed (shared with a
/// node disposed earlier) are skipped.
pub(crate) fn release_subtree(context: &mut RenderContext, node: NodeKey) -> DisposeReport {
    let mut report = DisposeReport::default();
    for (key, removed) in context.scene.remove_subtree(node) {
        report.nodes_removed += 1;
        if removed.is_camera() && context.deregister_camera(key) {
            report.cameras_deregistered += 1;
        }
        for &resource_key in removed.resources() {
            if let Some(resource) = context.scene.free_resource(resource_key) {
                context.renderer.release_resource(resource_key, &resource);
                report.resources_freed += 1;
            }
        }
    }
    report
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

//! Render context: the per-canvas state bundle.
//!
//! One `RenderContext` exists per canvas. It owns the scene graph, the
//! renderer, the camera registry, the viewport sizes and the frame loop, and
//! is shared by every canvas subcomponent through a [`ContextHandle`].
//! Everything runs on the host's thread inside its update pass, so sharing
//! is `Rc<RefCell<_>>` without locks.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use glam::Vec3;
use winit::dpi::PhysicalSize;
use crate::camera::{Camera, CameraRegistry, DefaultCameraState, DEFAULT_FAR, DEFAULT_FOV_DEGREES, DEFAULT_NEAR};
use crate::error::Result;
use crate::renderer::{FrameLoop, FrameSignal, Renderer, RendererSlot};
use crate::scene::{NodeKey, RootMarker, SceneGraph};
use crate::{bridge_bail, bridge_debug};

/// Shared handle to a render context
pub type ContextHandle = Rc<RefCell<RenderContext>>;

/// Where the fallback camera is placed (it looks at the origin)
pub const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(3.0, 3.0, 3.0);

/// Sizing mode of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowSize {
    /// Follow the parent element
    #[default]
    Parent,
    /// Follow the whole window
    Window,
}

/// Drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sizes {
    pub width: f32,
    pub height: f32,
}

impl Sizes {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// width / height, or 1.0 while the height is zero
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Whether anything can be drawn (both dimensions non-zero)
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl From<PhysicalSize<u32>> for Sizes {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }
}

/// Per-canvas state shared by all subcomponents
pub struct RenderContext {
    pub scene: SceneGraph,
    pub renderer: RendererSlot,
    pub camera: CameraRegistry,
    pub sizes: Sizes,
    pub frame_loop: FrameLoop,
    self_ref: Weak<RefCell<RenderContext>>,
}

impl RenderContext {
    /// Create a context and stamp its scene root with a marker pointing back
    /// to it.
    pub fn new(renderer: Box<dyn Renderer>, sizes: Sizes) -> ContextHandle {
        Rc::new_cyclic(|weak: &Weak<RefCell<RenderContext>>| {
            let mut scene = SceneGraph::new();
            scene.set_root_marker(RootMarker::new(weak.clone()));
            RefCell::new(RenderContext {
                scene,
                renderer: RendererSlot::new(renderer),
                camera: CameraRegistry::new(),
                sizes,
                frame_loop: FrameLoop::new(),
                self_ref: weak.clone(),
            })
        })
    }

    /// Handle to this context (None only while it is being dropped)
    pub fn handle(&self) -> Option<ContextHandle> {
        self.self_ref.upgrade()
    }

    /// Fresh root marker referencing this context
    pub fn root_marker(&self) -> RootMarker {
        RootMarker::new(self.self_ref.clone())
    }

    // ===== CAMERAS =====

    pub fn active_camera(&self) -> Option<NodeKey> {
        self.camera.active_camera()
    }

    /// Register a camera node. If that retires the fallback camera, the
    /// fallback is detached from the graph and removed.
    pub fn register_camera(&mut self, camera: NodeKey, as_active: bool) {
        if let Some(evicted) = self.camera.register_camera(camera, as_active) {
            self.scene.remove_subtree(evicted);
            bridge_debug!("scenebridge::Context", "Default camera removed: {:?} took over", camera);
        }
    }

    /// Deregister a camera node. False when it was not registered.
    pub fn deregister_camera(&mut self, camera: NodeKey) -> bool {
        self.camera.deregister_camera(camera)
    }

    /// Install the fallback camera when the first mount left no camera active.
    ///
    /// Runs the decision once: later calls do nothing. Returns the created
    /// camera node.
    pub fn ensure_default_camera(&mut self) -> Option<NodeKey> {
        if self.camera.default_state() != DefaultCameraState::NoCamera {
            return None;
        }
        if self.camera.active_camera().is_some() {
            self.camera.mark_user_active();
            return None;
        }

        let camera = Camera::perspective(DEFAULT_FOV_DEGREES, self.sizes.aspect(), DEFAULT_NEAR, DEFAULT_FAR);
        let key = self.scene.create_camera("PerspectiveCamera", camera);
        if let Some(node) = self.scene.node_mut(key) {
            node.name = "DefaultCamera".to_string();
            node.transform.position = DEFAULT_CAMERA_POSITION;
            node.transform.look_at(Vec3::ZERO, Vec3::Y);
        }
        self.camera.install_default(key);
        bridge_debug!("scenebridge::Context", "No active camera after mount, default camera created");
        Some(key)
    }

    // ===== SIZES =====

    /// Record a new drawable size and update perspective camera aspects
    pub fn resize(&mut self, sizes: Sizes) {
        self.sizes = sizes;
        let aspect = sizes.aspect();
        for &key in self.camera.cameras() {
            if let Some(camera) = self.scene.node_mut(key).and_then(|n| n.camera_mut()) {
                camera.set_aspect(aspect);
            }
        }
    }

    // ===== FRAME LOOP =====

    /// Run one tick of the frame loop, reporting each signal to `sink` in
    /// order. Draw failures are returned as-is; nothing is signalled after
    /// a failed draw.
    pub fn advance_frame(
        &mut self,
        delta: Duration,
        sink: &mut dyn FnMut(&RenderContext, FrameSignal),
    ) -> Result<()> {
        if self.frame_loop.is_paused() {
            return Ok(());
        }
        if self.renderer.is_released() {
            bridge_bail!("scenebridge::Context", InvalidState,
                "frame requested after the renderer was released");
        }

        let tick = self.frame_loop.advance(delta);
        sink(&*self, FrameSignal::BeforeLoop(tick));
        sink(&*self, FrameSignal::Loop(tick));

        let camera = self.camera.active_camera();
        self.renderer.get_mut().render(&self.scene, camera)?;
        sink(&*self, FrameSignal::Render);

        if self.frame_loop.mark_ready() {
            sink(&*self, FrameSignal::Ready);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

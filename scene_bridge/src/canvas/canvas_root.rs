//! Canvas root: creates the render context, mounts the content and owns
//! its lifecycle (hot-reload remount, final unmount, deferred diagnostics).

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::time::{Duration, Instant};
use crate::camera::Camera;
use crate::context::{ContextHandle, RenderContext, Sizes, WindowSize};
use crate::error::Result;
use crate::renderer::Renderer;
use crate::scene::NodeKey;
use crate::{bridge_bail, bridge_debug, bridge_err, bridge_info};
use super::catalogue::{Catalogue, Extend};
use super::diagnostics::{CancellationToken, SizeCheck, SizeCheckStatus, SIZE_CHECK_DELAY};
use super::events::{CanvasEvent, EventDispatcher, PointerEvent, SubscriptionId};
use super::host::{ContentFn, MountedTree, NodeOpsFactory, RendererHost};
use super::injection::{AncestorChain, InjectionScope};
use super::lifecycle::{self, DisposeReport};
use super::node_ops::SceneNodeOps;

// ===== CONFIGURATION =====

/// Canvas options
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Forward the host's ancestor bindings into the canvas scope
    pub enable_provide_bridge: bool,
    /// Sizing mode (named by the zero-area warning)
    pub window_size: WindowSize,
    /// User camera, created detached and bound as the active camera at setup
    pub camera: Option<Camera>,
    /// React to development module updates
    pub hot_reload: bool,
    /// Delay before the drawable-area check fires
    pub size_check_delay: Duration,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            enable_provide_bridge: true,
            window_size: WindowSize::default(),
            camera: None,
            hot_reload: cfg!(debug_assertions),
            size_check_delay: SIZE_CHECK_DELAY,
        }
    }
}

/// Everything a canvas is created from
#[derive(Default)]
pub struct CanvasDesc {
    pub config: CanvasConfig,
    /// Host ancestors, farthest first
    pub ancestors: AncestorChain,
    /// Canvas content; `None` mounts an empty tree
    pub content: Option<ContentFn>,
    /// Node operations; defaults to [`SceneNodeOps`]
    pub node_ops: Option<NodeOpsFactory>,
    /// Element catalogue; defaults to [`Catalogue::with_builtins`]
    pub catalogue: Option<Catalogue>,
}

// ===== CAMERA BINDING =====

/// Keeps the user-supplied camera registered as the active camera
#[derive(Debug, Default)]
pub struct CameraBinding {
    current: Option<NodeKey>,
}

impl CameraBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<NodeKey> {
        self.current
    }

    /// Register `camera` as active, then drop the previously bound camera
    /// (detached and deregistered) when it differs.
    pub fn set(&mut self, context: &mut RenderContext, camera: Option<NodeKey>) -> Result<()> {
        if let Some(key) = camera {
            if !context.scene.node(key).is_some_and(|n| n.is_camera()) {
                bridge_bail!("scenebridge::Canvas", InvalidNode,
                    "camera binding: {:?} is not a camera node", key);
            }
            context.register_camera(key, true);
        }
        if let Some(previous) = self.current.filter(|&previous| Some(previous) != camera) {
            context.scene.detach(previous);
            context.deregister_camera(previous);
        }
        self.current = camera;
        Ok(())
    }
}

// ===== CANVAS ROOT =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasState {
    Mounted,
    Unmounted,
}

pub struct CanvasRoot {
    context: ContextHandle,
    config: CanvasConfig,
    host: RendererHost,
    mounted: MountedTree,
    events: EventDispatcher,
    camera_binding: CameraBinding,
    size_check: SizeCheck,
    token: CancellationToken,
    state: CanvasState,
}

impl CanvasRoot {
    pub fn create(desc: CanvasDesc, renderer: Box<dyn Renderer>, sizes: Sizes) -> Result<Self> {
        Self::create_at(desc, renderer, sizes, Instant::now())
    }

    /// Set up a canvas with the size check scheduled relative to `now`.
    ///
    /// Order: create the context, mount the content, bind the configured
    /// camera, install the default camera if none is active, schedule the
    /// size check.
    pub fn create_at(
        desc: CanvasDesc,
        renderer: Box<dyn Renderer>,
        sizes: Sizes,
        now: Instant,
    ) -> Result<Self> {
        let CanvasDesc { config, ancestors, content, node_ops, catalogue } = desc;

        let context = RenderContext::new(renderer, sizes);
        let catalogue = Rc::new(RefCell::new(catalogue.unwrap_or_else(Catalogue::with_builtins)));
        let node_ops = node_ops.unwrap_or_else(|| SceneNodeOps::factory(catalogue.clone()));
        let host = RendererHost {
            ancestors,
            bridge_enabled: config.enable_provide_bridge,
            content,
            node_ops,
            extend: Extend::new(catalogue),
        };

        let mounted = host.mount(&context, false)?;

        let mut camera_binding = CameraBinding::new();
        {
            let mut ctx = write(&context, "create")?;
            if let Some(camera) = config.camera.clone() {
                let tag = if camera.is_perspective() { "PerspectiveCamera" } else { "OrthographicCamera" };
                let key = ctx.scene.create_camera(tag, camera);
                camera_binding.set(&mut ctx, Some(key))?;
            }
            ctx.ensure_default_camera();
        }

        let token = CancellationToken::new();
        let size_check = SizeCheck::schedule(now, config.size_check_delay, token.clone());

        bridge_debug!("scenebridge::Canvas", "Canvas created ({}x{})", sizes.width, sizes.height);

        Ok(Self {
            context,
            config,
            host,
            mounted,
            events: EventDispatcher::new(),
            camera_binding,
            size_check,
            token,
            state: CanvasState::Mounted,
        })
    }

    // ===== ACCESSORS =====

    pub fn context(&self) -> &ContextHandle {
        &self.context
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn state(&self) -> CanvasState {
        self.state
    }

    /// Injection scope of the current mount
    pub fn scope(&self) -> &Rc<InjectionScope> {
        self.mounted.scope()
    }

    pub fn mounted(&self) -> &MountedTree {
        &self.mounted
    }

    pub fn mounted_roots(&self) -> &[NodeKey] {
        self.mounted.roots()
    }

    pub fn bound_camera(&self) -> Option<NodeKey> {
        self.camera_binding.current()
    }

    // ===== EVENTS =====

    pub fn on_event<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: for<'a> FnMut(&CanvasEvent<'a>) + 'static,
    {
        self.events.subscribe(observer)
    }

    pub fn off_event(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Relay a pointer event that hit nothing
    pub fn pointer_missed(&mut self, event: PointerEvent) -> Result<()> {
        let context = read(&self.context, "pointer_missed")?;
        self.events.dispatch(&CanvasEvent::PointerMissed { context: &*context, event });
        Ok(())
    }

    /// Run one frame and relay its signals to observers
    pub fn render_frame(&mut self, delta: Duration) -> Result<()> {
        let events = &mut self.events;
        let mut context = write(&self.context, "render_frame")?;
        context.advance_frame(delta, &mut move |ctx, signal| events.relay(ctx, signal))
    }

    /// Stop the frame loop; `render_frame` does nothing until `resume_loop`
    pub fn pause_loop(&mut self) -> Result<()> {
        write(&self.context, "pause_loop")?.frame_loop.pause();
        Ok(())
    }

    pub fn resume_loop(&mut self) -> Result<()> {
        write(&self.context, "resume_loop")?.frame_loop.resume();
        Ok(())
    }

    // ===== CAMERA & SIZES =====

    /// Rebind the user camera
    pub fn set_camera(&mut self, camera: Option<NodeKey>) -> Result<()> {
        let mut context = write(&self.context, "set_camera")?;
        self.camera_binding.set(&mut context, camera)
    }

    pub fn resize(&mut self, sizes: Sizes) -> Result<()> {
        write(&self.context, "resize")?.resize(sizes);
        Ok(())
    }

    // ===== LIFECYCLE =====

    /// Release everything under the scene root (see [`lifecycle::dispose`])
    pub fn dispose(&mut self, force: bool) -> Result<DisposeReport> {
        let mut context = write(&self.context, "dispose")?;
        Ok(lifecycle::dispose(&mut context, force))
    }

    /// Development module update: dispose without releasing the renderer,
    /// then mount the content again into the same context.
    ///
    /// Returns whether a remount ran. If the new content fails to mount,
    /// the canvas stays mounted with an empty tree and the next update
    /// tries again.
    pub fn handle_module_update(&mut self) -> Result<bool> {
        if !self.config.hot_reload || self.state != CanvasState::Mounted {
            return Ok(false);
        }

        self.dispose(false)?;
        self.mounted.clear();
        self.mounted = self.host.mount(&self.context, false)?;

        bridge_info!("scenebridge::Canvas", "Hot reload remount complete");
        Ok(true)
    }

    /// Final teardown: release everything including the renderer, leave an
    /// empty tree mounted and cancel the pending size check. A second call
    /// does nothing.
    pub fn unmount(&mut self) -> Result<()> {
        if self.state == CanvasState::Unmounted {
            return Ok(());
        }

        self.token.cancel();
        self.dispose(true)?;
        self.mounted.clear();
        self.state = CanvasState::Unmounted;
        self.mounted = self.host.mount(&self.context, true)?;

        bridge_debug!("scenebridge::Canvas", "Canvas unmounted");
        Ok(())
    }

    /// Host scheduler hook: fire the size check when due
    pub fn poll(&mut self, now: Instant) -> Result<SizeCheckStatus> {
        let sizes = read(&self.context, "poll")?.sizes;
        Ok(self.size_check.poll(now, &sizes))
    }
}

// Every canvas operation borrows the context through these; an observer or
// node-ops call re-entering the canvas gets InvalidState instead of a panic.
fn read<'a>(context: &'a ContextHandle, operation: &str) -> Result<Ref<'a, RenderContext>> {
    context.try_borrow().map_err(|_| bridge_err!(
        "scenebridge::Canvas", InvalidState, "{}: render context is mutably borrowed", operation))
}

fn write<'a>(context: &'a ContextHandle, operation: &str) -> Result<RefMut<'a, RenderContext>> {
    context.try_borrow_mut().map_err(|_| bridge_err!(
        "scenebridge::Canvas", InvalidState, "{}: render context is already borrowed", operation))
}

impl Drop for CanvasRoot {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
#[path = "canvas_root_tests.rs"]
mod tests;

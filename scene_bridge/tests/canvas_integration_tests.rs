//! Integration tests for CanvasRoot
//!
//! Drives a canvas end to end through the public API: mount, frame loop,
//! hot-reload cycles and the final unmount. No GPU required.
//!
//! Run with: cargo test --test canvas_integration_tests

use scene_bridge::glam::Vec3;
use scene_bridge::scenebridge::{ContextHandle, Error, Result, Sizes};
use scene_bridge::scenebridge::camera::DefaultCameraState;
use scene_bridge::scenebridge::canvas::{
    AncestorChain, CanvasConfig, CanvasDesc, CanvasEvent, CanvasRoot, CanvasState, ContentFn,
    InjectionKey, InjectionScope, NodeDescriptor, ScopeFrame,
};
use scene_bridge::scenebridge::render::{
    HeadlessRenderer, Renderer, RendererStats, SupportsContextLoss,
};
use scene_bridge::scenebridge::scene::{GpuResource, NodeKey, NodeKind, ResourceKey, SceneGraph};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// GPU-style renderer sharing its call log with the test
struct RecordingGpuRenderer {
    log: Rc<RefCell<Vec<String>>>,
    stats: RendererStats,
}

impl Renderer for RecordingGpuRenderer {
    fn render(&mut self, _scene: &SceneGraph, camera: Option<NodeKey>) -> Result<()> {
        self.stats.frames_rendered += 1;
        self.log.borrow_mut().push(format!("render camera={}", camera.is_some()));
        Ok(())
    }

    fn release_resource(&mut self, _key: ResourceKey, resource: &GpuResource) {
        self.stats.resources_released += 1;
        self.log.borrow_mut().push(format!("release {}", resource.label));
    }

    fn dispose(&mut self) {
        self.stats.disposed = true;
        self.log.borrow_mut().push("dispose".to_string());
    }

    fn context_loss(&mut self) -> Option<&mut dyn SupportsContextLoss> {
        Some(self)
    }

    fn stats(&self) -> RendererStats {
        self.stats
    }
}

impl SupportsContextLoss for RecordingGpuRenderer {
    fn dispose_render_lists(&mut self) {
        self.log.borrow_mut().push("dispose_render_lists".to_string());
    }

    fn force_context_loss(&mut self) {
        self.stats.context_lost = true;
        self.log.borrow_mut().push("force_context_loss".to_string());
    }
}

fn app_content() -> ContentFn {
    Rc::new(|scope: &InjectionScope| {
        let theme = scope
            .inject::<String>(&InjectionKey::from("theme"))
            .map(|t| t.as_str().to_string())
            .unwrap_or_default();
        vec![
            NodeDescriptor::new("Group")
                .prop("name", theme.as_str())
                .child(NodeDescriptor::new("Mesh").prop("position", Vec3::new(0.0, 1.0, 0.0)))
                .child(
                    NodeDescriptor::new("PerspectiveCamera")
                        .prop("position", Vec3::new(0.0, 0.0, 5.0))
                        .prop("look-at", Vec3::ZERO),
                ),
            NodeDescriptor::new("DirectionalLight").prop("cast-shadow", true),
        ]
    })
}

fn ancestors() -> AncestorChain {
    let mut app = ScopeFrame::new();
    app.provide("theme", "light".to_string());
    let mut panel = ScopeFrame::new();
    panel.provide("theme", "dark".to_string());
    AncestorChain::from_root_first(vec![app, panel])
}

fn desc() -> CanvasDesc {
    CanvasDesc {
        config: CanvasConfig { hot_reload: true, ..CanvasConfig::default() },
        ancestors: ancestors(),
        content: Some(app_content()),
        ..CanvasDesc::default()
    }
}

fn cameras(context: &ContextHandle) -> Vec<NodeKey> {
    context.borrow().camera.cameras().to_vec()
}

// ============================================================================
// MOUNT
// ============================================================================

#[test]
fn test_mount_uses_nearest_ancestor_binding() {
    let canvas = CanvasRoot::create(desc(), Box::new(HeadlessRenderer::new()), Sizes::new(800.0, 600.0)).unwrap();

    let ctx = canvas.context().borrow();
    let group = canvas.mounted_roots()[0];
    assert_eq!(ctx.scene.node(group).unwrap().name, "dark");
    assert_eq!(ctx.camera.default_state(), DefaultCameraState::UserActive);
}

#[test]
fn test_frame_loop_event_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let renderer = RecordingGpuRenderer { log: log.clone(), stats: RendererStats::default() };
    let mut canvas = CanvasRoot::create(desc(), Box::new(renderer), Sizes::new(800.0, 600.0)).unwrap();
    let sink = log.clone();
    canvas.on_event(move |event| {
        let entry = match event {
            CanvasEvent::Loop(state) => format!("loop frame={}", state.frame),
            other => other.name().to_string(),
        };
        sink.borrow_mut().push(entry);
    });

    canvas.render_frame(Duration::from_millis(16)).unwrap();
    canvas.render_frame(Duration::from_millis(16)).unwrap();

    assert_eq!(*log.borrow(), vec![
        "beforeLoop", "loop frame=1", "render camera=true", "render", "ready",
        "beforeLoop", "loop frame=2", "render camera=true", "render",
    ]);
}

// ============================================================================
// HOT RELOAD
// ============================================================================

#[test]
fn test_two_hot_reload_cycles_do_not_duplicate_cameras() {
    let mut canvas = CanvasRoot::create(desc(), Box::new(HeadlessRenderer::new()), Sizes::new(800.0, 600.0)).unwrap();
    let context = canvas.context().clone();
    assert_eq!(cameras(&context).len(), 1);
    let nodes = context.borrow().scene.node_count();

    for _ in 0..2 {
        assert!(canvas.handle_module_update().unwrap());
        assert_eq!(cameras(&context).len(), 1);
        assert_eq!(context.borrow().scene.node_count(), nodes);
    }

    let ctx = context.borrow();
    let active = ctx.active_camera().unwrap();
    assert!(ctx.scene.is_attached(active));
    assert_eq!(ctx.camera.default_state(), DefaultCameraState::UserActive);
}

#[test]
fn test_hot_reload_then_render() {
    let mut canvas = CanvasRoot::create(desc(), Box::new(HeadlessRenderer::new()), Sizes::new(800.0, 600.0)).unwrap();
    let frames = Rc::new(RefCell::new(0));
    let sink = frames.clone();
    canvas.on_event(move |event| {
        if let CanvasEvent::Render(_) = event {
            *sink.borrow_mut() += 1;
        }
    });

    canvas.render_frame(Duration::from_millis(16)).unwrap();
    canvas.handle_module_update().unwrap();
    canvas.render_frame(Duration::from_millis(16)).unwrap();

    assert_eq!(*frames.borrow(), 2);
    assert_eq!(canvas.context().borrow().renderer.get().stats().frames_rendered, 2);
}

// ============================================================================
// UNMOUNT
// ============================================================================

#[test]
fn test_unmount_releases_gpu_context_and_keeps_empty_tree() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let renderer = RecordingGpuRenderer { log: log.clone(), stats: RendererStats::default() };
    let mut canvas = CanvasRoot::create(desc(), Box::new(renderer), Sizes::new(800.0, 600.0)).unwrap();

    canvas.unmount().unwrap();
    canvas.unmount().unwrap();

    assert_eq!(*log.borrow(), vec![
        "release BufferGeometry",
        "release MeshBasicMaterial",
        "dispose",
        "dispose_render_lists",
        "force_context_loss",
    ]);
    assert_eq!(canvas.state(), CanvasState::Unmounted);
    assert!(canvas.mounted().is_empty());
    let scope_context = canvas.scope().context().unwrap();
    assert!(Rc::ptr_eq(&scope_context, canvas.context()));
    let ctx = canvas.context().borrow();
    assert!(ctx.scene.children(ctx.scene.root()).is_empty());
    assert!(ctx.renderer.get().stats().context_lost);
}

#[test]
fn test_unmount_then_render_is_rejected() {
    let mut canvas = CanvasRoot::create(desc(), Box::new(HeadlessRenderer::new()), Sizes::new(800.0, 600.0)).unwrap();
    canvas.unmount().unwrap();

    let result = canvas.render_frame(Duration::from_millis(16));

    assert!(matches!(result, Err(Error::InvalidState(_))));
}

// ============================================================================
// EXTEND
// ============================================================================

#[test]
fn test_content_registers_custom_element_through_extend() {
    let content: ContentFn = Rc::new(|scope: &InjectionScope| {
        let extend = scope.extend().unwrap();
        extend.register("Grid", |graph| Ok(graph.create_node("Grid", NodeKind::Group)));
        vec![NodeDescriptor::new("Grid")]
    });
    let desc = CanvasDesc {
        config: CanvasConfig { hot_reload: true, ..CanvasConfig::default() },
        content: Some(content),
        ..CanvasDesc::default()
    };

    let mut canvas = CanvasRoot::create(desc, Box::new(HeadlessRenderer::new()), Sizes::new(800.0, 600.0)).unwrap();
    assert!(canvas.handle_module_update().unwrap());

    let ctx = canvas.context().borrow();
    assert_eq!(ctx.scene.node(canvas.mounted_roots()[0]).unwrap().tag, "Grid");
    // No camera in the content: the fallback camera is active
    assert!(matches!(ctx.camera.default_state(), DefaultCameraState::DefaultActive(_)));
}

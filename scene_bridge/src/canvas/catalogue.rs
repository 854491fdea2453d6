//! Element catalogue: maps declarative tags to scene node constructors.

use std::cell::RefCell;
use std::rc::Rc;
use glam::Vec3;
use rustc_hash::FxHashMap;
use crate::camera::{Camera, DEFAULT_FAR, DEFAULT_NEAR};
use crate::error::Result;
use crate::scene::{GpuResource, Light, LightKind, NodeKey, NodeKind, ResourceKind, SceneGraph};
use crate::{bridge_bail, bridge_debug};

/// Builds a detached node (plus any resources it owns) in the graph
pub type Constructor = Rc<dyn Fn(&mut SceneGraph) -> Result<NodeKey>>;

/// Registry of element constructors keyed by tag
#[derive(Clone, Default)]
pub struct Catalogue {
    constructors: FxHashMap<String, Constructor>,
}

impl Catalogue {
    /// Empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalogue pre-filled with the built-in element types
    pub fn with_builtins() -> Self {
        let mut catalogue = Self::new();
        catalogue.register("Group", |graph| Ok(graph.create_node("Group", NodeKind::Group)));
        catalogue.register("Mesh", |graph| {
            let node = graph.create_node("Mesh", NodeKind::Mesh);
            let geometry = graph.create_resource(GpuResource::new(ResourceKind::Geometry, "BufferGeometry"));
            let material = graph.create_resource(GpuResource::new(ResourceKind::Material, "MeshBasicMaterial"));
            graph.attach_resource(node, geometry)?;
            graph.attach_resource(node, material)?;
            Ok(node)
        });
        catalogue.register("PerspectiveCamera", |graph| {
            Ok(graph.create_camera("PerspectiveCamera", Camera::default()))
        });
        catalogue.register("OrthographicCamera", |graph| {
            let camera = Camera::orthographic(-1.0, 1.0, -1.0, 1.0, DEFAULT_NEAR, DEFAULT_FAR);
            Ok(graph.create_camera("OrthographicCamera", camera))
        });
        catalogue.register("AmbientLight", |graph| {
            let light = Light { kind: LightKind::Ambient, color: Vec3::ONE, intensity: 1.0 };
            Ok(graph.create_node("AmbientLight", NodeKind::Light(light)))
        });
        catalogue.register("DirectionalLight", |graph| {
            let light = Light { kind: LightKind::Directional, color: Vec3::ONE, intensity: 1.0 };
            Ok(graph.create_node("DirectionalLight", NodeKind::Light(light)))
        });
        catalogue
    }

    /// Register (or replace) the constructor for `tag`
    pub fn register<F>(&mut self, tag: impl Into<String>, constructor: F)
    where
        F: Fn(&mut SceneGraph) -> Result<NodeKey> + 'static,
    {
        self.constructors.insert(tag.into(), Rc::new(constructor));
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Constructor registered for `tag`
    pub fn constructor(&self, tag: &str) -> Result<Constructor> {
        match self.constructors.get(tag) {
            Some(constructor) => Ok(constructor.clone()),
            None => bridge_bail!("scenebridge::Catalogue", UnknownElement,
                "no constructor registered for <{}>", tag),
        }
    }
}

/// Type-registration function injected into the canvas scope.
///
/// Content can add its own element types before they are mounted:
///
/// ```ignore
/// let extend = scope.extend().unwrap();
/// extend.register("Grid", |graph| Ok(graph.create_node("Grid", NodeKind::Group)));
/// ```
#[derive(Clone)]
pub struct Extend {
    catalogue: Rc<RefCell<Catalogue>>,
}

impl Extend {
    pub fn new(catalogue: Rc<RefCell<Catalogue>>) -> Self {
        Self { catalogue }
    }

    pub fn register<F>(&self, tag: impl Into<String>, constructor: F)
    where
        F: Fn(&mut SceneGraph) -> Result<NodeKey> + 'static,
    {
        let tag = tag.into();
        bridge_debug!("scenebridge::Catalogue", "Registering element <{}>", tag);
        self.catalogue.borrow_mut().register(tag, constructor);
    }

    pub fn catalogue(&self) -> &Rc<RefCell<Catalogue>> {
        &self.catalogue
    }
}

#[cfg(test)]
#[path = "catalogue_tests.rs"]
mod tests;

/// Retained scene graph: the imperative side of the bridge.
///
/// Nodes live in a SlotMap arena and link to each other by key. The graph is
/// created with a single root node; everything the declarative tree mounts
/// ends up somewhere below it. Nodes that are created but never attached
/// (for example the fallback camera) stay in the arena with no parent.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use bitflags::bitflags;
use glam::{Mat4, Quat, Vec3};
use slotmap::{new_key_type, SlotMap};
use crate::camera::Camera;
use crate::context::{ContextHandle, RenderContext};
use crate::error::Result;
use crate::bridge_err;
use super::resource::{GpuResource, ResourceKey};

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a node within a SceneGraph.
    ///
    /// Keys remain valid until their own node is removed from the arena.
    pub struct NodeKey;
}

bitflags! {
    /// Per-node render flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        const VISIBLE = 1 << 0;
        const CAST_SHADOW = 1 << 1;
        const RECEIVE_SHADOW = 1 << 2;
        const FRUSTUM_CULLED = 1 << 3;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        NodeFlags::VISIBLE | NodeFlags::FRUSTUM_CULLED
    }
}

// ===== TRANSFORM =====

/// Local transform relative to the parent node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Local matrix (translation * rotation * scale)
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Rotate so that the local -Z axis points at `target` (camera convention).
    ///
    /// Does nothing when `target` coincides with the current position.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        if (target - self.position).length_squared() <= f32::EPSILON {
            return;
        }
        let view = Mat4::look_at_rh(self.position, target, up);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
    }
}

// ===== NODE KINDS =====

/// Light source category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Directional,
}

/// Light parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
}

/// What a node is, beyond its place in the hierarchy
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The scene root
    Root,
    /// Pure transform node
    Group,
    /// Drawable; its geometry/material live in the node's resource list
    Mesh,
    Camera(Camera),
    Light(Light),
}

/// A node of the retained scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Element tag the node was created from ("Mesh", "PerspectiveCamera", ...)
    pub tag: String,
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub flags: NodeFlags,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    resources: Vec<ResourceKey>,
}

impl SceneNode {
    fn new(tag: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            tag: tag.into(),
            name: String::new(),
            kind,
            transform: Transform::default(),
            flags: NodeFlags::default(),
            parent: None,
            children: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// GPU resources this node references (may be shared with other nodes)
    pub fn resources(&self) -> &[ResourceKey] {
        &self.resources
    }

    pub fn is_camera(&self) -> bool {
        matches!(self.kind, NodeKind::Camera(_))
    }

    pub fn camera(&self) -> Option<&Camera> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        match &mut self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }
}

// ===== ROOT MARKER =====

/// Back-reference from the scene root to the context that owns it.
///
/// Lets code holding only the scene (node-ops, devtools) find the owning
/// context, including after the tree has been torn down.
#[derive(Clone)]
pub struct RootMarker {
    context: Weak<RefCell<RenderContext>>,
}

impl RootMarker {
    pub fn new(context: Weak<RefCell<RenderContext>>) -> Self {
        Self { context }
    }

    /// Owning context, if it is still alive
    pub fn context(&self) -> Option<ContextHandle> {
        self.context.upgrade()
    }

    /// Whether this marker points at `handle`
    pub fn refers_to(&self, handle: &ContextHandle) -> bool {
        std::ptr::eq(self.context.as_ptr(), Rc::as_ptr(handle))
    }
}

impl PartialEq for RootMarker {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.context, &other.context)
    }
}

impl fmt::Debug for RootMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootMarker")
            .field("context_alive", &(self.context.strong_count() > 0))
            .finish()
    }
}

// ===== SCENE GRAPH =====

/// Arena-backed scene graph with a fixed root node.
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    resources: SlotMap<ResourceKey, GpuResource>,
    root: NodeKey,
    root_marker: Option<RootMarker>,
}

impl SceneGraph {
    /// Create a graph holding only the root node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new("Scene", NodeKind::Root));
        Self {
            nodes,
            resources: SlotMap::with_key(),
            root,
            root_marker: None,
        }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn root_marker(&self) -> Option<&RootMarker> {
        self.root_marker.as_ref()
    }

    pub fn set_root_marker(&mut self, marker: RootMarker) {
        self.root_marker = Some(marker);
    }

    // ===== NODES =====

    /// Create a detached node
    pub fn create_node(&mut self, tag: impl Into<String>, kind: NodeKind) -> NodeKey {
        self.nodes.insert(SceneNode::new(tag, kind))
    }

    /// Create a detached camera node
    pub fn create_camera(&mut self, tag: impl Into<String>, camera: Camera) -> NodeKey {
        self.create_node(tag, NodeKind::Camera(camera))
    }

    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    /// Whether `key` is the root or has the root as an ancestor
    pub fn is_attached(&self, key: NodeKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == self.root {
                return true;
            }
            current = self.parent(k);
        }
        false
    }

    /// Attach `child` under `parent`, before `anchor` when it is a child of
    /// `parent`, otherwise at the end.
    ///
    /// A child that already has a parent is moved.
    pub fn attach(&mut self, child: NodeKey, parent: NodeKey, anchor: Option<NodeKey>) -> Result<()> {
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            return Err(bridge_err!("scenebridge::SceneGraph", InvalidNode,
                "attach: unknown node (child {:?}, parent {:?})", child, parent));
        }
        if child == self.root {
            return Err(bridge_err!("scenebridge::SceneGraph", InvalidNode,
                "attach: the scene root cannot be re-parented"));
        }
        let mut ancestor = Some(parent);
        while let Some(k) = ancestor {
            if k == child {
                return Err(bridge_err!("scenebridge::SceneGraph", InvalidNode,
                    "attach: {:?} is an ancestor of {:?}", child, parent));
            }
            ancestor = self.parent(k);
        }

        self.detach(child);

        let siblings = &mut self.nodes[parent].children;
        let index = anchor
            .and_then(|a| siblings.iter().position(|&k| k == a))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Remove `key` from its parent's children. Returns false when the node
    /// is unknown or already detached.
    pub fn detach(&mut self, key: NodeKey) -> bool {
        let Some(parent) = self.parent(key) else {
            return false;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|&k| k != key);
        }
        self.nodes[key].parent = None;
        true
    }

    /// `key` and all of its descendants, parents before children
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(key) {
            return out;
        }
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            out.push(k);
            // Reverse so the first child is visited first
            stack.extend(self.children(k).iter().rev().copied());
        }
        out
    }

    /// Detach `key` and remove it with its whole subtree from the arena.
    ///
    /// Resource keys referenced by removed nodes are NOT freed; callers
    /// collect them from the returned nodes. The root cannot be removed.
    pub fn remove_subtree(&mut self, key: NodeKey) -> Vec<(NodeKey, SceneNode)> {
        if key == self.root {
            return Vec::new();
        }
        let keys = self.descendants(key);
        self.detach(key);
        keys.into_iter()
            .filter_map(|k| self.nodes.remove(k).map(|node| (k, node)))
            .collect()
    }

    /// World matrix of `key` (product of local matrices from the root down)
    pub fn world_matrix(&self, key: NodeKey) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(key);
        while let Some(k) = current {
            let Some(node) = self.nodes.get(k) else { break };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    // ===== RESOURCES =====

    /// Register a GPU resource; it is not referenced by any node yet
    pub fn create_resource(&mut self, resource: GpuResource) -> ResourceKey {
        self.resources.insert(resource)
    }

    /// Make `node` reference `resource`
    pub fn attach_resource(&mut self, node: NodeKey, resource: ResourceKey) -> Result<()> {
        if !self.resources.contains_key(resource) {
            return Err(bridge_err!("scenebridge::SceneGraph", InvalidNode,
                "attach_resource: resource {:?} is not live", resource));
        }
        let node = self.nodes.get_mut(node).ok_or_else(|| bridge_err!(
            "scenebridge::SceneGraph", InvalidNode, "attach_resource: unknown node {:?}", node))?;
        if !node.resources.contains(&resource) {
            node.resources.push(resource);
        }
        Ok(())
    }

    pub fn resource(&self, key: ResourceKey) -> Option<&GpuResource> {
        self.resources.get(key)
    }

    /// Number of live (not yet freed) resources
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Remove a resource from the live set. `None` if it was already freed.
    pub fn free_resource(&mut self, key: ResourceKey) -> Option<GpuResource> {
        self.resources.remove(key)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;

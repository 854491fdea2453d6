//! Custom renderer host: mounts declarative content onto the scene root.
//!
//! The host does not diff trees. Mounting walks the descriptors once and
//! issues node operations (create, patch props, insert) through a
//! [`NodeOps`] implementation bound to the canvas context. Mounting twice
//! without disposing in between therefore creates everything twice.

use std::rc::Rc;
use glam::Vec3;
use crate::context::ContextHandle;
use crate::error::Result;
use crate::scene::NodeKey;
use crate::{bridge_debug, bridge_trace, bridge_warn};
use super::catalogue::Extend;
use super::injection::{AncestorChain, InjectionScope};

/// Value of a declarative prop
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Number(f32),
    Vec3(Vec3),
    Text(String),
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        PropValue::Number(value)
    }
}

impl From<Vec3> for PropValue {
    fn from(value: Vec3) -> Self {
        PropValue::Vec3(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

/// Declarative description of one scene node and its children
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    pub tag: String,
    /// Props in application order
    pub props: Vec<(String, PropValue)>,
    pub children: Vec<NodeDescriptor>,
}

impl NodeDescriptor {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, child: NodeDescriptor) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes described, this one included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeDescriptor::node_count).sum::<usize>()
    }
}

/// Node-operations contract: the primitives that turn descriptors into
/// scene-graph mutations
pub trait NodeOps {
    /// Create a detached node for `tag`
    fn create_element(&mut self, tag: &str) -> Result<NodeKey>;

    /// Attach `child` under `parent`, before `anchor` if given
    fn insert(&mut self, child: NodeKey, parent: NodeKey, anchor: Option<NodeKey>) -> Result<()>;

    /// Detach and destroy `node` with its subtree
    fn remove(&mut self, node: NodeKey) -> Result<()>;

    /// Apply a prop change; `next == None` means the prop was removed
    fn patch_prop(
        &mut self,
        node: NodeKey,
        key: &str,
        prev: Option<&PropValue>,
        next: Option<&PropValue>,
    ) -> Result<()>;
}

/// Builds the node operations bound to a context
pub type NodeOpsFactory = Rc<dyn Fn(&ContextHandle) -> Box<dyn NodeOps>>;

/// Produces the canvas content; runs inside the canvas injection scope
pub type ContentFn = Rc<dyn Fn(&InjectionScope) -> Vec<NodeDescriptor>>;

/// Secondary render tree driven by a node-operations implementation
pub struct SubtreeRenderer {
    ops: Box<dyn NodeOps>,
}

impl SubtreeRenderer {
    pub fn new(ops: Box<dyn NodeOps>) -> Self {
        Self { ops }
    }

    /// Mount `content` under `container`; returns the created top-level nodes.
    ///
    /// On failure every node created by this call is removed again, so the
    /// container is left as it was.
    pub fn render(&mut self, content: &[NodeDescriptor], container: NodeKey) -> Result<Vec<NodeKey>> {
        let mut roots = Vec::with_capacity(content.len());
        for descriptor in content {
            match self.mount_node(descriptor, container) {
                Ok(node) => roots.push(node),
                Err(err) => {
                    self.discard(&roots);
                    return Err(err);
                }
            }
        }
        Ok(roots)
    }

    /// Remove previously mounted top-level nodes
    pub fn unmount(&mut self, roots: &[NodeKey]) -> Result<()> {
        for &root in roots {
            self.ops.remove(root)?;
        }
        Ok(())
    }

    // Children are mounted into the new node before it is inserted into
    // its parent, so the parent sees a complete subtree on insert.
    fn mount_node(&mut self, descriptor: &NodeDescriptor, parent: NodeKey) -> Result<NodeKey> {
        bridge_trace!("scenebridge::Host", "create <{}>", descriptor.tag);
        let node = self.ops.create_element(&descriptor.tag)?;
        if let Err(err) = self.build_node(descriptor, node, parent) {
            self.discard(&[node]);
            return Err(err);
        }
        Ok(node)
    }

    fn build_node(&mut self, descriptor: &NodeDescriptor, node: NodeKey, parent: NodeKey) -> Result<()> {
        for (key, value) in &descriptor.props {
            self.ops.patch_prop(node, key, None, Some(value))?;
        }
        for child in &descriptor.children {
            self.mount_node(child, node)?;
        }
        self.ops.insert(node, parent, None)
    }

    // Rollback after a failed mount; the original error is what the caller sees
    fn discard(&mut self, nodes: &[NodeKey]) {
        if let Err(err) = self.unmount(nodes) {
            bridge_warn!("scenebridge::Host", "Could not remove partially mounted nodes: {}", err);
        }
    }
}

/// Result of one mount
pub struct MountedTree {
    scope: Rc<InjectionScope>,
    roots: Vec<NodeKey>,
    empty: bool,
}

impl MountedTree {
    /// Injection scope of this mount; stays valid after teardown
    pub fn scope(&self) -> &Rc<InjectionScope> {
        &self.scope
    }

    /// Top-level nodes created under the scene root
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Mounted with bindings only, no content
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Forget the mounted nodes after they were released; the scope stays
    pub(crate) fn clear(&mut self) {
        self.roots.clear();
        self.empty = true;
    }
}

/// Everything needed to (re)mount the canvas content
pub struct RendererHost {
    pub ancestors: AncestorChain,
    pub bridge_enabled: bool,
    pub content: Option<ContentFn>,
    pub node_ops: NodeOpsFactory,
    pub extend: Extend,
}

impl RendererHost {
    /// Mount the content (or, when `empty`, only the injection scope) onto
    /// the context's scene root.
    ///
    /// No context borrow is held while the content function runs, so
    /// content may read the injected context.
    pub fn mount(&self, context: &ContextHandle, empty: bool) -> Result<MountedTree> {
        let scope = Rc::new(InjectionScope::build(
            &self.ancestors,
            self.bridge_enabled,
            context,
            &self.extend,
        ));

        let content = match (&self.content, empty) {
            (Some(content), false) => content(&scope),
            _ => Vec::new(),
        };

        let container = context.borrow().scene.root();
        let mut renderer = SubtreeRenderer::new((self.node_ops)(context));
        let roots = renderer.render(&content, container)?;

        bridge_debug!("scenebridge::Host", "Mounted {} top-level node(s){}",
            roots.len(), if empty { " (empty)" } else { "" });

        Ok(MountedTree { scope, roots, empty })
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;

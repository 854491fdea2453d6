//! Default node operations: catalogue-backed construction plus the small
//! prop set the bridge understands on its own.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use glam::Vec3;
use crate::context::{ContextHandle, RenderContext};
use crate::error::Result;
use crate::scene::{NodeFlags, NodeKey};
use crate::{bridge_err, bridge_trace};
use super::catalogue::Catalogue;
use super::host::{NodeOps, NodeOpsFactory, PropValue};
use super::lifecycle;

/// Node operations bound to one render context
pub struct SceneNodeOps {
    context: Weak<RefCell<RenderContext>>,
    catalogue: Rc<RefCell<Catalogue>>,
}

impl SceneNodeOps {
    pub fn new(context: &ContextHandle, catalogue: Rc<RefCell<Catalogue>>) -> Self {
        Self {
            context: Rc::downgrade(context),
            catalogue,
        }
    }

    /// Factory producing `SceneNodeOps` for any context
    pub fn factory(catalogue: Rc<RefCell<Catalogue>>) -> NodeOpsFactory {
        Rc::new(move |context: &ContextHandle| {
            Box::new(SceneNodeOps::new(context, catalogue.clone())) as Box<dyn NodeOps>
        })
    }

    fn with_context<R>(&self, f: impl FnOnce(&mut RenderContext) -> Result<R>) -> Result<R> {
        let context = self.context.upgrade().ok_or_else(|| bridge_err!(
            "scenebridge::NodeOps", InvalidState, "render context has been dropped"))?;
        let mut guard = context.try_borrow_mut().map_err(|_| bridge_err!(
            "scenebridge::NodeOps", InvalidState, "render context is already borrowed"))?;
        f(&mut guard)
    }
}

impl NodeOps for SceneNodeOps {
    fn create_element(&mut self, tag: &str) -> Result<NodeKey> {
        let constructor = self.catalogue.borrow().constructor(tag)?;
        self.with_context(|ctx| constructor(&mut ctx.scene))
    }

    fn insert(&mut self, child: NodeKey, parent: NodeKey, anchor: Option<NodeKey>) -> Result<()> {
        self.with_context(|ctx| {
            ctx.scene.attach(child, parent, anchor)?;
            let is_camera = ctx.scene.node(child).is_some_and(|n| n.is_camera());
            if is_camera {
                ctx.register_camera(child, false);
            }
            Ok(())
        })
    }

    fn remove(&mut self, node: NodeKey) -> Result<()> {
        self.with_context(|ctx| {
            lifecycle::release_subtree(ctx, node);
            Ok(())
        })
    }

    fn patch_prop(
        &mut self,
        node: NodeKey,
        key: &str,
        _prev: Option<&PropValue>,
        next: Option<&PropValue>,
    ) -> Result<()> {
        self.with_context(|ctx| {
            let target = ctx.scene.node_mut(node).ok_or_else(|| bridge_err!(
                "scenebridge::NodeOps", InvalidNode, "patch_prop: unknown node {:?}", node))?;

            match (key, next) {
                ("name", Some(PropValue::Text(name))) => target.name = name.clone(),
                ("name", None) => target.name.clear(),
                ("visible", Some(PropValue::Bool(visible))) => {
                    target.flags.set(NodeFlags::VISIBLE, *visible);
                }
                ("visible", None) => target.flags.insert(NodeFlags::VISIBLE),
                ("cast-shadow", Some(PropValue::Bool(on))) => {
                    target.flags.set(NodeFlags::CAST_SHADOW, *on);
                }
                ("receive-shadow", Some(PropValue::Bool(on))) => {
                    target.flags.set(NodeFlags::RECEIVE_SHADOW, *on);
                }
                ("position", Some(PropValue::Vec3(position))) => target.transform.position = *position,
                ("position", None) => target.transform.position = Vec3::ZERO,
                ("scale", Some(PropValue::Vec3(scale))) => target.transform.scale = *scale,
                ("look-at", Some(PropValue::Vec3(point))) => target.transform.look_at(*point, Vec3::Y),
                ("fov", Some(PropValue::Number(fov))) => {
                    if let Some(camera) = target.camera_mut() {
                        camera.set_fov(*fov);
                    }
                }
                ("near", Some(PropValue::Number(near))) => {
                    if let Some(camera) = target.camera_mut() {
                        camera.set_near(*near);
                    }
                }
                ("far", Some(PropValue::Number(far))) => {
                    if let Some(camera) = target.camera_mut() {
                        camera.set_far(*far);
                    }
                }
                _ => {
                    bridge_trace!("scenebridge::NodeOps", "Ignoring prop '{}' on <{}>", key, target.tag);
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "node_ops_tests.rs"]
mod tests;

//! Scene graph module
//!
//! Retained node arena, GPU resource handles and the root marker that ties a
//! scene back to its owning render context.

mod resource;
mod scene_graph;

pub use resource::{GpuResource, ResourceKey, ResourceKind};
pub use scene_graph::{
    SceneGraph, SceneNode, NodeKey, NodeKind, NodeFlags,
    Transform, Light, LightKind, RootMarker,
};

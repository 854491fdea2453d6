//! Canvas module: host integration, injection bridge, lifecycle and events

mod canvas_root;
mod catalogue;
mod diagnostics;
mod events;
mod host;
mod injection;
mod lifecycle;
mod node_ops;

pub use canvas_root::{CanvasConfig, CanvasDesc, CanvasRoot, CanvasState, CameraBinding};
pub use catalogue::{Catalogue, Constructor, Extend};
pub use diagnostics::{
    CancellationToken, SizeCheck, SizeCheckStatus,
    SIZE_CHECK_DELAY, ZERO_AREA_WARNING,
};
pub use events::{CanvasEvent, EventDispatcher, LoopState, PointerEvent, SubscriptionId};
pub use host::{
    ContentFn, MountedTree, NodeDescriptor, NodeOps, NodeOpsFactory,
    PropValue, RendererHost, SubtreeRenderer,
};
pub use injection::{
    AncestorChain, BindingValue, InjectionBindings, InjectionKey, InjectionScope,
    Precedence, ScopeFrame, merge_frames, CONTEXT_KEY, EXTEND_KEY,
};
pub use lifecycle::{dispose, DisposeReport};
pub use node_ops::SceneNodeOps;

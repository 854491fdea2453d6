//! Injection scope: bindings forwarded from the host's ancestor chain into
//! the canvas subtree.
//!
//! The host describes its ancestors as an explicit list of [`ScopeFrame`]s,
//! farthest first. [`merge_frames`] flattens that list with a caller-chosen
//! precedence; the canvas always uses [`Precedence::NearestWins`] so the
//! closest ancestor's value survives a key collision.

use std::any::Any;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use rustc_hash::FxHashMap;
use crate::context::{ContextHandle, RenderContext};
use super::catalogue::Extend;

/// Key of an injected binding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InjectionKey(Cow<'static, str>);

impl InjectionKey {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for InjectionKey {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl fmt::Display for InjectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binding to the canvas render context, always installed
pub const CONTEXT_KEY: InjectionKey = InjectionKey::from_static("scenebridge:context");
/// Binding to the element type-registration function, always installed
pub const EXTEND_KEY: InjectionKey = InjectionKey::from_static("scenebridge:extend");

/// Type-erased binding value
pub type BindingValue = Rc<dyn Any>;

/// Flattened bindings
pub type InjectionBindings = FxHashMap<InjectionKey, BindingValue>;

/// Bindings provided by one ancestor
#[derive(Clone, Default)]
pub struct ScopeFrame {
    bindings: InjectionBindings,
}

impl ScopeFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide `value` under `key`, replacing any previous value in this frame
    pub fn provide<T: Any>(&mut self, key: impl Into<InjectionKey>, value: T) -> &mut Self {
        self.bindings.insert(key.into(), Rc::new(value));
        self
    }

    /// Provide an already shared value
    pub fn provide_shared(&mut self, key: impl Into<InjectionKey>, value: BindingValue) -> &mut Self {
        self.bindings.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &InjectionKey) -> Option<&BindingValue> {
        self.bindings.get(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Ancestor frames ordered root-first: index 0 is the farthest ancestor,
/// the last frame is the nearest parent.
#[derive(Clone, Default)]
pub struct AncestorChain {
    frames: Vec<ScopeFrame>,
}

impl AncestorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain from frames already ordered farthest → nearest
    pub fn from_root_first(frames: Vec<ScopeFrame>) -> Self {
        Self { frames }
    }

    /// Append `frame` as the new nearest ancestor
    pub fn push_nearest(&mut self, frame: ScopeFrame) -> &mut Self {
        self.frames.push(frame);
        self
    }

    pub fn frames(&self) -> &[ScopeFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Which side of the chain wins a key collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    NearestWins,
    FarthestWins,
}

/// Flatten root-first `frames` into one map
pub fn merge_frames(frames: &[ScopeFrame], precedence: Precedence) -> InjectionBindings {
    let mut merged = InjectionBindings::default();
    let mut apply = |frame: &ScopeFrame| {
        for (key, value) in &frame.bindings {
            merged.insert(key.clone(), value.clone());
        }
    };
    match precedence {
        // Later writes overwrite earlier ones, so visit the winner last
        Precedence::NearestWins => frames.iter().for_each(&mut apply),
        Precedence::FarthestWins => frames.iter().rev().for_each(&mut apply),
    }
    merged
}

/// The injection scope the canvas content is rendered in
pub struct InjectionScope {
    bindings: InjectionBindings,
}

impl InjectionScope {
    /// Merge the ancestor chain (when bridging is enabled) and install the
    /// two fixed bindings on top.
    pub fn build(
        ancestors: &AncestorChain,
        bridge_enabled: bool,
        context: &ContextHandle,
        extend: &Extend,
    ) -> Self {
        let mut bindings = if bridge_enabled {
            merge_frames(ancestors.frames(), Precedence::NearestWins)
        } else {
            InjectionBindings::default()
        };
        let context_value: BindingValue = context.clone();
        bindings.insert(CONTEXT_KEY, context_value);
        bindings.insert(EXTEND_KEY, Rc::new(extend.clone()));
        Self { bindings }
    }

    /// Typed lookup. `None` when the key is missing or holds another type.
    pub fn inject<T: Any>(&self, key: &InjectionKey) -> Option<Rc<T>> {
        self.bindings.get(key)?.clone().downcast::<T>().ok()
    }

    pub fn contains(&self, key: &InjectionKey) -> bool {
        self.bindings.contains_key(key)
    }

    /// The canvas render context
    pub fn context(&self) -> Option<ContextHandle> {
        self.inject::<RefCell<RenderContext>>(&CONTEXT_KEY)
    }

    /// The element type-registration function
    pub fn extend(&self) -> Option<Rc<Extend>> {
        self.inject::<Extend>(&EXTEND_KEY)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
#[path = "injection_tests.rs"]
mod tests;

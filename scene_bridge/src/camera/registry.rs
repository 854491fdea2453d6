/// Camera registry: ordered camera list, active selection, fallback policy.
///
/// The registry only stores node keys; the camera data lives in the scene
/// graph. The active camera is the explicitly selected one when it is still
/// registered, otherwise the first registered camera, so it is always either
/// `None` or a member of `cameras()`.
///
/// The fallback ("default") camera follows an explicit state machine:
///
/// ```text
///   NoCamera ──install_default──▶ DefaultActive(key)
///      │                               │  list reaches 2 cameras
///      │ mark_user_active              ▼  (default evicted)
///      └─────────────────────────▶ UserActive   (terminal)
/// ```
///
/// Once `UserActive` is reached no default camera is ever installed again.

use crate::scene::NodeKey;

/// Fallback-camera lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCameraState {
    /// First mount has not decided yet
    NoCamera,
    /// The fallback camera is registered
    DefaultActive(NodeKey),
    /// A user camera took over (or was present from the start)
    UserActive,
}

/// Snapshot passed to camera watchers
#[derive(Debug, Clone, Copy)]
pub struct CameraChange<'a> {
    pub cameras: &'a [NodeKey],
    pub active: Option<NodeKey>,
}

/// Handle returned by [`CameraRegistry::watch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

type Watcher = Box<dyn FnMut(&CameraChange<'_>)>;

/// Ordered set of cameras with an active selection
pub struct CameraRegistry {
    cameras: Vec<NodeKey>,
    explicit_active: Option<NodeKey>,
    default_state: DefaultCameraState,
    watchers: Vec<(WatchId, Watcher)>,
    next_watch_id: u64,
}

impl CameraRegistry {
    pub fn new() -> Self {
        Self {
            cameras: Vec::new(),
            explicit_active: None,
            default_state: DefaultCameraState::NoCamera,
            watchers: Vec::new(),
            next_watch_id: 0,
        }
    }

    /// Registered cameras in insertion order
    pub fn cameras(&self) -> &[NodeKey] {
        &self.cameras
    }

    pub fn contains(&self, camera: NodeKey) -> bool {
        self.cameras.contains(&camera)
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Active camera: explicit selection if still registered, else the first one
    pub fn active_camera(&self) -> Option<NodeKey> {
        self.explicit_active
            .filter(|key| self.cameras.contains(key))
            .or_else(|| self.cameras.first().copied())
    }

    pub fn default_state(&self) -> DefaultCameraState {
        self.default_state
    }

    /// The fallback camera, while it is registered
    pub fn default_camera(&self) -> Option<NodeKey> {
        match self.default_state {
            DefaultCameraState::DefaultActive(key) => Some(key),
            _ => None,
        }
    }

    /// Register `camera`, optionally making it the active one.
    ///
    /// Registering a camera twice keeps a single entry (an `as_active`
    /// request still promotes it). When the fallback camera is registered
    /// and the list reaches two cameras, the fallback is removed from the
    /// list and returned so the caller can detach it from the scene graph.
    pub fn register_camera(&mut self, camera: NodeKey, as_active: bool) -> Option<NodeKey> {
        let before = self.state_key();

        if !self.cameras.contains(&camera) {
            self.cameras.push(camera);
        }
        if as_active {
            self.explicit_active = Some(camera);
        }

        let evicted = match self.default_state {
            DefaultCameraState::DefaultActive(default) if self.cameras.len() >= 2 && default != camera => {
                self.remove_entry(default);
                self.default_state = DefaultCameraState::UserActive;
                Some(default)
            }
            _ => None,
        };

        self.notify_if_changed(before);
        evicted
    }

    /// Remove `camera`. Returns false when it was not registered.
    ///
    /// Deregistering the fallback camera retires it for good.
    pub fn deregister_camera(&mut self, camera: NodeKey) -> bool {
        if !self.cameras.contains(&camera) {
            return false;
        }
        let before = self.state_key();
        self.remove_entry(camera);
        if self.default_state == DefaultCameraState::DefaultActive(camera) {
            self.default_state = DefaultCameraState::UserActive;
        }
        self.notify_if_changed(before);
        true
    }

    /// Select an already registered camera. Returns false otherwise.
    pub fn set_active_camera(&mut self, camera: NodeKey) -> bool {
        if !self.cameras.contains(&camera) {
            return false;
        }
        let before = self.state_key();
        self.explicit_active = Some(camera);
        self.notify_if_changed(before);
        true
    }

    /// Register `camera` as the fallback. Only allowed from `NoCamera` with
    /// an empty list; returns false (and changes nothing) otherwise.
    pub fn install_default(&mut self, camera: NodeKey) -> bool {
        if self.default_state != DefaultCameraState::NoCamera || !self.cameras.is_empty() {
            return false;
        }
        self.default_state = DefaultCameraState::DefaultActive(camera);
        self.register_camera(camera, false);
        true
    }

    /// First mount found a camera already active: no fallback will be created.
    pub fn mark_user_active(&mut self) {
        if self.default_state == DefaultCameraState::NoCamera {
            self.default_state = DefaultCameraState::UserActive;
        }
    }

    // ===== WATCHERS =====

    /// Call `watcher` synchronously after every change of the list or of the
    /// active camera
    pub fn watch(&mut self, watcher: impl FnMut(&CameraChange<'_>) + 'static) -> WatchId {
        let id = WatchId(self.next_watch_id);
        self.next_watch_id += 1;
        self.watchers.push((id, Box::new(watcher)));
        id
    }

    pub fn unwatch(&mut self, id: WatchId) -> bool {
        let len = self.watchers.len();
        self.watchers.retain(|(watch_id, _)| *watch_id != id);
        self.watchers.len() != len
    }

    // ===== INTERNALS =====

    fn remove_entry(&mut self, camera: NodeKey) {
        self.cameras.retain(|&key| key != camera);
        if self.explicit_active == Some(camera) {
            self.explicit_active = None;
        }
    }

    fn state_key(&self) -> (Vec<NodeKey>, Option<NodeKey>) {
        (self.cameras.clone(), self.active_camera())
    }

    fn notify_if_changed(&mut self, before: (Vec<NodeKey>, Option<NodeKey>)) {
        let active = self.active_camera();
        if before.0 == self.cameras && before.1 == active {
            return;
        }
        let change = CameraChange {
            cameras: &self.cameras,
            active,
        };
        for (_, watcher) in &mut self.watchers {
            watcher(&change);
        }
    }
}

impl Default for CameraRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

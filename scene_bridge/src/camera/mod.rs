//! Camera module: projection data and the per-canvas camera registry.
//!
//! Cameras are scene nodes (`NodeKind::Camera`); the registry tracks which
//! of them are registered with the canvas and which one is active.

mod camera;
mod registry;

pub use camera::{
    Camera, Projection,
    DEFAULT_FOV_DEGREES, DEFAULT_NEAR, DEFAULT_FAR,
};
pub use registry::{CameraRegistry, CameraChange, DefaultCameraState, WatchId};

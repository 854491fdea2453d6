/*!
# Scene Bridge

Embeds a retained 3D scene graph inside a host's declarative component tree.

A [`CanvasRoot`](scenebridge::canvas::CanvasRoot) owns one render context
(scene graph, renderer, camera registry, viewport sizes, frame loop) and
mounts declarative content onto the scene root through a node-operations
contract.

## Architecture

- **RenderContext**: Per-canvas state shared by every subcomponent
- **SceneGraph**: Node arena with GPU resource handles
- **CameraRegistry**: Registered cameras, active camera, default-camera state
- **Renderer**: 3D engine boundary (`HeadlessRenderer` ships in-crate)
- **InjectionScope**: Ancestor bindings forwarded into the canvas subtree
- **CanvasRoot**: Mount, hot-reload remount, final unmount, frame events

Everything runs on the host's thread; sharing is `Rc<RefCell<_>>`.
*/

// Internal modules
mod error;
mod bridge;
mod context;
pub mod log;
pub mod camera;
pub mod canvas;
pub mod renderer;
pub mod scene;

// Main scenebridge namespace module
pub mod scenebridge {
    // Error types
    pub use crate::error::{Error, Result};

    // Logger registry
    pub use crate::bridge::Bridge;

    // Render context
    pub use crate::context::{
        ContextHandle, RenderContext, Sizes, WindowSize, DEFAULT_CAMERA_POSITION,
    };

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Canvas sub-module
    pub mod canvas {
        pub use crate::canvas::*;
    }

    // Render sub-module (renderer boundary and frame loop)
    pub mod render {
        pub use crate::renderer::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;

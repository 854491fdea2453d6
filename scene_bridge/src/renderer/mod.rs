/// Renderer module - 3D engine boundary, headless backend and frame loop

pub mod renderer;
pub mod headless_renderer;
pub mod frame_loop;

pub use renderer::*;
pub use headless_renderer::HeadlessRenderer;
pub use frame_loop::{FrameLoop, FrameSignal, LoopTick};

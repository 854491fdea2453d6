//! Frame loop timing and the signals a frame produces.
//!
//! Per tick the order is fixed: `BeforeLoop`, `Loop`, the draw call,
//! `Render`, and `Ready` after the first successful draw only.

use std::time::Duration;

/// Timing fields of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopTick {
    /// Seconds since the previous tick
    pub delta: f32,
    /// Seconds since the loop started
    pub elapsed: f32,
    /// Tick counter, starting at 1
    pub frame: u64,
}

/// Renderer lifecycle signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameSignal {
    BeforeLoop(LoopTick),
    Loop(LoopTick),
    /// Emitted after the frame's draw call
    Render,
    /// First successful draw
    Ready,
}

#[derive(Debug, Default)]
pub struct FrameLoop {
    elapsed: Duration,
    frame: u64,
    ready: bool,
    paused: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance timing by `delta` and return the tick
    pub fn advance(&mut self, delta: Duration) -> LoopTick {
        self.elapsed += delta;
        self.frame += 1;
        LoopTick {
            delta: delta.as_secs_f32(),
            elapsed: self.elapsed.as_secs_f32(),
            frame: self.frame,
        }
    }

    /// Record a successful draw. True only the first time.
    pub fn mark_ready(&mut self) -> bool {
        !std::mem::replace(&mut self.ready, true)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Stop producing ticks; timing is frozen until `resume`
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
#[path = "frame_loop_tests.rs"]
mod tests;

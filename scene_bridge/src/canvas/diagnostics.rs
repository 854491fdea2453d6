//! Deferred canvas diagnostics.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use crate::context::Sizes;
use crate::bridge_warn;

/// Delay between setup and the drawable-area check
pub const SIZE_CHECK_DELAY: Duration = Duration::from_secs(3);

/// Emitted once when the canvas still has no area at check time
pub const ZERO_AREA_WARNING: &str =
    "The canvas has no area, so nothing can be rendered. \
     Size the parent element or set the `window_size` option.";

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Outcome of one [`SizeCheck::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCheckStatus {
    /// Not due yet
    Pending,
    /// Token cancelled before the check fired
    Cancelled,
    /// Fired and the canvas has an area
    Passed,
    /// Fired and the warning was logged
    Warned,
    /// Already fired or cancelled earlier
    Done,
}

/// One-shot drawable-area check
#[derive(Debug)]
pub struct SizeCheck {
    due: Instant,
    token: CancellationToken,
    finished: bool,
}

impl SizeCheck {
    pub fn schedule(now: Instant, delay: Duration, token: CancellationToken) -> Self {
        Self {
            due: now + delay,
            token,
            finished: false,
        }
    }

    pub fn due(&self) -> Instant {
        self.due
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fire the check if it is due. Runs at most once.
    pub fn poll(&mut self, now: Instant, sizes: &Sizes) -> SizeCheckStatus {
        if self.finished {
            return SizeCheckStatus::Done;
        }
        if self.token.is_cancelled() {
            self.finished = true;
            return SizeCheckStatus::Cancelled;
        }
        if now < self.due {
            return SizeCheckStatus::Pending;
        }

        self.finished = true;
        if sizes.has_area() {
            SizeCheckStatus::Passed
        } else {
            bridge_warn!("scenebridge::Canvas", "{}", ZERO_AREA_WARNING);
            SizeCheckStatus::Warned
        }
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;

//! Canvas events: frame-loop and pointer notifications delivered to
//! observers.
//!
//! Observers get shared references only. The context is mutably borrowed by
//! the frame loop while they run, so they must not try to borrow the
//! [`ContextHandle`](crate::context::ContextHandle) again.

use std::ops::Deref;
use crate::context::RenderContext;
use crate::renderer::{FrameSignal, LoopTick};

/// Pointer event that hit no scene object
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub button: u16,
}

/// Render context merged with the timing fields of one tick
#[derive(Clone, Copy)]
pub struct LoopState<'a> {
    context: &'a RenderContext,
    pub delta: f32,
    pub elapsed: f32,
    pub frame: u64,
}

impl<'a> LoopState<'a> {
    pub fn new(context: &'a RenderContext, tick: LoopTick) -> Self {
        Self {
            context,
            delta: tick.delta,
            elapsed: tick.elapsed,
            frame: tick.frame,
        }
    }

    pub fn context(&self) -> &'a RenderContext {
        self.context
    }
}

impl Deref for LoopState<'_> {
    type Target = RenderContext;

    fn deref(&self) -> &RenderContext {
        self.context
    }
}

/// Event delivered to canvas observers
#[derive(Clone, Copy)]
pub enum CanvasEvent<'a> {
    PointerMissed {
        context: &'a RenderContext,
        event: PointerEvent,
    },
    Render(&'a RenderContext),
    BeforeLoop(LoopState<'a>),
    Loop(LoopState<'a>),
    Ready(&'a RenderContext),
}

impl<'a> CanvasEvent<'a> {
    /// Event name as exposed to hosts
    pub fn name(&self) -> &'static str {
        match self {
            CanvasEvent::PointerMissed { .. } => "pointermissed",
            CanvasEvent::Render(_) => "render",
            CanvasEvent::BeforeLoop(_) => "beforeLoop",
            CanvasEvent::Loop(_) => "loop",
            CanvasEvent::Ready(_) => "ready",
        }
    }

    pub fn context(&self) -> &'a RenderContext {
        match *self {
            CanvasEvent::PointerMissed { context, .. } => context,
            CanvasEvent::Render(context) | CanvasEvent::Ready(context) => context,
            CanvasEvent::BeforeLoop(state) | CanvasEvent::Loop(state) => state.context(),
        }
    }

    /// Build the observer event for a frame-loop signal
    pub fn from_signal(context: &'a RenderContext, signal: FrameSignal) -> Self {
        match signal {
            FrameSignal::BeforeLoop(tick) => CanvasEvent::BeforeLoop(LoopState::new(context, tick)),
            FrameSignal::Loop(tick) => CanvasEvent::Loop(LoopState::new(context, tick)),
            FrameSignal::Render => CanvasEvent::Render(context),
            FrameSignal::Ready => CanvasEvent::Ready(context),
        }
    }
}

/// Handle returned by [`EventDispatcher::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn for<'a> FnMut(&CanvasEvent<'a>)>;

/// Ordered observer list
#[derive(Default)]
pub struct EventDispatcher {
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer; it receives every event until unsubscribed
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: for<'a> FnMut(&CanvasEvent<'a>) + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// False when `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver `event` to every observer in subscription order
    pub fn dispatch(&mut self, event: &CanvasEvent<'_>) {
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }

    /// Forward a frame-loop signal as a canvas event
    pub fn relay(&mut self, context: &RenderContext, signal: FrameSignal) {
        self.dispatch(&CanvasEvent::from_signal(context, signal));
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;

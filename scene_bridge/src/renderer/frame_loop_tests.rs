use std::time::Duration;
use super::*;

#[test]
fn test_advance_accumulates_time() {
    let mut frame_loop = FrameLoop::new();

    let first = frame_loop.advance(Duration::from_millis(500));
    let second = frame_loop.advance(Duration::from_millis(250));

    assert_eq!(first, LoopTick { delta: 0.5, elapsed: 0.5, frame: 1 });
    assert_eq!(second.frame, 2);
    assert_eq!(second.delta, 0.25);
    assert_eq!(second.elapsed, 0.75);
    assert_eq!(frame_loop.frame(), 2);
    assert_eq!(frame_loop.elapsed(), Duration::from_millis(750));
}

#[test]
fn test_mark_ready_only_once() {
    let mut frame_loop = FrameLoop::new();
    assert!(!frame_loop.is_ready());
    assert!(frame_loop.mark_ready());
    assert!(!frame_loop.mark_ready());
    assert!(frame_loop.is_ready());
}

#[test]
fn test_pause_resume() {
    let mut frame_loop = FrameLoop::new();
    frame_loop.pause();
    assert!(frame_loop.is_paused());
    frame_loop.resume();
    assert!(!frame_loop.is_paused());
}

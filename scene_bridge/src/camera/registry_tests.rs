use std::cell::RefCell;
use std::rc::Rc;
use slotmap::SlotMap;
use crate::scene::NodeKey;
use super::*;

fn make_keys(count: usize) -> Vec<NodeKey> {
    let mut arena: SlotMap<NodeKey, ()> = SlotMap::with_key();
    (0..count).map(|_| arena.insert(())).collect()
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_new_registry_is_empty() {
    let registry = CameraRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.active_camera(), None);
    assert_eq!(registry.default_state(), DefaultCameraState::NoCamera);
}

#[test]
fn test_first_registered_camera_is_active() {
    let keys = make_keys(2);
    let mut registry = CameraRegistry::new();

    registry.register_camera(keys[0], false);
    registry.register_camera(keys[1], false);

    assert_eq!(registry.cameras(), &[keys[0], keys[1]]);
    assert_eq!(registry.active_camera(), Some(keys[0]));
}

#[test]
fn test_register_as_active() {
    let keys = make_keys(2);
    let mut registry = CameraRegistry::new();

    registry.register_camera(keys[0], false);
    registry.register_camera(keys[1], true);

    assert_eq!(registry.active_camera(), Some(keys[1]));
}

#[test]
fn test_register_duplicate_keeps_single_entry() {
    let keys = make_keys(2);
    let mut registry = CameraRegistry::new();

    registry.register_camera(keys[0], false);
    registry.register_camera(keys[1], false);
    registry.register_camera(keys[1], true);

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.active_camera(), Some(keys[1]));
}

#[test]
fn test_deregister_active_falls_back_to_first() {
    let keys = make_keys(3);
    let mut registry = CameraRegistry::new();
    registry.register_camera(keys[0], false);
    registry.register_camera(keys[1], false);
    registry.register_camera(keys[2], true);

    assert!(registry.deregister_camera(keys[2]));

    assert_eq!(registry.active_camera(), Some(keys[0]));
    assert!(!registry.deregister_camera(keys[2]));
}

#[test]
fn test_set_active_camera_requires_registration() {
    let keys = make_keys(2);
    let mut registry = CameraRegistry::new();
    registry.register_camera(keys[0], false);

    assert!(!registry.set_active_camera(keys[1]));
    assert!(registry.set_active_camera(keys[0]));
    assert_eq!(registry.active_camera(), Some(keys[0]));
}

// ============================================================================
// Default camera state machine
// ============================================================================

#[test]
fn test_install_default_only_from_no_camera() {
    let keys = make_keys(2);
    let mut registry = CameraRegistry::new();

    assert!(registry.install_default(keys[0]));
    assert_eq!(registry.default_state(), DefaultCameraState::DefaultActive(keys[0]));
    assert_eq!(registry.default_camera(), Some(keys[0]));
    assert_eq!(registry.active_camera(), Some(keys[0]));

    assert!(!registry.install_default(keys[1]));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_install_default_refused_when_cameras_exist() {
    let keys = make_keys(2);
    let mut registry = CameraRegistry::new();
    registry.register_camera(keys[0], false);

    assert!(!registry.install_default(keys[1]));
    assert_eq!(registry.default_state(), DefaultCameraState::NoCamera);
}

#[test]
fn test_second_camera_evicts_default() {
    let keys = make_keys(2);
    let mut registry = CameraRegistry::new();
    registry.install_default(keys[0]);

    let evicted = registry.register_camera(keys[1], false);

    assert_eq!(evicted, Some(keys[0]));
    assert_eq!(registry.cameras(), &[keys[1]]);
    assert_eq!(registry.active_camera(), Some(keys[1]));
    assert_eq!(registry.default_state(), DefaultCameraState::UserActive);
}

#[test]
fn test_reregistering_default_does_not_evict_it() {
    let keys = make_keys(1);
    let mut registry = CameraRegistry::new();
    registry.install_default(keys[0]);

    assert_eq!(registry.register_camera(keys[0], true), None);
    assert_eq!(registry.default_camera(), Some(keys[0]));
}

#[test]
fn test_default_never_reinstalled_after_user_active() {
    let keys = make_keys(3);
    let mut registry = CameraRegistry::new();
    registry.install_default(keys[0]);
    registry.register_camera(keys[1], false);
    registry.deregister_camera(keys[1]);

    assert!(registry.is_empty());
    assert!(!registry.install_default(keys[2]));
    assert_eq!(registry.default_state(), DefaultCameraState::UserActive);
}

#[test]
fn test_deregistering_default_retires_it() {
    let keys = make_keys(1);
    let mut registry = CameraRegistry::new();
    registry.install_default(keys[0]);

    assert!(registry.deregister_camera(keys[0]));
    assert_eq!(registry.default_state(), DefaultCameraState::UserActive);
    assert_eq!(registry.default_camera(), None);
}

#[test]
fn test_mark_user_active() {
    let mut registry = CameraRegistry::new();
    registry.mark_user_active();
    assert_eq!(registry.default_state(), DefaultCameraState::UserActive);
}

// ============================================================================
// Watchers
// ============================================================================

#[test]
fn test_watchers_notified_on_change_only() {
    let keys = make_keys(2);
    let mut registry = CameraRegistry::new();
    let seen: Rc<RefCell<Vec<(usize, Option<NodeKey>)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    registry.watch(move |change| sink.borrow_mut().push((change.cameras.len(), change.active)));

    registry.register_camera(keys[0], false);
    registry.register_camera(keys[0], false);
    registry.register_camera(keys[1], true);
    registry.set_active_camera(keys[1]);

    assert_eq!(*seen.borrow(), vec![(1, Some(keys[0])), (2, Some(keys[1]))]);
}

#[test]
fn test_unwatch_stops_notifications() {
    let keys = make_keys(1);
    let mut registry = CameraRegistry::new();
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    let id = registry.watch(move |_| *sink.borrow_mut() += 1);

    assert!(registry.unwatch(id));
    assert!(!registry.unwatch(id));
    registry.register_camera(keys[0], false);

    assert_eq!(*count.borrow(), 0);
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn test_active_camera_always_registered_or_unset() {
    let keys = make_keys(5);
    let mut registry = CameraRegistry::new();
    registry.install_default(keys[0]);

    // Deterministic pseudo-random operation sequence
    let mut seed: u32 = 0x2545_f491;
    for _ in 0..500 {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let key = keys[(seed >> 8) as usize % keys.len()];
        match (seed >> 20) % 3 {
            0 => {
                registry.register_camera(key, (seed >> 4) & 1 == 1);
            }
            1 => {
                registry.deregister_camera(key);
            }
            _ => {
                registry.set_active_camera(key);
            }
        }

        match registry.active_camera() {
            Some(active) => assert!(registry.cameras().contains(&active)),
            None => assert!(registry.is_empty()),
        }
        // Once evicted, the default is never back as the default
        if registry.default_state() == DefaultCameraState::UserActive {
            assert_eq!(registry.default_camera(), None);
        }
    }
}

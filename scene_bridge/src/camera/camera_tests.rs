use glam::{Mat4, Vec3};
use super::*;

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_camera_default_is_fallback_perspective() {
    let camera = Camera::default();
    assert!(camera.is_perspective());
    assert_eq!(*camera.projection(), Projection::Perspective {
        fov_y_degrees: DEFAULT_FOV_DEGREES,
        aspect: 1.0,
        near: DEFAULT_NEAR,
        far: DEFAULT_FAR,
    });
}

#[test]
fn test_camera_orthographic() {
    let camera = Camera::orthographic(-2.0, 2.0, -1.0, 1.0, 0.5, 50.0);
    assert!(!camera.is_perspective());
}

// ============================================================================
// Matrices
// ============================================================================

#[test]
fn test_perspective_projection_matrix() {
    let camera = Camera::perspective(60.0, 16.0 / 9.0, 0.1, 100.0);
    let expected = Mat4::perspective_rh(60.0_f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
    assert_eq!(camera.projection_matrix(), expected);
}

#[test]
fn test_orthographic_projection_matrix() {
    let camera = Camera::orthographic(-2.0, 2.0, -1.0, 1.0, 0.5, 50.0);
    let expected = Mat4::orthographic_rh(-2.0, 2.0, -1.0, 1.0, 0.5, 50.0);
    assert_eq!(camera.projection_matrix(), expected);
}

#[test]
fn test_view_matrix_is_inverse_of_world() {
    let world = Mat4::from_translation(Vec3::new(3.0, 3.0, 3.0));
    let view = Camera::view_matrix_from_world(&world);
    let origin_in_view = view.transform_point3(Vec3::new(3.0, 3.0, 3.0));
    assert!(origin_in_view.abs_diff_eq(Vec3::ZERO, 1e-6));
}

// ============================================================================
// Setters
// ============================================================================

#[test]
fn test_set_aspect_perspective() {
    let mut camera = Camera::default();
    camera.set_aspect(2.0);
    match camera.projection() {
        Projection::Perspective { aspect, .. } => assert_eq!(*aspect, 2.0),
        other => panic!("unexpected projection: {:?}", other),
    }
}

#[test]
fn test_set_aspect_and_fov_ignored_for_orthographic() {
    let mut camera = Camera::orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0);
    let before = camera.clone();
    camera.set_aspect(3.0);
    camera.set_fov(90.0);
    assert_eq!(camera, before);
}

#[test]
fn test_set_near_far_both_projections() {
    let mut perspective = Camera::default();
    perspective.set_near(1.0);
    perspective.set_far(10.0);
    match perspective.projection() {
        Projection::Perspective { near, far, .. } => {
            assert_eq!((*near, *far), (1.0, 10.0));
        }
        other => panic!("unexpected projection: {:?}", other),
    }

    let mut ortho = Camera::orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0);
    ortho.set_near(2.0);
    ortho.set_far(20.0);
    match ortho.projection() {
        Projection::Orthographic { near, far, .. } => {
            assert_eq!((*near, *far), (2.0, 20.0));
        }
        other => panic!("unexpected projection: {:?}", other),
    }
}

#[test]
fn test_set_fov() {
    let mut camera = Camera::default();
    camera.set_fov(75.0);
    match camera.projection() {
        Projection::Perspective { fov_y_degrees, .. } => assert_eq!(*fov_y_degrees, 75.0),
        other => panic!("unexpected projection: {:?}", other),
    }
}

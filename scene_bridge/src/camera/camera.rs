/// Camera: projection parameters attached to a scene node.
///
/// Position and orientation come from the owning node's transform; the
/// Camera only stores how the view volume is projected. The view matrix is
/// the inverse of the node's world matrix (see `view_matrix_from_world`).

use glam::Mat4;

/// Field of view used by the fallback camera (degrees)
pub const DEFAULT_FOV_DEGREES: f32 = 45.0;
/// Near plane used by the fallback camera
pub const DEFAULT_NEAR: f32 = 0.1;
/// Far plane used by the fallback camera
pub const DEFAULT_FAR: f32 = 1000.0;

/// Projection model of a camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees
        fov_y_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

/// Camera projection data
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    projection: Projection,
}

impl Camera {
    /// Perspective camera. `aspect` is width / height.
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            projection: Projection::Perspective { fov_y_degrees, aspect, near, far },
        }
    }

    /// Orthographic camera with explicit frustum bounds
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self {
            projection: Projection::Orthographic { left, right, bottom, top, near, far },
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn is_perspective(&self) -> bool {
        matches!(self.projection, Projection::Perspective { .. })
    }

    /// Projection matrix (right-handed, depth 0..1)
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov_y_degrees, aspect, near, far } => {
                Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, near, far)
            }
            Projection::Orthographic { left, right, bottom, top, near, far } => {
                Mat4::orthographic_rh(left, right, bottom, top, near, far)
            }
        }
    }

    /// View matrix for a camera whose node has the given world matrix
    pub fn view_matrix_from_world(world: &Mat4) -> Mat4 {
        world.inverse()
    }

    // ===== SETTERS =====

    /// Update the aspect ratio. Ignored for orthographic cameras.
    pub fn set_aspect(&mut self, new_aspect: f32) {
        if let Projection::Perspective { aspect, .. } = &mut self.projection {
            *aspect = new_aspect;
        }
    }

    /// Update the vertical field of view. Ignored for orthographic cameras.
    pub fn set_fov(&mut self, degrees: f32) {
        if let Projection::Perspective { fov_y_degrees, .. } = &mut self.projection {
            *fov_y_degrees = degrees;
        }
    }

    pub fn set_near(&mut self, value: f32) {
        match &mut self.projection {
            Projection::Perspective { near, .. } | Projection::Orthographic { near, .. } => *near = value,
        }
    }

    pub fn set_far(&mut self, value: f32) {
        match &mut self.projection {
            Projection::Perspective { far, .. } | Projection::Orthographic { far, .. } => *far = value,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(DEFAULT_FOV_DEGREES, 1.0, DEFAULT_NEAR, DEFAULT_FAR)
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;

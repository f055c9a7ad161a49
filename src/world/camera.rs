use glam::{Mat2, Vec2};

/// Smallest |direction × camera| accepted as a usable view basis.
const MIN_DETERMINANT: f32 = 1e-6;

/// Player view-point on the grid.
///
/// * `position` is in cell units (cell `(3, 4)` spans `3.0..4.0 × 4.0..5.0`).
/// * `direction` is the forward vector, `camera` the projection plane; the
///   ratio of their lengths sets the horizontal field of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entity {
    pub position: Vec2,
    pub direction: Vec2,
    pub camera: Vec2,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EntityError {
    /// `direction` and `camera` are (nearly) parallel.
    #[error("degenerate view basis: direction {direction} parallel to camera plane {camera}")]
    DegenerateBasis { direction: Vec2, camera: Vec2 },

    #[error("entity vector is not finite")]
    NotFinite,
}

impl Entity {
    /// Create an entity, rejecting bases the sprite projection cannot invert.
    pub fn new(position: Vec2, direction: Vec2, camera: Vec2) -> Result<Self, EntityError> {
        let e = Self {
            position,
            direction,
            camera,
        };
        e.validate()?;
        Ok(e)
    }

    /// Entity at `position` looking along `yaw` (radians, 0 = +X) with
    /// horizontal field of view `fov`.
    pub fn from_angle(position: Vec2, yaw: f32, fov: f32) -> Result<Self, EntityError> {
        let direction = Vec2::from_angle(yaw);
        // plane is to the right of forward in screen space (+Y grows downward)
        let camera = direction.perp() * (fov * 0.5).tan();
        Self::new(position, direction, camera)
    }

    /// Check the invariants the renderer relies on.
    pub fn validate(&self) -> Result<(), EntityError> {
        if !(self.position.is_finite() && self.direction.is_finite() && self.camera.is_finite()) {
            return Err(EntityError::NotFinite);
        }
        if self.determinant().abs() < MIN_DETERMINANT {
            return Err(EntityError::DegenerateBasis {
                direction: self.direction,
                camera: self.camera,
            });
        }
        Ok(())
    }

    /// Determinant of the `[camera, direction]` basis.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.camera.perp_dot(self.direction)
    }

    /// Inverse of the `[camera, direction]` basis, `None` when degenerate.
    ///
    /// Multiplying a camera-relative offset by this matrix yields
    /// `(lateral, depth)` in view space.
    #[inline]
    pub fn view_basis(&self) -> Option<Mat2> {
        if self.determinant().abs() < MIN_DETERMINANT {
            return None;
        }
        Some(Mat2::from_cols(self.camera, self.direction).inverse())
    }

    /// Transform a world point into view space:
    ///  .x = lateral offset in camera-plane units
    ///  .y = depth along `direction`
    #[inline]
    pub fn to_view(&self, p: Vec2) -> Option<Vec2> {
        self.view_basis().map(|inv| inv * (p - self.position))
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe, + = right).
    pub fn step(&mut self, forward: f32, side: f32) {
        let f = self.direction.normalize_or_zero();
        let r = self.camera.normalize_or_zero();
        self.position += f * forward + r * side;
    }

    /// Rotate direction and camera plane together (positive = towards the plane).
    pub fn turn(&mut self, delta_yaw: f32) {
        let rot = Vec2::from_angle(delta_yaw);
        self.direction = rot.rotate(self.direction);
        self.camera = rot.rotate(self.camera);
    }

    /// Grid cell the entity stands in.
    #[inline]
    pub fn cell(&self) -> glam::IVec2 {
        self.position.floor().as_ivec2()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn from_angle_builds_perpendicular_plane() {
        let e = Entity::from_angle(Vec2::ZERO, 0.3, FRAC_PI_2).unwrap();
        assert!((e.direction.length() - 1.0).abs() < 1e-5);
        // tan(45°) = 1 → plane as long as direction
        assert!((e.camera.length() - 1.0).abs() < 1e-5);
        assert!(e.direction.dot(e.camera).abs() < 1e-5);
    }

    #[test]
    fn parallel_basis_rejected() {
        let err = Entity::new(Vec2::ZERO, vec2(1.0, 0.0), vec2(2.0, 0.0)).unwrap_err();
        assert!(matches!(err, EntityError::DegenerateBasis { .. }));
        let nan = Entity::new(vec2(f32::NAN, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0));
        assert_eq!(nan.unwrap_err(), EntityError::NotFinite);
    }

    #[test]
    fn to_view_axes_align() {
        let e = Entity::new(Vec2::ZERO, vec2(1.0, 0.0), vec2(0.0, 0.66)).unwrap();
        // straight ahead → (lateral 0, depth 10)
        let v = e.to_view(vec2(10.0, 0.0)).unwrap();
        assert!((v - vec2(0.0, 10.0)).length() < 1e-5);
        // on the plane side → positive lateral, zero depth
        let v = e.to_view(vec2(0.0, 0.66)).unwrap();
        assert!((v - vec2(1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn turn_keeps_basis_orthogonal() {
        let mut e = Entity::from_angle(vec2(2.5, 2.5), 0.0, FRAC_PI_2).unwrap();
        e.turn(FRAC_PI_2);
        assert!((e.direction - vec2(0.0, 1.0)).length() < 1e-5);
        assert!(e.direction.dot(e.camera).abs() < 1e-5);
        e.step(1.0, 0.0);
        assert!((e.position - vec2(2.5, 3.5)).length() < 1e-5);
        assert_eq!(e.cell(), glam::IVec2::new(2, 3));
    }
}

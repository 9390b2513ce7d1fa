use bon::bon;
use nalgebra::Unit;

use crate::geometry::{EPSILON, FloatType, Ray, WorldPoint, WorldVector};

/// Pinhole camera: maps normalized screen coordinates to primary rays.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    center: WorldPoint,
    forward: WorldVector,
    up: WorldVector,
    right: WorldVector,
}

#[bon]
impl Camera {
    #[builder]
    pub fn new(center: WorldPoint, forward: WorldVector, up: WorldVector) -> Camera {
        let forward = Unit::try_new(forward, EPSILON).expect("Forward vector must be non-zero");
        let right = Unit::try_new(forward.cross(&up), EPSILON)
            .expect("`up` and `forward` must be linearly independent");
        // Re-orthogonalize so the frame stays orthonormal even when the
        // caller's up vector is only approximate.
        let up = right.cross(&forward);

        Camera {
            center,
            forward: forward.into_inner(),
            up,
            right: right.into_inner(),
        }
    }
}

impl Camera {
    /// Primary ray through screen coordinates `(u, v) ∈ [−1, 1]²`, where
    /// `(−1, −1)` is the bottom-left corner of the image plane. The returned
    /// ray covers `t ∈ [0, +∞)`.
    pub fn ray(&self, u: FloatType, v: FloatType) -> Ray {
        Ray::new(self.center, self.forward + self.right * u + self.up * v)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use assert2::assert;

    fn reference_camera() -> Camera {
        Camera::builder()
            .center(WorldPoint::new(0.0, 1.0, 3.0))
            .forward(WorldVector::new(0.0, 0.0, -1.0))
            .up(WorldVector::new(0.0, 1.0, 0.0))
            .build()
    }

    #[test]
    fn center_ray_looks_forward() {
        let ray = reference_camera().ray(0.0, 0.0);
        assert!(ray.origin == WorldPoint::new(0.0, 1.0, 3.0));
        assert!(ray.direction == WorldVector::new(0.0, 0.0, -1.0));
        assert!(ray.tmin == 0.0);
        assert!(ray.tmax == FloatType::INFINITY);
    }

    #[test]
    fn screen_axes_pan_the_direction() {
        let camera = reference_camera();
        let center = camera.ray(0.0, 0.0);
        let left = camera.ray(-1.0, 0.0);
        let right = camera.ray(1.0, 0.0);
        let top = camera.ray(0.0, 1.0);
        assert!(left.direction.x < center.direction.x);
        assert!(right.direction.x > center.direction.x);
        assert!(top.direction.y > center.direction.y);
    }

    #[test]
    fn corner_ray_matches_the_camera_frame() {
        // With forward (0,0,-1) and up (0,1,0), right is (1,0,0).
        let ray = reference_camera().ray(1.0, 1.0);
        assert_relative_eq!(ray.direction.x, 1.0);
        assert_relative_eq!(ray.direction.y, 1.0);
        assert_relative_eq!(ray.direction.z, -1.0);
    }

    #[test]
    fn sloppy_up_vector_is_reorthogonalized() {
        let camera = Camera::builder()
            .center(WorldPoint::origin())
            .forward(WorldVector::new(0.0, 0.0, -1.0))
            .up(WorldVector::new(0.1, 1.0, -0.2))
            .build();
        let ray = camera.ray(0.0, 0.0);
        assert_relative_eq!(ray.direction.z, -1.0);
    }

    #[test]
    #[should_panic]
    fn parallel_up_and_forward_panic() {
        let _ = Camera::builder()
            .center(WorldPoint::origin())
            .forward(WorldVector::new(0.0, 1.0, 0.0))
            .up(WorldVector::new(0.0, 2.0, 0.0))
            .build();
    }
}

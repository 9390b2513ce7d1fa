mod aabb;
mod ray_box_intersection;
mod ray_triangle_intersection;
mod triangle;

use nalgebra::{Point3, Vector3};

pub use aabb::Aabb;
pub use ray_box_intersection::RayIntersectionExt;
pub use triangle::Triangle;

pub type FloatType = f32;

/// Tolerance for geometric sanity checks (camera setup and the like).
/// Not machine epsilon; the intersection routines use no tolerances at all.
pub const EPSILON: FloatType = 1e-6;

pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;

/// Inverse of `x`, with `|x|` clamped up to machine epsilon while keeping the
/// sign of `x`. The result is always finite and nonzero, so multiplying by it
/// never produces a NaN out of thin air.
pub fn safe_inverse(x: FloatType) -> FloatType {
    if x.abs() <= FloatType::EPSILON {
        (1.0 / FloatType::EPSILON).copysign(x)
    } else {
        1.0 / x
    }
}

/// Ray with an active `t` interval.
///
/// `tmax` is in-out state: every accepted primitive intersection shrinks it,
/// so later tests implicitly reject anything farther than the best hit so
/// far. `tmin` is never written. The direction does not have to be
/// unit-length; all intersection routines are scale-invariant in it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: WorldPoint,
    pub direction: WorldVector,
    pub tmin: FloatType,
    pub tmax: FloatType,
}

impl Ray {
    /// Ray over the whole positive half-line, `t ∈ [0, +∞)`.
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        Ray::with_range(origin, direction, 0.0, FloatType::INFINITY)
    }

    pub fn with_range(
        origin: WorldPoint,
        direction: WorldVector,
        tmin: FloatType,
        tmax: FloatType,
    ) -> Ray {
        Ray {
            origin,
            direction,
            tmin,
            tmax,
        }
    }

    /// Componentwise `safe_inverse` of the direction. Finite and nonzero in
    /// every lane, even for rays running parallel to an axis plane.
    pub fn inv_direction(&self) -> WorldVector {
        self.direction.map(safe_inverse)
    }

    pub fn point_at(&self, t: FloatType) -> WorldPoint {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;
    use test_case::test_case;

    #[test_case(2.0, 0.5 ; "regular")]
    #[test_case(-4.0, -0.25 ; "negative")]
    fn safe_inverse_regular(x: FloatType, expected: FloatType) {
        assert!(safe_inverse(x) == expected);
    }

    #[test_case(0.0 ; "positive_zero")]
    #[test_case(-0.0 ; "negative_zero")]
    #[test_case(FloatType::EPSILON / 2.0 ; "positive_subnormal")]
    #[test_case(-FloatType::EPSILON / 2.0 ; "negative_subnormal")]
    fn safe_inverse_near_zero_is_finite(x: FloatType) {
        let inv = safe_inverse(x);
        assert!(inv.is_finite());
        assert!(inv != 0.0);
        assert!(inv.is_sign_positive() == x.is_sign_positive());
    }

    #[test]
    fn inv_direction_of_axis_parallel_ray_is_finite() {
        let ray = Ray::new(WorldPoint::origin(), WorldVector::new(1.0, 0.0, 0.0));
        let inv = ray.inv_direction();
        assert!(inv.x == 1.0);
        assert!(inv.y.is_finite());
        assert!(inv.z.is_finite());
    }

    #[test]
    fn point_at_walks_along_direction() {
        let ray = Ray::new(
            WorldPoint::new(1.0, 2.0, 3.0),
            WorldVector::new(0.0, 0.0, -2.0),
        );
        assert!(ray.point_at(0.5) == WorldPoint::new(1.0, 2.0, 2.0));
    }
}

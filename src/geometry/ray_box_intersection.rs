use crate::geometry::{Aabb, FloatType, Ray};

/// Min/max that fall back to the right operand when the comparison fails.
/// In the reductions below the accumulator sits on the right, so a NaN on the
/// left is discarded instead of poisoning the interval.
fn robust_min(a: FloatType, b: FloatType) -> FloatType {
    if a < b {
        a
    } else {
        b
    }
}

fn robust_max(a: FloatType, b: FloatType) -> FloatType {
    if a > b {
        a
    } else {
        b
    }
}

pub trait RayIntersectionExt {
    /// First and last intersection distance along the ray, clipped to the
    /// ray's `[tmin, tmax]` interval. The target is hit iff the returned
    /// interval is non-empty (`enter <= exit`).
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType);
}

impl RayIntersectionExt for Aabb {
    /// Slab test. `inv_direction` is finite and nonzero by construction, so
    /// axis-parallel rays produce infinite slab distances of the correct
    /// sign instead of NaNs, and grazing hits are never lost.
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType) {
        let inv = ray.inv_direction();
        let t_lo = (self.min - ray.origin).component_mul(&inv);
        let t_hi = (self.max - ray.origin).component_mul(&inv);
        let t_near = t_lo.inf(&t_hi);
        let t_far = t_lo.sup(&t_hi);
        (
            robust_max(t_near.x, robust_max(t_near.y, robust_max(t_near.z, ray.tmin))),
            robust_min(t_far.x, robust_min(t_far.y, robust_min(t_far.z, ray.tmax))),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{WorldPoint, WorldVector};
    use assert2::assert;
    use test_case::test_case;

    fn unit_cube_at_5() -> Aabb {
        Aabb::new(WorldPoint::new(5.0, 5.0, 5.0), WorldPoint::new(10.0, 10.0, 10.0))
    }

    fn hits(bbox: &Aabb, ray: &Ray) -> bool {
        let (enter, exit) = bbox.intersect(ray);
        enter <= exit
    }

    #[test]
    fn straight_through() {
        let ray = Ray::new(
            WorldPoint::new(7.0, 7.0, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );
        let (enter, exit) = unit_cube_at_5().intersect(&ray);
        assert!((enter, exit) == (5.0, 10.0));
    }

    #[test]
    fn interval_respects_unnormalized_direction() {
        let ray = Ray::new(
            WorldPoint::new(7.0, 7.0, 0.0),
            WorldVector::new(0.0, 0.0, 2.0),
        );
        let (enter, exit) = unit_cube_at_5().intersect(&ray);
        assert!((enter, exit) == (2.5, 5.0));
    }

    /// Rays running exactly along a face or an edge of the box must still
    /// report the hit.
    #[test_case(5.0, 5.0 ; "edge")]
    #[test_case(5.0, 7.0 ; "face")]
    #[test_case(10.0, 10.0 ; "far_edge")]
    fn axis_aligned_graze_is_a_hit(px: FloatType, py: FloatType) {
        let ray = Ray::new(
            WorldPoint::new(px, py, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );
        assert!(hits(&unit_cube_at_5(), &ray));
    }

    /// A ray with a zero direction component aimed at a box that is flat on
    /// that same axis: `safe_inverse` keeps the slab distances meaningful.
    #[test]
    fn flat_box_zero_component_direction() {
        let slab = Aabb::new(WorldPoint::new(5.0, 7.0, 5.0), WorldPoint::new(10.0, 7.0, 10.0));
        let ray = Ray::new(
            WorldPoint::new(0.0, 7.0, 7.0),
            WorldVector::new(1.0, 0.0, 0.0),
        );
        assert!(hits(&slab, &ray));
    }

    /// Axis-parallel rays starting outside the matching slab must miss, no
    /// matter how they move on the other axes.
    #[test_case(0.0, 7.0, 7.0, 0.0, 1.0, 0.0 ; "low_x")]
    #[test_case(12.0, 7.0, 7.0, 0.0, 1.0, 0.0 ; "high_x")]
    #[test_case(7.0, 0.0, 7.0, 1.0, 0.0, 0.0 ; "low_y")]
    #[test_case(7.0, 12.0, 7.0, 1.0, 0.0, 1.0 ; "high_y")]
    fn parallel_outside_slab_misses(
        px: FloatType,
        py: FloatType,
        pz: FloatType,
        dx: FloatType,
        dy: FloatType,
        dz: FloatType,
    ) {
        let ray = Ray::new(WorldPoint::new(px, py, pz), WorldVector::new(dx, dy, dz));
        assert!(!hits(&unit_cube_at_5(), &ray));
    }

    #[test]
    fn box_behind_origin_misses() {
        let ray = Ray::new(
            WorldPoint::new(7.0, 7.0, 20.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );
        assert!(!hits(&unit_cube_at_5(), &ray));
    }

    #[test]
    fn interval_is_clipped_by_ray_range() {
        let ray = Ray::with_range(
            WorldPoint::new(7.0, 7.0, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
            6.0,
            8.0,
        );
        let (enter, exit) = unit_cube_at_5().intersect(&ray);
        assert!((enter, exit) == (6.0, 8.0));
    }

    #[test]
    fn clipping_can_empty_the_interval() {
        let ray = Ray::with_range(
            WorldPoint::new(7.0, 7.0, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
            0.0,
            4.0,
        );
        assert!(!hits(&unit_cube_at_5(), &ray));
    }

    #[test]
    fn negative_direction_hits_box_behind() {
        let ray = Ray::new(
            WorldPoint::new(7.0, 7.0, 20.0),
            WorldVector::new(0.0, 0.0, -1.0),
        );
        let (enter, exit) = unit_cube_at_5().intersect(&ray);
        assert!((enter, exit) == (10.0, 15.0));
    }
}

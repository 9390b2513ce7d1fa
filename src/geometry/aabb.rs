use crate::geometry::{FloatType, WorldPoint, WorldVector};

/// Axis-aligned bounding box.
///
/// A non-empty box satisfies `min[i] <= max[i]` on every axis. The empty box
/// is the sentinel `min = +inf, max = -inf`: extending it by any point or box
/// yields the bound of the operand.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: WorldPoint,
    pub max: WorldPoint,
}

impl Aabb {
    pub fn new(min: WorldPoint, max: WorldPoint) -> Aabb {
        Aabb { min, max }
    }

    pub fn from_point(point: WorldPoint) -> Aabb {
        Aabb::new(point, point)
    }

    pub fn empty() -> Aabb {
        Aabb::new(
            WorldPoint::new(
                FloatType::INFINITY,
                FloatType::INFINITY,
                FloatType::INFINITY,
            ),
            WorldPoint::new(
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
            ),
        )
    }

    pub fn extend(&mut self, other: &Aabb) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    pub fn extend_point(&mut self, point: &WorldPoint) {
        self.extend(&Aabb::from_point(*point));
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut result = *self;
        result.extend(other);
        result
    }

    pub fn diagonal(&self) -> WorldVector {
        self.max - self.min
    }

    /// Surface area divided by two; the quantity the SAH cost model and the
    /// PLOC merge distance are expressed in.
    pub fn half_area(&self) -> FloatType {
        let d = self.diagonal();
        (d.x + d.y) * d.z + d.x * d.y
    }

    /// Axis with the largest extent; the earlier axis wins ties.
    pub fn largest_axis(&self) -> usize {
        let d = self.diagonal();
        let mut axis = 0;
        if d[axis] < d[1] {
            axis = 1;
        }
        if d[axis] < d[2] {
            axis = 2;
        }
        axis
    }
}

use crate::geometry::{Aabb, WorldPoint};

/// Triangle stored as three world-space vertices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    pub p0: WorldPoint,
    pub p1: WorldPoint,
    pub p2: WorldPoint,
}

impl Triangle {
    pub fn new(p0: WorldPoint, p1: WorldPoint, p2: WorldPoint) -> Triangle {
        Triangle { p0, p1, p2 }
    }

    /// Arithmetic mean of the vertices, the proxy point used for
    /// partitioning during BVH construction.
    pub fn centroid(&self) -> WorldPoint {
        WorldPoint::from((self.p0.coords + self.p1.coords + self.p2.coords) / 3.0)
    }

    pub fn aabb(&self) -> Aabb {
        let mut bbox = Aabb::from_point(self.p0);
        bbox.extend_point(&self.p1);
        bbox.extend_point(&self.p2);
        bbox
    }
}

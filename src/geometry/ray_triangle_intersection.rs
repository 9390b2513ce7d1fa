use crate::geometry::{Ray, Triangle};

impl Triangle {
    /// Möller–Trumbore intersection.
    ///
    /// On a hit, `ray.tmax` is advanced to the hit distance in place and
    /// `true` is returned; the caller is responsible for remembering which
    /// primitive produced the hit. The comparisons are written so that a NaN
    /// in `t`, `u` or `v` (degenerate or NaN triangles, rays in the triangle
    /// plane) makes the test fail instead of accepting garbage.
    pub fn intersect(&self, ray: &mut Ray) -> bool {
        let e1 = self.p0 - self.p1;
        let e2 = self.p2 - self.p0;
        let n = e1.cross(&e2);

        let c = self.p0 - ray.origin;
        let r = ray.direction.cross(&c);
        let inv_det = 1.0 / n.dot(&ray.direction);

        let u = r.dot(&e2) * inv_det;
        let v = r.dot(&e1) * inv_det;
        let w = 1.0 - u - v;

        if u >= 0.0 && v >= 0.0 && w >= 0.0 {
            let t = n.dot(&c) * inv_det;
            if t >= ray.tmin && t <= ray.tmax {
                ray.tmax = t;
                return true;
            }
        }

        false
    }
}

use super::{Bvh, Hit, Primitive};
use crate::geometry::{Ray, RayIntersectionExt as _};

impl Bvh {
    /// Closest-hit query for a single ray.
    ///
    /// Walks the tree depth-first with an explicit stack. Every accepted
    /// primitive intersection shrinks `ray.tmax`, so box tests against
    /// nodes popped later automatically cull subtrees behind the best hit.
    /// After the call, `ray.tmax` is the closest hit distance (or untouched
    /// on a miss); the other ray fields are never written.
    pub fn traverse<P: Primitive>(&self, ray: &mut Ray, prims: &[P]) -> Option<Hit> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut hit = None;
        let mut stack = vec![0u32];
        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index as usize];
            let (t_enter, t_exit) = node.bbox.intersect(ray);
            if t_enter > t_exit {
                continue;
            }

            if node.is_leaf() {
                for slot in node.first_index..node.first_index + node.prim_count {
                    let prim_index = self.prim_indices[slot as usize];
                    if prims[prim_index as usize].intersect(ray) {
                        hit = Some(Hit { prim_index });
                    }
                }
            } else {
                stack.push(node.first_index);
                stack.push(node.first_index + 1);
            }
        }
        hit
    }
}

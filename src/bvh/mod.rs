mod binned_sah;
mod ploc;
mod printing;
mod traversal;

pub use binned_sah::SahConfig;
pub use ploc::PlocConfig;

use crate::geometry::{Aabb, Ray, Triangle};

/// Something the traversal can test a ray against, keyed by position in the
/// primitive table. A hit must advance `ray.tmax` to the hit distance.
pub trait Primitive {
    fn intersect(&self, ray: &mut Ray) -> bool;
}

impl Primitive for Triangle {
    fn intersect(&self, ray: &mut Ray) -> bool {
        Triangle::intersect(self, ray)
    }
}

/// Closest intersection found by a traversal: the index of the primitive in
/// the table handed to [`Bvh::traverse`]. The hit distance itself lives in
/// the ray's `tmax`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    pub prim_index: u32,
}

/// One node of the flattened tree. The layout is contractual: 32 bytes, with
/// `prim_count == 0` marking an internal node. For internal nodes
/// `first_index` is the left child in the node array and the right child sits
/// at `first_index + 1`; for leaves it is the start of the node's range in
/// the primitive-index permutation.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    pub bbox: Aabb,
    pub prim_count: u32,
    pub first_index: u32,
}

impl Node {
    fn placeholder() -> Node {
        Node {
            bbox: Aabb::empty(),
            prim_count: 0,
            first_index: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.prim_count != 0
    }
}

/// Pointer-free bounding volume hierarchy over a set of primitives.
///
/// `nodes[0]` is the root; children always sit at larger indices than their
/// parent, so the array is forward-referencing and can be serialized as-is.
/// `prim_indices` is a permutation of the input primitive indices, and every
/// leaf owns a contiguous slice of it. Both builders produce this same
/// format; an empty input produces an empty tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bvh {
    pub nodes: Vec<Node>,
    pub prim_indices: Vec<u32>,
}

impl Bvh {
    /// Maximum depth of the tree; 0 for the empty tree, 1 for a single leaf.
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            0
        } else {
            self.depth_below(0)
        }
    }

    fn depth_below(&self, node_index: u32) -> usize {
        let node = &self.nodes[node_index as usize];
        if node.is_leaf() {
            1
        } else {
            1 + self
                .depth_below(node.first_index)
                .max(self.depth_below(node.first_index + 1))
        }
    }
}

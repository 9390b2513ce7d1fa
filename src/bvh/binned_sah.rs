use itertools::partition;

use super::{Bvh, Node};
use crate::geometry::{Aabb, FloatType, WorldPoint};

/// Tuning options of the top-down binned SAH builder.
#[derive(Copy, Clone, Debug)]
pub struct SahConfig {
    /// Nodes with fewer primitives than this become leaves unconditionally.
    pub min_prims: usize,
    /// Nodes with more primitives than this are split even when the SAH
    /// rejects every candidate (median fallback).
    pub max_prims: usize,
    /// Cost of visiting a node, in units where intersecting one primitive
    /// costs 1.
    pub traversal_cost: FloatType,
    /// Number of bins per axis.
    pub bin_count: usize,
}

impl Default for SahConfig {
    fn default() -> SahConfig {
        SahConfig {
            min_prims: 2,
            max_prims: 8,
            traversal_cost: 1.0,
            bin_count: 16,
        }
    }
}

#[derive(Clone)]
struct Bin {
    bbox: Aabb,
    prim_count: usize,
}

impl Bin {
    fn empty() -> Bin {
        Bin {
            bbox: Aabb::empty(),
            prim_count: 0,
        }
    }

    fn extend(&mut self, other: &Bin) {
        self.bbox.extend(&other.bbox);
        self.prim_count += other.prim_count;
    }

    /// SAH cost of a subtree kept as one flat group. NaN when the bin is
    /// empty, which every comparison below treats as "worse than anything".
    fn cost(&self) -> FloatType {
        self.bbox.half_area() * self.prim_count as FloatType
    }
}

/// Candidate object split: everything in bins `< right_bin` goes left.
/// `right_bin == 0` encodes "no valid split found"; such a candidate loses
/// against any real one.
#[derive(Copy, Clone, Debug)]
struct Split {
    axis: usize,
    cost: FloatType,
    right_bin: usize,
}

impl Split {
    fn none() -> Split {
        Split {
            axis: 0,
            cost: FloatType::MAX,
            right_bin: 0,
        }
    }

    fn is_valid(&self) -> bool {
        self.right_bin != 0
    }

    fn is_better_than(&self, other: &Split) -> bool {
        self.is_valid() && self.cost < other.cost
    }
}

fn bin_index(axis: usize, bbox: &Aabb, center: &WorldPoint, bin_count: usize) -> usize {
    let scale = bin_count as FloatType / (bbox.max[axis] - bbox.min[axis]);
    let index = ((center[axis] - bbox.min[axis]) * scale) as i64;
    (index.max(0) as usize).min(bin_count - 1)
}

/// Sweeps the binned primitives of `node` along one axis and returns the
/// cheapest split between two bins. Right-side costs are accumulated into an
/// array back-to-front so the forward sweep can combine both sides in O(1).
fn find_best_split(
    axis: usize,
    bvh: &Bvh,
    node: &Node,
    bboxes: &[Aabb],
    centers: &[WorldPoint],
    config: &SahConfig,
) -> Split {
    let mut bins = vec![Bin::empty(); config.bin_count];
    for i in 0..node.prim_count as usize {
        let prim_index = bvh.prim_indices[node.first_index as usize + i] as usize;
        let bin = &mut bins[bin_index(axis, &node.bbox, &centers[prim_index], config.bin_count)];
        bin.bbox.extend(&bboxes[prim_index]);
        bin.prim_count += 1;
    }

    let mut right_cost = vec![FloatType::NAN; config.bin_count];
    let mut right_accum = Bin::empty();
    for i in (1..config.bin_count).rev() {
        right_accum.extend(&bins[i]);
        right_cost[i] = right_accum.cost();
    }

    let mut split = Split {
        axis,
        ..Split::none()
    };
    let mut left_accum = Bin::empty();
    for i in 0..config.bin_count - 1 {
        left_accum.extend(&bins[i]);
        let cost = left_accum.cost() + right_cost[i + 1];
        if cost < split.cost {
            split.cost = cost;
            split.right_bin = i + 1;
        }
    }
    split
}

fn build_recursive(
    bvh: &mut Bvh,
    node_index: usize,
    node_count: &mut usize,
    bboxes: &[Aabb],
    centers: &[WorldPoint],
    config: &SahConfig,
) {
    let (first_index, prim_count) = {
        let node = &bvh.nodes[node_index];
        debug_assert!(node.is_leaf());
        (node.first_index as usize, node.prim_count as usize)
    };

    let mut bbox = Aabb::empty();
    for i in first_index..first_index + prim_count {
        bbox.extend(&bboxes[bvh.prim_indices[i] as usize]);
    }
    bvh.nodes[node_index].bbox = bbox;

    if prim_count < config.min_prims {
        return;
    }

    let node = bvh.nodes[node_index];
    let mut best = Split::none();
    for axis in 0..3 {
        let candidate = find_best_split(axis, bvh, &node, bboxes, centers, config);
        if candidate.is_better_than(&best) {
            best = candidate;
        }
    }

    let leaf_cost = bbox.half_area() * (prim_count as FloatType - config.traversal_cost);
    let first_right = if !best.is_valid() || best.cost > leaf_cost {
        if prim_count > config.max_prims {
            // Too many primitives for a leaf even though the SAH found no
            // profitable split: median split along the largest axis.
            let axis = bbox.largest_axis();
            bvh.prim_indices[first_index..first_index + prim_count]
                .sort_by(|&i, &j| centers[i as usize][axis].total_cmp(&centers[j as usize][axis]));
            first_index + prim_count / 2
        } else {
            return;
        }
    } else {
        let bin_count = config.bin_count;
        first_index
            + partition(
                &mut bvh.prim_indices[first_index..first_index + prim_count],
                |&i| bin_index(best.axis, &node.bbox, &centers[i as usize], bin_count)
                    < best.right_bin,
            )
    };

    let first_child = *node_count;
    *node_count += 2;

    bvh.nodes[first_child] = Node {
        bbox: Aabb::empty(),
        prim_count: (first_right - first_index) as u32,
        first_index: first_index as u32,
    };
    bvh.nodes[first_child + 1] = Node {
        bbox: Aabb::empty(),
        prim_count: (prim_count - (first_right - first_index)) as u32,
        first_index: first_right as u32,
    };
    bvh.nodes[node_index].first_index = first_child as u32;
    bvh.nodes[node_index].prim_count = 0;

    build_recursive(bvh, first_child, node_count, bboxes, centers, config);
    build_recursive(bvh, first_child + 1, node_count, bboxes, centers, config);
}

impl Bvh {
    /// Builds the hierarchy top-down by recursive binned SAH splitting.
    ///
    /// `bboxes` and `centers` describe one primitive each; neither is
    /// retained. An empty input yields an empty tree.
    pub fn build_binned_sah(
        bboxes: &[Aabb],
        centers: &[WorldPoint],
        config: &SahConfig,
    ) -> Bvh {
        assert2::assert!(bboxes.len() == centers.len());
        let prim_count = bboxes.len();
        if prim_count == 0 {
            return Bvh::default();
        }

        let mut bvh = Bvh {
            nodes: vec![Node::placeholder(); 2 * prim_count - 1],
            prim_indices: (0..prim_count as u32).collect(),
        };
        bvh.nodes[0].prim_count = prim_count as u32;

        let mut node_count = 1;
        build_recursive(&mut bvh, 0, &mut node_count, bboxes, centers, config);
        bvh.nodes.truncate(node_count);
        bvh
    }
}

use morton_encoding::morton_encode;

use super::{Bvh, Node};
use crate::geometry::{Aabb, FloatType, WorldPoint};

/// Tuning options of the bottom-up PLOC builder.
#[derive(Copy, Clone, Debug)]
pub struct PlocConfig {
    /// How far to look for a merge partner on each side of a node in the
    /// Morton-ordered working sequence.
    pub search_radius: usize,
    /// Resolution of the quantization lattice per axis. Must fit in 16 bits.
    pub morton_grid_dim: u32,
}

impl Default for PlocConfig {
    fn default() -> PlocConfig {
        PlocConfig {
            search_radius: 14,
            morton_grid_dim: 1024,
        }
    }
}

/// Quantizes a centroid into the Morton lattice spanned by `bounds`.
/// Clamped to the lattice, and collapsed axes (or NaNs bred by them) land in
/// cell zero, which keeps the ordering deterministic for degenerate input.
fn grid_position(center: &WorldPoint, bounds: &Aabb, grid_dim: u32) -> [u16; 3] {
    let diagonal = bounds.diagonal();
    let mut cells = [0u16; 3];
    for (axis, cell) in cells.iter_mut().enumerate() {
        let scaled = (center[axis] - bounds.min[axis]) * (grid_dim as FloatType / diagonal[axis]);
        // max first: it turns a NaN (collapsed axis) into 0 before clamping.
        *cell = scaled.max(0.0).min((grid_dim - 1) as FloatType) as u16;
    }
    cells
}

/// Index of the best merge partner for `index`: the neighbor within the
/// search window whose union with it has the smallest half-area. Strict `<`
/// against the running minimum, so the first of equally good partners wins.
fn find_closest_node(nodes: &[Node], index: usize, search_radius: usize) -> usize {
    let begin = index.saturating_sub(search_radius);
    let end = (index + search_radius + 1).min(nodes.len());
    let mut best_index = 0;
    let mut best_distance = FloatType::MAX;
    for i in begin..end {
        if i == index {
            continue;
        }
        let distance = nodes[index].bbox.union(&nodes[i].bbox).half_area();
        if distance < best_distance {
            best_distance = distance;
            best_index = i;
        }
    }
    best_index
}

impl Bvh {
    /// Builds the hierarchy bottom-up by parallel locally-ordered clustering
    /// (run sequentially here): primitives are sorted along a Morton curve,
    /// then mutually-nearest neighbors are merged round by round until a
    /// single root remains.
    ///
    /// The node array is filled back-to-front from a cursor, which yields the
    /// same forward-referencing layout as the top-down builder.
    pub fn build_ploc(bboxes: &[Aabb], centers: &[WorldPoint], config: &PlocConfig) -> Bvh {
        assert2::assert!(bboxes.len() == centers.len());
        assert2::assert!(config.morton_grid_dim <= 1 << 16);
        let prim_count = bboxes.len();
        if prim_count == 0 {
            return Bvh::default();
        }

        let mut center_bounds = Aabb::empty();
        for center in centers {
            center_bounds.extend_point(center);
        }

        let mortons: Vec<u64> = centers
            .iter()
            .map(|center| {
                morton_encode(grid_position(center, &center_bounds, config.morton_grid_dim))
            })
            .collect();

        // Stable sort; primitives with equal codes keep their input order.
        let mut prim_indices: Vec<u32> = (0..prim_count as u32).collect();
        prim_indices.sort_by_key(|&i| mortons[i as usize]);

        // One singleton leaf per primitive, in Morton order. Leaves address
        // their slot in the permutation, not the primitive itself.
        let mut current: Vec<Node> = prim_indices
            .iter()
            .enumerate()
            .map(|(slot, &prim_index)| Node {
                bbox: bboxes[prim_index as usize],
                prim_count: 1,
                first_index: slot as u32,
            })
            .collect();

        let mut nodes = vec![Node::placeholder(); 2 * prim_count - 1];
        let mut insertion_index = nodes.len();
        let mut merge_index = vec![0usize; prim_count];
        let mut next: Vec<Node> = Vec::with_capacity(prim_count);

        while current.len() > 1 {
            for i in 0..current.len() {
                merge_index[i] = find_closest_node(&current, i, config.search_radius);
            }

            next.clear();
            for i in 0..current.len() {
                let j = merge_index[i];
                if merge_index[j] == i {
                    // Mutual nearest neighbors merge exactly once, handled
                    // from the smaller of the two indices.
                    if i > j {
                        continue;
                    }
                    debug_assert!(insertion_index >= 2);
                    insertion_index -= 2;
                    nodes[insertion_index] = current[i];
                    nodes[insertion_index + 1] = current[j];
                    next.push(Node {
                        bbox: current[i].bbox.union(&current[j].bbox),
                        prim_count: 0,
                        first_index: insertion_index as u32,
                    });
                } else {
                    next.push(current[i]);
                }
            }
            std::mem::swap(&mut current, &mut next);
        }

        assert2::assert!(insertion_index == 1);
        nodes[0] = current[0];

        Bvh {
            nodes,
            prim_indices,
        }
    }
}

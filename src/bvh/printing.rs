use super::Bvh;

impl Bvh {
    /// One-line-per-metric summary of the tree shape, for the CLI driver.
    pub fn print_statistics(&self) {
        let leaves = self.nodes.iter().filter(|node| node.is_leaf());
        let leaf_count = leaves.clone().count();
        println!(
            "Nodes: {} ({} leaves), depth {}",
            self.nodes.len(),
            leaf_count,
            self.depth()
        );
        if leaf_count > 0 {
            let smallest = leaves.clone().map(|node| node.prim_count).min().unwrap();
            let largest = leaves.clone().map(|node| node.prim_count).max().unwrap();
            let total: u32 = leaves.map(|node| node.prim_count).sum();
            println!(
                "Leaf size: {} - {}; avg {:.1}",
                smallest,
                largest,
                total as f32 / leaf_count as f32
            );
        }
    }
}

//! Preorder numbering of the species tree.

use crate::model::{PhyloTree, VertexIndex};

/// Preorder number of every live species tree vertex, root first,
/// starting at 0.
///
/// Along any root-to-leaf path the numbers strictly increase, so among
/// a set of candidate vertices on the way to their common ancestor, the
/// one with the largest number is never an ancestor of another candidate.
///
/// Owned by a single reconciliation run; rebuild it after any structural
/// change of the species tree.
#[derive(Debug, Clone)]
pub struct SpeciesIndex {
    ids: Vec<Option<usize>>,
}

impl SpeciesIndex {
    pub fn build(species_tree: &PhyloTree) -> Self {
        let mut ids = vec![None; species_tree.arena_len()];
        for (id, vertex) in species_tree.pre_order_iter().enumerate() {
            ids[vertex.index()] = Some(id);
        }
        SpeciesIndex { ids }
    }

    /// Returns the preorder number of `vertex`, or `None` if it is not
    /// part of the indexed tree (e.g. removed).
    pub fn id(&self, vertex: VertexIndex) -> Option<usize> {
        self.ids.get(vertex).copied().flatten()
    }
}

//! Linking gene tree leaves to species tree leaves by taxonomy.

use crate::model::{PhyloTree, VertexIndex};
use crate::sdi::comparison_base::{TaxonomyComparisonBase, taxonomy_key};
use crate::sdi::error::{SdiError, UnmatchedReason};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

/// Outcome of linking the leaves of a gene tree.
#[derive(Debug, Default)]
pub(crate) struct LeafLinkage {
    /// Species tree leaves that at least one gene tree leaf links to
    pub(crate) mapped_species_leaves: BTreeSet<VertexIndex>,
    /// Gene tree leaves deleted because they could not be linked
    pub(crate) stripped_gene_leaves: Vec<VertexIndex>,
    /// Species tree leaves deleted because no gene tree leaf links to them
    pub(crate) stripped_species_leaves: Vec<VertexIndex>,
}

/// Links every gene tree leaf to the species tree leaf with the same
/// taxonomy key, and strips unmatched/unused leaves if requested.
///
/// Deleting leaves collapses parents left with a single child, so a
/// binary gene tree stays binary.
pub(crate) fn link_leaves(
    gene_tree: &mut PhyloTree,
    species_tree: &mut PhyloTree,
    base: TaxonomyComparisonBase,
    strip_gene_tree: bool,
    strip_species_tree: bool,
) -> Result<LeafLinkage, SdiError> {
    let species_leaves = species_tree.leaves();
    let species_by_key = species_key_map(species_tree, &species_leaves, base)?;

    let mut linkage = LeafLinkage::default();
    for gene_leaf in gene_tree.leaves() {
        match match_gene_leaf(gene_tree, gene_leaf, base, &species_by_key) {
            Ok(species_leaf) => {
                trace!(gene_leaf, species_leaf, "linking leaf");
                gene_tree[gene_leaf].set_link(species_leaf);
                linkage.mapped_species_leaves.insert(species_leaf);
            }
            Err(reason) if strip_gene_tree => {
                debug!(gene_leaf, %reason, "stripping gene tree leaf");
                linkage.stripped_gene_leaves.push(gene_leaf);
            }
            Err(reason) => {
                return Err(SdiError::UnmatchedGeneLeaf {
                    node: gene_leaf,
                    name: gene_tree[gene_leaf].name().map(str::to_string),
                    reason,
                });
            }
        }
    }

    for &gene_leaf in &linkage.stripped_gene_leaves {
        gene_tree.delete_subtree(gene_leaf);
    }

    if strip_species_tree {
        for species_leaf in species_leaves {
            if !linkage.mapped_species_leaves.contains(&species_leaf) {
                debug!(species_leaf, "stripping unused species tree leaf");
                species_tree.delete_subtree(species_leaf);
                linkage.stripped_species_leaves.push(species_leaf);
            }
        }
    }

    Ok(linkage)
}

/// Maps the key of every species tree leaf to that leaf.
/// Leaves without a key under `base` are left out.
fn species_key_map(
    species_tree: &PhyloTree,
    species_leaves: &[VertexIndex],
    base: TaxonomyComparisonBase,
) -> Result<HashMap<String, VertexIndex>, SdiError> {
    let mut species_by_key = HashMap::with_capacity(species_leaves.len());
    for &leaf in species_leaves {
        let Some(key) = species_tree[leaf]
            .taxonomy()
            .and_then(|t| taxonomy_key(t, base))
        else {
            continue;
        };
        if species_by_key.contains_key(&key) {
            return Err(SdiError::DuplicateSpeciesTaxonomy { key });
        }
        species_by_key.insert(key, leaf);
    }
    Ok(species_by_key)
}

fn match_gene_leaf(
    gene_tree: &PhyloTree,
    gene_leaf: VertexIndex,
    base: TaxonomyComparisonBase,
    species_by_key: &HashMap<String, VertexIndex>,
) -> Result<VertexIndex, UnmatchedReason> {
    let taxonomy = gene_tree[gene_leaf]
        .taxonomy()
        .ok_or(UnmatchedReason::NoTaxonomy)?;
    let key = taxonomy_key(taxonomy, base).ok_or(UnmatchedReason::NoKey(base))?;
    species_by_key
        .get(&key)
        .copied()
        .ok_or(UnmatchedReason::NotInSpeciesTree(key))
}

//! Choosing the taxonomy field gene and species leaves are matched on.

use crate::model::{PhyloTree, Taxonomy};
use crate::sdi::error::SdiError;
use std::fmt;
use tracing::debug;

/// Taxonomy field used to match gene tree leaves with species tree leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyComparisonBase {
    ScientificName,
    Code,
    Identifier,
}

impl fmt::Display for TaxonomyComparisonBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxonomyComparisonBase::ScientificName => write!(f, "scientific name"),
            TaxonomyComparisonBase::Code => write!(f, "taxonomy code"),
            TaxonomyComparisonBase::Identifier => write!(f, "taxonomy identifier"),
        }
    }
}

/// Determines the taxonomy field most gene tree leaves carry.
///
/// Counts, over all leaves, how many have a non-empty identifier, code,
/// and scientific name. The field with the highest count wins; ties are
/// broken in the order scientific name, identifier, code.
///
/// # Errors
/// [SdiError::InsufficientTaxonomicData] if no field is present on at
/// least two leaves.
///
/// # Example
/// ```
/// use gsdi::model::{PhyloTree, Taxonomy};
/// use gsdi::sdi::{TaxonomyComparisonBase, determine_comparison_base};
///
/// let mut gene_tree = PhyloTree::new();
/// let a = gene_tree.add_leaf(None, Some(Taxonomy::from_code("HUMAN")), None);
/// let b = gene_tree.add_leaf(None, Some(Taxonomy::from_code("MOUSE")), None);
/// gene_tree.add_root(vec![a, b]);
///
/// assert_eq!(determine_comparison_base(&gene_tree), Ok(TaxonomyComparisonBase::Code));
/// ```
pub fn determine_comparison_base(gene_tree: &PhyloTree) -> Result<TaxonomyComparisonBase, SdiError> {
    let mut with_id_count = 0;
    let mut with_code_count = 0;
    let mut with_sn_count = 0;

    for taxonomy in gene_tree
        .pre_order_iter()
        .filter(|v| v.is_leaf())
        .filter_map(|v| v.taxonomy())
    {
        with_id_count += usize::from(taxonomy.has_identifier());
        with_code_count += usize::from(taxonomy.has_code());
        with_sn_count += usize::from(taxonomy.has_scientific_name());
    }

    let max = with_id_count.max(with_code_count).max(with_sn_count);
    if max < 2 {
        return Err(SdiError::InsufficientTaxonomicData { count: max });
    }
    let base = if max == with_sn_count {
        TaxonomyComparisonBase::ScientificName
    } else if max == with_id_count {
        TaxonomyComparisonBase::Identifier
    } else {
        TaxonomyComparisonBase::Code
    };

    debug!(
        %base,
        with_sn_count, with_id_count, with_code_count, "determined taxonomy comparison base"
    );
    Ok(base)
}

/// Returns the string key of `taxonomy` under `base`, or `None` if the
/// field is absent or empty.
///
/// Identifiers are keyed as `provider:value` if they carry a provider.
pub fn taxonomy_key(taxonomy: &Taxonomy, base: TaxonomyComparisonBase) -> Option<String> {
    match base {
        TaxonomyComparisonBase::ScientificName => taxonomy.scientific_name().map(str::to_string),
        TaxonomyComparisonBase::Code => taxonomy.code().map(str::to_string),
        TaxonomyComparisonBase::Identifier => {
            taxonomy.identifier().map(|id| id.value_plus_provider())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Identifier;

    fn tree_with_leaf_taxonomies(taxonomies: Vec<Option<Taxonomy>>) -> PhyloTree {
        let mut tree = PhyloTree::new();
        let leaves = taxonomies
            .into_iter()
            .map(|t| tree.add_leaf(None, t, None))
            .collect();
        tree.add_root(leaves);
        tree
    }

    #[test]
    fn test_no_taxonomy_fails() {
        let tree = tree_with_leaf_taxonomies(vec![None, None]);
        assert_eq!(
            determine_comparison_base(&tree),
            Err(SdiError::InsufficientTaxonomicData { count: 0 })
        );
    }

    #[test]
    fn test_single_leaf_with_taxonomy_fails() {
        let tree = tree_with_leaf_taxonomies(vec![
            Some(Taxonomy::from_scientific_name("Homo sapiens")),
            Some(Taxonomy::from_code("MOUSE")),
            None,
        ]);
        assert_eq!(
            determine_comparison_base(&tree),
            Err(SdiError::InsufficientTaxonomicData { count: 1 })
        );
    }

    #[test]
    fn test_highest_count_wins() {
        let tree = tree_with_leaf_taxonomies(vec![
            Some(Taxonomy::from_scientific_name("Homo sapiens")),
            Some(Taxonomy::from_code("MOUSE")),
            Some(Taxonomy::from_code("RAT")),
            Some(Taxonomy::from_code("CHICK")),
        ]);
        assert_eq!(determine_comparison_base(&tree), Ok(TaxonomyComparisonBase::Code));
    }

    #[test]
    fn test_tie_precedence() {
        let both = |sn: &str, code: &str, id: &str| {
            Some(
                Taxonomy::from_scientific_name(sn)
                    .with_code(code)
                    .with_identifier(Identifier::new(id)),
            )
        };
        let all_three = tree_with_leaf_taxonomies(vec![
            both("Homo sapiens", "HUMAN", "9606"),
            both("Mus musculus", "MOUSE", "10090"),
        ]);
        assert_eq!(
            determine_comparison_base(&all_three),
            Ok(TaxonomyComparisonBase::ScientificName)
        );

        let code_and_id = tree_with_leaf_taxonomies(vec![
            Some(Taxonomy::from_code("HUMAN").with_identifier(Identifier::new("9606"))),
            Some(Taxonomy::from_code("MOUSE").with_identifier(Identifier::new("10090"))),
        ]);
        assert_eq!(
            determine_comparison_base(&code_and_id),
            Ok(TaxonomyComparisonBase::Identifier)
        );
    }

    #[test]
    fn test_taxonomy_key() {
        let taxonomy = Taxonomy::from_scientific_name("Homo sapiens")
            .with_identifier(Identifier::with_provider("9606", "ncbi"));
        assert_eq!(
            taxonomy_key(&taxonomy, TaxonomyComparisonBase::ScientificName).as_deref(),
            Some("Homo sapiens")
        );
        assert_eq!(
            taxonomy_key(&taxonomy, TaxonomyComparisonBase::Identifier).as_deref(),
            Some("ncbi:9606")
        );
        assert_eq!(taxonomy_key(&taxonomy, TaxonomyComparisonBase::Code), None);
    }
}

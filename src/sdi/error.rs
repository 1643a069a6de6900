//! Error types of a reconciliation run.

use crate::model::VertexIndex;
use crate::sdi::comparison_base::TaxonomyComparisonBase;
use std::fmt;
use thiserror::Error;

/// Which of the two input trees an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRole {
    Gene,
    Species,
}

impl fmt::Display for TreeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeRole::Gene => write!(f, "gene tree"),
            TreeRole::Species => write!(f, "species tree"),
        }
    }
}

/// Why a gene tree leaf could not be linked to a species tree leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnmatchedReason {
    /// The leaf carries no taxonomy at all.
    NoTaxonomy,
    /// The leaf's taxonomy has no value for the comparison base.
    NoKey(TaxonomyComparisonBase),
    /// No species tree leaf has this key.
    NotInSpeciesTree(String),
}

impl fmt::Display for UnmatchedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedReason::NoTaxonomy => write!(f, "has no taxonomic data"),
            UnmatchedReason::NoKey(base) => write!(f, "has no {}", base),
            UnmatchedReason::NotInSpeciesTree(key) => {
                write!(f, "has taxonomy \"{}\" not present in species tree", key)
            }
        }
    }
}

/// Fatal errors of a reconciliation run. No partial result is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdiError {
    /// Fewer than two gene tree leaves carry usable taxonomy.
    #[error("gene tree has {count} leaves with taxonomic data, at least two are required")]
    InsufficientTaxonomicData { count: usize },
    /// Two species tree leaves share the same taxonomy key.
    #[error("taxonomy \"{key}\" is not unique in species tree")]
    DuplicateSpeciesTaxonomy { key: String },
    /// A gene tree leaf cannot be linked and stripping is disabled.
    #[error("gene tree leaf {node} (\"{}\") {reason}", .name.as_deref().unwrap_or("?"))]
    UnmatchedGeneLeaf {
        node: VertexIndex,
        name: Option<String>,
        reason: UnmatchedReason,
    },
    /// A vertex reached during the mapping has no link; the trees are
    /// malformed or linking did not complete.
    #[error("gene tree vertex {node} has no link to the species tree")]
    BrokenLink { node: VertexIndex },
    /// A tree is empty (possibly after stripping).
    #[error("{0} is empty")]
    EmptyTree(TreeRole),
}

//! gsdi is a library to reconcile gene trees with species trees.
//!
//! Given a rooted gene tree and a rooted species tree whose leaves share
//! taxonomic labels, it infers for every internal gene tree vertex whether
//! it represents a speciation or a gene duplication, and which species
//! tree vertex it maps to (generalized speciation/duplication inference).
//! Core functionality provided:
//! - Taxonomy matching: leaves are matched on scientific name, taxonomy
//!   code, or taxonomy identifier, whichever most gene tree leaves carry.
//! - Stripping: gene tree leaves without a species tree counterpart and
//!   species tree leaves without gene tree leaves can be deleted instead
//!   of failing the run.
//! - Polytomies: the species tree may contain unresolved vertices. Gene
//!   tree vertices which can not be decided are reported as
//!   [SpeciationOrDuplication](crate::model::Event::SpeciationOrDuplication),
//!   or resolved as speciations under the most parsimonious model.
//! - Tree model: [PhyloTree](crate::model::PhyloTree) using the arena
//!   pattern, see [crate::model].
//! - Newick: read trees from and write reconciled trees to Newick/NHX,
//!   see [crate::newick].
//!
//! Limitations:
//! - Gene trees are expected to be binary (polytomies are mapped, but
//!   their classification is not meaningful)
//! - No species tree inference, no multi-labelled species trees
//!
//! # Usage patterns
//! 1. [reconcile] runs a reconciliation with the flags given directly.
//! 2. Configure a [Gsdi](crate::sdi::Gsdi) with a
//!    [GsdiConfig](crate::sdi::GsdiConfig) and reuse it for many tree pairs.
//!
//! ## Example
//! ```
//! use gsdi::model::Event;
//! use gsdi::newick::parse_str;
//!
//! let mut species_tree = parse_str("((Human,Chimp),Gorilla);")?;
//! let mut gene_tree = parse_str("((Human,Chimp),(Human,Gorilla));")?;
//!
//! let result = gsdi::reconcile(&mut gene_tree, &mut species_tree, false, false, false)?;
//! assert_eq!(result.duplications(), 1);
//! assert_eq!(gene_tree.root().event(), Some(Event::Duplication));
//! println!("{result}");
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod model;
pub mod newick;
pub mod parser;
pub mod sdi;

use crate::model::PhyloTree;
use crate::sdi::{Gsdi, GsdiConfig, GsdiResult, SdiError};

// ============================================================================
// Quick API
// ============================================================================
/// Reconciles `gene_tree` with `species_tree`.
///
/// Shorthand for [Gsdi::infer] with a [GsdiConfig] built from the flags:
/// * `most_parsimonious` - resolve ambiguous vertices as speciations
/// * `strip_gene_tree` - delete unmatched gene tree leaves instead of failing
/// * `strip_species_tree` - delete species tree leaves no gene tree leaf maps to
pub fn reconcile(
    gene_tree: &mut PhyloTree,
    species_tree: &mut PhyloTree,
    most_parsimonious: bool,
    strip_gene_tree: bool,
    strip_species_tree: bool,
) -> Result<GsdiResult, SdiError> {
    let config = GsdiConfig::new()
        .with_most_parsimonious(most_parsimonious)
        .with_strip_gene_tree(strip_gene_tree)
        .with_strip_species_tree(strip_species_tree);
    Gsdi::new(config).infer(gene_tree, species_tree)
}

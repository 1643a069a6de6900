//! Reconciliation of gene trees with species trees.
//!
//! The run proceeds in stages:
//! * [determine_comparison_base] picks the taxonomy field leaves are
//!   matched on
//! * gene tree leaves are linked to species tree leaves with the same
//!   [taxonomy_key], optionally stripping leaves of either tree
//! * the species tree is numbered in preorder ([SpeciesIndex])
//! * one postorder pass maps every internal gene tree vertex and assigns
//!   its [Event](crate::model::Event)
//!
//! [Gsdi] runs all stages; results are returned as [GsdiResult] and
//! left as annotations on the gene tree.

mod comparison_base;
mod error;
mod gsdi;
mod linker;
mod result;
mod species_index;

pub use comparison_base::{TaxonomyComparisonBase, determine_comparison_base, taxonomy_key};
pub use error::{SdiError, TreeRole, UnmatchedReason};
pub use gsdi::{Gsdi, GsdiConfig};
pub use result::GsdiResult;
pub use species_index::SpeciesIndex;

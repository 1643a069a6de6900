//! Outcome of a reconciliation run.

use crate::model::VertexIndex;
use crate::sdi::comparison_base::TaxonomyComparisonBase;
use std::collections::BTreeSet;
use std::fmt;

/// Counts and leaf sets of a successful run of [crate::sdi::Gsdi::infer].
///
/// Per-vertex links and events stay on the gene tree; this only holds
/// the aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsdiResult {
    pub(crate) most_parsimonious: bool,
    pub(crate) comparison_base: TaxonomyComparisonBase,
    pub(crate) duplications: usize,
    pub(crate) speciations: usize,
    pub(crate) speciation_or_duplications: usize,
    pub(crate) mapping_cost: usize,
    pub(crate) ascent_steps: usize,
    pub(crate) mapped_species_leaves: BTreeSet<VertexIndex>,
    pub(crate) stripped_gene_leaves: Vec<VertexIndex>,
    pub(crate) stripped_species_leaves: Vec<VertexIndex>,
}

impl GsdiResult {
    pub fn duplications(&self) -> usize {
        self.duplications
    }

    pub fn speciations(&self) -> usize {
        self.speciations
    }

    /// Number of vertices classified as [crate::model::Event::SpeciationOrDuplication].
    /// Always 0 under the most parsimonious model.
    pub fn speciation_or_duplications(&self) -> usize {
        self.speciation_or_duplications
    }

    /// Number of gene losses implied by the mapping.
    ///
    /// A duplication costs every step its children's mappings were moved
    /// up; any other event costs every step beyond the first per child.
    /// Vertices whose children already coincide cost nothing.
    ///
    /// Duplications themselves are not counted, so this is the classic
    /// mapping cost L without its one per duplication. Add
    /// [duplications](Self::duplications) to get L.
    pub fn mapping_cost(&self) -> usize {
        self.mapping_cost
    }

    /// Total number of steps children's mappings were moved up while
    /// searching for their meeting vertices.
    pub fn ascent_steps(&self) -> usize {
        self.ascent_steps
    }

    /// Taxonomy field leaves were matched on.
    pub fn comparison_base(&self) -> TaxonomyComparisonBase {
        self.comparison_base
    }

    pub fn most_parsimonious(&self) -> bool {
        self.most_parsimonious
    }

    /// Species tree leaves linked from at least one gene tree leaf.
    pub fn mapped_species_leaves(&self) -> &BTreeSet<VertexIndex> {
        &self.mapped_species_leaves
    }

    /// Gene tree leaves deleted during linking, in leaf order.
    pub fn stripped_gene_leaves(&self) -> &[VertexIndex] {
        &self.stripped_gene_leaves
    }

    /// Species tree leaves deleted during linking, in leaf order.
    pub fn stripped_species_leaves(&self) -> &[VertexIndex] {
        &self.stripped_species_leaves
    }

    /// Number of classified (internal) gene tree vertices.
    pub fn num_internal_events(&self) -> usize {
        self.duplications + self.speciations + self.speciation_or_duplications
    }
}

impl fmt::Display for GsdiResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Most parsimonious duplication model: {}", self.most_parsimonious)?;
        writeln!(f, "Speciations sum                    : {}", self.speciations)?;
        writeln!(f, "Duplications sum                   : {}", self.duplications)?;
        if !self.most_parsimonious {
            writeln!(
                f,
                "Speciation or duplications sum     : {}",
                self.speciation_or_duplications
            )?;
        }
        write!(f, "Mapping cost                       : {}", self.mapping_cost)
    }
}

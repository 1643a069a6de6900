//! Generalized speciation/duplication inference (GSDI).
//!
//! [Gsdi::infer] links the gene tree to the species tree and classifies
//! every internal gene tree vertex in one postorder pass. Polytomies in
//! the species tree are supported: the mapping of a gene tree vertex is
//! found by repeatedly moving the deepest of its children's mappings up,
//! and the number of times each species tree vertex was passed decides
//! whether an unresolved vertex is treated as a speciation or not.

use crate::model::{Event, PhyloTree, VertexIndex};
use crate::sdi::comparison_base::determine_comparison_base;
use crate::sdi::error::{SdiError, TreeRole};
use crate::sdi::linker::link_leaves;
use crate::sdi::result::GsdiResult;
use crate::sdi::species_index::SpeciesIndex;
use tracing::{debug, trace};

// =$========================================================================$=
// CONFIGURATION
// =$========================================================================$=
/// Settings of a reconciliation run.
///
/// All flags default to `false`.
///
/// # Example
/// ```
/// use gsdi::sdi::GsdiConfig;
///
/// let config = GsdiConfig::default()
///     .with_most_parsimonious(true)
///     .with_strip_gene_tree(true);
/// assert!(config.most_parsimonious());
/// assert!(!config.strip_species_tree());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GsdiConfig {
    most_parsimonious: bool,
    strip_gene_tree: bool,
    strip_species_tree: bool,
}

impl GsdiConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve ambiguous vertices as speciations instead of reporting
    /// them as [Event::SpeciationOrDuplication].
    pub fn with_most_parsimonious(mut self, most_parsimonious: bool) -> Self {
        self.most_parsimonious = most_parsimonious;
        self
    }

    /// Delete gene tree leaves that cannot be linked instead of failing.
    pub fn with_strip_gene_tree(mut self, strip_gene_tree: bool) -> Self {
        self.strip_gene_tree = strip_gene_tree;
        self
    }

    /// Delete species tree leaves no gene tree leaf links to.
    pub fn with_strip_species_tree(mut self, strip_species_tree: bool) -> Self {
        self.strip_species_tree = strip_species_tree;
        self
    }

    pub fn most_parsimonious(&self) -> bool {
        self.most_parsimonious
    }

    pub fn strip_gene_tree(&self) -> bool {
        self.strip_gene_tree
    }

    pub fn strip_species_tree(&self) -> bool {
        self.strip_species_tree
    }
}

// =$========================================================================$=
// GSDI
// =$========================================================================$=
/// Reconciles gene trees with species trees.
///
/// A `Gsdi` holds no state between runs, so one instance can be reused
/// for any number of tree pairs.
///
/// # Example
/// ```
/// use gsdi::model::Event;
/// use gsdi::newick::parse_str;
/// use gsdi::sdi::{Gsdi, GsdiConfig};
///
/// let mut species_tree = parse_str("((HUMAN,CHIMP),GORILLA);")?;
/// let mut gene_tree = parse_str("((HUMAN,HUMAN),CHIMP);")?;
///
/// let result = Gsdi::new(GsdiConfig::default()).infer(&mut gene_tree, &mut species_tree)?;
/// assert_eq!(result.duplications(), 1);
/// assert_eq!(result.speciations(), 1);
/// assert_eq!(gene_tree.root().event(), Some(Event::Speciation));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Gsdi {
    config: GsdiConfig,
}

impl Gsdi {
    pub fn new(config: GsdiConfig) -> Self {
        Gsdi { config }
    }

    pub fn config(&self) -> &GsdiConfig {
        &self.config
    }

    /// Runs the reconciliation.
    ///
    /// On success every live gene tree vertex is linked to a species tree
    /// vertex and every internal gene tree vertex carries an [Event].
    /// Links and events of a previous run are cleared first. Depending on
    /// the configuration, leaves of either tree may be deleted.
    ///
    /// # Errors
    /// See [SdiError]. No result is produced on error, but stripping may
    /// already have modified the trees.
    pub fn infer(
        &self,
        gene_tree: &mut PhyloTree,
        species_tree: &mut PhyloTree,
    ) -> Result<GsdiResult, SdiError> {
        if gene_tree.is_empty() {
            return Err(SdiError::EmptyTree(TreeRole::Gene));
        }
        if species_tree.is_empty() {
            return Err(SdiError::EmptyTree(TreeRole::Species));
        }
        gene_tree.clear_annotations();

        let base = determine_comparison_base(gene_tree)?;
        let linkage = link_leaves(
            gene_tree,
            species_tree,
            base,
            self.config.strip_gene_tree,
            self.config.strip_species_tree,
        )?;
        if gene_tree.is_empty() {
            return Err(SdiError::EmptyTree(TreeRole::Gene));
        }

        let mut context = RunContext::new(species_tree, self.config.most_parsimonious);
        context.map_gene_tree(gene_tree)?;

        let result = GsdiResult {
            most_parsimonious: self.config.most_parsimonious,
            comparison_base: base,
            duplications: context.duplications,
            speciations: context.speciations,
            speciation_or_duplications: context.speciation_or_duplications,
            mapping_cost: context.mapping_cost,
            ascent_steps: context.ascent_steps,
            mapped_species_leaves: linkage.mapped_species_leaves,
            stripped_gene_leaves: linkage.stripped_gene_leaves,
            stripped_species_leaves: linkage.stripped_species_leaves,
        };
        debug!(
            duplications = result.duplications,
            speciations = result.speciations,
            speciation_or_duplications = result.speciation_or_duplications,
            mapping_cost = result.mapping_cost,
            "reconciliation finished"
        );
        Ok(result)
    }
}

// =$========================================================================$=
// MAPPING
// =$========================================================================$=
/// State of a single run over a fixed species tree.
struct RunContext<'a> {
    species_tree: &'a PhyloTree,
    index: SpeciesIndex,
    /// How often each species tree vertex was moved past, by [VertexIndex]
    traversal_counts: Vec<usize>,
    most_parsimonious: bool,

    duplications: usize,
    speciations: usize,
    speciation_or_duplications: usize,
    mapping_cost: usize,
    ascent_steps: usize,
}

impl<'a> RunContext<'a> {
    fn new(species_tree: &'a PhyloTree, most_parsimonious: bool) -> Self {
        RunContext {
            species_tree,
            index: SpeciesIndex::build(species_tree),
            traversal_counts: vec![0; species_tree.arena_len()],
            most_parsimonious,
            duplications: 0,
            speciations: 0,
            speciation_or_duplications: 0,
            mapping_cost: 0,
            ascent_steps: 0,
        }
    }

    fn map_gene_tree(&mut self, gene_tree: &mut PhyloTree) -> Result<(), SdiError> {
        let internal: Vec<VertexIndex> = gene_tree
            .post_order_iter()
            .filter(|v| v.is_internal())
            .map(|v| v.index())
            .collect();

        for g in internal {
            let child_links = gene_tree[g]
                .children()
                .iter()
                .map(|&child| gene_tree[child].link().ok_or(SdiError::BrokenLink { node: child }))
                .collect::<Result<Vec<_>, _>>()?;

            let (s, steps) = self.meet(g, &child_links)?;
            let event = self.classify(&child_links, s);
            trace!(gene_vertex = g, species_vertex = s, %event, "mapped");

            gene_tree[g].set_link(s);
            gene_tree[g].set_event(event);
            self.record(event, &steps);
        }
        Ok(())
    }

    /// Moves the deepest entry of `working` to its parent until all
    /// entries coincide. Returns the meeting vertex and the number of
    /// moves per entry.
    fn meet(
        &mut self,
        g: VertexIndex,
        child_links: &[VertexIndex],
    ) -> Result<(VertexIndex, Vec<usize>), SdiError> {
        let mut working = child_links.to_vec();
        let mut steps = vec![0; working.len()];

        loop {
            let (min_pos, max_pos) = self.extreme_positions(g, &working)?;
            if working[min_pos] == working[max_pos] {
                return Ok((working[max_pos], steps));
            }
            let deepest = working[max_pos];
            self.traversal_counts[deepest] += 1;
            working[max_pos] = self.species_tree[deepest]
                .parent()
                .ok_or(SdiError::BrokenLink { node: g })?;
            steps[max_pos] += 1;
        }
    }

    /// Positions of the entries with the smallest and largest preorder
    /// number; the first one wins on ties.
    fn extreme_positions(
        &self,
        g: VertexIndex,
        working: &[VertexIndex],
    ) -> Result<(usize, usize), SdiError> {
        let mut min = (0, usize::MAX);
        let mut max = (0, 0);
        for (pos, &vertex) in working.iter().enumerate() {
            let id = self.index.id(vertex).ok_or(SdiError::BrokenLink { node: g })?;
            if id < min.1 {
                min = (pos, id);
            }
            if pos == 0 || id > max.1 {
                max = (pos, id);
            }
        }
        Ok((min.0, max.0))
    }

    fn classify(&mut self, child_links: &[VertexIndex], s: VertexIndex) -> Event {
        let already_at_s = child_links.iter().filter(|&&l| l == s).count();
        if already_at_s == 0 {
            return Event::Speciation;
        }

        let mut sum = 0;
        let mut max: Option<(VertexIndex, usize)> = None;
        for &child in self.species_tree[s].children() {
            let count = self.traversal_counts[child];
            sum += count;
            if max.is_none_or(|(_, m)| count > m) {
                max = Some((child, count));
            }
        }

        match (sum, max) {
            (2, _) => Event::Duplication,
            (sum, Some((_, max_count))) if sum > 2 && max_count <= 1 => {
                if self.most_parsimonious {
                    Event::Speciation
                } else {
                    Event::SpeciationOrDuplication
                }
            }
            (sum, Some((max_owner, _))) if sum > 2 => {
                self.traversal_counts[max_owner] = 1;
                Event::Duplication
            }
            _ => Event::Duplication,
        }
    }

    fn record(&mut self, event: Event, steps: &[usize]) {
        let total: usize = steps.iter().sum();
        self.ascent_steps += total;
        match event {
            Event::Duplication => {
                self.duplications += 1;
                self.mapping_cost += total;
            }
            Event::Speciation => {
                self.speciations += 1;
                self.mapping_cost += losses_below_speciation(steps);
            }
            Event::SpeciationOrDuplication => {
                self.speciation_or_duplications += 1;
                self.mapping_cost += losses_below_speciation(steps);
            }
        }
    }
}

/// Below a speciation, the first step up from each child is the
/// speciation itself; every further step skips a species lineage.
fn losses_below_speciation(steps: &[usize]) -> usize {
    steps.iter().map(|k| k.saturating_sub(1)).sum()
}

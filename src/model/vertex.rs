//! Vertex module for phylogenetic tree representation.

use crate::model::event::Event;
use crate::model::taxonomy::Taxonomy;
use crate::model::tree::VertexIndex;
use std::ops::Deref;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// A vertex is a leaf if it has no children and internal otherwise.
/// There is no restriction on the number of children, so species trees
/// may contain polytomies; gene trees are expected to be binary.
///
/// Besides its structural data, a vertex carries the annotations
/// written by a reconciliation run:
/// - `link`: the vertex of the *other* tree this vertex maps to
/// - `event`: the inferred [Event] (internal gene tree vertices only)
///
/// # Invariants
/// - `index` is the index of this vertex in the arena of its tree
/// - `branch_length` is non-negative (enforced by [BranchLength]); might not be set
/// - `parent` is `None` exactly for the root and for removed vertices
/// - Removed vertices are kept in the arena so that indices stay stable,
///   but are no longer reachable from the root
#[derive(PartialEq, Debug, Clone)]
pub struct Vertex {
    /// Index of this vertex in the tree arena
    index: VertexIndex,
    /// Index of the parent vertex, `None` for the root
    parent: Option<VertexIndex>,
    /// Indices of the child vertices, in stable order
    children: Vec<VertexIndex>,
    /// Name (label) of this vertex, if any
    name: Option<String>,
    /// Taxonomic data, if any
    taxonomy: Option<Taxonomy>,
    /// Distance to parent vertex (optional, non-negative if present)
    branch_length: Option<BranchLength>,
    /// Mapping target in the other tree of a reconciliation
    link: Option<VertexIndex>,
    /// Inferred event of a reconciliation
    event: Option<Event>,
    /// Set once the vertex has been deleted from its tree
    removed: bool,
}

impl Vertex {
    /// Creates a new leaf vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `name` - Optional label of the leaf
    /// * `taxonomy` - Optional taxonomic data of the leaf
    /// * `branch_length` - Distance to parent vertex (non-negative)
    pub fn new_leaf(
        index: VertexIndex,
        name: Option<String>,
        taxonomy: Option<Taxonomy>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex {
            index,
            parent: None,
            children: Vec::new(),
            name,
            taxonomy,
            branch_length,
            link: None,
            event: None,
            removed: false,
        }
    }

    /// Creates a new internal vertex with the given children.
    ///
    /// The parent references of the children are not touched;
    /// that is the job of the owning tree.
    pub fn new_internal(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex {
            index,
            parent: None,
            children,
            name: None,
            taxonomy: None,
            branch_length,
            link: None,
            event: None,
            removed: false,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        self.index
    }

    /// Returns `true` if this vertex has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this vertex has at least one child.
    pub fn is_internal(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns `true` if this vertex is the root of its tree, i.e. a
    /// vertex without parent that has not been removed.
    pub fn is_root(&self) -> bool {
        self.parent.is_none() && !self.removed
    }

    /// Returns `true` if this vertex has been deleted from its tree.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Returns the children of this vertex (empty for leaves).
    pub fn children(&self) -> &[VertexIndex] {
        &self.children
    }

    /// Returns the number of children of this vertex.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<VertexIndex> {
        self.parent
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns the name of this vertex, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the name of this vertex.
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Returns the taxonomic data of this vertex, if any.
    pub fn taxonomy(&self) -> Option<&Taxonomy> {
        self.taxonomy.as_ref()
    }

    /// Returns whether this vertex carries taxonomic data.
    pub fn has_taxonomy(&self) -> bool {
        self.taxonomy.is_some()
    }

    /// Sets the taxonomic data of this vertex.
    pub fn set_taxonomy(&mut self, taxonomy: Taxonomy) {
        self.taxonomy = Some(taxonomy);
    }

    /// Returns the branch length, if set.
    pub fn branch_length(&self) -> Option<BranchLength> {
        self.branch_length
    }

    /// Returns whether this vertex has a [BranchLength].
    pub fn has_branch_length(&self) -> bool {
        self.branch_length.is_some()
    }

    /// Sets the branch length of this vertex.
    pub fn set_branch_length(&mut self, branch_length: Option<BranchLength>) {
        self.branch_length = branch_length;
    }

    /// Returns the vertex of the other tree this vertex is linked to.
    pub fn link(&self) -> Option<VertexIndex> {
        self.link
    }

    /// Links this vertex to a vertex of the other tree.
    pub fn set_link(&mut self, target: VertexIndex) {
        self.link = Some(target);
    }

    /// Returns the inferred event of this vertex, if any.
    pub fn event(&self) -> Option<Event> {
        self.event
    }

    /// Sets the inferred event of this vertex.
    pub fn set_event(&mut self, event: Event) {
        self.event = Some(event);
    }

    /// Removes link and event annotations.
    pub fn clear_annotations(&mut self) {
        self.link = None;
        self.event = None;
    }

    /// Label used when displaying this vertex:
    /// name, else scientific name, else taxonomy code, else identifier.
    pub fn display_label(&self) -> Option<&str> {
        self.name().or_else(|| {
            self.taxonomy.as_ref().and_then(|t| {
                t.scientific_name()
                    .or(t.code())
                    .or(t.identifier().map(|id| id.value()))
            })
        })
    }

    // Structural mutation is restricted to the owning tree
    pub(crate) fn set_parent(&mut self, parent: Option<VertexIndex>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<VertexIndex> {
        &mut self.children
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
        self.parent = None;
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, enforced non-negative.
///
/// Represents the evolutionary distance between a vertex and its parent.
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    /// Use [BranchLength::try_new] for unchecked input.
    pub fn new(length: f64) -> Self {
        assert!(length >= 0.0, "Branch length must be non-negative, got {}", length);
        assert!(length.is_finite(), "Branch length must be finite, got {}", length);
        BranchLength(length)
    }

    /// Creates a new branch length, or `None` if `length` is negative or not finite.
    pub fn try_new(length: f64) -> Option<Self> {
        (length >= 0.0 && length.is_finite()).then_some(BranchLength(length))
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl std::ops::Add for BranchLength {
    type Output = BranchLength;

    fn add(self, other: BranchLength) -> BranchLength {
        BranchLength(self.0 + other.0)
    }
}

impl std::fmt::Display for BranchLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Provides the tree representation used for reconciliation.
//!
//! * [PhyloTree] - rooted phylogenetic tree using the arena pattern
//! * [VertexIndex] - type used to index vertices in a tree
//! * [PostOrderIter], [PreOrderIter] - stack-based traversals

use crate::model::taxonomy::Taxonomy;
use crate::model::vertex::{BranchLength, Vertex};
use std::fmt;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree represented using the arena pattern
/// on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Parent and children are stored as indices, which avoids
/// cyclic ownership while keeping the parent step `O(1)`.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained; `None` for an empty tree.
/// - Vertices may have any number of children (polytomies are allowed).
/// - No assumption on order of indices is maintained.
///   (e.g. leaves must not be first `n` indices)
/// - Deleting a subtree ([`PhyloTree::delete_subtree()`]) only flags its
///   vertices as removed; indices of all vertices stay valid.
///
/// # Construction
/// Add leaves first, then internal vertices referencing their children,
/// and finally the root via [`PhyloTree::add_root()`] (or
/// [`PhyloTree::set_root()`] for a single-leaf tree).
/// Test validity with [`PhyloTree::is_valid()`].
#[derive(Debug, Clone, Default)]
pub struct PhyloTree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: Option<VertexIndex>,

    /// Name of tree; optional
    name: Option<String>,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl PhyloTree {
    /// Creates a new, empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty tree with room for `num_vertices` vertices.
    pub fn with_capacity(num_vertices: usize) -> Self {
        PhyloTree {
            vertices: Vec::with_capacity(num_vertices),
            root_index: None,
            name: None,
        }
    }

    /// Attaches a name to this tree.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set a name for this tree.
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `name` - Optional label of the leaf
    /// * `taxonomy` - Optional taxonomic data of the leaf
    /// * `branch_length` - Length of incoming branch
    pub fn add_leaf(
        &mut self,
        name: Option<String>,
        taxonomy: Option<Taxonomy>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, name, taxonomy, branch_length));
        index
    }

    /// Adds a leaf with the given name and the name as scientific name.
    ///
    /// Convenience for the common case of species trees whose leaf
    /// labels are species names.
    pub fn add_species_leaf(&mut self, name: &str) -> VertexIndex {
        self.add_leaf(
            Some(name.to_string()),
            Some(Taxonomy::from_scientific_name(name)),
            None,
        )
    }

    /// Adds an internal vertex to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices, in order
    /// * `branch_length` - Length of incoming branch
    ///
    /// # Panics
    /// Panics if `children` is empty or a child index is out of bounds.
    pub fn add_internal_vertex(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        assert!(!children.is_empty(), "Internal vertex needs at least one child");
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(Some(index));
        }
        self.vertices
            .push(Vertex::new_internal(index, children, branch_length));
        index
    }

    /// Adds an internal vertex and makes it the root of the tree.
    ///
    /// # Returns
    /// The index of the newly created root vertex.
    pub fn add_root(&mut self, children: Vec<VertexIndex>) -> VertexIndex {
        let index = self.add_internal_vertex(children, None);
        self.root_index = Some(index);
        index
    }

    /// Makes an existing parentless vertex the root, e.g. for a tree
    /// consisting of a single leaf.
    ///
    /// # Panics
    /// Panics if the vertex has a parent.
    pub fn set_root(&mut self, index: VertexIndex) {
        assert!(!self[index].has_parent(), "Root must not have a parent");
        self.root_index = Some(index);
    }

    /// Returns whether this tree has no (live) vertices.
    pub fn is_empty(&self) -> bool {
        self.root_index.is_none()
    }

    /// Returns the index of the root, or `None` for an empty tree.
    pub fn root_index(&self) -> Option<VertexIndex> {
        self.root_index
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the tree is empty.
    pub fn root(&self) -> &Vertex {
        let index = self.root_index.expect("Tree has no root");
        &self[index]
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns a mutable reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex_mut(&mut self, index: VertexIndex) -> &mut Vertex {
        &mut self.vertices[index]
    }

    /// Returns the number of vertices in the arena, including removed ones.
    ///
    /// Any [VertexIndex] of this tree is smaller than this value.
    pub fn arena_len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.live_vertices().filter(|v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices (including the root,
    /// unless it is a leaf) in this tree.
    pub fn num_internal(&self) -> usize {
        self.live_vertices().filter(|v| v.is_internal()).count()
    }

    /// Returns the number of live vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.live_vertices().count()
    }

    /// Returns the indices of all leaves, left to right.
    pub fn leaves(&self) -> Vec<VertexIndex> {
        self.pre_order_iter()
            .filter(|v| v.is_leaf())
            .map(|v| v.index())
            .collect()
    }

    /// Returns the index of the first leaf (left to right) with the given name.
    pub fn leaf_by_name(&self, name: &str) -> Option<VertexIndex> {
        self.pre_order_iter()
            .find(|v| v.is_leaf() && v.name() == Some(name))
            .map(|v| v.index())
    }

    /// Returns `true` if all non-root vertices carry branch lengths.
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.pre_order_iter()
            .all(|v| v.is_root() || v.has_branch_length())
    }

    /// Removes link and event annotations from all vertices.
    pub fn clear_annotations(&mut self) {
        for vertex in &mut self.vertices {
            vertex.clear_annotations();
        }
    }

    fn live_vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().filter(|v| !v.is_removed())
    }
}

// ============================================================================
// Deletion (pub)
// ============================================================================
impl PhyloTree {
    /// Deletes the subtree rooted at `index`.
    ///
    /// If the parent is left with a single child, the parent is collapsed:
    /// the remaining child takes its place (and inherits the sum of both
    /// branch lengths), or becomes the new root if the parent was the root.
    /// A parent left without children is deleted as well.
    /// Deleting the root empties the tree.
    ///
    /// All deleted vertices are flagged as removed but stay in the arena.
    /// Calling this on an already removed vertex does nothing.
    pub fn delete_subtree(&mut self, index: VertexIndex) {
        if self[index].is_removed() {
            return;
        }

        match self[index].parent() {
            None => {
                if self.root_index == Some(index) {
                    self.root_index = None;
                }
            }
            Some(parent) => {
                self[parent].children_mut().retain(|&c| c != index);
                match self[parent].num_children() {
                    0 => self.delete_subtree(parent),
                    1 => self.collapse(parent),
                    _ => {}
                }
            }
        }

        self.mark_subtree_removed(index);
    }

    /// Replaces a vertex having a single child by that child.
    fn collapse(&mut self, index: VertexIndex) {
        let only_child = self[index].children()[0];
        match self[index].parent() {
            None => {
                self[only_child].set_parent(None);
                self.root_index = Some(only_child);
            }
            Some(grandparent) => {
                if let Some(slot) = self[grandparent]
                    .children_mut()
                    .iter_mut()
                    .find(|c| **c == index)
                {
                    *slot = only_child;
                }
                self[only_child].set_parent(Some(grandparent));
                let combined = match (self[index].branch_length(), self[only_child].branch_length()) {
                    (Some(a), Some(b)) => Some(a + b),
                    (a, b) => a.or(b),
                };
                self[only_child].set_branch_length(combined);
            }
        }
        self[index].children_mut().clear();
        self[index].mark_removed();
    }

    fn mark_subtree_removed(&mut self, index: VertexIndex) {
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            stack.extend_from_slice(self[current].children());
            self[current].mark_removed();
        }
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl PhyloTree {
    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index (if set) is valid, live, and has no parent
    /// - All vertex indices match their position in the arena
    /// - All child indices are valid, live, and point back to correct parent
    /// - Every live non-root vertex is reachable from the root
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return false;
            }
        }

        let Some(root) = self.root_index else {
            return self.live_vertices().next().is_none();
        };
        if root >= self.vertices.len() || self[root].is_removed() || self[root].has_parent() {
            return false;
        }

        let mut reached = 0;
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            reached += 1;
            if reached > self.vertices.len() {
                // cycle
                return false;
            }
            for &child in self[current].children() {
                if child >= self.vertices.len()
                    || self[child].is_removed()
                    || self[child].parent() != Some(current)
                {
                    return false;
                }
                stack.push(child);
            }
        }

        reached == self.num_vertices()
    }
}

impl std::ops::Index<VertexIndex> for PhyloTree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for PhyloTree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
/// Draws the tree, one vertex per line, with events of reconciled vertices.
///
/// # Example Output
/// ```text
/// Tree with 3 leaves (5 vertices total):
/// [4] Internal <speciation>
///   ├─ [2] Internal <duplication>
///   │   ├─ [0] Leaf "HUMAN"
///   │   └─ [1] Leaf "HUMAN"
///   └─ [3] Leaf "PANTR"
/// ```
impl fmt::Display for PhyloTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root_index else {
            return writeln!(f, "(Empty tree)");
        };
        writeln!(
            f,
            "Tree with {} leaves ({} vertices total):",
            self.num_leaves(),
            self.num_vertices()
        )?;
        self.fmt_vertex(f, root, "", true)
    }
}

impl PhyloTree {
    fn fmt_vertex(
        &self,
        f: &mut fmt::Formatter<'_>,
        index: VertexIndex,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let vertex = &self[index];
        let connector = if prefix.is_empty() {
            ""
        } else if is_last {
            "└─ "
        } else {
            "├─ "
        };

        if vertex.is_leaf() {
            let label = vertex.display_label().unwrap_or("?");
            writeln!(f, "{}{}[{}] Leaf \"{}\"", prefix, connector, index, label)?;
        } else {
            let event = vertex
                .event()
                .map(|e| format!(" <{}>", e))
                .unwrap_or_default();
            writeln!(f, "{}{}[{}] Internal{}", prefix, connector, index, event)?;

            let new_prefix = if prefix.is_empty() {
                "  ".to_string()
            } else {
                format!("{}{}  ", prefix, if is_last { " " } else { "│" })
            };
            let children = vertex.children();
            for (i, &child) in children.iter().enumerate() {
                self.fmt_vertex(f, child, &new_prefix, i + 1 == children.len())?;
            }
        }
        Ok(())
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl PhyloTree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Children are visited in their stored order. Removed vertices are
    /// never visited since they are not reachable from the root.
    ///
    /// # Example
    /// ```
    /// use gsdi::model::PhyloTree;
    ///
    /// let mut tree = PhyloTree::new();
    /// let a = tree.add_species_leaf("A");
    /// let b = tree.add_species_leaf("B");
    /// let root = tree.add_root(vec![a, b]);
    ///
    /// let indices: Vec<_> = tree.post_order_iter().map(|v| v.index()).collect();
    /// assert_eq!(indices, vec![a, b, root]);
    /// ```
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// # Example
    /// ```
    /// use gsdi::model::PhyloTree;
    ///
    /// let mut tree = PhyloTree::new();
    /// let a = tree.add_species_leaf("A");
    /// let b = tree.add_species_leaf("B");
    /// let root = tree.add_root(vec![a, b]);
    ///
    /// let indices: Vec<_> = tree.pre_order_iter().map(|v| v.index()).collect();
    /// assert_eq!(indices, vec![root, a, b]);
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a PhyloTree) -> Self {
        let stack = tree.root_index.map(|r| (r, false)).into_iter().collect();
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            // Push children in reverse, so the first child is processed first
            for &child in vertex.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a PhyloTree) -> Self {
        let stack = tree.root_index.into_iter().collect();
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];
        self.stack.extend(vertex.children().iter().rev());
        Some(vertex)
    }
}

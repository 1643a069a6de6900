//! Data model for rooted phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [PhyloTree], which uses the arena pattern to
//! store [Vertex] nodes, referenced by [VertexIndex]. Vertices may have any
//! number of children, so species trees with polytomies are supported.
//!
//! Leaves carry an optional [Taxonomy] (scientific name, taxonomy code,
//! and/or [Identifier]), which is what gene tree leaves are matched on
//! during reconciliation.
//!
//! # Reconciliation annotations
//! Each vertex can store a *link* (index of a vertex in another tree) and
//! an [Event]. A reconciliation run writes both onto the gene tree and
//! leaves them there for downstream use, e.g. for writing NHX.

pub mod event;
pub mod taxonomy;
pub mod tree;
pub mod vertex;

pub use event::Event;
pub use taxonomy::{Identifier, Taxonomy};
pub use tree::{PhyloTree, PostOrderIter, PreOrderIter, VertexIndex};
pub use vertex::{BranchLength, Vertex};

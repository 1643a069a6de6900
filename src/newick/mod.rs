//! Newick format parser and writer for phylogenetic trees.
//!
//! This module provides [NewickParser] to read Newick strings into
//! [PhyloTree]s, and [to_newick] to write them back, optionally with NHX
//! tags carrying taxonomy and reconciliation events.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_file`] - parses all trees in a file
//! * [`parse_str`] - parses a single string
//!
//! # Format
//! The accepted grammar is:
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex (',' vertex)* ')' [label] decoration*`
//! * `leaf ::= [label] decoration*`
//! * `decoration ::= ':' number | '[' comment ']'`
//!
//! Furthermore:
//! * Internal vertices may have any number of children (polytomies)
//! * Labels may be single-quoted, with `''` as an escaped quote
//! * Whitespace and `[...]` comments may occur between elements
//! * NHX comments (`[&&NHX:S=HUMAN:T=9606:D=Y]`) set taxonomy and events;
//!   all other comments are skipped
//!
//! How leaf labels are interpreted as taxonomy is configured with
//! [`NewickParser::with_taxonomy_from`]; see [LeafTaxonomy].

mod defs;
pub mod parser;
pub mod writer;

pub use parser::{LeafTaxonomy, NewickParser};
pub use writer::{NewickStyle, to_newick, write_newick_file};

use crate::model::PhyloTree;
use crate::parser::ParsingError;
use crate::parser::byte_parser::ByteParser;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a file containing semicolon-separated Newick strings,
/// reading leaf labels as scientific names.
///
/// # Returns
/// * `Vec<PhyloTree>` - All parsed trees
/// * [ParsingError] - If file reading fails or Newick format is invalid
///
/// # Example
/// ```no_run
/// use gsdi::newick::parse_file;
///
/// let trees = parse_file("gene_trees.nwk")?;
/// println!("Parsed {} trees", trees.len());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<PhyloTree>, ParsingError> {
    let content = std::fs::read(path)?;
    NewickParser::new().parse_all(ByteParser::from_bytes(&content))
}

/// Parses a single Newick string, reading leaf labels as scientific names.
///
/// # Example
/// ```
/// use gsdi::newick::parse_str;
///
/// let tree = parse_str("((Homo_sapiens,Pan_troglodytes),Gorilla_gorilla);")?;
/// assert_eq!(tree.num_leaves(), 3);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<PhyloTree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    NewickParser::new().parse_str(&mut byte_parser)
}

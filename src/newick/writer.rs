//! Newick (and NHX) string and file writing.

use crate::model::{PhyloTree, Vertex, VertexIndex};
use crate::newick::defs::{CHARS_PER_VERTEX_GUESS, NHX_PREFIX};
use crate::parser::utils::{escape_label, is_nhx_value_writable};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Style for serializing a tree to Newick format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewickStyle {
    /// Labels and branch lengths only.
    #[default]
    Plain,
    /// Additionally writes taxonomy and reconciliation events as NHX tags,
    /// e.g. `(A,B)[&&NHX:D=Y]`.
    Nhx,
}

/// Writes given list of trees to a file, one Newick string per line.
///
/// # Errors
/// Returns an I/O error if creating or writing the file fails.
pub fn write_newick_file<P: AsRef<Path>>(
    path: P,
    trees: &[PhyloTree],
    style: NewickStyle,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for tree in trees {
        writer.write_all(to_newick(tree, style).as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// Leaves are labelled by name, falling back to their taxonomy
/// (see [`Vertex::display_label`]); internal vertices by name if they have one.
/// An empty tree is written as `;`.
///
/// # Example
/// ```
/// use gsdi::model::PhyloTree;
/// use gsdi::newick::{NewickStyle, to_newick};
///
/// let mut tree = PhyloTree::new();
/// let a = tree.add_species_leaf("Homo sapiens");
/// let b = tree.add_species_leaf("Pan troglodytes");
/// tree.add_root(vec![a, b]);
///
/// assert_eq!(to_newick(&tree, NewickStyle::Plain), "(Homo_sapiens,Pan_troglodytes);");
/// ```
pub fn to_newick(tree: &PhyloTree, style: NewickStyle) -> String {
    let mut newick = String::with_capacity(tree.num_vertices() * CHARS_PER_VERTEX_GUESS);
    if let Some(root) = tree.root_index() {
        build_newick(tree, &mut newick, root, style);
    }
    newick.push(';');
    newick
}

fn build_newick(tree: &PhyloTree, newick: &mut String, index: VertexIndex, style: NewickStyle) {
    let vertex = &tree[index];

    if vertex.is_internal() {
        newick.push('(');
        for (i, &child) in vertex.children().iter().enumerate() {
            if i > 0 {
                newick.push(',');
            }
            build_newick(tree, newick, child, style);
        }
        newick.push(')');
    }

    let label = if vertex.is_leaf() {
        vertex.display_label()
    } else {
        vertex.name()
    };
    if let Some(label) = label {
        newick.push_str(&escape_label(label));
    }

    if let Some(branch_length) = vertex.branch_length() {
        newick.push(':');
        newick.push_str(&branch_length.to_string());
    }

    if style == NewickStyle::Nhx {
        push_nhx_tags(newick, vertex);
    }
}

/// Values that could not be read back unchanged (containing `[`, `]`, or
/// text like `:D=`) are left out.
fn push_nhx_tags(newick: &mut String, vertex: &Vertex) {
    let mut tags = String::new();
    if let Some(taxonomy) = vertex.taxonomy() {
        if let Some(species) = taxonomy.code().or(taxonomy.scientific_name()) {
            push_nhx_tag(&mut tags, vertex, "S", species);
        }
        if let Some(id) = taxonomy.identifier() {
            // A provider-less value containing ':' would be read back with a provider
            if id.provider().is_some() || !id.value().contains(':') {
                push_nhx_tag(&mut tags, vertex, "T", &id.value_plus_provider());
            } else {
                warn!(
                    vertex = vertex.index(),
                    value = id.value(),
                    "identifier not writable as NHX tag"
                );
            }
        }
    }
    if let Some(event) = vertex.event() {
        tags.push_str(":D=");
        tags.push_str(event.nhx_tag());
    }

    if !tags.is_empty() {
        newick.push('[');
        newick.push_str(NHX_PREFIX);
        newick.push_str(&tags);
        newick.push(']');
    }
}

fn push_nhx_tag(tags: &mut String, vertex: &Vertex, key: &str, value: &str) {
    if is_nhx_value_writable(value) {
        tags.push(':');
        tags.push_str(key);
        tags.push('=');
        tags.push_str(value);
    } else {
        warn!(vertex = vertex.index(), key, value, "value not writable as NHX tag");
    }
}

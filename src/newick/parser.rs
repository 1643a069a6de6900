//! Structs and logic to parse Newick strings into [PhyloTree]s.

use crate::model::{BranchLength, Event, Identifier, PhyloTree, Taxonomy, VertexIndex};
use crate::newick::defs::{NEWICK_LABEL_DELIMITERS, NHX_PREFIX};
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use crate::parser::utils::{is_taxonomy_code, split_nhx_tags, taxonomy_code_suffix};

// =#========================================================================#=
// LEAF TAXONOMY
// =#========================================================================#=
/// How the label of a leaf is turned into [Taxonomy].
///
/// Taxonomy given by NHX tags (`S=`, `T=`) is applied on top of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafTaxonomy {
    /// Labels are names only; leaves get no taxonomy from their label.
    None,
    /// The full label is the scientific name (e.g. `Homo_sapiens`, read
    /// as `Homo sapiens`).
    #[default]
    ScientificName,
    /// The full label is a taxonomy code (e.g. `HUMAN`).
    Code,
    /// The label is a UniProt-style gene name whose suffix after the last
    /// `_` is a taxonomy code (e.g. `BRCA1_HUMAN`). Unquoted, this label is
    /// read as `BRCA1 HUMAN` and split at the space.
    CodeSuffix,
    /// The full label is a taxonomy identifier (e.g. `9606`).
    Identifier,
}

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================#=
/// Parser (configuration) for Newick format phylogenetic trees.
///
/// Unlike strictly binary formats, vertices may have any number of
/// children, so species trees with polytomies can be read.
///
/// # Configuration
/// * [`with_taxonomy_from(leaf_taxonomy)`](Self::with_taxonomy_from)
///     - how leaf labels become [Taxonomy], default
///       [LeafTaxonomy::ScientificName]
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse single tree
/// * [`parse_all`](Self::parse_all) - Parse all trees until EOF
///
/// # Example
/// ```
/// use gsdi::newick::{LeafTaxonomy, NewickParser};
/// use gsdi::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("((BRCA1_HUMAN,BRCA1_PANTR),BRCA1_MOUSE);");
/// let tree = NewickParser::new()
///     .with_taxonomy_from(LeafTaxonomy::CodeSuffix)
///     .parse_str(&mut byte_parser)
///     .unwrap();
///
/// // Unquoted underscores are read as spaces
/// let leaf = tree.leaf_by_name("BRCA1 MOUSE").unwrap();
/// assert_eq!(tree[leaf].taxonomy().unwrap().code(), Some("MOUSE"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NewickParser {
    leaf_taxonomy: LeafTaxonomy,
}

impl NewickParser {
    /// Creates a new [NewickParser] with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how leaf labels are turned into taxonomy.
    pub fn with_taxonomy_from(mut self, leaf_taxonomy: LeafTaxonomy) -> Self {
        self.leaf_taxonomy = leaf_taxonomy;
        self
    }

    pub fn leaf_taxonomy(&self) -> LeafTaxonomy {
        self.leaf_taxonomy
    }

    /// Parses all Newick trees from the byte parser until EOF.
    ///
    /// # Returns
    /// * `Ok(Vec<PhyloTree>)` - All parsed trees
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all(&self, mut byte_parser: ByteParser<'_>) -> Result<Vec<PhyloTree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(&mut byte_parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree terminated by `;`.
    ///
    /// # Arguments
    /// * `parser` - The byte parser positioned at the start of a Newick tree string
    pub fn parse_str(&self, parser: &mut ByteParser<'_>) -> Result<PhyloTree, ParsingError> {
        let mut tree = PhyloTree::new();

        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser));
        }
        let root = self.parse_vertex(parser, &mut tree)?;

        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }

        tree.set_root(root);
        Ok(tree)
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Parses a vertex (internal vertex or leaf), adds it to the tree and
    /// returns its index.
    fn parse_vertex(
        &self,
        parser: &mut ByteParser<'_>,
        tree: &mut PhyloTree,
    ) -> Result<VertexIndex, ParsingError> {
        parser.skip_comment_and_whitespace()?;

        let index = if parser.peek_is(b'(') {
            let children = self.parse_children(parser, tree)?;
            let index = tree.add_internal_vertex(children, None);
            let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
            if !label.is_empty() {
                tree[index].set_name(label);
            }
            index
        } else {
            let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
            let taxonomy = self.taxonomy_from_label(&label);
            let name = (!label.is_empty()).then_some(label);
            tree.add_leaf(name, taxonomy, None)
        };

        self.parse_decorations(parser, tree, index)?;
        Ok(index)
    }

    /// Parses `(vertex[,vertex]*)` and returns the child indices in order.
    fn parse_children(
        &self,
        parser: &mut ByteParser<'_>,
        tree: &mut PhyloTree,
    ) -> Result<Vec<VertexIndex>, ParsingError> {
        if !parser.consume_if(b'(') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' before children but found {:?}", next_char),
            ));
        }

        let mut children = vec![self.parse_vertex(parser, tree)?];
        loop {
            parser.skip_comment_and_whitespace()?;
            if parser.consume_if(b',') {
                children.push(self.parse_vertex(parser, tree)?);
            } else if parser.consume_if(b')') {
                return Ok(children);
            } else if parser.is_eof() {
                return Err(ParsingError::unexpected_eof(parser));
            } else {
                let next_char = parser.peek().map(char::from);
                return Err(ParsingError::invalid_newick_string(
                    parser,
                    format!("Expected ',' or ')' after child but found {:?}", next_char),
                ));
            }
        }
    }

    /// Parses any sequence of comments and `:branch_length` following a
    /// label. NHX comments are applied to the vertex, others are skipped.
    fn parse_decorations(
        &self,
        parser: &mut ByteParser<'_>,
        tree: &mut PhyloTree,
        index: VertexIndex,
    ) -> Result<(), ParsingError> {
        loop {
            parser.skip_whitespace();
            if let Some(comment) = parser.parse_comment()? {
                apply_nhx_tags(&comment, tree, index);
            } else if parser.consume_if(b':') {
                parser.skip_whitespace();
                let branch_length = parse_branch_length(parser)?;
                tree[index].set_branch_length(Some(branch_length));
            } else {
                return Ok(());
            }
        }
    }

    fn taxonomy_from_label(&self, label: &str) -> Option<Taxonomy> {
        if label.is_empty() {
            return None;
        }
        match self.leaf_taxonomy {
            LeafTaxonomy::None => None,
            LeafTaxonomy::ScientificName => Some(Taxonomy::from_scientific_name(label)),
            LeafTaxonomy::Code => Some(Taxonomy::from_code(label)),
            LeafTaxonomy::CodeSuffix => taxonomy_code_suffix(label).map(Taxonomy::from_code),
            LeafTaxonomy::Identifier => Some(Taxonomy::from_identifier(Identifier::new(label))),
        }
    }
}

/// Parses a branch length value; supports scientific notation (e.g. `1.5e-10`).
fn parse_branch_length(parser: &mut ByteParser<'_>) -> Result<BranchLength, ParsingError> {
    let mut value_str = String::new();
    while let Some(b) = parser.peek() {
        if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
            value_str.push(b as char);
            parser.next_byte();
        } else {
            break;
        }
    }

    value_str
        .parse::<f64>()
        .ok()
        .and_then(BranchLength::try_new)
        .ok_or_else(|| parser.error(ParsingErrorType::InvalidBranchLength(value_str)))
}

/// Applies `[&&NHX:S=..:T=..:D=..]` tags to a vertex; other comments are ignored.
///
/// * `S` - taxonomy code if it looks like one, else scientific name
/// * `T` - taxonomy identifier, `provider:value` or just `value`
/// * `D` - event (`Y` duplication, `N` speciation, `?` either)
fn apply_nhx_tags(comment: &str, tree: &mut PhyloTree, index: VertexIndex) {
    let Some(tags) = comment.strip_prefix(NHX_PREFIX) else {
        return;
    };

    for (key, value) in split_nhx_tags(tags)
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
    {
        match key {
            "S" | "T" => {
                let taxonomy = tree[index].taxonomy().cloned().unwrap_or_default();
                let taxonomy = match key {
                    "T" => taxonomy.with_identifier(identifier_from_tag(value)),
                    _ if is_taxonomy_code(value) => taxonomy.with_code(value),
                    _ => taxonomy.with_scientific_name(value),
                };
                tree[index].set_taxonomy(taxonomy);
            }
            "D" => match value {
                "Y" | "T" => tree[index].set_event(Event::Duplication),
                "N" | "F" => tree[index].set_event(Event::Speciation),
                "?" => tree[index].set_event(Event::SpeciationOrDuplication),
                _ => {}
            },
            _ => {}
        }
    }
}

/// Reads `provider:value` (split at the first `:`) or a plain `value`.
fn identifier_from_tag(tag: &str) -> Identifier {
    match tag.split_once(':') {
        Some((provider, value)) if !provider.is_empty() && !value.is_empty() => {
            Identifier::with_provider(value, provider)
        }
        _ => Identifier::new(tag),
    }
}

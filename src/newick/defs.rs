//! Constants for the Newick parser and writer.

/// Newick label delimiters: parentheses, brackets, comma, colon, semicolon
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"([,:;)]";

/// Prefix of an NHX tag comment, e.g. `[&&NHX:S=HUMAN:D=Y]`
pub(crate) const NHX_PREFIX: &str = "&&NHX";

/// Rough number of characters per vertex when pre-allocating Newick strings
pub(crate) const CHARS_PER_VERTEX_GUESS: usize = 12;

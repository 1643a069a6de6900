//! Low-level byte-by-byte parser for ASCII text.
//!
//! This module provides [ByteParser] for text-based tree formats with
//! support for peeking, consuming, comment handling, and quote-aware
//! label parsing. Used as the foundation for the Newick parser.

use crate::parser::parsing_error::{ParsingError, ParsingErrorType};

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser over an in-memory ASCII input.
///
/// # Features
/// - Whitespace and `[...]` comment skipping
/// - Comment content extraction (e.g. for NHX tags)
/// - Quote-aware label parsing (single quotes with `''` escaping)
/// - Context extraction for error reporting
///
/// # Example
/// ```
/// use gsdi::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [comment] (A,B);");
/// parser.skip_comment_and_whitespace().unwrap();
/// assert_eq!(parser.peek(), Some(b'('));
/// ```
pub struct ByteParser<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> ByteParser<'a> {
    /// Creates a new `ByteParser` over a string.
    pub fn for_str(input: &'a str) -> Self {
        Self::from_bytes(input.as_bytes())
    }

    /// Creates a new `ByteParser` over a byte slice.
    pub fn from_bytes(input: &'a [u8]) -> Self {
        Self { input, position: 0 }
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Checks if the current byte equals `ch`.
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it equals `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Consumes the next bytes if they match `sequence` exactly.
    pub fn consume_if_sequence(&mut self, sequence: &[u8]) -> bool {
        if self.input[self.position.min(self.input.len())..].starts_with(sequence) {
            self.position += sequence.len();
            true
        } else {
            false
        }
    }

    /// Skips (consumes) all consecutive whitespace characters.
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    /// Parses a `[...]` comment if present and returns its content
    /// (without the brackets).
    ///
    /// # Errors
    /// Returns an error if a comment starts with `[` but doesn't have a closing `]`.
    pub fn parse_comment(&mut self) -> Result<Option<String>, ParsingError> {
        if !self.peek_is(b'[') {
            return Ok(None);
        }
        let start = self.position;
        self.position += 1;

        let mut content = Vec::new();
        while let Some(b) = self.next_byte() {
            if b == b']' {
                return Ok(Some(String::from_utf8_lossy(&content).into_owned()));
            }
            content.push(b);
        }

        self.position = start;
        Err(self.error(ParsingErrorType::UnclosedComment))
    }

    /// Skips (consumes) a comment if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        Ok(self.parse_comment()?.is_some())
    }

    /// Skips (consumes) all consecutive whitespace and comments.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();
        while self.skip_comment()? {
            self.skip_whitespace();
        }
        Ok(())
    }

    /// Parses a label (quoted or unquoted) ending at any of `delimiters`.
    ///
    /// Leading whitespace is skipped; an unquoted label ends at whitespace too.
    ///
    /// # Errors
    /// Returns an error if a quoted label is not closed.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_whitespace();
        if self.peek_is(b'\'') {
            self.parse_quoted_label()
        } else {
            Ok(self.parse_unquoted_label(delimiters))
        }
    }

    /// Parses a label enclosed in single quotes. Single quotes within the
    /// label are escaped by doubling them (e.g. `'Wilson''s'` becomes `Wilson's`).
    ///
    /// Assumes the parser is positioned at the opening quote.
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        let start = self.position;
        self.position += 1; // opening '

        let mut label = Vec::new();
        while let Some(b) = self.next_byte() {
            if b == b'\'' && !self.consume_if(b'\'') {
                return Ok(String::from_utf8_lossy(&label).into_owned());
            }
            label.push(b);
        }

        self.position = start;
        Err(self.error(ParsingErrorType::UnclosedQuote))
    }

    /// Parses an unquoted label until any of `delimiters` or whitespace.
    ///
    /// Underscores stand for spaces in unquoted labels and are replaced
    /// (e.g. `Homo_sapiens` becomes `Homo sapiens`).
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> String {
        let start = self.position;
        while let Some(b) = self.peek() {
            if delimiters.contains(&b) || b.is_ascii_whitespace() {
                break;
            }
            self.position += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.position]).replace('_', " ")
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        let start = self.position.min(self.input.len());
        let end = (start + k).min(self.input.len());
        String::from_utf8_lossy(&self.input[start..end]).into_owned()
    }

    /// Creates an error of the given kind at the current position.
    pub fn error(&self, kind: ParsingErrorType) -> ParsingError {
        ParsingError::from_parser(kind, self)
    }
}

//! Label escaping and NHX tag helpers for Newick strings.

/// Characters that cannot appear in an unquoted Newick label.
/// Underscores can, but are read back as spaces.
const SPECIAL_CHARS: &[char] = &[',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\'', '_'];

/// Escapes a label for safe use in Newick strings.
///
/// Labels containing special characters (punctuation, delimiters,
/// underscores) are wrapped in single quotes, with internal single quotes
/// doubled. Otherwise spaces are replaced with underscores.
///
/// # Examples
/// ```
/// # use gsdi::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Homo sapiens"), "Homo_sapiens");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// assert_eq!(escape_label("BRCA1_HUMAN"), "'BRCA1_HUMAN'");
/// ```
pub fn escape_label(label: &str) -> String {
    if label.contains(SPECIAL_CHARS) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.replace(' ', "_")
    }
}

/// Splits a UniProt-style gene label such as `BRCA1_HUMAN` into its
/// taxonomy code suffix (`HUMAN`).
///
/// The separator may also be a space, as unquoted Newick labels have
/// their underscores read as spaces.
///
/// The suffix must be 3 to 5 uppercase ASCII letters or digits and
/// start with a letter; otherwise `None` is returned.
///
/// # Examples
/// ```
/// # use gsdi::parser::utils::taxonomy_code_suffix;
/// assert_eq!(taxonomy_code_suffix("BRCA1_HUMAN"), Some("HUMAN"));
/// assert_eq!(taxonomy_code_suffix("BRCA1 HUMAN"), Some("HUMAN"));
/// assert_eq!(taxonomy_code_suffix("P53_MOUSE/1-393"), None);
/// assert_eq!(taxonomy_code_suffix("gene_human"), None);
/// assert_eq!(taxonomy_code_suffix("HUMAN"), None);
/// ```
pub fn taxonomy_code_suffix(label: &str) -> Option<&str> {
    let (_, suffix) = label.rsplit_once(['_', ' '])?;
    is_taxonomy_code(suffix).then_some(suffix)
}

/// Checks whether `code` looks like a taxonomy code (e.g. `HUMAN`, `ARATH`, `BUCA4`):
/// 3 to 5 uppercase ASCII letters or digits, starting with a letter.
///
/// # Examples
/// ```
/// # use gsdi::parser::utils::is_taxonomy_code;
/// assert!(is_taxonomy_code("PANTR"));
/// assert!(is_taxonomy_code("BUCA4"));
/// assert!(!is_taxonomy_code("Homo sapiens"));
/// assert!(!is_taxonomy_code("9606"));
/// ```
pub fn is_taxonomy_code(code: &str) -> bool {
    (3..=5).contains(&code.len())
        && code.starts_with(|c: char| c.is_ascii_uppercase())
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

// ============================================================================
// NHX tags
// ============================================================================
/// Splits the body of an NHX comment (after `&&NHX`) into `(key, value)`
/// pairs.
///
/// A tag starts at a `:` directly followed by an alphanumeric key and `=`,
/// so values may contain `:` themselves (e.g. `T=ncbi:9606`).
/// Text before the first tag is ignored.
///
/// # Examples
/// ```
/// # use gsdi::parser::utils::split_nhx_tags;
/// let tags = split_nhx_tags(":S=E. coli O157:H7:T=ncbi:562:D=N");
/// assert_eq!(tags, vec![("S", "E. coli O157:H7"), ("T", "ncbi:562"), ("D", "N")]);
/// ```
pub fn split_nhx_tags(body: &str) -> Vec<(&str, &str)> {
    let starts: Vec<usize> = body
        .match_indices(':')
        .map(|(i, _)| i)
        .filter(|&i| is_tag_start(&body[i + 1..]))
        .collect();

    starts
        .iter()
        .enumerate()
        .filter_map(|(k, &start)| {
            let end = starts.get(k + 1).copied().unwrap_or(body.len());
            body[start + 1..end].split_once('=')
        })
        .collect()
}

/// Checks whether `value` can be written as an NHX tag value and read back
/// unchanged by [split_nhx_tags]: it must not close or open a comment, and
/// must not contain something that reads as the start of another tag.
///
/// # Examples
/// ```
/// # use gsdi::parser::utils::is_nhx_value_writable;
/// assert!(is_nhx_value_writable("E. coli O157:H7"));
/// assert!(!is_nhx_value_writable("a]b"));
/// assert!(!is_nhx_value_writable("x:D=Y"));
/// assert!(!is_nhx_value_writable(""));
/// ```
pub fn is_nhx_value_writable(value: &str) -> bool {
    !value.is_empty()
        && !value.contains(['[', ']'])
        && !value
            .match_indices(':')
            .any(|(i, _)| is_tag_start(&value[i + 1..]))
}

/// Whether `rest` starts with `KEY=`.
fn is_tag_start(rest: &str) -> bool {
    let key_len = rest.bytes().take_while(u8::is_ascii_alphanumeric).count();
    key_len > 0 && rest.as_bytes().get(key_len) == Some(&b'=')
}

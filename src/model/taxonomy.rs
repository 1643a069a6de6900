//! Taxonomic data attached to tree vertices.
//!
//! A [Taxonomy] may hold any combination of a scientific name
//! (e.g. `Homo sapiens`), a taxonomy code (e.g. `HUMAN`), and an
//! [Identifier] (e.g. `ncbi:9606`). Which of these is used to match gene
//! tree leaves to species tree leaves is decided per run, see
//! [TaxonomyComparisonBase](crate::sdi::TaxonomyComparisonBase).

use std::fmt;

/// Taxonomic data of a vertex.
///
/// Empty strings are treated as absent by all `has_*` queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Taxonomy {
    scientific_name: Option<String>,
    code: Option<String>,
    identifier: Option<Identifier>,
}

impl Taxonomy {
    /// Creates an empty taxonomy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a taxonomy holding only a scientific name.
    pub fn from_scientific_name<S: Into<String>>(name: S) -> Self {
        Self::new().with_scientific_name(name)
    }

    /// Creates a taxonomy holding only a taxonomy code.
    pub fn from_code<S: Into<String>>(code: S) -> Self {
        Self::new().with_code(code)
    }

    /// Creates a taxonomy holding only an identifier.
    pub fn from_identifier(identifier: Identifier) -> Self {
        Self::new().with_identifier(identifier)
    }

    /// Sets the scientific name.
    pub fn with_scientific_name<S: Into<String>>(mut self, name: S) -> Self {
        self.scientific_name = Some(name.into());
        self
    }

    /// Sets the taxonomy code.
    pub fn with_code<S: Into<String>>(mut self, code: S) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the identifier.
    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn scientific_name(&self) -> Option<&str> {
        self.scientific_name.as_deref().filter(|s| !s.is_empty())
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|s| !s.is_empty())
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref().filter(|id| !id.value.is_empty())
    }

    pub fn has_scientific_name(&self) -> bool {
        self.scientific_name().is_some()
    }

    pub fn has_code(&self) -> bool {
        self.code().is_some()
    }

    pub fn has_identifier(&self) -> bool {
        self.identifier().is_some()
    }

    /// Returns `true` if none of the fields carries a non-empty value.
    pub fn is_empty(&self) -> bool {
        !self.has_scientific_name() && !self.has_code() && !self.has_identifier()
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if let Some(id) = self.identifier() {
            parts.push(format!("[{}]", id.value_plus_provider()));
        }
        if let Some(code) = self.code() {
            parts.push(code.to_string());
        }
        if let Some(name) = self.scientific_name() {
            parts.push(name.to_string());
        }
        write!(f, "{}", parts.join(" "))
    }
}

// =#========================================================================#=
// IDENTIFIER
// =#========================================================================#=
/// External identifier of a taxon, optionally qualified by its provider
/// (e.g. value `9606` from provider `ncbi`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    value: String,
    provider: Option<String>,
}

impl Identifier {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Identifier {
            value: value.into(),
            provider: None,
        }
    }

    pub fn with_provider<S: Into<String>>(value: S, provider: S) -> Self {
        Identifier {
            value: value.into(),
            provider: Some(provider.into()),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref().filter(|p| !p.is_empty())
    }

    /// Returns `provider:value`, or only `value` if no provider is set.
    pub fn value_plus_provider(&self) -> String {
        match self.provider() {
            Some(provider) => format!("{}:{}", provider, self.value),
            None => self.value.clone(),
        }
    }
}

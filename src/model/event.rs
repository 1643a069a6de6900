//! Evolutionary events assigned to internal gene tree vertices.

use std::fmt;

/// Event inferred for an internal vertex of a gene tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Gene lineages diverged because the species diverged.
    Speciation,
    /// Gene was duplicated within a single species lineage.
    Duplication,
    /// Either of the above; cannot be decided because the species tree
    /// is unresolved (polytomy) at the mapped vertex.
    SpeciationOrDuplication,
}

impl Event {
    pub fn is_speciation(&self) -> bool {
        matches!(self, Event::Speciation)
    }

    pub fn is_duplication(&self) -> bool {
        matches!(self, Event::Duplication)
    }

    pub fn is_speciation_or_duplication(&self) -> bool {
        matches!(self, Event::SpeciationOrDuplication)
    }

    /// Value of the NHX `D=` tag for this event.
    pub fn nhx_tag(&self) -> &'static str {
        match self {
            Event::Speciation => "N",
            Event::Duplication => "Y",
            Event::SpeciationOrDuplication => "?",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Speciation => write!(f, "speciation"),
            Event::Duplication => write!(f, "duplication"),
            Event::SpeciationOrDuplication => write!(f, "speciation or duplication"),
        }
    }
}

//! Term matching against code descriptions.
//!
//! Definitions are compiled once, before any matching: every keyword becomes
//! a case-insensitive regex (plain keywords are escaped and wrapped in word
//! boundaries, quoted keywords are taken verbatim). Matching itself is then
//! a pure function of (compiled definition, description).
//!
//! The engine uses the `regex` crate, so patterns have the standard
//! metacharacters (`.`, `*`, `+`, character classes, alternation) but no
//! lookaround.

use concept_types::{ConceptDefinition, KeywordKind, Term};
use regex::{Regex, RegexBuilder};

use crate::types::{DiscoveryError, DiscoveryResult};

/// A term with every keyword compiled to a case-insensitive pattern.
///
/// The term matches a description when every pattern finds at least one
/// match anywhere in it, independent of order.
#[derive(Debug, Clone)]
pub struct CompiledTerm {
    patterns: Vec<Regex>,
}

impl CompiledTerm {
    /// Compiles a term's keywords for the given concept.
    ///
    /// # Errors
    /// Returns [`DiscoveryError::Pattern`] when a quoted keyword is not a
    /// valid regular expression, identifying the concept and term line.
    pub fn compile(term: &Term, concept: &str) -> DiscoveryResult<Self> {
        let mut patterns = Vec::with_capacity(term.keywords.len());

        for keyword in &term.keywords {
            let pattern = match keyword.kind {
                KeywordKind::Plain => format!(r"\b{}\b", regex::escape(&keyword.value)),
                KeywordKind::Regex => keyword.value.clone(),
            };

            let compiled = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| DiscoveryError::Pattern {
                    concept: concept.to_string(),
                    term: term.to_string(),
                    pattern: keyword.value.clone(),
                    source,
                })?;

            patterns.push(compiled);
        }

        Ok(Self { patterns })
    }

    /// Returns true when every keyword pattern matches the description.
    pub fn matches(&self, description: &str) -> bool {
        self.patterns.iter().all(|p| p.is_match(description))
    }
}

/// A concept definition with all terms compiled, ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledDefinition {
    id: String,
    positive: Vec<CompiledTerm>,
    negative: Vec<CompiledTerm>,
}

impl CompiledDefinition {
    /// Compiles every term of a definition.
    pub fn compile(definition: &ConceptDefinition) -> DiscoveryResult<Self> {
        let positive = definition
            .positive
            .iter()
            .map(|term| CompiledTerm::compile(term, &definition.id))
            .collect::<DiscoveryResult<Vec<_>>>()?;
        let negative = definition
            .negative
            .iter()
            .map(|term| CompiledTerm::compile(term, &definition.id))
            .collect::<DiscoveryResult<Vec<_>>>()?;

        Ok(Self {
            id: definition.id.clone(),
            positive,
            negative,
        })
    }

    /// The concept identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true if the definition declares any positive terms.
    pub fn has_positive_terms(&self) -> bool {
        !self.positive.is_empty()
    }

    /// Returns true when any positive term fully matches the description.
    pub fn matches_positive(&self, description: &str) -> bool {
        self.positive.iter().any(|t| t.matches(description))
    }

    /// Returns true when any negative term fully matches the description.
    pub fn matches_negative(&self, description: &str) -> bool {
        self.negative.iter().any(|t| t.matches(description))
    }

    /// Decides whether a code with this description belongs to the concept.
    ///
    /// Negative terms dominate: any negative match excludes the code outright.
    /// Otherwise the code is included when any positive term matches — or,
    /// for a definition with no positive terms at all, unconditionally. That
    /// default makes a negative-only concept match every code that survives
    /// its exclusions.
    pub fn matches(&self, description: &str) -> bool {
        if self.matches_negative(description) {
            return false;
        }
        if self.positive.is_empty() {
            return true;
        }
        self.matches_positive(description)
    }
}

/// Compiles a slice of definitions, preserving order.
pub fn compile_definitions(
    definitions: &[ConceptDefinition],
) -> DiscoveryResult<Vec<CompiledDefinition>> {
    definitions.iter().map(CompiledDefinition::compile).collect()
}

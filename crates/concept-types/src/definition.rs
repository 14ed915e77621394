//! Concept definition type.
//!
//! A concept definition is the merged rule set for one concept identifier:
//! every positive and negative term declared for that identifier anywhere in
//! the definition file, in file order.

use crate::{Term, TermType};

/// An analyst-defined clinical category and its matching rules.
///
/// A code belongs to the concept when its description satisfies at least one
/// positive term and no negative term. When the same identifier is declared
/// in several blocks of the definition file, the blocks' terms are unioned
/// into a single definition; nothing is overwritten.
///
/// # Examples
///
/// ```
/// use concept_types::{ConceptDefinition, Keyword, Term, TermType};
///
/// let mut definition = ConceptDefinition::new("Type2-Diabetes");
/// definition.push_term(
///     TermType::Positive,
///     Term::new(vec![Keyword::regex("type 2"), Keyword::plain("diabetes")]),
/// );
/// definition.push_term(
///     TermType::Negative,
///     Term::new(vec![Keyword::regex("family history")]),
/// );
///
/// assert_eq!(definition.id, "Type2-Diabetes");
/// assert!(definition.has_positive_terms());
/// assert_eq!(definition.negative.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConceptDefinition {
    /// The concept identifier, unique across a parsed definition file.
    pub id: String,
    /// Terms that include a code in the concept.
    pub positive: Vec<Term>,
    /// Terms that exclude a code from the concept.
    pub negative: Vec<Term>,
}

impl ConceptDefinition {
    /// Creates an empty definition for the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            positive: Vec::new(),
            negative: Vec::new(),
        }
    }

    /// Appends a term to the positive or negative set, preserving order.
    pub fn push_term(&mut self, term_type: TermType, term: Term) {
        match term_type {
            TermType::Positive => self.positive.push(term),
            TermType::Negative => self.negative.push(term),
        }
    }

    /// Returns true if any positive terms have been declared.
    ///
    /// A definition with no positive terms places no positive requirement on
    /// codes; membership then depends solely on the negative terms.
    pub fn has_positive_terms(&self) -> bool {
        !self.positive.is_empty()
    }

    /// Merges another definition for the same identifier into this one.
    ///
    /// All positive and negative terms of `other` are appended after the
    /// terms already present.
    pub fn merge(&mut self, other: ConceptDefinition) {
        self.positive.extend(other.positive);
        self.negative.extend(other.negative);
    }

    /// Returns the total number of terms across both sets.
    pub fn term_count(&self) -> usize {
        self.positive.len() + self.negative.len()
    }
}

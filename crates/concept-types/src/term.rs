//! Term types.
//!
//! A term is a conjunctive set of keywords: one matching unit within a
//! concept's positive or negative rule set. A term matches a description
//! only when every one of its keywords matches, independent of order.

use std::fmt;

use crate::Keyword;

/// Whether a term includes or excludes matching codes.
///
/// # Examples
///
/// ```
/// use concept_types::TermType;
///
/// assert_eq!(TermType::parse("POSITIVE"), Some(TermType::Positive));
/// assert_eq!(TermType::parse("negative"), Some(TermType::Negative));
/// assert_eq!(TermType::parse("neutral"), None);
/// assert_eq!(TermType::default(), TermType::Positive);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TermType {
    /// Codes whose description satisfies the term belong to the concept.
    #[default]
    Positive,
    /// Codes whose description satisfies the term are excluded from the
    /// concept, regardless of any positive term.
    Negative,
}

impl TermType {
    /// Parses a term type header value, case-insensitively.
    ///
    /// Returns `None` if the value is neither `positive` nor `negative`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

/// A conjunctive set of keywords parsed from one definition-file line.
///
/// # Examples
///
/// ```
/// use concept_types::{Keyword, Term};
///
/// let term = Term::new(vec![
///     Keyword::regex("type 2"),
///     Keyword::plain("diabetes"),
/// ]);
/// assert_eq!(term.keywords.len(), 2);
/// assert_eq!(term.to_string(), "\"type 2\" diabetes");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Term {
    /// The keywords that must all match for the term to match.
    pub keywords: Vec<Keyword>,
}

impl Term {
    /// Creates a term from its keywords.
    pub fn new(keywords: Vec<Keyword>) -> Self {
        Self { keywords }
    }

    /// Returns true if the term has no keywords.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl fmt::Display for Term {
    /// Renders the term as a definition-file line, regex keywords re-quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, keyword) in self.keywords.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", keyword)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_type_parse() {
        assert_eq!(TermType::parse("positive"), Some(TermType::Positive));
        assert_eq!(TermType::parse("Negative"), Some(TermType::Negative));
        assert_eq!(TermType::parse("POSITIVE"), Some(TermType::Positive));
        assert_eq!(TermType::parse(""), None);
        assert_eq!(TermType::parse("both"), None);
    }

    #[test]
    fn test_term_type_default_is_positive() {
        assert_eq!(TermType::default(), TermType::Positive);
    }

    #[test]
    fn test_term_display_requotes_patterns() {
        let term = Term::new(vec![
            Keyword::plain("chronic"),
            Keyword::regex("renal.*failure"),
        ]);
        assert_eq!(term.to_string(), "chronic \"renal.*failure\"");
    }
}

//! Keyword types.
//!
//! A keyword is the atomic matching unit within a term. The two kinds are
//! distinguished at parse time by quoting in the definition file: quoted
//! substrings become regex keywords, bare tokens become plain keywords.

use std::fmt;

/// The matching semantics of a keyword.
///
/// # Examples
///
/// ```
/// use concept_types::{Keyword, KeywordKind};
///
/// let plain = Keyword::plain("renal");
/// assert_eq!(plain.kind, KeywordKind::Plain);
///
/// let pattern = Keyword::regex("kidney.*injury");
/// assert_eq!(pattern.kind, KeywordKind::Regex);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeywordKind {
    /// Matches as a case-insensitive whole word anywhere in a description.
    Plain,
    /// Matches as a case-insensitive regular expression pattern searched
    /// anywhere in a description (unanchored).
    Regex,
}

/// A single word or pattern to search for in a code description.
///
/// # Examples
///
/// ```
/// use concept_types::Keyword;
///
/// let keyword = Keyword::plain("chronic");
/// assert_eq!(keyword.value, "chronic");
/// assert!(keyword.is_plain());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyword {
    /// Whether the keyword matches as a whole word or as a pattern.
    pub kind: KeywordKind,
    /// The word or pattern text. For regex keywords this is the exact inner
    /// content of the quoted substring, quote characters stripped.
    pub value: String,
}

impl Keyword {
    /// Creates a plain (whole-word) keyword.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            kind: KeywordKind::Plain,
            value: value.into(),
        }
    }

    /// Creates a regex (pattern) keyword.
    pub fn regex(value: impl Into<String>) -> Self {
        Self {
            kind: KeywordKind::Regex,
            value: value.into(),
        }
    }

    /// Returns true if this is a plain whole-word keyword.
    pub fn is_plain(&self) -> bool {
        self.kind == KeywordKind::Plain
    }

    /// Returns true if this is a regex pattern keyword.
    pub fn is_regex(&self) -> bool {
        self.kind == KeywordKind::Regex
    }
}

impl fmt::Display for Keyword {
    /// Renders the keyword as it appears in a definition file: regex
    /// keywords re-quoted, plain keywords bare.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            KeywordKind::Plain => write!(f, "{}", self.value),
            KeywordKind::Regex => write!(f, "\"{}\"", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_constructors() {
        let plain = Keyword::plain("renal");
        assert!(plain.is_plain());
        assert!(!plain.is_regex());
        assert_eq!(plain.value, "renal");

        let pattern = Keyword::regex("type [12]");
        assert!(pattern.is_regex());
        assert!(!pattern.is_plain());
        assert_eq!(pattern.value, "type [12]");
    }

    #[test]
    fn test_keyword_display() {
        assert_eq!(Keyword::plain("renal").to_string(), "renal");
        assert_eq!(
            Keyword::regex("family history").to_string(),
            "\"family history\""
        );
    }
}

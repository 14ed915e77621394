//! Engine-specific types: errors, result alias and configuration.

use thiserror::Error;

/// Errors that can occur while preparing a discovery run.
///
/// All of these are fatal and abort the run before any matching begins;
/// matching itself is total over well-formed compiled inputs.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// I/O error reading an input file.
    #[error("IO error reading input file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV-layer error reading the code file.
    #[error("error reading code file: {0}")]
    Csv(#[from] csv::Error),

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A term line appeared before any concept header.
    #[error("line {line}: term line appears before any concept header: {content}")]
    TermOutsideConcept {
        /// Line number in the definition file (1-based).
        line: usize,
        /// The offending line content.
        content: String,
    },

    /// A `##` header named something other than `positive` or `negative`.
    #[error("line {line}: unrecognized term type \"{value}\" (expected \"positive\" or \"negative\")")]
    UnknownTermType {
        /// Line number in the definition file (1-based).
        line: usize,
        /// The unrecognized header value.
        value: String,
    },

    /// A term line contained an odd number of quote characters.
    #[error("line {line}: unterminated quote in term for concept {concept}: {content}")]
    UnterminatedQuote {
        /// Line number in the definition file (1-based).
        line: usize,
        /// The concept the term belongs to.
        concept: String,
        /// The offending line content.
        content: String,
    },

    /// A quoted keyword is not a valid regular expression.
    #[error("invalid pattern \"{pattern}\" in term '{term}' for concept {concept}: {source}")]
    Pattern {
        /// The concept the term belongs to.
        concept: String,
        /// The term line the pattern came from.
        term: String,
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying regex error.
        source: regex::Error,
    },
}

/// Result type for engine operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Configuration for generalising discovered codes up the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneraliseConfig {
    /// The highest hierarchy level the search may ascend to. Level 1 is the
    /// root; a larger value stops the search further down the hierarchy.
    pub search_level: usize,
    /// The fraction of a parent's children that must already be found before
    /// the parent itself is added.
    pub child_threshold: f64,
}

impl Default for GeneraliseConfig {
    fn default() -> Self {
        Self {
            search_level: 1,
            child_threshold: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generalise_config_default() {
        let config = GeneraliseConfig::default();
        assert_eq!(config.search_level, 1);
        assert!((config.child_threshold - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = DiscoveryError::UnknownTermType {
            line: 7,
            value: "neutral".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("line 7"));
        assert!(message.contains("neutral"));

        let err = DiscoveryError::TermOutsideConcept {
            line: 1,
            content: "chronic renal".to_string(),
        };
        assert!(err.to_string().contains("chronic renal"));
    }
}

//! # concept-types
//!
//! Type definitions for clinical concept discovery.
//!
//! This crate provides the data model shared by the concept discovery
//! engine: keywords, terms, concept definitions and code entries. A
//! concept definition describes an analyst-defined clinical category as
//! sets of positive and negative matching terms; a code entry is one row
//! of the clinical code hierarchy being searched.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use concept_types::{ConceptDefinition, Keyword, Term, TermType};
//!
//! let mut definition = ConceptDefinition::new("CKD-Diagnosis");
//! definition.push_term(
//!     TermType::Positive,
//!     Term::new(vec![Keyword::plain("chronic"), Keyword::plain("renal")]),
//! );
//! definition.push_term(
//!     TermType::Negative,
//!     Term::new(vec![Keyword::regex("family history")]),
//! );
//!
//! assert_eq!(definition.positive.len(), 1);
//! assert_eq!(definition.negative.len(), 1);
//! ```
//!
//! ## Without Serde
//!
//! To use this crate without serde (zero dependencies):
//!
//! ```toml
//! [dependencies]
//! concept-types = { version = "0.1", default-features = false }
//! ```

#![warn(missing_docs)]

mod code;
mod definition;
mod keyword;
mod term;

// Re-export all public types at crate root
pub use code::CodeEntry;
pub use definition::ConceptDefinition;
pub use keyword::{Keyword, KeywordKind};
pub use term::{Term, TermType};

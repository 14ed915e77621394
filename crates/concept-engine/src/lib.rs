//! # concept-engine
//!
//! Term-matching engine for clinical concept discovery.
//!
//! Classifies clinical codes into analyst-defined concepts by matching their
//! free-text descriptions against a small rule grammar of positive and
//! negative terms. A run is two-phase: parse the definition file and compile
//! every keyword to a pattern, then evaluate the full (concept x code)
//! cross-product.
//!
//! ## Features
//!
//! - `parallel` (default): Enables parallel discovery via rayon.
//!
//! ## Usage
//!
//! ```ignore
//! use concept_engine::{
//!     compile_definitions, discover, parse_definitions, CodeHierarchy,
//! };
//!
//! let definitions = parse_definitions(&std::fs::read_to_string("concepts.txt")?)?;
//! let compiled = compile_definitions(&definitions)?;
//! let hierarchy = CodeHierarchy::from_path("Data/Coding.tsv")?;
//!
//! let discovery = discover(&compiled, hierarchy.entries());
//! for (concept, codes) in discovery.iter() {
//!     println!("{concept}: {} codes", codes.included.len());
//! }
//! ```

#![warn(missing_docs)]

mod engine;
mod grammar;
mod hierarchy;
mod matcher;
mod report;
mod types;

// Re-export concept-types for convenience
pub use concept_types;

#[cfg(feature = "parallel")]
pub use engine::discover_parallel;
pub use engine::{discover, ConceptCodes, Discovery};
pub use grammar::parse_definitions;
pub use hierarchy::CodeHierarchy;
pub use matcher::{compile_definitions, CompiledDefinition, CompiledTerm};
pub use report::{
    write_generalised_reports, write_reports, ALL_CODES_FILE, GENERAL_ALL_CODES_FILE,
    GENERAL_POSITIVE_CODES_FILE, POSITIVE_CODES_FILE,
};
pub use types::{DiscoveryError, DiscoveryResult, GeneraliseConfig};

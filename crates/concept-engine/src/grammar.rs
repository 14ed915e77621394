//! Concept definition grammar parser.
//!
//! Parses the flat-file concept definition format:
//!
//! ```text
//! # CKD-Diagnosis
//! ## positive
//! chronic renal
//! "kidney.*failure"
//! ## negative
//! kidney donation
//! ```
//!
//! A `#` line opens (or reopens) a concept block; a `##` line switches the
//! term type for the rest of the block; every other non-blank line is one
//! conjunctive term. Quoted substrings become regex keywords, bare tokens
//! become plain keywords. Repeated blocks for one identifier are merged,
//! unioning their positive and negative term sets in file order.

use std::collections::HashMap;

use concept_types::{ConceptDefinition, Keyword, Term, TermType};

use crate::types::{DiscoveryError, DiscoveryResult};

/// Parses a concept definition file into merged, ordered definitions.
///
/// Definitions are returned in the order their identifiers first appear.
/// Term type defaults to positive at the start of every concept block; it
/// does not carry over from a previous block.
///
/// # Errors
/// Returns an error for a term line before any concept header, a `##` header
/// that is neither `positive` nor `negative`, or an unterminated quote.
pub fn parse_definitions(text: &str) -> DiscoveryResult<Vec<ConceptDefinition>> {
    let mut definitions: Vec<ConceptDefinition> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut current: Option<usize> = None;
    let mut current_type = TermType::Positive;

    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no + 1;

        if let Some(header) = line.strip_prefix("##") {
            let value = header.trim();
            current_type = TermType::parse(value).ok_or_else(|| {
                DiscoveryError::UnknownTermType {
                    line: line_no,
                    value: value.to_string(),
                }
            })?;
        } else if let Some(header) = line.strip_prefix('#') {
            let id = header.trim().to_string();
            let slot = match index.get(&id).copied() {
                Some(slot) => slot,
                None => {
                    definitions.push(ConceptDefinition::new(id.clone()));
                    index.insert(id, definitions.len() - 1);
                    definitions.len() - 1
                }
            };
            current = Some(slot);
            current_type = TermType::Positive;
        } else if line.trim().is_empty() {
            continue;
        } else {
            let Some(slot) = current else {
                return Err(DiscoveryError::TermOutsideConcept {
                    line: line_no,
                    content: line.trim().to_string(),
                });
            };
            let term = tokenize_term(line, line_no, &definitions[slot].id)?;
            definitions[slot].push_term(current_type, term);
        }
    }

    Ok(definitions)
}

/// Tokenizes one term line into keywords.
///
/// Quote characters cannot be escaped in this format, so the line splits on
/// `"` into alternating unquoted/quoted segments; a balanced line has an odd
/// number of segments.
fn tokenize_term(line: &str, line_no: usize, concept: &str) -> DiscoveryResult<Term> {
    let segments: Vec<&str> = line.split('"').collect();
    if segments.len() % 2 == 0 {
        return Err(DiscoveryError::UnterminatedQuote {
            line: line_no,
            concept: concept.to_string(),
            content: line.trim().to_string(),
        });
    }

    let mut keywords = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        if i % 2 == 1 {
            keywords.push(Keyword::regex(*segment));
        } else {
            keywords.extend(segment.split_whitespace().map(Keyword::plain));
        }
    }

    Ok(Term::new(keywords))
}

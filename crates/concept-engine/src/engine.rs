//! Discovery orchestration.
//!
//! Runs every compiled definition against every code row and accumulates
//! the per-concept code sets. Each (concept, code) pair is independent, so
//! the cross-product can be evaluated sequentially or in parallel with the
//! same result; the `parallel` feature provides the rayon fast path.

use std::collections::{BTreeSet, HashMap};

use concept_types::CodeEntry;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::matcher::CompiledDefinition;

/// The per-concept match sets accumulated by a discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptCodes {
    /// Codes whose description satisfies at least one positive term.
    pub positive: BTreeSet<String>,
    /// Codes whose description satisfies at least one negative term.
    pub negative: BTreeSet<String>,
    /// The final membership: codes surviving the negative check that meet
    /// the positive requirement (trivially met when no positive terms are
    /// declared).
    pub included: BTreeSet<String>,
}

/// The outcome of a discovery run: one [`ConceptCodes`] per concept, in
/// definition-file order.
///
/// Every concept appears in the outcome, including concepts that matched
/// nothing.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    order: Vec<String>,
    codes: HashMap<String, ConceptCodes>,
}

impl Discovery {
    /// Iterates concepts and their code sets in definition-file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConceptCodes)> {
        self.order
            .iter()
            .filter_map(|id| self.codes.get(id).map(|codes| (id.as_str(), codes)))
    }

    /// Iterates concept identifiers in definition-file order.
    pub fn concepts(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Gets the code sets for one concept.
    pub fn get(&self, id: &str) -> Option<&ConceptCodes> {
        self.codes.get(id)
    }

    /// Gets the final included codes for one concept.
    pub fn included(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.codes.get(id).map(|c| &c.included)
    }

    /// Returns the number of concepts in the outcome.
    pub fn concept_count(&self) -> usize {
        self.order.len()
    }

    /// Returns the total number of included codes across all concepts.
    pub fn included_count(&self) -> usize {
        self.codes.values().map(|c| c.included.len()).sum()
    }

    /// Adds one concept's code sets, merging if the identifier is already
    /// present. Set union keeps the aggregation duplicate-safe.
    fn insert(&mut self, id: String, codes: ConceptCodes) {
        match self.codes.get_mut(&id) {
            Some(existing) => {
                existing.positive.extend(codes.positive);
                existing.negative.extend(codes.negative);
                existing.included.extend(codes.included);
            }
            None => {
                self.order.push(id.clone());
                self.codes.insert(id, codes);
            }
        }
    }
}

/// Evaluates one definition against every code row.
fn evaluate(definition: &CompiledDefinition, entries: &[CodeEntry]) -> ConceptCodes {
    let mut codes = ConceptCodes::default();

    for entry in entries {
        let negative = definition.matches_negative(&entry.description);
        let positive = definition.matches_positive(&entry.description);

        if positive {
            codes.positive.insert(entry.code.clone());
        }
        if negative {
            codes.negative.insert(entry.code.clone());
        }
        if !negative && (positive || !definition.has_positive_terms()) {
            codes.included.insert(entry.code.clone());
        }
    }

    codes
}

/// Runs discovery sequentially over the full (concept x code) cross-product.
pub fn discover(definitions: &[CompiledDefinition], entries: &[CodeEntry]) -> Discovery {
    let mut discovery = Discovery::default();

    for definition in definitions {
        discovery.insert(definition.id().to_string(), evaluate(definition, entries));
    }

    discovery
}

/// Runs discovery with concepts evaluated in parallel.
///
/// Matching is pure over immutable data, so this produces exactly the same
/// outcome as [`discover`].
#[cfg(feature = "parallel")]
pub fn discover_parallel(
    definitions: &[CompiledDefinition],
    entries: &[CodeEntry],
) -> Discovery {
    let evaluated: Vec<(String, ConceptCodes)> = definitions
        .par_iter()
        .map(|definition| (definition.id().to_string(), evaluate(definition, entries)))
        .collect();

    let mut discovery = Discovery::default();
    for (id, codes) in evaluated {
        discovery.insert(id, codes);
    }

    discovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_definitions;
    use crate::matcher::compile_definitions;

    fn make_entries() -> Vec<CodeEntry> {
        vec![
            CodeEntry::new("K05", "Chronic renal failure"),
            CodeEntry::new("K06", "Kidney donation procedure"),
            CodeEntry::new("K07", "Acute injury"),
        ]
    }

    fn compile(text: &str) -> Vec<CompiledDefinition> {
        compile_definitions(&parse_definitions(text).unwrap()).unwrap()
    }

    #[test]
    fn test_discover_end_to_end() {
        let definitions = compile(
            "# CKD-Diagnosis\n## positive\nchronic renal\n## negative\nkidney donation\n",
        );
        let discovery = discover(&definitions, &make_entries());

        assert_eq!(discovery.concept_count(), 1);
        let included = discovery.included("CKD-Diagnosis").unwrap();
        assert_eq!(included.iter().collect::<Vec<_>>(), vec!["K05"]);
    }

    #[test]
    fn test_discover_keeps_empty_concepts() {
        let definitions = compile("# Nothing-Matches\nzzzz\n");
        let discovery = discover(&definitions, &make_entries());

        assert_eq!(discovery.concept_count(), 1);
        assert!(discovery.included("Nothing-Matches").unwrap().is_empty());
    }

    #[test]
    fn test_discover_tracks_per_side_matches() {
        let definitions = compile(
            "# CKD-Diagnosis\n## positive\nrenal\n## negative\n\"family history\"\n",
        );
        let entries = vec![
            CodeEntry::new("K05", "Chronic renal failure"),
            CodeEntry::new("K08", "Family history of renal failure"),
        ];
        let discovery = discover(&definitions, &entries);
        let codes = discovery.get("CKD-Diagnosis").unwrap();

        // K08 matches the positive side too, but the negative side wins.
        assert!(codes.positive.contains("K08"));
        assert!(codes.negative.contains("K08"));
        assert!(!codes.included.contains("K08"));
        assert!(codes.included.contains("K05"));
    }

    #[test]
    fn test_discover_negative_only_concept() {
        let definitions = compile("# Not-Donation\n## negative\ndonation\n");
        let discovery = discover(&definitions, &make_entries());
        let included = discovery.included("Not-Donation").unwrap();

        assert_eq!(included.iter().collect::<Vec<_>>(), vec!["K05", "K07"]);
    }

    #[test]
    fn test_discover_preserves_definition_order() {
        let definitions = compile("# B-Concept\nrenal\n# A-Concept\ninjury\n");
        let discovery = discover(&definitions, &make_entries());

        let order: Vec<_> = discovery.concepts().collect();
        assert_eq!(order, vec!["B-Concept", "A-Concept"]);
    }

    #[test]
    fn test_duplicate_code_rows_evaluated_independently() {
        let definitions = compile("# CKD\nrenal\n");
        let entries = vec![
            CodeEntry::new("K05", "Chronic renal failure"),
            CodeEntry::new("K05", "Chronic renal failure"),
        ];
        let discovery = discover(&definitions, &entries);

        // Set aggregation absorbs the duplicate row.
        assert_eq!(discovery.included("CKD").unwrap().len(), 1);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let definitions = compile(
            "# CKD-Diagnosis\n## positive\nchronic renal\n## negative\nkidney donation\n\
             # Injuries\ninjury\n# Not-Donation\n## negative\ndonation\n",
        );
        let entries = make_entries();

        let sequential = discover(&definitions, &entries);
        let parallel = discover_parallel(&definitions, &entries);

        let seq: Vec<_> = sequential.iter().map(|(id, c)| (id.to_string(), c.clone())).collect();
        let par: Vec<_> = parallel.iter().map(|(id, c)| (id.to_string(), c.clone())).collect();
        assert_eq!(seq, par);
    }
}

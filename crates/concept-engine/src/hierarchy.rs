//! Clinical code hierarchy store.
//!
//! Loads the two-column tab-separated code file (no header) and derives a
//! Read v2-style hierarchy from the codes themselves: a code's level is its
//! length and its parent is the code with the last character removed. The
//! row list is kept as-is for matching (repeated codes are evaluated
//! independently); the derived hierarchy supports description lookup and
//! generalisation.

use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use concept_types::CodeEntry;

use crate::types::{DiscoveryError, DiscoveryResult, GeneraliseConfig};

/// One node of the derived code hierarchy.
#[derive(Debug, Clone, Default)]
struct CodeNode {
    /// Description from the code file; empty for codes that only appear as
    /// an implied parent of a longer code.
    description: String,
    level: usize,
    parent: Option<String>,
    children: Vec<String>,
}

/// In-memory store for the clinical code hierarchy.
///
/// # Example
///
/// ```ignore
/// use concept_engine::CodeHierarchy;
///
/// let hierarchy = CodeHierarchy::from_path("Data/Coding.tsv")?;
/// println!("{} codes loaded", hierarchy.entry_count());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeHierarchy {
    entries: Vec<CodeEntry>,
    nodes: HashMap<String, CodeNode>,
}

impl CodeHierarchy {
    /// Creates an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a hierarchy from a tab-separated code file.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be read.
    pub fn from_path<P: AsRef<Path>>(path: P) -> DiscoveryResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DiscoveryError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Loads a hierarchy from a reader of tab-separated rows.
    ///
    /// Rows that do not have exactly two fields are skipped with a warning
    /// rather than aborting the run.
    pub fn from_reader<R: Read>(reader: R) -> DiscoveryResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut hierarchy = Self::new();
        let mut record = StringRecord::new();
        let mut row = 0usize;

        while csv_reader.read_record(&mut record)? {
            row += 1;

            // Skip empty rows
            if record.is_empty() || record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }

            if record.len() != 2 {
                tracing::warn!(
                    row,
                    fields = record.len(),
                    "skipping malformed code row: expected 2 tab-separated fields"
                );
                continue;
            }

            hierarchy.insert(CodeEntry::new(&record[0], &record[1]));
        }

        Ok(hierarchy)
    }

    /// Inserts one code entry, linking it into the derived hierarchy.
    pub fn insert(&mut self, entry: CodeEntry) {
        let code = entry.code.clone();
        let level = code.chars().count();
        let parent = if level > 1 {
            Some(code.chars().take(level - 1).collect::<String>())
        } else {
            None
        };

        {
            let node = self.nodes.entry(code.clone()).or_default();
            node.description = entry.description.clone();
            node.level = level;
            node.parent = parent.clone();
        }

        if let Some(parent) = parent {
            let parent_node = self.nodes.entry(parent).or_default();
            if parent_node.level == 0 {
                parent_node.level = level - 1;
            }
            if !parent_node.children.contains(&code) {
                parent_node.children.push(code);
            }
        }

        self.entries.push(entry);
    }

    /// The code rows in file order; the matching corpus.
    ///
    /// Repeated codes are kept as separate rows so each is evaluated
    /// independently.
    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    /// Returns the number of rows loaded.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of distinct codes in the hierarchy, including
    /// implied parents.
    pub fn code_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if a code exists in the hierarchy.
    pub fn contains(&self, code: &str) -> bool {
        self.nodes.contains_key(code)
    }

    /// Gets the description of a code.
    pub fn description(&self, code: &str) -> Option<&str> {
        self.nodes.get(code).map(|n| n.description.as_str())
    }

    /// Gets the hierarchy level of a code (level 1 is the root).
    pub fn level(&self, code: &str) -> Option<usize> {
        self.nodes.get(code).map(|n| n.level)
    }

    /// Gets the parent of a code.
    pub fn parent(&self, code: &str) -> Option<&str> {
        self.nodes.get(code).and_then(|n| n.parent.as_deref())
    }

    /// Gets the direct children of a code.
    pub fn children(&self, code: &str) -> &[String] {
        self.nodes
            .get(code)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Resolves `(code, description)` pairs for the given codes, in the
    /// order given. Codes not in the hierarchy are ignored.
    pub fn descriptions_for<'a, I>(&self, codes: I) -> Vec<(String, String)>
    where
        I: IntoIterator<Item = &'a String>,
    {
        codes
            .into_iter()
            .filter_map(|code| {
                self.nodes
                    .get(code)
                    .map(|n| (code.clone(), n.description.clone()))
            })
            .collect()
    }

    /// Gets all transitive ancestors of a set of codes (BFS).
    pub fn ancestors<'a, I>(&self, codes: I) -> HashSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut ancestors = HashSet::new();
        let mut queue = VecDeque::new();

        for code in codes {
            if let Some(parent) = self.parent(code) {
                queue.push_back(parent.to_string());
            }
        }

        while let Some(current) = queue.pop_front() {
            if ancestors.insert(current.clone()) {
                if let Some(parent) = self.parent(&current) {
                    queue.push_back(parent.to_string());
                }
            }
        }

        ancestors
    }

    /// Gets all transitive descendants of a set of codes (BFS).
    pub fn descendants<'a, I>(&self, codes: I) -> HashSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut descendants = HashSet::new();
        let mut queue = VecDeque::new();

        for code in codes {
            queue.extend(self.children(code).iter().cloned());
        }

        while let Some(current) = queue.pop_front() {
            if descendants.insert(current.clone()) {
                queue.extend(self.children(&current).iter().cloned());
            }
        }

        descendants
    }

    /// Generalises a set of codes up the hierarchy.
    ///
    /// The search starts from the deepest codes so that every code's
    /// children are settled before the code itself is examined. A parent not
    /// already found is added when the fraction of its children that are
    /// found exceeds `child_threshold`; the search never ascends above
    /// `search_level`. Finally all descendants of every generalised code are
    /// added.
    ///
    /// Returns the generalised ancestors and their descendants; the initial
    /// codes themselves are not necessarily part of the result.
    pub fn generalise(
        &self,
        initial: &HashSet<String>,
        config: &GeneraliseConfig,
    ) -> HashSet<String> {
        let mut found: HashSet<String> = initial.clone();
        let mut generalised: HashSet<String> = HashSet::new();

        // Max-heap on level: deepest codes are examined first.
        let mut to_search: BinaryHeap<(usize, String)> = initial
            .iter()
            .filter_map(|code| self.level(code).map(|level| (level, code.clone())))
            .collect();

        while let Some((_, code)) = to_search.pop() {
            let Some(parent) = self.parent(&code).map(str::to_string) else {
                continue;
            };
            if found.contains(&parent) {
                continue;
            }

            let children = self.children(&parent);
            let supporting = children.iter().filter(|c| found.contains(*c)).count();

            if !children.is_empty()
                && (supporting as f64 / children.len() as f64) > config.child_threshold
            {
                found.insert(parent.clone());
                generalised.insert(parent.clone());
                if let Some(parent_level) = self.level(&parent) {
                    if parent_level > config.search_level {
                        to_search.push((parent_level, parent));
                    }
                }
            }
        }

        let descendants = self.descendants(generalised.iter().map(String::as_str));
        generalised.union(&descendants).cloned().collect()
    }
}

//! Clinical code entry type.

/// One row of the clinical code hierarchy: a code and its description.
///
/// # Examples
///
/// ```
/// use concept_types::CodeEntry;
///
/// let entry = CodeEntry::new("C10E", "Type 1 diabetes mellitus");
/// assert_eq!(entry.code, "C10E");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodeEntry {
    /// The clinical code (e.g. a Read v2 code such as `C10E`).
    pub code: String,
    /// The free-text description attached to the code.
    pub description: String,
}

impl CodeEntry {
    /// Creates a code entry.
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

//! Run report writing.
//!
//! Serializes a discovery outcome into the per-run result files. The base
//! reports list, per concept, every code matching the positive and negative
//! term sets (`AllConceptCodes.txt`) and the final membership
//! (`PositiveConceptCodes.txt`). The generalised reports add the codes
//! reached by climbing the hierarchy, marked with a leading `*`.

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::engine::Discovery;
use crate::hierarchy::CodeHierarchy;
use crate::types::{DiscoveryResult, GeneraliseConfig};

/// Per-concept positive and negative matches.
pub const ALL_CODES_FILE: &str = "AllConceptCodes.txt";
/// Per-concept final membership.
pub const POSITIVE_CODES_FILE: &str = "PositiveConceptCodes.txt";
/// Per-concept matches with generalised codes marked.
pub const GENERAL_ALL_CODES_FILE: &str = "AllConceptCodes_General.txt";
/// Per-concept generalised membership minus exclusions.
pub const GENERAL_POSITIVE_CODES_FILE: &str = "PositiveConceptCodes_General.txt";

/// Writes the base reports into the run directory.
pub fn write_reports(
    dir: &Path,
    discovery: &Discovery,
    hierarchy: &CodeHierarchy,
) -> DiscoveryResult<()> {
    let mut all = BufWriter::new(File::create(dir.join(ALL_CODES_FILE))?);
    let mut positive = BufWriter::new(File::create(dir.join(POSITIVE_CODES_FILE))?);

    for (id, codes) in discovery.iter() {
        writeln!(all, "# {id}")?;
        writeln!(all, "## POSITIVE")?;
        for (code, description) in hierarchy.descriptions_for(&codes.positive) {
            writeln!(all, "{code}\t{description}")?;
        }
        writeln!(all, "## NEGATIVE")?;
        for (code, description) in hierarchy.descriptions_for(&codes.negative) {
            writeln!(all, "{code}\t{description}")?;
        }

        writeln!(positive, "# {id}")?;
        for (code, description) in hierarchy.descriptions_for(&codes.included) {
            writeln!(positive, "{code}\t{description}")?;
        }
    }

    all.flush()?;
    positive.flush()?;
    Ok(())
}

/// Writes the generalised reports into the run directory.
///
/// For each concept the included codes are generalised up the hierarchy;
/// codes found only through generalisation are marked with a leading `*` in
/// the all-codes report, and the positive report lists the generalised
/// membership minus the concept's negative codes.
pub fn write_generalised_reports(
    dir: &Path,
    discovery: &Discovery,
    hierarchy: &CodeHierarchy,
    config: &GeneraliseConfig,
) -> DiscoveryResult<()> {
    let mut all = BufWriter::new(File::create(dir.join(GENERAL_ALL_CODES_FILE))?);
    let mut positive = BufWriter::new(File::create(dir.join(GENERAL_POSITIVE_CODES_FILE))?);

    for (id, codes) in discovery.iter() {
        let initial: HashSet<String> = codes.included.iter().cloned().collect();
        let generalised = hierarchy.generalise(&initial, config);

        // Sorted union of the directly included and generalised codes.
        let general: BTreeSet<String> = codes
            .included
            .iter()
            .cloned()
            .chain(generalised.iter().cloned())
            .collect();

        writeln!(all, "# {id}")?;
        writeln!(all, "## POSITIVE")?;
        for (code, description) in hierarchy.descriptions_for(&general) {
            let marker = if codes.included.contains(&code) { "" } else { "*" };
            writeln!(all, "{marker}\t{code}\t{description}")?;
        }
        writeln!(all, "## NEGATIVE")?;
        for (code, description) in hierarchy.descriptions_for(&codes.negative) {
            writeln!(all, "\t{code}\t{description}")?;
        }

        writeln!(positive, "# {id}")?;
        for (code, description) in hierarchy.descriptions_for(&general) {
            if !codes.negative.contains(&code) {
                writeln!(positive, "{code}\t{description}")?;
            }
        }
    }

    all.flush()?;
    positive.flush()?;
    Ok(())
}

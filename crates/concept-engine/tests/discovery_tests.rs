//! End-to-end tests for the discovery engine.
//!
//! These run the whole pipeline — definition parsing, compilation, code file
//! loading, matching and report writing — over file-backed fixtures.

use std::io::Write;

use concept_engine::{
    compile_definitions, discover, parse_definitions, CodeHierarchy, DiscoveryError,
    GeneraliseConfig, ALL_CODES_FILE, POSITIVE_CODES_FILE,
};

const DEFINITIONS: &str = "\
# CKD-Diagnosis
## positive
chronic renal
## negative
kidney donation
";

const CODES: &str = "\
K05\tChronic renal failure
K06\tKidney donation procedure
K07\tAcute injury
";

fn write_fixture(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_discovery_from_files() {
    let codes = write_fixture(CODES);

    let definitions = parse_definitions(DEFINITIONS).unwrap();
    let compiled = compile_definitions(&definitions).unwrap();
    let hierarchy = CodeHierarchy::from_path(codes.path()).unwrap();

    let discovery = discover(&compiled, hierarchy.entries());

    assert_eq!(discovery.concept_count(), 1);
    let included = discovery.included("CKD-Diagnosis").unwrap();
    assert_eq!(included.iter().collect::<Vec<_>>(), vec!["K05"]);
}

#[test]
fn test_missing_code_file_is_reported() {
    let err = CodeHierarchy::from_path("does/not/exist.tsv").unwrap_err();
    assert!(matches!(err, DiscoveryError::FileNotFound { .. }));
}

#[test]
fn test_duplicate_definition_blocks_merge() {
    // Splitting the block in two must behave exactly like one block with
    // both terms.
    let split = "\
# CKD-Diagnosis
chronic renal
# Other
injury
# CKD-Diagnosis
renal failure
";
    let joined = "\
# CKD-Diagnosis
chronic renal
renal failure
# Other
injury
";
    let entries = CodeHierarchy::from_reader(CODES.as_bytes()).unwrap();

    let from_split = discover(
        &compile_definitions(&parse_definitions(split).unwrap()).unwrap(),
        entries.entries(),
    );
    let from_joined = discover(
        &compile_definitions(&parse_definitions(joined).unwrap()).unwrap(),
        entries.entries(),
    );

    assert_eq!(
        from_split.included("CKD-Diagnosis"),
        from_joined.included("CKD-Diagnosis")
    );
    assert_eq!(from_split.included("Other"), from_joined.included("Other"));
}

#[test]
fn test_reports_written_to_run_directory() {
    let dir = tempfile::tempdir().unwrap();

    let compiled =
        compile_definitions(&parse_definitions(DEFINITIONS).unwrap()).unwrap();
    let hierarchy = CodeHierarchy::from_reader(CODES.as_bytes()).unwrap();
    let discovery = discover(&compiled, hierarchy.entries());

    concept_engine::write_reports(dir.path(), &discovery, &hierarchy).unwrap();

    let all = std::fs::read_to_string(dir.path().join(ALL_CODES_FILE)).unwrap();
    assert_eq!(
        all,
        "# CKD-Diagnosis\n## POSITIVE\nK05\tChronic renal failure\n\
         ## NEGATIVE\nK06\tKidney donation procedure\n"
    );

    let positive = std::fs::read_to_string(dir.path().join(POSITIVE_CODES_FILE)).unwrap();
    assert_eq!(positive, "# CKD-Diagnosis\nK05\tChronic renal failure\n");
}

#[test]
fn test_generalisation_round_trip() {
    let codes = "\
C10\tDiabetes mellitus
C10E\tType 1 diabetes mellitus
C10F\tType 2 diabetes mellitus
";
    let definitions = "\
# Typed-Diabetes
\"type [12]\" diabetes
";
    let dir = tempfile::tempdir().unwrap();

    let compiled =
        compile_definitions(&parse_definitions(definitions).unwrap()).unwrap();
    let hierarchy = CodeHierarchy::from_reader(codes.as_bytes()).unwrap();
    let discovery = discover(&compiled, hierarchy.entries());

    concept_engine::write_generalised_reports(
        dir.path(),
        &discovery,
        &hierarchy,
        &GeneraliseConfig::default(),
    )
    .unwrap();

    let all = std::fs::read_to_string(dir.path().join(concept_engine::GENERAL_ALL_CODES_FILE))
        .unwrap();
    // C10 did not match directly but both of its children did.
    assert!(all.contains("*\tC10\tDiabetes mellitus\n"));
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_discovery_from_files() {
    let compiled =
        compile_definitions(&parse_definitions(DEFINITIONS).unwrap()).unwrap();
    let hierarchy = CodeHierarchy::from_reader(CODES.as_bytes()).unwrap();

    let sequential = discover(&compiled, hierarchy.entries());
    let parallel = concept_engine::discover_parallel(&compiled, hierarchy.entries());

    assert_eq!(
        sequential.included("CKD-Diagnosis"),
        parallel.included("CKD-Diagnosis")
    );
}

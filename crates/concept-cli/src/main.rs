//! Concept discovery CLI binary.

mod config;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use concept_engine::{
    compile_definitions, discover_parallel, parse_definitions, write_generalised_reports,
    write_reports, CodeHierarchy, GeneraliseConfig,
};

use crate::config::RunConfig;

const DEFAULT_CODES_FILE: &str = "Data/Coding.tsv";
const DEFAULT_RESULTS_DIR: &str = "Results";

#[derive(Parser)]
#[command(name = "concept-discovery")]
#[command(about = "Extract clinical codes matching analyst-defined concept definitions")]
struct Cli {
    /// The concept definitions file
    input: PathBuf,

    /// The code-description file (two tab-separated columns, no header)
    #[arg(long)]
    codes: Option<PathBuf>,

    /// JSON run configuration naming the code-description file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for the run reports (default: a timestamped
    /// subdirectory of Results)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also produce generalised reports by climbing the code hierarchy
    #[arg(short, long)]
    generalise: bool,

    /// The hierarchy level where the generalisation search stops (1 = root)
    #[arg(short = 'l', long, default_value_t = 1)]
    search_level: usize,

    /// Fraction of child codes that must match before a parent code is added
    #[arg(short = 't', long, default_value_t = 0.2)]
    child_threshold: f64,

    /// Remove an existing (empty) output directory before the run
    #[arg(short = 'w', long)]
    overwrite: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let run_config = match &cli.config {
        Some(path) => RunConfig::from_path(path)?,
        None => RunConfig::default(),
    };

    let codes_path = cli
        .codes
        .clone()
        .or(run_config.code_description_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CODES_FILE));

    let output_dir = cli.output.clone().unwrap_or_else(default_output_dir);
    prepare_output_dir(&output_dir, cli.overwrite)?;

    let generalise_config = clamped_generalise_config(cli.search_level, cli.child_threshold);

    tracing::info!("Loading the code hierarchy from {}", codes_path.display());
    let hierarchy = CodeHierarchy::from_path(&codes_path)?;
    tracing::info!(
        "Loaded {} code rows ({} distinct codes)",
        hierarchy.entry_count(),
        hierarchy.code_count()
    );

    tracing::info!("Parsing concept definitions from {}", cli.input.display());
    let definitions = parse_definitions(&fs::read_to_string(&cli.input)?)?;
    let compiled = compile_definitions(&definitions)?;
    tracing::info!("Compiled {} concept definitions", compiled.len());

    let discovery = discover_parallel(&compiled, hierarchy.entries());
    tracing::info!(
        "Matched {} codes across {} concepts",
        discovery.included_count(),
        discovery.concept_count()
    );

    write_reports(&output_dir, &discovery, &hierarchy)?;

    if cli.generalise {
        tracing::info!("Generalising matched codes up the hierarchy");
        write_generalised_reports(&output_dir, &discovery, &hierarchy, &generalise_config)?;
    }

    tracing::info!("Run reports written to {}", output_dir.display());
    Ok(())
}

/// Builds the default timestamped run directory path.
fn default_output_dir() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y_%m_%d_%H_%M_%S");
    PathBuf::from(DEFAULT_RESULTS_DIR).join(format!("ConceptDiscovery_{timestamp}"))
}

/// Creates the output directory, honoring the overwrite flag.
///
/// Overwriting only removes an empty directory; a directory holding previous
/// results is never clobbered.
fn prepare_output_dir(dir: &Path, overwrite: bool) -> Result<(), Box<dyn Error>> {
    if dir.exists() {
        if !overwrite {
            return Err(format!(
                "output directory {} already exists and overwriting is not enabled",
                dir.display()
            )
            .into());
        }
        fs::remove_dir(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Clamps out-of-range generalisation parameters with a warning.
fn clamped_generalise_config(search_level: usize, child_threshold: f64) -> GeneraliseConfig {
    let mut config = GeneraliseConfig {
        search_level,
        child_threshold,
    };

    if config.search_level < 1 {
        tracing::warn!(
            "search level {} is below 1 and will be treated as 1",
            config.search_level
        );
        config.search_level = 1;
    }

    if !(0.0..=1.0).contains(&config.child_threshold) {
        let clamped = config.child_threshold.clamp(0.0, 1.0);
        tracing::warn!(
            "child threshold {} is outside [0, 1] and will be treated as {}",
            config.child_threshold,
            clamped
        );
        config.child_threshold = clamped;
    }

    config
}

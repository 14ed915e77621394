//! Run configuration file.
//!
//! An optional JSON file can name the code-description file when it is not
//! given on the command line. Unknown keys are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// JSON run configuration.
#[derive(Debug, Default, Deserialize)]
pub struct RunConfig {
    /// Location of the code-description file.
    #[serde(rename = "CodeDescriptionFile", default)]
    pub code_description_file: Option<PathBuf>,
}

impl RunConfig {
    /// Loads the configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_reads_code_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"CodeDescriptionFile\": \"Data/Coding.tsv\"}}").unwrap();

        let config = RunConfig::from_path(file.path()).unwrap();
        assert_eq!(
            config.code_description_file,
            Some(PathBuf::from("Data/Coding.tsv"))
        );
    }

    #[test]
    fn test_config_ignores_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"SomeOtherSetting\": 3}}").unwrap();

        let config = RunConfig::from_path(file.path()).unwrap();
        assert!(config.code_description_file.is_none());
    }
}

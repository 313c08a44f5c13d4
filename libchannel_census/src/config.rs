use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// Structure representing the census configuration. Contains pathing and scope
/// selection. Configs are serializable and deserializable to YAML using serde
/// and serde_yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub report_path: PathBuf,
    pub run: String,
    /// Which hit-flag variant of each record to classify against (1 is the
    /// first; 0 is the mask flag and is never a valid choice).
    pub hit_index: usize,
    /// Sectors to summarize. None means every sector present in the dataset.
    pub sectors: Option<Vec<String>>,
    pub per_board: bool,
    pub per_vmm: bool,
}

impl Default for Config {
    /// Generate a new Config object. Path fields will be empty/invalid
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("None"),
            report_path: PathBuf::from("None"),
            run: String::from(""),
            hit_index: 1,
            sectors: None,
            per_board: false,
            per_vmm: false,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    pub fn is_hit_index_valid(&self) -> bool {
        self.hit_index >= 1
    }
}

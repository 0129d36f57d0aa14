use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePlacementConfig {
    pub neighbor_cutoff: Option<f64>,
    pub coincidence_tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSpeciesConfig {
    /// Relative paths are resolved against the configuration file's directory.
    pub registry: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub format: Option<String>,
    pub overlap_warning: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub placement: Option<FilePlacementConfig>,
    pub species: Option<FileSpeciesConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        if let Some(registry) = config.species.as_mut().and_then(|s| s.registry.as_mut()) {
            if registry.is_relative() {
                if let Some(dir) = path.parent() {
                    *registry = dir.join(&*registry);
                }
            }
        }
        Ok(config)
    }
}

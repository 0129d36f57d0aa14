use mofads::core::io::StructureIoError;
use mofads::core::species::registry::SpeciesLoadError;
use mofads::engine::error::PlacementError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Structure(#[from] StructureIoError),

    #[error(transparent)]
    Species(#[from] SpeciesLoadError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write summary: {0}")]
    Summary(#[from] csv::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("{failed} of {total} placements failed")]
    PartialFailure { failed: usize, total: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

//! Reading and writing atomic structure files.
//!
//! Each format implements [`traits::StructureFile`]. [`StructureFormat`] picks the
//! implementation from a file extension or a format name, which is what the batch
//! workflow and the command-line driver need.

pub mod cif;
pub mod traits;
pub mod xyz;

use crate::core::models::structure::AtomicStructure;
use cif::{CifError, CifFile};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use traits::StructureFile;
use xyz::{XyzError, XyzFile};

#[derive(Debug, Error)]
pub enum StructureIoError {
    #[error("CIF error in '{path}': {source}")]
    Cif {
        path: PathBuf,
        #[source]
        source: CifError,
    },
    #[error("XYZ error in '{path}': {source}")]
    Xyz {
        path: PathBuf,
        #[source]
        source: XyzError,
    },
    #[error("Unsupported structure file '{0}' (expected .cif or .xyz)")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureFormat {
    Cif,
    Xyz,
}

#[derive(Debug, Error)]
#[error("Unknown structure format '{0}' (expected 'cif' or 'xyz')")]
pub struct ParseStructureFormatError(String);

impl FromStr for StructureFormat {
    type Err = ParseStructureFormatError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cif" => Ok(StructureFormat::Cif),
            "xyz" | "extxyz" => Ok(StructureFormat::Xyz),
            _ => Err(ParseStructureFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl StructureFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub fn extension(&self) -> &'static str {
        match self {
            StructureFormat::Cif => CifFile::EXTENSION,
            StructureFormat::Xyz => XyzFile::EXTENSION,
        }
    }

    /// Whether the format can hold `structure`; CIF output needs a unit cell.
    pub fn can_write(&self, structure: &AtomicStructure) -> bool {
        match self {
            StructureFormat::Cif => structure.lattice().is_some(),
            StructureFormat::Xyz => true,
        }
    }

    pub fn read(&self, path: &Path) -> Result<AtomicStructure, StructureIoError> {
        match self {
            StructureFormat::Cif => {
                CifFile::read_from_path(path).map_err(|source| StructureIoError::Cif {
                    path: path.to_path_buf(),
                    source,
                })
            }
            StructureFormat::Xyz => {
                XyzFile::read_from_path(path).map_err(|source| StructureIoError::Xyz {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    pub fn write(&self, structure: &AtomicStructure, path: &Path) -> Result<(), StructureIoError> {
        match self {
            StructureFormat::Cif => {
                CifFile::write_to_path(structure, path).map_err(|source| StructureIoError::Cif {
                    path: path.to_path_buf(),
                    source,
                })
            }
            StructureFormat::Xyz => {
                XyzFile::write_to_path(structure, path).map_err(|source| StructureIoError::Xyz {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
}

/// Reads a structure, choosing the format from the file extension.
pub fn read_structure(path: &Path) -> Result<AtomicStructure, StructureIoError> {
    StructureFormat::from_path(path)
        .ok_or_else(|| StructureIoError::UnsupportedFormat(path.to_path_buf()))?
        .read(path)
}

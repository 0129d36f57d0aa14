use thiserror::Error;

use crate::core::models::structure::StructureError;

/// Identifies the site a geometric failure refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SiteRef {
    Index(usize),
    Coordinate([f64; 3]),
}

impl std::fmt::Display for SiteRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteRef::Index(i) => write!(f, "atom {}", i),
            SiteRef::Coordinate([x, y, z]) => write!(f, "({:.3}, {:.3}, {:.3})", x, y, z),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlacementError {
    #[error("Site index {index} is out of range for a structure with {atom_count} atoms")]
    InvalidSiteIndex { index: usize, atom_count: usize },

    #[error("No neighbors found within {cutoff:.3} Å of site {site}")]
    NoNeighborsFound { site: SiteRef, cutoff: f64 },

    #[error("Unknown adsorbate species '{species}'")]
    UnknownSpecies { species: String },

    #[error("Orientation eta={eta} is not supported by species '{species}' (supported: {supported:?})")]
    UnsupportedOrientation {
        species: String,
        eta: u8,
        supported: Vec<u8>,
    },

    #[error("Degenerate geometry at site {site}: {reason}")]
    DegenerateGeometry { site: SiteRef, reason: String },

    #[error("Bond length must be a positive, finite distance (got {value})")]
    InvalidBondLength { value: f64 },

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Assembled structure is invalid: {source}")]
    Structure {
        #[from]
        source: StructureError,
    },
}

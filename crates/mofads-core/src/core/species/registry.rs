use super::template::{AdsorbateSpecies, SpeciesTemplate};
use crate::core::utils::elements::canonical_symbol;
use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiatomicMode {
    EndOn,
    SideOn,
}

struct BuiltinDiatomic {
    mode: DiatomicMode,
    proximal: &'static str,
    distal: &'static str,
    bond_length: f64,
}

// Gas-phase equilibrium bond lengths in Angstroms.
static BUILTIN_DIATOMICS: Map<&'static str, BuiltinDiatomic> = phf_map! {
    "O2_end" => BuiltinDiatomic { mode: DiatomicMode::EndOn, proximal: "O", distal: "O", bond_length: 1.21 },
    "O2_side" => BuiltinDiatomic { mode: DiatomicMode::SideOn, proximal: "O", distal: "O", bond_length: 1.21 },
    "N2_end" => BuiltinDiatomic { mode: DiatomicMode::EndOn, proximal: "N", distal: "N", bond_length: 1.10 },
    "N2_side" => BuiltinDiatomic { mode: DiatomicMode::SideOn, proximal: "N", distal: "N", bond_length: 1.10 },
    "H2_end" => BuiltinDiatomic { mode: DiatomicMode::EndOn, proximal: "H", distal: "H", bond_length: 0.74 },
    "H2_side" => BuiltinDiatomic { mode: DiatomicMode::SideOn, proximal: "H", distal: "H", bond_length: 0.74 },
    "CO_end" => BuiltinDiatomic { mode: DiatomicMode::EndOn, proximal: "C", distal: "O", bond_length: 1.13 },
    "NO_end" => BuiltinDiatomic { mode: DiatomicMode::EndOn, proximal: "N", distal: "O", bond_length: 1.15 },
};

impl BuiltinDiatomic {
    fn to_species(&self) -> AdsorbateSpecies {
        match self.mode {
            DiatomicMode::EndOn => AdsorbateSpecies::DiatomicEndOn {
                proximal: self.proximal.to_string(),
                distal: self.distal.to_string(),
                bond_length: self.bond_length,
            },
            DiatomicMode::SideOn => AdsorbateSpecies::DiatomicSideOn {
                first: self.proximal.to_string(),
                second: self.distal.to_string(),
                bond_length: self.bond_length,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum GeometryKind {
    Atom,
    EndOn,
    SideOn,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct SpeciesEntry {
    geometry: GeometryKind,
    elements: Vec<String>,
    bond_length: Option<f64>,
}

#[derive(Debug, Error)]
pub enum SpeciesLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid species '{id}': {reason}")]
    Invalid { id: String, reason: String },
}

/// Maps adsorbate identifiers to their templates.
///
/// Every canonical element symbol resolves to a single-atom species. Molecular species
/// come from the built-in table and from registry files, where file entries override
/// built-ins with the same identifier.
#[derive(Debug, Clone, Default)]
pub struct SpeciesRegistry {
    custom: HashMap<String, AdsorbateSpecies>,
}

impl SpeciesRegistry {
    /// A registry containing only the built-in species.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Loads additional species from a TOML file on top of the built-ins.
    pub fn load(path: &Path) -> Result<Self, SpeciesLoadError> {
        let mut registry = Self::builtin();
        registry.extend_from_file(path)?;
        Ok(registry)
    }

    pub fn extend_from_file(&mut self, path: &Path) -> Result<(), SpeciesLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| SpeciesLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        self.extend_from_str(&content)
            .map_err(|e| match e {
                SpeciesLoadError::Toml { source, .. } => SpeciesLoadError::Toml {
                    path: path.to_string_lossy().to_string(),
                    source,
                },
                other => other,
            })
    }

    pub fn extend_from_str(&mut self, content: &str) -> Result<(), SpeciesLoadError> {
        let entries: HashMap<String, SpeciesEntry> =
            toml::from_str(content).map_err(|e| SpeciesLoadError::Toml {
                path: "<string>".to_string(),
                source: e,
            })?;
        let parsed = entries
            .into_iter()
            .map(|(id, entry)| entry_to_species(&id, entry).map(|species| (id, species)))
            .collect::<Result<Vec<_>, _>>()?;
        for (id, species) in parsed {
            debug!(species = %id, "Registered custom adsorbate species.");
            self.custom.insert(id, species);
        }
        Ok(())
    }

    pub fn insert(&mut self, template: SpeciesTemplate) {
        self.custom.insert(template.id, template.species);
    }

    /// Resolves an identifier to its template, or `None` if it is not recognised.
    pub fn resolve(&self, id: &str) -> Option<SpeciesTemplate> {
        if let Some(species) = self.custom.get(id) {
            return Some(SpeciesTemplate::new(id, species.clone()));
        }
        if let Some(builtin) = BUILTIN_DIATOMICS.get(id) {
            return Some(SpeciesTemplate::new(id, builtin.to_species()));
        }
        match canonical_symbol(id) {
            Some(symbol) if symbol == id => Some(SpeciesTemplate::new(
                id,
                AdsorbateSpecies::Atom { element: symbol },
            )),
            _ => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }

    /// Molecular templates (built-in and custom), sorted by identifier.
    ///
    /// Single-atom species are implicit and not listed.
    pub fn molecular_templates(&self) -> Vec<SpeciesTemplate> {
        let mut ids: Vec<&str> = BUILTIN_DIATOMICS.keys().copied().collect();
        ids.extend(self.custom.keys().map(String::as_str));
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter()
            .filter_map(|id| self.resolve(id))
            .filter(|t| t.species.is_molecular())
            .collect()
    }
}

fn entry_to_species(id: &str, entry: SpeciesEntry) -> Result<AdsorbateSpecies, SpeciesLoadError> {
    let invalid = |reason: String| SpeciesLoadError::Invalid {
        id: id.to_string(),
        reason,
    };

    let elements = entry
        .elements
        .iter()
        .map(|raw| canonical_symbol(raw).ok_or_else(|| invalid(format!("unknown element '{}'", raw))))
        .collect::<Result<Vec<_>, _>>()?;

    let expected = match entry.geometry {
        GeometryKind::Atom => 1,
        GeometryKind::EndOn | GeometryKind::SideOn => 2,
    };
    if elements.len() != expected {
        return Err(invalid(format!(
            "geometry requires {} element(s), found {}",
            expected,
            elements.len()
        )));
    }

    let bond_length = match (entry.geometry, entry.bond_length) {
        (GeometryKind::Atom, Some(_)) => {
            return Err(invalid("single-atom species take no bond-length".to_string()));
        }
        (GeometryKind::Atom, None) => 0.0,
        (_, Some(d)) if d.is_finite() && d > 0.0 => d,
        (_, Some(d)) => return Err(invalid(format!("bond-length must be positive, got {}", d))),
        (_, None) => return Err(invalid("bond-length is required".to_string())),
    };

    let mut elements = elements.into_iter();
    let mut next = || elements.next().unwrap_or_default();
    Ok(match entry.geometry {
        GeometryKind::Atom => AdsorbateSpecies::Atom { element: next() },
        GeometryKind::EndOn => AdsorbateSpecies::DiatomicEndOn {
            proximal: next(),
            distal: next(),
            bond_length,
        },
        GeometryKind::SideOn => AdsorbateSpecies::DiatomicSideOn {
            first: next(),
            second: next(),
            bond_length,
        },
    })
}

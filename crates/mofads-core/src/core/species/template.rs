use std::fmt;

/// Geometric family of an adsorbate, together with its internal template.
///
/// The internal bond length is a property of the adsorbate itself and is independent of
/// the distance between the site and the adsorbate.
#[derive(Debug, Clone, PartialEq)]
pub enum AdsorbateSpecies {
    /// A single atom bonded to the site.
    Atom { element: String },
    /// A linear diatomic bound through one end; `proximal` is bonded to the site and
    /// `distal` continues the site-adsorbate line.
    DiatomicEndOn {
        proximal: String,
        distal: String,
        bond_length: f64,
    },
    /// A linear diatomic bound through its bond midpoint, with the bond axis
    /// perpendicular to the site direction.
    DiatomicSideOn {
        first: String,
        second: String,
        bond_length: f64,
    },
}

const ETA_ONE: &[u8] = &[1];
const ETA_TWO: &[u8] = &[2];

impl AdsorbateSpecies {
    pub fn atom_count(&self) -> usize {
        match self {
            AdsorbateSpecies::Atom { .. } => 1,
            AdsorbateSpecies::DiatomicEndOn { .. } | AdsorbateSpecies::DiatomicSideOn { .. } => 2,
        }
    }

    /// Element symbols in the order the atoms are appended to a structure.
    pub fn elements(&self) -> Vec<&str> {
        match self {
            AdsorbateSpecies::Atom { element } => vec![element.as_str()],
            AdsorbateSpecies::DiatomicEndOn {
                proximal, distal, ..
            } => vec![proximal.as_str(), distal.as_str()],
            AdsorbateSpecies::DiatomicSideOn { first, second, .. } => {
                vec![first.as_str(), second.as_str()]
            }
        }
    }

    pub fn internal_bond_length(&self) -> Option<f64> {
        match self {
            AdsorbateSpecies::Atom { .. } => None,
            AdsorbateSpecies::DiatomicEndOn { bond_length, .. }
            | AdsorbateSpecies::DiatomicSideOn { bond_length, .. } => Some(*bond_length),
        }
    }

    /// The hapticities this geometry can be placed with.
    pub fn supported_etas(&self) -> &'static [u8] {
        match self {
            AdsorbateSpecies::Atom { .. } | AdsorbateSpecies::DiatomicEndOn { .. } => ETA_ONE,
            AdsorbateSpecies::DiatomicSideOn { .. } => ETA_TWO,
        }
    }

    pub fn default_eta(&self) -> u8 {
        self.supported_etas()[0]
    }

    pub fn supports_eta(&self, eta: u8) -> bool {
        self.supported_etas().contains(&eta)
    }

    /// Whether the hapticity is part of the label of placements of this species.
    pub fn is_molecular(&self) -> bool {
        !matches!(self, AdsorbateSpecies::Atom { .. })
    }

    pub fn geometry_name(&self) -> &'static str {
        match self {
            AdsorbateSpecies::Atom { .. } => "atom",
            AdsorbateSpecies::DiatomicEndOn { .. } => "end-on",
            AdsorbateSpecies::DiatomicSideOn { .. } => "side-on",
        }
    }
}

/// An adsorbate species bound to the identifier it is requested by (e.g. `"O2_end"`).
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesTemplate {
    pub id: String,
    pub species: AdsorbateSpecies,
}

impl SpeciesTemplate {
    pub fn new(id: &str, species: AdsorbateSpecies) -> Self {
        Self {
            id: id.to_string(),
            species,
        }
    }
}

impl fmt::Display for SpeciesTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let etas = self
            .species
            .supported_etas()
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(
            f,
            "{} ({}, {}",
            self.id,
            self.species.geometry_name(),
            self.species.elements().join("-")
        )?;
        if let Some(d) = self.species.internal_bond_length() {
            write!(f, ", d={:.3} Å", d)?;
        }
        write!(f, ", eta={})", etas)
    }
}

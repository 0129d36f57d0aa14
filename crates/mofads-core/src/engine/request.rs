use super::error::{PlacementError, SiteRef};
use crate::core::species::registry::SpeciesRegistry;
use crate::core::species::template::SpeciesTemplate;
use nalgebra::{Point3, Vector3};

/// The anchor an adsorbate is placed on.
#[derive(Debug, Clone, PartialEq)]
pub enum Site {
    /// An atom of the structure; the placement direction is derived from its neighbors.
    Index(usize),
    /// An atom of the structure with a direction supplied by an external site detector.
    IndexWithDirection {
        index: usize,
        direction: Vector3<f64>,
    },
    /// A free position together with the coordination environment defining its direction.
    Coordinate {
        position: Point3<f64>,
        neighbors: Vec<Point3<f64>>,
    },
}

impl Site {
    pub fn index(&self) -> Option<usize> {
        match self {
            Site::Index(index) | Site::IndexWithDirection { index, .. } => Some(*index),
            Site::Coordinate { .. } => None,
        }
    }

    pub fn site_ref(&self) -> SiteRef {
        match self {
            Site::Index(index) | Site::IndexWithDirection { index, .. } => SiteRef::Index(*index),
            Site::Coordinate { position, .. } => {
                SiteRef::Coordinate([position.x, position.y, position.z])
            }
        }
    }
}

/// A validated placement request.
///
/// Requests can only be obtained through [`PlacementRequestBuilder`] or
/// [`PlacementRequest::new`], which resolve the species and reject invalid
/// species/orientation pairs and bond lengths before any geometry is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest {
    template: SpeciesTemplate,
    bond_length: f64,
    site: Site,
    eta: u8,
}

impl PlacementRequest {
    /// Resolves and validates a request in one call.
    ///
    /// When `eta` is `None` the species' own hapticity is used.
    pub fn new(
        registry: &SpeciesRegistry,
        species: &str,
        bond_length: f64,
        site: Site,
        eta: Option<u8>,
    ) -> Result<Self, PlacementError> {
        let mut builder = PlacementRequestBuilder::new()
            .species(species)
            .bond_length(bond_length)
            .site(site);
        if let Some(eta) = eta {
            builder = builder.eta(eta);
        }
        builder.build(registry)
    }

    pub fn builder() -> PlacementRequestBuilder {
        PlacementRequestBuilder::new()
    }

    pub fn template(&self) -> &SpeciesTemplate {
        &self.template
    }

    pub fn bond_length(&self) -> f64 {
        self.bond_length
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn eta(&self) -> u8 {
        self.eta
    }

    /// The same request anchored on a different site.
    pub fn with_site(&self, site: Site) -> Self {
        Self {
            site,
            ..self.clone()
        }
    }
}

#[derive(Default, Debug)]
pub struct PlacementRequestBuilder {
    species: Option<String>,
    bond_length: Option<f64>,
    site: Option<Site>,
    eta: Option<u8>,
}

impl PlacementRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn species(mut self, id: &str) -> Self {
        self.species = Some(id.to_string());
        self
    }
    pub fn bond_length(mut self, length: f64) -> Self {
        self.bond_length = Some(length);
        self
    }
    pub fn site(mut self, site: Site) -> Self {
        self.site = Some(site);
        self
    }
    pub fn site_index(self, index: usize) -> Self {
        self.site(Site::Index(index))
    }
    pub fn eta(mut self, eta: u8) -> Self {
        self.eta = Some(eta);
        self
    }

    pub fn build(self, registry: &SpeciesRegistry) -> Result<PlacementRequest, PlacementError> {
        let species = self
            .species
            .ok_or(PlacementError::MissingParameter("species"))?;
        let template = registry
            .resolve(&species)
            .ok_or_else(|| PlacementError::UnknownSpecies {
                species: species.clone(),
            })?;

        let bond_length = self
            .bond_length
            .ok_or(PlacementError::MissingParameter("bond_length"))?;
        if !bond_length.is_finite() || bond_length <= 0.0 {
            return Err(PlacementError::InvalidBondLength { value: bond_length });
        }

        let eta = self.eta.unwrap_or_else(|| template.species.default_eta());
        if !template.species.supports_eta(eta) {
            return Err(PlacementError::UnsupportedOrientation {
                species,
                eta,
                supported: template.species.supported_etas().to_vec(),
            });
        }

        let site = self.site.ok_or(PlacementError::MissingParameter("site"))?;

        Ok(PlacementRequest {
            template,
            bond_length,
            site,
            eta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SpeciesRegistry {
        SpeciesRegistry::builtin()
    }

    #[test]
    fn build_resolves_species_and_defaults_eta() {
        let request = PlacementRequest::builder()
            .species("O2_side")
            .bond_length(2.0)
            .site_index(0)
            .build(&registry())
            .unwrap();
        assert_eq!(request.template().id, "O2_side");
        assert_eq!(request.eta(), 2);
        assert_eq!(request.bond_length(), 2.0);
        assert_eq!(request.site(), &Site::Index(0));
    }

    #[test]
    fn new_accepts_explicit_matching_eta() {
        let request = PlacementRequest::new(&registry(), "O2_end", 2.0, Site::Index(3), Some(1));
        assert_eq!(request.unwrap().eta(), 1);
    }

    #[test]
    fn unknown_species_is_rejected() {
        let result = PlacementRequest::new(&registry(), "N2_triple", 2.0, Site::Index(0), None);
        assert_eq!(
            result,
            Err(PlacementError::UnknownSpecies {
                species: "N2_triple".to_string()
            })
        );
    }

    #[test]
    fn mismatched_eta_is_rejected_up_front() {
        let result = PlacementRequest::new(&registry(), "O2_end", 2.0, Site::Index(0), Some(2));
        assert_eq!(
            result,
            Err(PlacementError::UnsupportedOrientation {
                species: "O2_end".to_string(),
                eta: 2,
                supported: vec![1],
            })
        );

        let atom = PlacementRequest::new(&registry(), "O", 1.8, Site::Index(0), Some(2));
        assert!(matches!(
            atom,
            Err(PlacementError::UnsupportedOrientation { eta: 2, .. })
        ));
    }

    #[test]
    fn non_positive_or_non_finite_bond_lengths_are_rejected() {
        for value in [0.0, -1.0, f64::INFINITY] {
            let result = PlacementRequest::new(&registry(), "O", value, Site::Index(0), None);
            assert!(matches!(
                result,
                Err(PlacementError::InvalidBondLength { .. })
            ));
        }
        let nan = PlacementRequest::new(&registry(), "O", f64::NAN, Site::Index(0), None);
        assert!(matches!(nan, Err(PlacementError::InvalidBondLength { .. })));
    }

    #[test]
    fn missing_parameters_are_reported_by_name() {
        let no_species = PlacementRequest::builder().bond_length(1.0).build(&registry());
        assert_eq!(no_species, Err(PlacementError::MissingParameter("species")));

        let no_bond = PlacementRequest::builder().species("O").build(&registry());
        assert_eq!(no_bond, Err(PlacementError::MissingParameter("bond_length")));

        let no_site = PlacementRequest::builder()
            .species("O")
            .bond_length(1.0)
            .build(&registry());
        assert_eq!(no_site, Err(PlacementError::MissingParameter("site")));
    }

    #[test]
    fn with_site_keeps_everything_else() {
        let request =
            PlacementRequest::new(&registry(), "N2_end", 2.1, Site::Index(0), None).unwrap();
        let moved = request.with_site(Site::Index(5));
        assert_eq!(moved.site().index(), Some(5));
        assert_eq!(moved.template(), request.template());
        assert_eq!(moved.bond_length(), 2.1);
    }

    #[test]
    fn site_ref_describes_coordinate_sites() {
        let site = Site::Coordinate {
            position: Point3::new(1.0, 2.0, 3.0),
            neighbors: vec![],
        };
        assert_eq!(site.index(), None);
        assert_eq!(site.site_ref(), SiteRef::Coordinate([1.0, 2.0, 3.0]));
    }
}

use super::error::PlacementError;
use super::frame::LocalFrame;
use super::request::{PlacementRequest, Site};
use crate::core::models::atom::Atom;
use crate::core::models::structure::AtomicStructure;
use nalgebra::{Point3, Vector3};
use std::ops::Range;

/// The outcome of a successful placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementResult {
    /// The input atoms, unchanged and in order, followed by the adsorbate atoms.
    pub structure: AtomicStructure,
    /// Descriptive name of this structure variant, e.g. `"HKUST-1_O2_side_eta2_site0"`.
    pub label: String,
    /// Indices of the appended adsorbate atoms within `structure`.
    pub new_atoms: Range<usize>,
    /// The site atom, if the site was an atom of the input structure.
    pub site_index: Option<usize>,
    pub site_position: Point3<f64>,
    /// Unit vector the adsorbate was placed along.
    pub direction: Vector3<f64>,
}

impl PlacementResult {
    pub fn adsorbate_atoms(&self) -> &[Atom] {
        &self.structure.atoms()[self.new_atoms.clone()]
    }

    /// Shortest distance between an adsorbate atom and any original atom other than the
    /// site atom.
    ///
    /// Placement never checks for overlaps; this is the diagnostic callers can warn on.
    /// Returns `None` when the site atom is the only original atom.
    pub fn closest_contact(&self) -> Option<f64> {
        let originals = &self.structure.atoms()[..self.new_atoms.start];
        self.adsorbate_atoms()
            .iter()
            .flat_map(|new| {
                originals
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| Some(*i) != self.site_index)
                    .map(move |(_, old)| new.distance_to(old))
            })
            .min_by(f64::total_cmp)
    }
}

/// Builds the label of a placement variant.
///
/// The form is `{name}_{species}[_eta{eta}]_site{index}`: the name part is dropped for
/// unnamed structures, the hapticity only appears for molecular adsorbates and free
/// coordinate sites are written as `site-custom`.
pub fn label(structure_name: Option<&str>, request: &PlacementRequest) -> String {
    let mut label = String::new();
    if let Some(name) = structure_name.filter(|n| !n.is_empty()) {
        label.push_str(name);
        label.push('_');
    }
    label.push_str(&request.template().id);
    if request.template().species.is_molecular() {
        label.push_str(&format!("_eta{}", request.eta()));
    }
    match request.site() {
        Site::Index(index) | Site::IndexWithDirection { index, .. } => {
            label.push_str(&format!("_site{}", index));
        }
        Site::Coordinate { .. } => label.push_str("_site-custom"),
    }
    label
}

pub fn assemble(
    structure: &AtomicStructure,
    frame: &LocalFrame,
    request: &PlacementRequest,
    adsorbate: Vec<Atom>,
) -> Result<PlacementResult, PlacementError> {
    let start = structure.len();
    let end = start + adsorbate.len();
    let assembled = structure.with_appended(adsorbate)?;

    Ok(PlacementResult {
        label: label(structure.name(), request),
        structure: assembled,
        new_atoms: start..end,
        site_index: request.site().index(),
        site_position: frame.site_position,
        direction: frame.direction,
    })
}

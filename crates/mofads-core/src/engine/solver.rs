use super::error::PlacementError;
use super::frame::LocalFrame;
use super::request::PlacementRequest;
use crate::core::models::atom::Atom;
use crate::core::species::template::AdsorbateSpecies;
use crate::core::utils::geometry::{is_finite_point, orthogonal_axis};
use nalgebra::Point3;

/// Computes the positions of the adsorbate atoms for `request` in `frame`.
///
/// Atoms are returned in a fixed order: the atom bonded to the site first for end-on
/// species, the `+axis` atom first for side-on species. No overlap checking is done.
pub fn solve(frame: &LocalFrame, request: &PlacementRequest) -> Result<Vec<Atom>, PlacementError> {
    let template = request.template();
    let species = &template.species;
    let eta = request.eta();

    if !species.supports_eta(eta) {
        return Err(PlacementError::UnsupportedOrientation {
            species: template.id.clone(),
            eta,
            supported: species.supported_etas().to_vec(),
        });
    }

    let direction = frame.direction;
    let anchor = anchor_point(frame, request.bond_length());

    let atoms = match species {
        AdsorbateSpecies::Atom { element } => vec![Atom::new(element, anchor)],
        AdsorbateSpecies::DiatomicEndOn {
            proximal,
            distal,
            bond_length,
        } => vec![
            Atom::new(proximal, anchor),
            Atom::new(distal, anchor + direction * *bond_length),
        ],
        AdsorbateSpecies::DiatomicSideOn {
            first,
            second,
            bond_length,
        } => {
            let half = orthogonal_axis(&direction) * (*bond_length / 2.0);
            vec![Atom::new(first, anchor + half), Atom::new(second, anchor - half)]
        }
    };

    if let Some(bad) = atoms.iter().find(|a| !is_finite_point(&a.position)) {
        return Err(PlacementError::DegenerateGeometry {
            site: request.site().site_ref(),
            reason: format!("computed position of {} is not finite", bad.element),
        });
    }

    Ok(atoms)
}

/// The point above the site that the adsorbate is centred on (or bonded through).
pub fn anchor_point(frame: &LocalFrame, bond_length: f64) -> Point3<f64> {
    frame.site_position + frame.direction * bond_length
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::species::registry::SpeciesRegistry;
    use crate::engine::frame::DirectionSource;
    use crate::engine::request::Site;
    use nalgebra::Vector3;

    const TOL: f64 = 1e-9;

    fn frame(site: [f64; 3], direction: Vector3<f64>) -> LocalFrame {
        LocalFrame {
            site_position: Point3::new(site[0], site[1], site[2]),
            direction: direction.normalize(),
            neighbor_count: 1,
            source: DirectionSource::CentroidOffset,
        }
    }

    fn request(species: &str, bond: f64) -> PlacementRequest {
        PlacementRequest::new(
            &SpeciesRegistry::builtin(),
            species,
            bond,
            Site::Index(0),
            None,
        )
        .unwrap()
    }

    fn assert_point_close(a: &Point3<f64>, b: &Point3<f64>) {
        assert!((a - b).norm() < TOL, "expected {:?}, got {:?}", b, a);
    }

    #[test]
    fn single_atom_sits_at_bond_length_along_direction() {
        let atoms = solve(&frame([0.0; 3], -Vector3::x()), &request("O", 1.75)).unwrap();
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].element, "O");
        assert_point_close(&atoms[0].position, &Point3::new(-1.75, 0.0, 0.0));
    }

    #[test]
    fn end_on_diatomic_forms_collinear_chain() {
        let atoms = solve(&frame([0.0; 3], Vector3::x()), &request("O2_end", 2.0)).unwrap();
        assert_eq!(atoms.len(), 2);
        assert_point_close(&atoms[0].position, &Point3::new(2.0, 0.0, 0.0));
        assert_point_close(&atoms[1].position, &Point3::new(3.21, 0.0, 0.0));
    }

    #[test]
    fn end_on_heteronuclear_binds_through_proximal_atom() {
        let atoms = solve(&frame([1.0, 1.0, 1.0], Vector3::z()), &request("CO_end", 1.9)).unwrap();
        assert_eq!(atoms[0].element, "C");
        assert_eq!(atoms[1].element, "O");
        assert_point_close(&atoms[0].position, &Point3::new(1.0, 1.0, 2.9));
        assert_point_close(&atoms[1].position, &Point3::new(1.0, 1.0, 4.03));
    }

    #[test]
    fn side_on_diatomic_is_symmetric_and_perpendicular() {
        let site = Point3::new(0.5, -0.5, 2.0);
        let direction = Vector3::new(1.0, 2.0, -0.5).normalize();
        let f = frame([site.x, site.y, site.z], direction);
        let atoms = solve(&f, &request("O2_side", 2.0)).unwrap();
        assert_eq!(atoms.len(), 2);

        let d1 = (atoms[0].position - site).norm();
        let d2 = (atoms[1].position - site).norm();
        assert!((d1 - d2).abs() < TOL);

        let bond = atoms[0].position - atoms[1].position;
        assert!((bond.norm() - 1.21).abs() < TOL);
        assert!(bond.dot(&direction).abs() < TOL);

        let midpoint = Point3::from((atoms[0].position.coords + atoms[1].position.coords) / 2.0);
        assert_point_close(&midpoint, &anchor_point(&f, 2.0));
    }

    #[test]
    fn side_on_axis_falls_back_when_direction_is_vertical() {
        let atoms = solve(&frame([0.0; 3], Vector3::z()), &request("N2_side", 2.2)).unwrap();
        let bond = atoms[0].position - atoms[1].position;
        assert!(bond.z.abs() < TOL);
        assert!((bond.norm() - 1.10).abs() < TOL);
        assert!((atoms[0].position.z - 2.2).abs() < TOL);
    }

    #[test]
    fn solver_is_deterministic() {
        let f = frame([0.1, 0.2, 0.3], Vector3::new(-0.3, 0.4, 0.9));
        let a = solve(&f, &request("H2_side", 1.6)).unwrap();
        let b = solve(&f, &request("H2_side", 1.6)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_geometry_is_reported() {
        let f = LocalFrame {
            site_position: Point3::new(f64::NAN, 0.0, 0.0),
            direction: Vector3::x(),
            neighbor_count: 1,
            source: DirectionSource::Supplied,
        };
        let result = solve(&f, &request("O", 1.0));
        assert!(matches!(
            result,
            Err(PlacementError::DegenerateGeometry { .. })
        ));
    }
}

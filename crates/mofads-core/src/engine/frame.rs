use super::config::EngineConfig;
use super::error::{PlacementError, SiteRef};
use super::request::Site;
use crate::core::models::structure::AtomicStructure;
use crate::core::utils::geometry::{
    PointCloudShape, canonical_sign, centroid, classify_shape, is_finite_point, is_finite_vector,
    orthogonal_axis,
};
use nalgebra::{Point3, Vector3};
use tracing::{debug, trace};

/// How the placement direction of a frame was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionSource {
    /// Given by the caller together with the site.
    Supplied,
    /// Pointing from the centroid of the neighbors through the site.
    CentroidOffset,
    /// Perpendicular to a line of neighbors passing through the site.
    LinearEnvironment,
    /// Normal to a plane of neighbors containing the site.
    PlanarEnvironment,
}

/// The local geometric frame at a site: where it is and which way is "out".
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFrame {
    pub site_position: Point3<f64>,
    /// Unit vector along which the adsorbate is placed.
    pub direction: Vector3<f64>,
    pub neighbor_count: usize,
    pub source: DirectionSource,
}

pub fn compute_frame(
    structure: &AtomicStructure,
    site: &Site,
    config: &EngineConfig,
) -> Result<LocalFrame, PlacementError> {
    let site_ref = site.site_ref();
    match site {
        Site::Index(index) => {
            let position = site_position(structure, *index)?;
            let neighbors = collect_neighbors(structure, *index, config)?;
            frame_from_environment(position, &neighbors, site_ref, config)
        }
        Site::IndexWithDirection { index, direction } => {
            let position = site_position(structure, *index)?;
            let norm = direction.norm();
            if !is_finite_vector(direction) || norm < config.direction_tolerance {
                return Err(PlacementError::DegenerateGeometry {
                    site: site_ref,
                    reason: format!("supplied direction {:?} is not usable", direction.as_slice()),
                });
            }
            Ok(LocalFrame {
                site_position: position,
                direction: direction / norm,
                neighbor_count: 0,
                source: DirectionSource::Supplied,
            })
        }
        Site::Coordinate {
            position,
            neighbors,
        } => {
            if !is_finite_point(position) {
                return Err(PlacementError::DegenerateGeometry {
                    site: site_ref,
                    reason: "site position is not finite".to_string(),
                });
            }
            if neighbors.is_empty() {
                return Err(PlacementError::NoNeighborsFound {
                    site: site_ref,
                    cutoff: config.neighbor_cutoff,
                });
            }
            for (i, neighbor) in neighbors.iter().enumerate() {
                if !is_finite_point(neighbor) {
                    return Err(PlacementError::DegenerateGeometry {
                        site: site_ref,
                        reason: format!("neighbor {} has a non-finite position", i),
                    });
                }
                if (neighbor - position).norm() < config.coincidence_tolerance {
                    return Err(PlacementError::DegenerateGeometry {
                        site: site_ref,
                        reason: format!("neighbor {} coincides with the site", i),
                    });
                }
            }
            frame_from_environment(*position, neighbors, site_ref, config)
        }
    }
}

fn site_position(structure: &AtomicStructure, index: usize) -> Result<Point3<f64>, PlacementError> {
    structure
        .atom(index)
        .map(|atom| atom.position)
        .ok_or(PlacementError::InvalidSiteIndex {
            index,
            atom_count: structure.len(),
        })
}

/// Positions of all atoms within the neighbor cutoff of atom `index`, in index order.
pub fn collect_neighbors(
    structure: &AtomicStructure,
    index: usize,
    config: &EngineConfig,
) -> Result<Vec<Point3<f64>>, PlacementError> {
    let center = site_position(structure, index)?;
    let mut neighbors = Vec::new();

    for (j, atom) in structure.atoms().iter().enumerate() {
        if j == index {
            continue;
        }
        let distance = (atom.position - center).norm();
        if distance < config.coincidence_tolerance {
            return Err(PlacementError::DegenerateGeometry {
                site: SiteRef::Index(index),
                reason: format!("atom {} ({}) coincides with the site", j, atom.element),
            });
        }
        if distance <= config.neighbor_cutoff {
            trace!(site = index, neighbor = j, distance, "Neighbor found.");
            neighbors.push(atom.position);
        }
    }

    if neighbors.is_empty() {
        return Err(PlacementError::NoNeighborsFound {
            site: SiteRef::Index(index),
            cutoff: config.neighbor_cutoff,
        });
    }
    Ok(neighbors)
}

fn frame_from_environment(
    position: Point3<f64>,
    neighbors: &[Point3<f64>],
    site_ref: SiteRef,
    config: &EngineConfig,
) -> Result<LocalFrame, PlacementError> {
    let Some(center) = centroid(neighbors) else {
        return Err(PlacementError::NoNeighborsFound {
            site: site_ref,
            cutoff: config.neighbor_cutoff,
        });
    };

    let mean_distance =
        neighbors.iter().map(|n| (n - position).norm()).sum::<f64>() / neighbors.len() as f64;
    let centered_within =
        (config.centering_tolerance * mean_distance).max(config.direction_tolerance);

    let offset = position - center;
    if offset.norm() > centered_within {
        return Ok(LocalFrame {
            site_position: position,
            direction: offset.normalize(),
            neighbor_count: neighbors.len(),
            source: DirectionSource::CentroidOffset,
        });
    }

    debug!(
        site = %site_ref,
        neighbors = neighbors.len(),
        offset = offset.norm(),
        mean_distance,
        "Site sits on the centroid of its neighbors; using the shape of the environment."
    );

    let (direction, source) = match classify_shape(neighbors, config.flatness_tolerance) {
        PointCloudShape::Linear(axis) => (
            canonical_sign(orthogonal_axis(&canonical_sign(axis))),
            DirectionSource::LinearEnvironment,
        ),
        PointCloudShape::Planar(normal) => {
            (canonical_sign(normal), DirectionSource::PlanarEnvironment)
        }
        PointCloudShape::Point | PointCloudShape::Volumetric => {
            return Err(PlacementError::DegenerateGeometry {
                site: site_ref,
                reason: format!(
                    "the {} neighbors surround the site symmetrically; no open direction",
                    neighbors.len()
                ),
            });
        }
    };

    Ok(LocalFrame {
        site_position: position,
        direction,
        neighbor_count: neighbors.len(),
        source,
    })
}

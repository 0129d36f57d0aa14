use crate::core::models::structure::AtomicStructure;
use crate::engine::assembler::PlacementResult;
use crate::engine::config::EngineConfig;
use crate::engine::error::PlacementError;
use crate::engine::place;
use crate::engine::request::PlacementRequest;
use tracing::{debug, info, instrument};

/// Places one adsorbate on one structure.
#[instrument(skip_all, name = "placement_workflow")]
pub fn run(
    structure: &AtomicStructure,
    request: &PlacementRequest,
    config: &EngineConfig,
) -> Result<PlacementResult, PlacementError> {
    info!(
        structure = structure.name().unwrap_or("<unnamed>"),
        atoms = structure.len(),
        species = %request.template().id,
        eta = request.eta(),
        bond_length = request.bond_length(),
        site = %request.site().site_ref(),
        "Placing adsorbate."
    );

    let result = place(structure, request, config)?;

    if let Some(contact) = result.closest_contact() {
        debug!(
            closest_contact = contact,
            "Shortest distance between the adsorbate and the framework (site excluded)."
        );
    }
    info!(
        label = %result.label,
        atoms = result.structure.len(),
        "Placement complete."
    );
    Ok(result)
}

/// Places several requests on the same structure, one result per request, in order.
///
/// A failing request does not stop the others.
#[instrument(skip_all, name = "variants_workflow")]
pub fn run_variants(
    structure: &AtomicStructure,
    requests: &[PlacementRequest],
    config: &EngineConfig,
) -> Vec<Result<PlacementResult, PlacementError>> {
    requests
        .iter()
        .map(|request| run(structure, request, config))
        .collect()
}

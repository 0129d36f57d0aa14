//! # Engine Module
//!
//! The placement engine: given a structure, a site and a validated request, it computes
//! the local frame at the site, positions the adsorbate atoms and assembles the new
//! structure.
//!
//! ## Architecture
//!
//! - **Requests** ([`request`]) - Validated placement requests and their builder
//! - **Local Frame** ([`frame`]) - Site position and placement direction from the coordination environment
//! - **Solver** ([`solver`]) - Adsorbate atom positions for each species geometry
//! - **Assembly** ([`assembler`]) - The new structure, its label and diagnostics
//! - **Configuration** ([`config`]) - Neighbor cutoff and numerical tolerances
//! - **Progress Monitoring** ([`progress`]) - Progress events for long-running workflows
//! - **Error Handling** ([`error`]) - Placement error types
//!
//! The engine holds no state: [`place`] is a pure function of its inputs and may be
//! called from several threads at once.

pub mod assembler;
pub mod config;
pub mod error;
pub mod frame;
pub mod progress;
pub mod request;
pub mod solver;

use crate::core::models::structure::AtomicStructure;
use assembler::PlacementResult;
use config::EngineConfig;
use error::PlacementError;
use request::PlacementRequest;
use tracing::debug;

/// Places the adsorbate described by `request` on `structure`.
///
/// The input structure is not modified; the result holds a new structure with the
/// adsorbate atoms appended.
///
/// # Errors
///
/// Returns a [`PlacementError`] when the site is invalid, has no usable coordination
/// environment, or the computed geometry is degenerate.
pub fn place(
    structure: &AtomicStructure,
    request: &PlacementRequest,
    config: &EngineConfig,
) -> Result<PlacementResult, PlacementError> {
    let frame = frame::compute_frame(structure, request.site(), config)?;
    debug!(
        site = %request.site().site_ref(),
        neighbors = frame.neighbor_count,
        source = ?frame.source,
        direction = ?frame.direction.as_slice(),
        "Local frame computed."
    );

    let adsorbate = solver::solve(&frame, request)?;
    assembler::assemble(structure, &frame, request, adsorbate)
}

//! # MOFADS Core Library
//!
//! Rigid geometric placement of adsorbates (single atoms, end-on and side-on diatomics)
//! at open metal sites of metal-organic framework structures.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AtomicStructure`, `Lattice`),
//!   adsorbate species templates and their registry, and CIF/XYZ I/O.
//!
//! - **[`engine`]: The Logic Core.** Validated placement requests, the local frame
//!   calculator, the placement solver and the structure assembler. The engine is a pure
//!   function of its inputs.
//!
//! - **[`workflows`]: The Public API.** Single placements and parallel batches with
//!   logging and progress reporting.
//!
//! ## Example
//!
//! ```
//! use mofads::core::models::{atom::Atom, structure::AtomicStructure};
//! use mofads::core::species::registry::SpeciesRegistry;
//! use mofads::engine::config::EngineConfig;
//! use mofads::engine::request::{PlacementRequest, Site};
//! use mofads::workflows::place;
//! use nalgebra::Point3;
//!
//! let structure = AtomicStructure::new(vec![
//!     Atom::new("Cu", Point3::new(0.0, 0.0, 0.0)),
//!     Atom::new("O", Point3::new(1.0, 0.0, 0.0)),
//! ])
//! .unwrap();
//!
//! let registry = SpeciesRegistry::builtin();
//! let request = PlacementRequest::new(&registry, "O", 1.75, Site::Index(0), None).unwrap();
//! let result = place::run(&structure, &request, &EngineConfig::default()).unwrap();
//!
//! assert_eq!(result.structure.len(), 3);
//! assert_eq!(result.label, "O_site0");
//! ```

pub mod core;
pub mod engine;
pub mod workflows;

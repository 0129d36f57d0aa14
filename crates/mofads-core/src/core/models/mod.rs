//! # Core Models Module
//!
//! This module contains the data structures used to represent atomic structures in
//! MOFADS.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom: element symbol and Cartesian position
//! - [`structure`] - An ordered, immutable snapshot of atoms, optionally with a unit cell
//! - [`lattice`] - Unit cell representation and fractional/Cartesian conversion
//!
//! ## Usage
//!
//! ```
//! use mofads::core::models::{atom::Atom, structure::AtomicStructure};
//! use nalgebra::Point3;
//!
//! let structure = AtomicStructure::new(vec![
//!     Atom::new("Cu", Point3::new(0.0, 0.0, 0.0)),
//!     Atom::new("O", Point3::new(1.95, 0.0, 0.0)),
//! ])
//! .unwrap();
//! assert_eq!(structure.len(), 2);
//! ```

pub mod atom;
pub mod lattice;
pub mod structure;

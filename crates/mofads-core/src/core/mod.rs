//! # Core Module
//!
//! The stateless building blocks of MOFADS: the atomic structure model, adsorbate
//! species templates, element and geometry utilities, and structure file I/O.
//!
//! ## Architecture
//!
//! - **Structure Representation** ([`models`]) - Atoms, atomic structures and unit cells
//! - **Adsorbates** ([`species`]) - Species templates and the registry resolving their identifiers
//! - **File I/O** ([`io`]) - CIF and (extended) XYZ readers and writers
//! - **Utilities** ([`utils`]) - Element table and point-cloud geometry
//!
//! Nothing in this module knows about placement; the [`engine`](crate::engine) builds on
//! these types.

pub mod io;
pub mod models;
pub mod species;
pub mod utils;

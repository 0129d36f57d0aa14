//! Adsorbate species templates and the registry that resolves identifiers such as
//! `"O"`, `"O2_end"` or `"O2_side"` to them.

pub mod registry;
pub mod template;

use super::atom::Atom;
use super::lattice::Lattice;
use crate::core::utils::geometry::is_finite_point;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StructureError {
    #[error("Structure contains no atoms")]
    Empty,
    #[error("Atom {index} ({element}) has a non-finite position")]
    NonFinitePosition { index: usize, element: String },
}

/// An ordered, immutable snapshot of a set of atoms.
///
/// The index of an atom is its position in the sequence and is stable for the lifetime
/// of the structure, which makes it suitable for site references. Structures are never
/// modified in place: operations that add atoms produce a new structure.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicStructure {
    /// Optional human-readable name, usually the CIF data block or file stem.
    name: Option<String>,
    /// The atoms, in index order.
    atoms: Vec<Atom>,
    /// The unit cell, when the structure came from a periodic source.
    lattice: Option<Lattice>,
}

impl AtomicStructure {
    /// Creates a structure from a list of atoms.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::Empty`] for an empty atom list and
    /// [`StructureError::NonFinitePosition`] if any coordinate is NaN or infinite.
    pub fn new(atoms: Vec<Atom>) -> Result<Self, StructureError> {
        StructureBuilder::new().atoms(atoms).build()
    }

    pub fn builder() -> StructureBuilder {
        StructureBuilder::new()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn lattice(&self) -> Option<&Lattice> {
        self.lattice.as_ref()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.atoms.iter().map(|a| &a.position)
    }

    /// Chemical formula in order of first appearance, e.g. `"Cu2O8C16"`.
    pub fn formula(&self) -> String {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for atom in &self.atoms {
            match counts.iter_mut().find(|(el, _)| *el == atom.element) {
                Some((_, n)) => *n += 1,
                None => counts.push((atom.element.as_str(), 1)),
            }
        }
        counts
            .into_iter()
            .map(|(el, n)| if n == 1 { el.to_string() } else { format!("{}{}", el, n) })
            .collect()
    }

    /// Replaces the name, keeping atoms and lattice.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Returns a new structure with `extra` appended after the existing atoms.
    ///
    /// Name and lattice are carried over unchanged.
    pub fn with_appended(&self, extra: Vec<Atom>) -> Result<Self, StructureError> {
        let mut atoms = Vec::with_capacity(self.atoms.len() + extra.len());
        atoms.extend(self.atoms.iter().cloned());
        atoms.extend(extra);
        let mut builder = StructureBuilder::new().atoms(atoms);
        if let Some(name) = &self.name {
            builder = builder.name(name);
        }
        if let Some(lattice) = &self.lattice {
            builder = builder.lattice(lattice.clone());
        }
        builder.build()
    }
}

/// Incremental constructor for [`AtomicStructure`], used by the file readers.
#[derive(Debug, Default)]
pub struct StructureBuilder {
    name: Option<String>,
    atoms: Vec<Atom>,
    lattice: Option<Lattice>,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
    pub fn lattice(mut self, lattice: Lattice) -> Self {
        self.lattice = Some(lattice);
        self
    }
    pub fn atoms(mut self, atoms: Vec<Atom>) -> Self {
        self.atoms = atoms;
        self
    }
    pub fn add_atom(&mut self, element: &str, position: Point3<f64>) -> &mut Self {
        self.atoms.push(Atom::new(element, position));
        self
    }

    pub fn build(self) -> Result<AtomicStructure, StructureError> {
        if self.atoms.is_empty() {
            return Err(StructureError::Empty);
        }
        if let Some((index, atom)) = self
            .atoms
            .iter()
            .enumerate()
            .find(|(_, a)| !is_finite_point(&a.position))
        {
            return Err(StructureError::NonFinitePosition {
                index,
                element: atom.element.clone(),
            });
        }
        Ok(AtomicStructure {
            name: self.name,
            atoms: self.atoms,
            lattice: self.lattice,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cu_o_structure() -> AtomicStructure {
        AtomicStructure::builder()
            .name("CuO")
            .atoms(vec![
                Atom::new("Cu", Point3::new(0.0, 0.0, 0.0)),
                Atom::new("O", Point3::new(1.9, 0.0, 0.0)),
                Atom::new("O", Point3::new(-1.9, 0.0, 0.0)),
            ])
            .build()
            .unwrap()
    }

    #[test]
    fn new_rejects_empty_atom_list() {
        assert_eq!(AtomicStructure::new(Vec::new()), Err(StructureError::Empty));
    }

    #[test]
    fn new_rejects_non_finite_positions() {
        let atoms = vec![
            Atom::new("Cu", Point3::new(0.0, 0.0, 0.0)),
            Atom::new("O", Point3::new(f64::NAN, 0.0, 0.0)),
        ];
        assert_eq!(
            AtomicStructure::new(atoms),
            Err(StructureError::NonFinitePosition {
                index: 1,
                element: "O".to_string()
            })
        );
    }

    #[test]
    fn accessors_expose_atoms_in_order() {
        let s = cu_o_structure();
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
        assert_eq!(s.name(), Some("CuO"));
        assert_eq!(s.atom(0).unwrap().element, "Cu");
        assert_eq!(s.atom(2).unwrap().position, Point3::new(-1.9, 0.0, 0.0));
        assert!(s.atom(3).is_none());
        assert_eq!(s.positions().count(), 3);
    }

    #[test]
    fn formula_counts_elements_in_order_of_appearance() {
        assert_eq!(cu_o_structure().formula(), "CuO2");
    }

    #[test]
    fn with_appended_leaves_original_untouched() {
        let original = cu_o_structure();
        let extended = original
            .with_appended(vec![Atom::new("O", Point3::new(0.0, 0.0, 2.0))])
            .unwrap();

        assert_eq!(original.len(), 3);
        assert_eq!(extended.len(), 4);
        assert_eq!(&extended.atoms()[..3], original.atoms());
        assert_eq!(extended.name(), Some("CuO"));
    }

    #[test]
    fn builder_add_atom_appends_in_order() {
        let mut builder = StructureBuilder::new();
        builder
            .add_atom("Zn", Point3::new(0.0, 0.0, 0.0))
            .add_atom("N", Point3::new(2.0, 0.0, 0.0));
        let s = builder.build().unwrap();
        assert_eq!(s.atoms()[0].element, "Zn");
        assert_eq!(s.atoms()[1].element, "N");
        assert!(s.lattice().is_none());
    }
}

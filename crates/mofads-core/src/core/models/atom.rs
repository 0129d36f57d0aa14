use nalgebra::Point3;

/// Represents a single atom of a crystal or molecular structure.
///
/// The atom is identified by its position in the owning
/// [`AtomicStructure`](super::structure::AtomicStructure); it carries no index of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The canonical element symbol (e.g., "Cu", "O").
    pub element: String,
    /// The Cartesian coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` from an element symbol and a Cartesian position.
    ///
    /// # Arguments
    ///
    /// * `element` - The element symbol. It is stored as given; readers are responsible
    ///   for normalising it.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        Self {
            element: element.to_string(),
            position,
        }
    }

    /// Euclidean distance to another atom, in Angstroms.
    pub fn distance_to(&self, other: &Atom) -> f64 {
        (self.position - other.position).norm()
    }
}

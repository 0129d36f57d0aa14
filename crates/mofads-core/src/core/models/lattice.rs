use nalgebra::{Matrix3, Point3, Vector3};
use thiserror::Error;

const MIN_CELL_VOLUME: f64 = 1e-6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LatticeError {
    #[error("Cell lengths must be positive and finite (a={a}, b={b}, c={c})")]
    InvalidLength { a: f64, b: f64, c: f64 },
    #[error("Cell angles (alpha={alpha}, beta={beta}, gamma={gamma}) do not describe a valid cell")]
    InvalidAngles { alpha: f64, beta: f64, gamma: f64 },
    #[error("Cell matrix has zero or near-zero volume")]
    ZeroVolume,
}

/// A periodic unit cell.
///
/// The cell vectors are the columns of `matrix`, in Angstroms. The lattice is only used to
/// convert between fractional and Cartesian coordinates; no periodic image search is
/// performed anywhere in the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    matrix: Matrix3<f64>,
    inverse: Matrix3<f64>,
}

impl Lattice {
    pub fn new(matrix: Matrix3<f64>) -> Result<Self, LatticeError> {
        if !matrix.iter().all(|v| v.is_finite()) || matrix.determinant().abs() < MIN_CELL_VOLUME {
            return Err(LatticeError::ZeroVolume);
        }
        let inverse = matrix.try_inverse().ok_or(LatticeError::ZeroVolume)?;
        Ok(Self { matrix, inverse })
    }

    /// Builds a cell from lengths (Angstroms) and angles (degrees).
    ///
    /// `a` lies along x and `b` in the xy plane.
    pub fn from_parameters(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self, LatticeError> {
        if [a, b, c].iter().any(|l| !l.is_finite() || *l <= 0.0) {
            return Err(LatticeError::InvalidLength { a, b, c });
        }
        let (ca, cb, cg) = (
            alpha.to_radians().cos(),
            beta.to_radians().cos(),
            gamma.to_radians().cos(),
        );
        let sg = gamma.to_radians().sin();
        let term = 1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg;
        if !term.is_finite() || term <= 0.0 || sg.abs() < 1e-12 {
            return Err(LatticeError::InvalidAngles { alpha, beta, gamma });
        }

        #[rustfmt::skip]
        let matrix = Matrix3::new(
            a,   b * cg, c * cb,
            0.0, b * sg, c * (ca - cb * cg) / sg,
            0.0, 0.0,    c * term.sqrt() / sg,
        );
        Self::new(matrix)
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    pub fn to_cartesian(&self, fractional: &Vector3<f64>) -> Point3<f64> {
        Point3::from(self.matrix * fractional)
    }

    pub fn to_fractional(&self, cartesian: &Point3<f64>) -> Vector3<f64> {
        self.inverse * cartesian.coords
    }

    /// Returns `(a, b, c, alpha, beta, gamma)` with angles in degrees.
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let va = self.matrix.column(0);
        let vb = self.matrix.column(1);
        let vc = self.matrix.column(2);
        let (a, b, c) = (va.norm(), vb.norm(), vc.norm());
        let alpha = (vb.dot(&vc) / (b * c)).clamp(-1.0, 1.0).acos().to_degrees();
        let beta = (va.dot(&vc) / (a * c)).clamp(-1.0, 1.0).acos().to_degrees();
        let gamma = (va.dot(&vb) / (a * b)).clamp(-1.0, 1.0).acos().to_degrees();
        (a, b, c, alpha, beta, gamma)
    }
}

use std::ops::Mul;

use nalgebra::SMatrix;

use crate::config::{Complex, is_nonzero};
use crate::error::UnitaryError;

/// A validated N×N unitary over complex doubles, N = 2^k for a k-qubit gate.
///
/// Unitarity is checked once by [`UnitaryMatrix::new`]. Matrices derived from
/// valid ones (`dagger`, `multiply`) are unitary by construction and are not
/// re-checked.
#[derive(Debug, Clone, Copy)]
pub struct UnitaryMatrix<const N: usize> {
    mat: SMatrix<Complex, N, N>,
}

impl<const N: usize> UnitaryMatrix<N> {
    const VALID_DIMENSION: () = assert!(
        N.is_power_of_two() && N <= 8,
        "gate matrices must be 2x2, 4x4 or 8x8"
    );

    pub fn identity() -> Self {
        Self::from_matrix(SMatrix::identity())
    }

    /// Builds a matrix from its rows, rejecting it unless M·M† = I.
    pub fn new(rows: [[Complex; N]; N]) -> Result<Self, UnitaryError> {
        let m = Self::from_rows_unchecked(rows);
        m.check_unitary()?;
        Ok(m)
    }

    pub(crate) fn from_rows_unchecked(rows: [[Complex; N]; N]) -> Self {
        Self::from_matrix(SMatrix::from_fn(|i, j| rows[i][j]))
    }

    fn from_matrix(mat: SMatrix<Complex, N, N>) -> Self {
        let () = Self::VALID_DIMENSION;
        Self { mat }
    }

    #[inline]
    pub fn at(&self, i: usize, j: usize) -> Complex {
        self.mat[(i, j)]
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Self {
        Self::from_matrix(self.mat.adjoint())
    }

    pub fn multiply(&self, other: &Self) -> Self {
        Self::from_matrix(self.mat * other.mat)
    }

    pub fn dimension(&self) -> usize {
        N
    }

    fn check_unitary(&self) -> Result<(), UnitaryError> {
        if self.multiply(&self.dagger()) == Self::identity() {
            Ok(())
        } else {
            Err(UnitaryError::NotUnitary)
        }
    }
}

impl<const N: usize> PartialEq for UnitaryMatrix<N> {
    /// Entry-wise equality up to the zero threshold.
    fn eq(&self, other: &Self) -> bool {
        self.mat
            .iter()
            .zip(other.mat.iter())
            .all(|(a, b)| !is_nonzero(a - b))
    }
}

impl<const N: usize> Mul for UnitaryMatrix<N> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl<const N: usize> Mul for &UnitaryMatrix<N> {
    type Output = UnitaryMatrix<N>;

    fn mul(self, rhs: Self) -> UnitaryMatrix<N> {
        self.multiply(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::RECP_SQRT_2;

    fn c(re: f64, im: f64) -> Complex {
        Complex::new(re, im)
    }

    #[test]
    fn test_identity_is_unitary() {
        let id = UnitaryMatrix::<4>::identity();
        assert_eq!(id.at(0, 0), c(1., 0.));
        assert_eq!(id.at(0, 1), c(0., 0.));
        assert_eq!(id.dimension(), 4);
        assert!(id.check_unitary().is_ok());
    }

    #[test]
    fn test_rejects_non_unitary() {
        let m = UnitaryMatrix::<2>::new([[c(1., 0.), c(1., 0.)], [c(0., 0.), c(1., 0.)]]);
        assert_eq!(m.unwrap_err(), UnitaryError::NotUnitary);

        let scaled = UnitaryMatrix::<2>::new([[c(2., 0.), c(0., 0.)], [c(0., 0.), c(2., 0.)]]);
        assert!(scaled.is_err());
    }

    #[test]
    fn test_accepts_hadamard() {
        let h = UnitaryMatrix::<2>::new([
            [c(RECP_SQRT_2, 0.), c(RECP_SQRT_2, 0.)],
            [c(RECP_SQRT_2, 0.), c(-RECP_SQRT_2, 0.)],
        ])
        .unwrap();
        assert_eq!(&h * &h, UnitaryMatrix::identity());
    }

    #[test]
    fn test_dagger() {
        let m = UnitaryMatrix::<2>::new([[c(0., 0.), c(0., 1.)], [c(1., 0.), c(0., 0.)]]).unwrap();
        let d = m.dagger();
        assert_eq!(d.at(0, 1), c(1., 0.));
        assert_eq!(d.at(1, 0), c(0., -1.));
        assert_eq!(m * d, UnitaryMatrix::identity());
    }

    #[test]
    fn test_multiply_is_row_by_column() {
        // [[0, 1], [1, 0]] * [[1, 0], [0, i]] = [[0, i], [1, 0]]
        let x = UnitaryMatrix::<2>::new([[c(0., 0.), c(1., 0.)], [c(1., 0.), c(0., 0.)]]).unwrap();
        let s = UnitaryMatrix::<2>::new([[c(1., 0.), c(0., 0.)], [c(0., 0.), c(0., 1.)]]).unwrap();
        let xs = x.multiply(&s);
        assert_eq!(xs.at(0, 1), c(0., 1.));
        assert_eq!(xs.at(1, 0), c(1., 0.));
        assert_eq!(xs.at(0, 0), c(0., 0.));
    }

    #[test]
    fn test_equality_is_approximate() {
        let a = UnitaryMatrix::<2>::identity();
        let b = UnitaryMatrix::<2>::from_rows_unchecked([
            [c(1. + 1e-13, 0.), c(0., 0.)],
            [c(0., 0.), c(1., -1e-13)],
        ]);
        assert_eq!(a, b);

        let far = UnitaryMatrix::<2>::from_rows_unchecked([
            [c(1. + 1e-6, 0.), c(0., 0.)],
            [c(0., 0.), c(1., 0.)],
        ]);
        assert_ne!(a, far);
    }
}

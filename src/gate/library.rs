//! Matrices of the standard gates.
//!
//! Multi-qubit matrices are indexed with the first operand as the most
//! significant bit, so `cnot()` applied to `[control, target]` flips `target`.

use std::f64::consts::PI;

use crate::config::constants::RECP_SQRT_2;
use crate::config::{Complex, Real};
use crate::error::UnitaryError;

use super::unitary::UnitaryMatrix;

const O: Complex = Complex::new(0., 0.);
const L: Complex = Complex::new(1., 0.);
const I: Complex = Complex::new(0., 1.);

fn r(x: Real) -> Complex {
    Complex::new(x, 0.)
}

const X_ROWS: [[Complex; 2]; 2] = [[O, L], [L, O]];
const Y_ROWS: [[Complex; 2]; 2] = [[O, Complex::new(0., -1.)], [I, O]];
const Z_ROWS: [[Complex; 2]; 2] = [[L, O], [O, Complex::new(-1., 0.)]];
const S_ROWS: [[Complex; 2]; 2] = [[L, O], [O, I]];
const T_ROWS: [[Complex; 2]; 2] = [[L, O], [O, Complex::new(RECP_SQRT_2, RECP_SQRT_2)]];
const H_ROWS: [[Complex; 2]; 2] = [
    [Complex::new(RECP_SQRT_2, 0.), Complex::new(RECP_SQRT_2, 0.)],
    [Complex::new(RECP_SQRT_2, 0.), Complex::new(-RECP_SQRT_2, 0.)],
];

const CNOT_ROWS: [[Complex; 4]; 4] = [[L, O, O, O], [O, L, O, O], [O, O, O, L], [O, O, L, O]];
const SWAP_ROWS: [[Complex; 4]; 4] = [[L, O, O, O], [O, O, L, O], [O, L, O, O], [O, O, O, L]];
const CZ_ROWS: [[Complex; 4]; 4] = [
    [L, O, O, O],
    [O, L, O, O],
    [O, O, L, O],
    [O, O, O, Complex::new(-1., 0.)],
];

const TOFFOLI_ROWS: [[Complex; 8]; 8] = [
    [L, O, O, O, O, O, O, O],
    [O, L, O, O, O, O, O, O],
    [O, O, L, O, O, O, O, O],
    [O, O, O, L, O, O, O, O],
    [O, O, O, O, L, O, O, O],
    [O, O, O, O, O, L, O, O],
    [O, O, O, O, O, O, O, L],
    [O, O, O, O, O, O, L, O],
];

pub fn identity() -> UnitaryMatrix<2> {
    UnitaryMatrix::identity()
}

pub fn x() -> UnitaryMatrix<2> {
    UnitaryMatrix::from_rows_unchecked(X_ROWS)
}

pub fn y() -> UnitaryMatrix<2> {
    UnitaryMatrix::from_rows_unchecked(Y_ROWS)
}

pub fn z() -> UnitaryMatrix<2> {
    UnitaryMatrix::from_rows_unchecked(Z_ROWS)
}

pub fn h() -> UnitaryMatrix<2> {
    UnitaryMatrix::from_rows_unchecked(H_ROWS)
}

pub fn s() -> UnitaryMatrix<2> {
    UnitaryMatrix::from_rows_unchecked(S_ROWS)
}

pub fn sdag() -> UnitaryMatrix<2> {
    s().dagger()
}

pub fn t() -> UnitaryMatrix<2> {
    UnitaryMatrix::from_rows_unchecked(T_ROWS)
}

pub fn tdag() -> UnitaryMatrix<2> {
    t().dagger()
}

fn rx_rows(theta: Real) -> [[Complex; 2]; 2] {
    let (sin, cos) = (theta / 2.).sin_cos();
    [[r(cos), Complex::new(0., -sin)], [Complex::new(0., -sin), r(cos)]]
}

fn ry_rows(theta: Real) -> [[Complex; 2]; 2] {
    let (sin, cos) = (theta / 2.).sin_cos();
    [[r(cos), r(-sin)], [r(sin), r(cos)]]
}

fn rz_rows(theta: Real) -> [[Complex; 2]; 2] {
    let (sin, cos) = (theta / 2.).sin_cos();
    [[Complex::new(cos, -sin), O], [O, Complex::new(cos, sin)]]
}

fn cr_rows(theta: Real) -> [[Complex; 4]; 4] {
    let mut rows = [[O; 4]; 4];
    rows[0][0] = L;
    rows[1][1] = L;
    rows[2][2] = L;
    rows[3][3] = Complex::from_polar(1., theta);
    rows
}

/// Rotations take their angle at run time and go through the checked
/// constructor; a non-finite angle is rejected.
pub fn rx(theta: Real) -> Result<UnitaryMatrix<2>, UnitaryError> {
    UnitaryMatrix::new(rx_rows(theta))
}

pub fn ry(theta: Real) -> Result<UnitaryMatrix<2>, UnitaryError> {
    UnitaryMatrix::new(ry_rows(theta))
}

pub fn rz(theta: Real) -> Result<UnitaryMatrix<2>, UnitaryError> {
    UnitaryMatrix::new(rz_rows(theta))
}

pub fn x90() -> UnitaryMatrix<2> {
    UnitaryMatrix::from_rows_unchecked(rx_rows(PI / 2.))
}

pub fn mx90() -> UnitaryMatrix<2> {
    UnitaryMatrix::from_rows_unchecked(rx_rows(-PI / 2.))
}

pub fn y90() -> UnitaryMatrix<2> {
    UnitaryMatrix::from_rows_unchecked(ry_rows(PI / 2.))
}

pub fn my90() -> UnitaryMatrix<2> {
    UnitaryMatrix::from_rows_unchecked(ry_rows(-PI / 2.))
}

pub fn cnot() -> UnitaryMatrix<4> {
    UnitaryMatrix::from_rows_unchecked(CNOT_ROWS)
}

pub fn swap() -> UnitaryMatrix<4> {
    UnitaryMatrix::from_rows_unchecked(SWAP_ROWS)
}

pub fn cz() -> UnitaryMatrix<4> {
    UnitaryMatrix::from_rows_unchecked(CZ_ROWS)
}

/// Controlled phase rotation by `theta`.
pub fn cr(theta: Real) -> Result<UnitaryMatrix<4>, UnitaryError> {
    UnitaryMatrix::new(cr_rows(theta))
}

/// Rotation angle of `crk`: π / 2^(k-1).
pub fn crk_angle(k: u32) -> Real {
    PI / Real::powf(2., Real::from(k) - 1.)
}

/// Controlled phase rotation by π / 2^(k-1), as used by the quantum Fourier transform.
pub fn crk(k: u32) -> Result<UnitaryMatrix<4>, UnitaryError> {
    cr(crk_angle(k))
}

pub fn toffoli() -> UnitaryMatrix<8> {
    UnitaryMatrix::from_rows_unchecked(TOFFOLI_ROWS)
}

fn expect_identity(holds: bool, name: &'static str) -> Result<(), UnitaryError> {
    if holds {
        Ok(())
    } else {
        Err(UnitaryError::IdentityViolated(name))
    }
}

/// Validates every fixed matrix through the checked constructor and verifies
/// the algebraic identities relating them.
pub fn self_check() -> Result<(), UnitaryError> {
    for rows in [X_ROWS, Y_ROWS, Z_ROWS, S_ROWS, T_ROWS, H_ROWS] {
        UnitaryMatrix::new(rows)?;
    }
    for rows in [CNOT_ROWS, SWAP_ROWS, CZ_ROWS] {
        UnitaryMatrix::new(rows)?;
    }
    UnitaryMatrix::new(TOFFOLI_ROWS)?;
    for theta in [PI / 2., -PI / 2.] {
        UnitaryMatrix::new(rx_rows(theta))?;
        UnitaryMatrix::new(ry_rows(theta))?;
    }

    let id = UnitaryMatrix::<2>::identity();
    expect_identity(t() * t() == s(), "T·T = S")?;
    expect_identity(s() * s() == z(), "S·S = Z")?;
    expect_identity(h() * h() == id, "H·H = I")?;
    expect_identity(x() * x() == id, "X·X = I")?;
    expect_identity(s() * sdag() == id, "S·S† = I")?;
    expect_identity(sdag() == s().dagger(), "Sdag = S†")?;
    expect_identity(x90() * x90() == rx(PI)?, "X90·X90 = Rx(π)")?;
    expect_identity(cnot() * cnot() == UnitaryMatrix::identity(), "CNOT·CNOT = I")?;
    expect_identity(
        toffoli() * toffoli() == UnitaryMatrix::identity(),
        "TOFFOLI·TOFFOLI = I",
    )?;

    log::debug!("gate library self-check passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_check() {
        assert_eq!(self_check(), Ok(()));
    }

    #[test]
    fn test_involutions() {
        let id = UnitaryMatrix::<2>::identity();
        assert_eq!(h() * h(), id);
        assert_eq!(x() * x(), id);
        assert_eq!(y() * y(), id);
        assert_eq!(z() * z(), id);
        assert_eq!(swap() * swap(), UnitaryMatrix::identity());
        assert_eq!(cz() * cz(), UnitaryMatrix::identity());
    }

    #[test]
    fn test_phase_ladder() {
        assert_eq!(s() * s(), z());
        assert_eq!(t() * t(), s());
        assert_eq!(tdag() * tdag(), sdag());
    }

    #[test]
    fn test_rotations_are_unitary() {
        for theta in [0., 0.3, 1.2, PI, -2.5] {
            assert!(rx(theta).is_ok());
            assert!(ry(theta).is_ok());
            assert!(rz(theta).is_ok());
            assert!(cr(theta).is_ok());
        }
    }

    #[test]
    fn test_rotations_reject_non_finite_angles() {
        for theta in [Real::NAN, Real::INFINITY, Real::NEG_INFINITY] {
            assert_eq!(rx(theta).unwrap_err(), UnitaryError::NotUnitary);
            assert_eq!(ry(theta).unwrap_err(), UnitaryError::NotUnitary);
            assert_eq!(rz(theta).unwrap_err(), UnitaryError::NotUnitary);
            assert_eq!(cr(theta).unwrap_err(), UnitaryError::NotUnitary);
        }
    }

    #[test]
    fn test_fixed_rotations() {
        assert_eq!(x90(), rx(PI / 2.).unwrap());
        assert_eq!(mx90() * x90(), UnitaryMatrix::identity());
        assert_eq!(my90() * y90(), UnitaryMatrix::identity());
    }

    #[test]
    fn test_rz_of_pi_is_z_up_to_phase() {
        // Rz(π) = -i Z
        let m = rz(PI).unwrap();
        assert!((m.at(0, 0) - Complex::new(0., -1.)).norm() < 1e-12);
        assert!((m.at(1, 1) - Complex::new(0., 1.)).norm() < 1e-12);
    }

    #[test]
    fn test_cr_and_crk() {
        assert_eq!(cr(PI).unwrap(), cz());
        assert_eq!(crk(1).unwrap(), cz());
        assert_eq!(crk(2).unwrap(), cr(PI / 2.).unwrap());
        assert!((crk(3).unwrap().at(3, 3) - t().at(1, 1)).norm() < 1e-12);
    }
}

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use crate::config::constants::MAX_QUBITS;

/// One computational basis state: bit `i` is the value of qubit `i`.
///
/// Also used as the classical measurement register. Ordering is the numeric
/// order of the underlying word, i.e. most significant bit first.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BasisVector {
    bits: u64,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseBasisVectorError {
    #[error("bit string is longer than {MAX_QUBITS} characters")]
    TooLong,

    #[error("invalid character {0:?} in bit string")]
    InvalidCharacter(char),
}

impl BasisVector {
    pub const fn zeros() -> Self {
        Self { bits: 0 }
    }

    pub fn test(&self, qi: usize) -> bool {
        assert!(qi < MAX_QUBITS, "bit index {qi} out of range");
        self.bits & (1 << qi) != 0
    }

    pub fn set(&mut self, qi: usize, value: bool) {
        assert!(qi < MAX_QUBITS, "bit index {qi} out of range");
        if value {
            self.bits |= 1 << qi;
        } else {
            self.bits &= !(1 << qi);
        }
    }

    /// Copy of `self` with bit `qi` set to `value`.
    pub fn with(mut self, qi: usize, value: bool) -> Self {
        self.set(qi, value);
        self
    }

    pub const fn from_u64(u: u64) -> Self {
        Self { bits: u }
    }

    pub const fn into_u64(self) -> u64 {
        self.bits
    }

    /// The lowest `n` bits, most significant first.
    pub fn to_substring(&self, n: usize) -> String {
        assert!(n <= MAX_QUBITS, "substring of {n} bits requested");
        (0..n)
            .rev()
            .map(|qi| if self.test(qi) { '1' } else { '0' })
            .collect()
    }
}

impl Display for BasisVector {
    /// Prints all 64 bits unless a width is given, e.g. `{:3}` prints the lowest 3.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let width = f.width().unwrap_or(MAX_QUBITS).min(MAX_QUBITS);
        f.write_str(&self.to_substring(width))
    }
}

impl FromStr for BasisVector {
    type Err = ParseBasisVectorError;

    /// Parses a bit string written most significant bit first: "10" sets bit 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_QUBITS {
            return Err(ParseBasisVectorError::TooLong);
        }

        s.chars().try_fold(Self::zeros(), |acc, c| {
            let bit = match c {
                '0' => 0,
                '1' => 1,
                other => return Err(ParseBasisVectorError::InvalidCharacter(other)),
            };
            Ok(Self {
                bits: (acc.bits << 1) | bit,
            })
        })
    }
}

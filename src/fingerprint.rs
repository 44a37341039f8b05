use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::config::Complex;
use crate::simulator::{BasisVector, QuantumState};

#[derive(Debug, PartialEq)]
struct Entry(BasisVector, Complex);

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // heavier amplitudes sort last, ties broken towards the smaller basis vector
        self.1
            .norm()
            .total_cmp(&other.1.norm())
            .then_with(|| other.0.cmp(&self.0))
    }
}

/// The `num_entries` largest amplitudes seen so far.
pub struct Fingerprint {
    num_entries: usize,
    entries: BTreeSet<Entry>,
}

impl Fingerprint {
    pub fn new(num_entries: usize) -> Self {
        Self {
            num_entries,
            entries: BTreeSet::new(),
        }
    }

    pub fn of(state: &mut QuantumState, num_entries: usize) -> Self {
        let mut fingerprint = Self::new(num_entries);
        state.for_each(|basis_vector, amplitude| fingerprint.insert(*basis_vector, *amplitude));
        fingerprint
    }

    pub fn insert(&mut self, basis_vector: BasisVector, amplitude: Complex) {
        self.entries.insert(Entry(basis_vector, amplitude));
        if self.entries.len() > self.num_entries {
            self.entries.pop_first();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Heaviest first.
    pub fn iter(&self) -> impl Iterator<Item = (BasisVector, Complex)> + '_ {
        self.entries
            .iter()
            .rev()
            .map(|Entry(basis_vector, amplitude)| (*basis_vector, *amplitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bv(s: &str) -> BasisVector {
        s.parse().unwrap()
    }

    #[test]
    fn test_keeps_heaviest() {
        let mut fingerprint = Fingerprint::new(2);
        fingerprint.insert(bv("00"), Complex::new(0.1, 0.));
        fingerprint.insert(bv("01"), Complex::new(0., -0.9));
        fingerprint.insert(bv("10"), Complex::new(0.4, 0.));
        fingerprint.insert(bv("11"), Complex::new(0.2, 0.));

        let kept: Vec<_> = fingerprint.iter().map(|(b, _)| b.to_substring(2)).collect();
        assert_eq!(kept, vec!["01", "10"]);
    }

    #[test]
    fn test_ties_prefer_smaller_basis_vector() {
        let mut fingerprint = Fingerprint::new(3);
        for s in ["11", "00", "10", "01"] {
            fingerprint.insert(bv(s), Complex::new(0.5, 0.));
        }

        let kept: Vec<_> = fingerprint.iter().map(|(b, _)| b.to_substring(2)).collect();
        assert_eq!(kept, vec!["00", "01", "10"]);
    }

    #[test]
    fn test_of_state() {
        let mut state = QuantumState::new(3);
        let fingerprint = Fingerprint::of(&mut state, 4);
        assert_eq!(fingerprint.len(), 1);
        assert_eq!(fingerprint.iter().next(), Some((bv("000"), Complex::new(1., 0.))));
    }
}

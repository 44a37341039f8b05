//! Sparse amplitude store.
//!
//! Only basis vectors with a non-negligible amplitude are kept. Repeated gate
//! application leaves numerically negligible but nonzero terms behind, so the
//! map is swept on a fixed cycle of linear transforms and before every full
//! enumeration.

use std::collections::HashMap;
use std::ops::MulAssign;

use ahash::RandomState;

use crate::config::constants::{ZERO_CYCLE_SIZE, ZERO_THRESHOLD};
use crate::config::{Complex, Real, is_nonzero};
use crate::simulator::BasisVector;

/// Amplitudes keyed by basis vector. The hasher has fixed keys so that two
/// maps built by the same operations iterate, and therefore sum, in the same
/// order.
pub type AmplitudeMap = HashMap<BasisVector, Complex, RandomState>;

fn amplitude_map(capacity: usize) -> AmplitudeMap {
    AmplitudeMap::with_capacity_and_hasher(
        capacity,
        RandomState::with_seeds(
            0x243f_6a88_85a3_08d3,
            0x1319_8a2e_0370_7344,
            0xa409_3822_299f_31d0,
            0x082e_fa98_ec4e_6c89,
        ),
    )
}

#[derive(Debug, Clone)]
pub struct SparseState {
    num_qubits: usize,
    zero_counter: u64,
    zero_cycle_size: u64,
    data: AmplitudeMap,
}

impl SparseState {
    /// An empty store for `num_qubits` qubits: every amplitude is zero.
    pub fn new(num_qubits: usize) -> Self {
        Self::with_cycle_length(num_qubits, ZERO_CYCLE_SIZE)
    }

    pub fn with_cycle_length(num_qubits: usize, zero_cycle_size: u64) -> Self {
        assert!(zero_cycle_size > 0, "cleanup cycle must be positive");
        Self {
            num_qubits,
            zero_counter: 0,
            zero_cycle_size,
            data: amplitude_map(0),
        }
    }

    /// Logical number of amplitudes, 2^num_qubits.
    pub fn size(&self) -> u128 {
        1u128 << self.num_qubits
    }

    /// Number of stored entries, negligible ones included until the next sweep.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn set(&mut self, key: BasisVector, value: Complex) {
        assert!(
            u128::from(key.into_u64()) < self.size(),
            "basis vector {:b} out of range for {} qubits",
            key.into_u64(),
            self.num_qubits
        );

        if value.norm() < ZERO_THRESHOLD {
            self.data.remove(&key);
        } else {
            self.data.insert(key, value);
        }
    }

    pub fn get(&self, key: &BasisVector) -> Complex {
        self.data.get(key).copied().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn cleanup_zeros(&mut self) {
        let before = self.data.len();
        self.data.retain(|_, value| is_nonzero(*value));
        self.zero_counter = 0;
        log::trace!("evicted {} negligible amplitudes", before - self.data.len());
    }

    /// Replaces the state by the image of a linear map.
    ///
    /// `f` is called once per stored entry and must only add into the result
    /// map it is given; the result then replaces the current contents.
    pub fn apply_linear<F>(&mut self, mut f: F)
    where
        F: FnMut(&BasisVector, Complex, &mut AmplitudeMap),
    {
        if self.zero_counter >= self.zero_cycle_size {
            self.cleanup_zeros();
        }
        self.zero_counter += 1;

        let mut result = amplitude_map(self.data.len());
        for (basis_vector, value) in self.data.iter() {
            f(basis_vector, *value, &mut result);
        }

        std::mem::swap(&mut self.data, &mut result);
    }

    /// Moves every entry to the key `f` gives it. `f` must be injective on the
    /// stored keys. Unlike `apply_linear` this does not count towards the
    /// cleanup cycle.
    pub fn relabel<F>(&mut self, mut f: F)
    where
        F: FnMut(&BasisVector) -> BasisVector,
    {
        let len = self.data.len();
        let mut result = amplitude_map(len);
        result.extend(self.data.drain().map(|(key, value)| (f(&key), value)));
        debug_assert_eq!(result.len(), len, "relabelling merged two entries");
        self.data = result;
    }

    pub fn erase_if<P>(&mut self, mut pred: P)
    where
        P: FnMut(&BasisVector, &Complex) -> bool,
    {
        self.data.retain(|key, value| !pred(key, value));
    }

    pub fn for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(&BasisVector, &Complex),
    {
        self.cleanup_zeros();
        self.data.iter().for_each(|(key, value)| f(key, value));
    }

    /// Visits entries in ascending basis vector order.
    pub fn for_each_sorted<F>(&mut self, mut f: F)
    where
        F: FnMut(&BasisVector, &Complex),
    {
        self.sorted_entries()
            .iter()
            .for_each(|(key, value)| f(key, value));
    }

    pub fn sorted_entries(&mut self) -> Vec<(BasisVector, Complex)> {
        self.cleanup_zeros();
        let mut sorted: Vec<_> = self.data.iter().map(|(k, v)| (*k, *v)).collect();
        sorted.sort_unstable_by_key(|(key, _)| *key);
        sorted
    }

    /// Σ|amplitude|² over the stored entries.
    pub fn norm_sqr(&self) -> Real {
        self.data.values().map(|value| value.norm_sqr()).sum()
    }

    /// Dense copy of the state, index i holding the amplitude of basis vector i.
    pub fn to_dense(&self) -> Vec<Complex> {
        assert!(self.num_qubits <= 24, "dense copy of {} qubits", self.num_qubits);
        let mut result = vec![Complex::default(); 1 << self.num_qubits];
        for (key, value) in self.data.iter() {
            result[key.into_u64() as usize] = *value;
        }
        result
    }
}

impl MulAssign<Real> for SparseState {
    fn mul_assign(&mut self, d: Real) {
        self.data.values_mut().for_each(|value| *value *= d);
    }
}

use crate::config::constants::{MAX_QUBITS, ZERO_THRESHOLD};
use crate::config::{Complex, QubitIdx, Real};
use crate::gate::unitary::UnitaryMatrix;
use crate::simulator::sparse::{AmplitudeMap, SparseState};
use crate::simulator::BasisVector;

/// Adds the image of one basis vector under a K-qubit gate into `storage`.
///
/// The operand bits of `index` select the input column of `matrix`
/// (`operands[0]` is the most significant bit); every output row writes its
/// own bit pattern back into the operand positions, all other bits unchanged.
fn apply_impl<const N: usize, const K: usize>(
    matrix: &UnitaryMatrix<N>,
    operands: &[QubitIdx; K],
    index: &BasisVector,
    value: Complex,
    storage: &mut AmplitudeMap,
) {
    let reduced_index = operands
        .iter()
        .fold(0usize, |acc, qi| (acc << 1) | usize::from(index.test(*qi)));

    for output in 0..N {
        let coefficient = matrix.at(output, reduced_index);
        // adding an exact zero changes nothing
        if coefficient == Complex::default() {
            continue;
        }

        let mut new_index = *index;
        for (k, qi) in operands.iter().rev().enumerate() {
            new_index.set(*qi, (output >> k) & 1 == 1);
        }

        *storage.entry(new_index).or_default() += coefficient * value;
    }
}

/// The simulated register: sparse amplitudes plus the classical record of
/// measured (or prepared) qubit values.
#[derive(Debug, Clone)]
pub struct QuantumState {
    num_qubits: usize,
    data: SparseState,
    measurement_register: BasisVector,
}

impl QuantumState {
    /// Create a new (0,...,0) state
    pub fn new(num_qubits: usize) -> Self {
        assert!(num_qubits > 0, "a quantum state needs at least one qubit");
        assert!(
            num_qubits <= MAX_QUBITS,
            "at most {MAX_QUBITS} qubits are supported, got {num_qubits}"
        );

        let mut data = SparseState::new(num_qubits);
        data.set(BasisVector::zeros(), Complex::new(1., 0.));

        Self {
            num_qubits,
            data,
            measurement_register: BasisVector::zeros(),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Back to (0,...,0). The measurement register is left as it is.
    pub fn reset(&mut self) {
        self.data.clear();
        self.data.set(BasisVector::zeros(), Complex::new(1., 0.));
    }

    /// Replaces the amplitudes by `values`, which must be normalized.
    pub fn initialize<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (BasisVector, Complex)>,
    {
        self.data.clear();
        for (index, value) in values {
            self.data.set(index, value);
        }

        let norm = self.data.norm_sqr();
        assert!(
            (norm - 1.).abs() < ZERO_THRESHOLD,
            "initial amplitudes are not normalized: {norm}"
        );
    }

    /// Applies a K-qubit gate (N = 2^K) to the qubits at `operands`.
    pub fn apply<const N: usize, const K: usize>(
        &mut self,
        matrix: &UnitaryMatrix<N>,
        operands: &[QubitIdx; K],
    ) -> &mut Self {
        const { assert!(N == 1 << K, "matrix dimension must be 2^operands") };
        assert!(
            K <= self.num_qubits,
            "gate has more operands than the state has qubits"
        );
        assert!(
            operands.iter().all(|qi| *qi < self.num_qubits),
            "operand refers to a non-existing qubit: {:?}",
            operands
        );
        debug_assert!(
            operands
                .iter()
                .enumerate()
                .all(|(i, qi)| !operands[..i].contains(qi)),
            "duplicate operand in {:?}",
            operands
        );

        self.data.apply_linear(|index, value, storage| {
            apply_impl(matrix, operands, index, value, storage)
        });

        self
    }

    /// Visits the non-zero amplitudes in ascending basis vector order.
    pub fn for_each<F>(&mut self, f: F)
    where
        F: FnMut(&BasisVector, &Complex),
    {
        self.data.for_each_sorted(f);
    }

    pub fn amplitude(&self, index: &BasisVector) -> Complex {
        self.data.get(index)
    }

    pub fn norm_sqr(&self) -> Real {
        self.data.norm_sqr()
    }

    pub fn num_nonzeros(&mut self) -> usize {
        self.data.cleanup_zeros();
        self.data.len()
    }

    pub fn to_dense(&self) -> Vec<Complex> {
        self.data.to_dense()
    }

    pub fn measurement_register(&self) -> &BasisVector {
        &self.measurement_register
    }

    pub fn probability_of_measuring_one(&mut self, qubit: QubitIdx) -> Real {
        let mut probability = 0.;
        self.data.for_each(|index, value| {
            if index.test(qubit) {
                probability += value.norm_sqr();
            }
        });
        probability
    }

    pub fn probability_of_measuring_zero(&mut self, qubit: QubitIdx) -> Real {
        1. - self.probability_of_measuring_one(qubit)
    }

    /// Outcome of a single-qubit measurement for draw `rand`. Outcomes within
    /// the zero threshold of certainty are taken as certain, so the surviving
    /// branch never has a vanishing probability.
    fn measured_state(probability_of_measuring_one: Real, rand: Real) -> bool {
        if probability_of_measuring_one >= 1. - ZERO_THRESHOLD {
            true
        } else if probability_of_measuring_one <= ZERO_THRESHOLD {
            false
        } else {
            rand < probability_of_measuring_one
        }
    }

    fn collapse_qubit(
        &mut self,
        qubit: QubitIdx,
        measured_state: bool,
        probability_of_measuring_one: Real,
    ) {
        self.data.erase_if(|index, _| index.test(qubit) != measured_state);

        let probability = if measured_state {
            probability_of_measuring_one
        } else {
            1. - probability_of_measuring_one
        };
        self.data *= (1. / probability).sqrt();
    }

    pub fn measure<F>(&mut self, qubit: QubitIdx, mut random_generator: F)
    where
        F: FnMut() -> Real,
    {
        assert!(qubit < self.num_qubits, "measured qubit {qubit} does not exist");
        let rand = random_generator();
        let probability_of_measuring_one = self.probability_of_measuring_one(qubit);

        let measured_state = Self::measured_state(probability_of_measuring_one, rand);
        self.collapse_qubit(qubit, measured_state, probability_of_measuring_one);
        self.measurement_register.set(qubit, measured_state);

        log::debug!(
            "measured qubit {} = {} (p1 = {:.8})",
            qubit,
            u8::from(measured_state),
            probability_of_measuring_one
        );
    }

    /// Collapses the whole register onto one basis vector, scanning the
    /// cumulative probability in ascending basis vector order.
    pub fn measure_all<F>(&mut self, mut random_generator: F)
    where
        F: FnMut() -> Real,
    {
        let rand = random_generator();
        let entries = self.data.sorted_entries();

        let mut probability = 0.;
        let winner = entries.iter().find(|(_, value)| {
            probability += value.norm_sqr();
            probability > rand
        });

        let (measured, value) = match winner {
            Some(entry) => *entry,
            // rounding of a normalized state may leave the total just below `rand`
            None if probability >= 1. - ZERO_THRESHOLD && !entries.is_empty() => {
                entries[entries.len() - 1]
            }
            None => panic!(
                "state was not normalized at measurement: total probability {}, draw {}",
                probability, rand
            ),
        };

        self.data.clear();
        self.data.set(measured, value / value.norm());
        self.measurement_register = measured;

        log::debug!("measured all qubits = {:w$}", measured, w = self.num_qubits);
    }

    /// Measures `qubit` and forces it to |0>, clearing its register bit.
    pub fn prep<F>(&mut self, qubit: QubitIdx, mut random_generator: F)
    where
        F: FnMut() -> Real,
    {
        assert!(qubit < self.num_qubits, "prepared qubit {qubit} does not exist");
        let rand = random_generator();
        let probability_of_measuring_one = self.probability_of_measuring_one(qubit);

        let measured_state = Self::measured_state(probability_of_measuring_one, rand);
        self.collapse_qubit(qubit, measured_state, probability_of_measuring_one);

        if measured_state {
            // every survivor has the bit set, so clearing it is injective
            self.data.relabel(|index| index.with(qubit, false));
        }
        self.measurement_register.set(qubit, false);
    }
}

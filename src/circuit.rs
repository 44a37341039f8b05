pub mod builder;

use crate::config::{BitIdx, QubitIdx, Real};
use crate::gate::unitary::UnitaryMatrix;
use crate::simulator::QuantumState;

/// A K-qubit gate (N = 2^K) bound to its operands, optionally gated on bits
/// of the measurement register.
#[derive(Debug, Clone)]
pub struct Unitary<const N: usize, const K: usize> {
    pub matrix: UnitaryMatrix<N>,
    pub operands: [QubitIdx; K],
    pub control_bits: Option<Vec<BitIdx>>,
}

impl<const N: usize, const K: usize> Unitary<N, K> {
    pub fn new(
        matrix: UnitaryMatrix<N>,
        operands: [QubitIdx; K],
        control_bits: Option<Vec<BitIdx>>,
    ) -> Self {
        const { assert!(N == 1 << K, "matrix dimension must be 2^operands") };
        Self {
            matrix,
            operands,
            control_bits,
        }
    }

    /// False when a control bit is clear in `state`'s measurement register.
    fn is_enabled(&self, state: &QuantumState) -> bool {
        self.control_bits.as_ref().map_or(true, |bits| {
            bits.iter().all(|bit| state.measurement_register().test(*bit))
        })
    }

    fn execute(&self, state: &mut QuantumState) {
        if !self.is_enabled(state) {
            log::trace!("skipping {}-qubit gate on {:?}", K, self.operands);
            return;
        }
        state.apply(&self.matrix, &self.operands);
    }
}

#[derive(Debug, Clone)]
pub enum Instruction {
    Measure { qubit: QubitIdx },
    MeasureAll,
    PrepZ { qubit: QubitIdx },
    Unitary1(Unitary<2, 1>),
    Unitary2(Unitary<4, 2>),
    Unitary3(Unitary<8, 3>),
}

#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    iterations: usize,
    instructions: Vec<Instruction>,
}

impl Circuit {
    pub fn new(name: impl Into<String>, iterations: usize, instructions: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            iterations,
            instructions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Runs the instruction list `iterations` times against `state`, drawing
    /// from `random_generator` once per measurement or preparation.
    pub fn execute<F>(&self, state: &mut QuantumState, random_generator: &mut F)
    where
        F: FnMut() -> Real,
    {
        log::debug!(
            "executing circuit {} ({} instructions, {} iterations)",
            self.name,
            self.len(),
            self.iterations
        );

        for _ in 0..self.iterations {
            for instruction in self.instructions.iter() {
                match instruction {
                    Instruction::Measure { qubit } => state.measure(*qubit, &mut *random_generator),
                    Instruction::MeasureAll => state.measure_all(&mut *random_generator),
                    Instruction::PrepZ { qubit } => state.prep(*qubit, &mut *random_generator),
                    Instruction::Unitary1(unitary) => unitary.execute(state),
                    Instruction::Unitary2(unitary) => unitary.execute(state),
                    Instruction::Unitary3(unitary) => unitary.execute(state),
                }
            }
        }
    }
}

pub mod defn;
pub mod library;
pub mod unitary;

use crate::circuit::{Instruction, Unitary};
use crate::config::{BitIdx, QubitIdx};
use crate::error::UnitaryError;
use defn::GateDefn;
use unitary::UnitaryMatrix;

#[derive(Debug, Clone)]
pub struct Gate {
    pub defn: GateDefn,
    pub touches: Vec<QubitIdx>,
}

fn create_touches(defn: &GateDefn) -> Vec<QubitIdx> {
    match *defn {
        GateDefn::Hadamard(qi)
        | GateDefn::Identity(qi)
        | GateDefn::Measure(qi)
        | GateDefn::MeasureX(qi)
        | GateDefn::MeasureY(qi)
        | GateDefn::MX90(qi)
        | GateDefn::MY90(qi)
        | GateDefn::PauliY(qi)
        | GateDefn::PauliZ(qi)
        | GateDefn::PrepX(qi)
        | GateDefn::PrepY(qi)
        | GateDefn::PrepZ(qi)
        | GateDefn::S(qi)
        | GateDefn::Sdg(qi)
        | GateDefn::T(qi)
        | GateDefn::Tdg(qi)
        | GateDefn::X(qi)
        | GateDefn::X90(qi)
        | GateDefn::Y90(qi) => vec![qi],
        GateDefn::RX { target, .. } | GateDefn::RY { target, .. } | GateDefn::RZ { target, .. } => {
            vec![target]
        }
        GateDefn::CPhase {
            control, target, ..
        }
        | GateDefn::CZ { control, target }
        | GateDefn::CX { control, target } => vec![control, target],
        GateDefn::Swap { target1, target2 } => vec![target1, target2],
        GateDefn::CCX {
            control1,
            control2,
            target,
        } => vec![control1, control2, target],
        GateDefn::MeasureAll => vec![],
    }
}

fn single(
    matrix: UnitaryMatrix<2>,
    qi: QubitIdx,
    control_bits: Option<Vec<BitIdx>>,
) -> Instruction {
    Instruction::Unitary1(Unitary::new(matrix, [qi], control_bits))
}

/// Instruction for an operation that needs no further decomposition.
fn lower(
    defn: &GateDefn,
    control_bits: Option<Vec<BitIdx>>,
) -> Result<Instruction, UnitaryError> {
    let instruction = match *defn {
        GateDefn::Identity(qi) => single(library::identity(), qi, control_bits),
        GateDefn::X(qi) => single(library::x(), qi, control_bits),
        GateDefn::PauliY(qi) => single(library::y(), qi, control_bits),
        GateDefn::PauliZ(qi) => single(library::z(), qi, control_bits),
        GateDefn::Hadamard(qi) => single(library::h(), qi, control_bits),
        GateDefn::S(qi) => single(library::s(), qi, control_bits),
        GateDefn::Sdg(qi) => single(library::sdag(), qi, control_bits),
        GateDefn::T(qi) => single(library::t(), qi, control_bits),
        GateDefn::Tdg(qi) => single(library::tdag(), qi, control_bits),
        GateDefn::X90(qi) => single(library::x90(), qi, control_bits),
        GateDefn::MX90(qi) => single(library::mx90(), qi, control_bits),
        GateDefn::Y90(qi) => single(library::y90(), qi, control_bits),
        GateDefn::MY90(qi) => single(library::my90(), qi, control_bits),
        GateDefn::RX { rot, target } => single(library::rx(rot)?, target, control_bits),
        GateDefn::RY { rot, target } => single(library::ry(rot)?, target, control_bits),
        GateDefn::RZ { rot, target } => single(library::rz(rot)?, target, control_bits),
        GateDefn::CX { control, target } => Instruction::Unitary2(Unitary::new(
            library::cnot(),
            [control, target],
            control_bits,
        )),
        GateDefn::CZ { control, target } => Instruction::Unitary2(Unitary::new(
            library::cz(),
            [control, target],
            control_bits,
        )),
        GateDefn::CPhase {
            control,
            target,
            rot,
        } => Instruction::Unitary2(Unitary::new(
            library::cr(rot)?,
            [control, target],
            control_bits,
        )),
        GateDefn::Swap { target1, target2 } => Instruction::Unitary2(Unitary::new(
            library::swap(),
            [target1, target2],
            control_bits,
        )),
        GateDefn::CCX {
            control1,
            control2,
            target,
        } => Instruction::Unitary3(Unitary::new(
            library::toffoli(),
            [control1, control2, target],
            control_bits,
        )),
        GateDefn::Measure(qubit) => Instruction::Measure { qubit },
        GateDefn::MeasureAll => Instruction::MeasureAll,
        GateDefn::PrepZ(qubit) => Instruction::PrepZ { qubit },
        GateDefn::MeasureX(_) | GateDefn::MeasureY(_) | GateDefn::PrepX(_) | GateDefn::PrepY(_) => {
            unreachable!("{:?} must be decomposed before lowering", defn)
        }
    };
    Ok(instruction)
}

impl Gate {
    pub fn new(defn: GateDefn) -> Self {
        let touches = create_touches(&defn);
        Self { defn, touches }
    }

    pub fn is_unitary(&self) -> bool {
        self.defn.is_unitary()
    }

    /// Circuit instructions implementing this gate, each unitary gated on
    /// `control_bits` of the measurement register when given. Fails when a
    /// rotation angle does not give a unitary matrix.
    pub fn instructions(
        &self,
        control_bits: Option<Vec<BitIdx>>,
    ) -> Result<Vec<Instruction>, UnitaryError> {
        self.defn
            .decompose_gate()
            .iter()
            .map(|defn| lower(defn, control_bits.clone()))
            .collect()
    }
}

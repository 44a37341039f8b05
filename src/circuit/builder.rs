//! Turns parsed statements into executable circuits.

use crate::circuit::{Circuit, Instruction};
use crate::config::{BitIdx, QubitIdx, Real};
use crate::error::LoadError;
use crate::gate::defn::GateDefn;
use crate::gate::library;
use crate::gate::Gate;
use crate::parser::{self, Operand, Program, Statement};

/// A loaded program: the qubit count and its subcircuits in source order.
#[derive(Debug, Clone)]
pub struct QuantumProgram {
    pub num_qubits: usize,
    pub circuits: Vec<Circuit>,
}

pub fn load_program(source: &str) -> Result<QuantumProgram, LoadError> {
    let program = parser::parse_program(source)?;
    let circuits = build_circuits(&program)?;
    Ok(QuantumProgram {
        num_qubits: program.num_qubits,
        circuits,
    })
}

pub fn build_circuits(program: &Program) -> Result<Vec<Circuit>, LoadError> {
    program
        .subcircuits
        .iter()
        .map(|subcircuit| {
            let mut instructions = vec![];
            for statement in subcircuit.statements.iter() {
                instructions.extend(build_statement(program.num_qubits, statement)?);
            }
            Ok(Circuit::new(
                subcircuit.name.clone(),
                subcircuit.iterations,
                instructions,
            ))
        })
        .collect()
}

/// Operand shapes an operation name accepts.
enum Shape {
    Single(fn(QubitIdx) -> GateDefn),
    Rotation(fn(Real, QubitIdx) -> GateDefn),
    Pair(fn(QubitIdx, QubitIdx) -> GateDefn),
    PairWithAngle(fn(QubitIdx, QubitIdx, Real) -> GateDefn),
    PairWithK,
    Triple,
    Nullary(GateDefn),
}

fn shape_of(name: &str) -> Option<Shape> {
    let shape = match name {
        "i" => Shape::Single(GateDefn::Identity),
        "x" => Shape::Single(GateDefn::X),
        "y" => Shape::Single(GateDefn::PauliY),
        "z" => Shape::Single(GateDefn::PauliZ),
        "h" => Shape::Single(GateDefn::Hadamard),
        "s" => Shape::Single(GateDefn::S),
        "sdag" => Shape::Single(GateDefn::Sdg),
        "t" => Shape::Single(GateDefn::T),
        "tdag" => Shape::Single(GateDefn::Tdg),
        "x90" => Shape::Single(GateDefn::X90),
        "mx90" => Shape::Single(GateDefn::MX90),
        "y90" => Shape::Single(GateDefn::Y90),
        "my90" => Shape::Single(GateDefn::MY90),
        "rx" => Shape::Rotation(|rot, target| GateDefn::RX { rot, target }),
        "ry" => Shape::Rotation(|rot, target| GateDefn::RY { rot, target }),
        "rz" => Shape::Rotation(|rot, target| GateDefn::RZ { rot, target }),
        "cnot" => Shape::Pair(|control, target| GateDefn::CX { control, target }),
        "cz" => Shape::Pair(|control, target| GateDefn::CZ { control, target }),
        "swap" => Shape::Pair(|target1, target2| GateDefn::Swap { target1, target2 }),
        "cr" => Shape::PairWithAngle(|control, target, rot| GateDefn::CPhase {
            control,
            target,
            rot,
        }),
        "crk" => Shape::PairWithK,
        "toffoli" => Shape::Triple,
        "measure" | "measure_z" => Shape::Single(GateDefn::Measure),
        "measure_x" => Shape::Single(GateDefn::MeasureX),
        "measure_y" => Shape::Single(GateDefn::MeasureY),
        "measure_all" => Shape::Nullary(GateDefn::MeasureAll),
        "prep" | "prep_z" => Shape::Single(GateDefn::PrepZ),
        "prep_x" => Shape::Single(GateDefn::PrepX),
        "prep_y" => Shape::Single(GateDefn::PrepY),
        _ => return None,
    };
    Some(shape)
}

fn invalid(statement: &Statement, expected: &'static str) -> LoadError {
    LoadError::InvalidOperands {
        line: statement.line,
        name: statement.name.clone(),
        expected,
    }
}

/// Pairs up operand lists element-wise; all lists must have the same length.
fn broadcast<const K: usize>(
    statement: &Statement,
    lists: [&Vec<QubitIdx>; K],
) -> Result<Vec<[QubitIdx; K]>, LoadError> {
    let len = lists[0].len();
    if lists.iter().any(|list| list.len() != len) {
        return Err(LoadError::OperandLengthMismatch {
            line: statement.line,
            name: statement.name.clone(),
        });
    }
    Ok((0..len).map(|i| lists.map(|list| list[i])).collect())
}

fn gate_definitions(
    statement: &Statement,
    shape: Shape,
    operands: &[Operand],
) -> Result<Vec<GateDefn>, LoadError> {
    use Operand::{Number, Qubits};

    let defns = match (shape, operands) {
        (Shape::Nullary(defn), []) => vec![defn],
        (Shape::Nullary(_), _) => return Err(invalid(statement, "no operands")),
        (Shape::Single(f), [Qubits(qs)]) => qs.iter().map(|qi| f(*qi)).collect(),
        (Shape::Single(_), _) => return Err(invalid(statement, "one qubit operand")),
        (Shape::Rotation(f), [Qubits(qs), Number(rot)]) => {
            qs.iter().map(|qi| f(*rot, *qi)).collect()
        }
        (Shape::Rotation(_), _) => return Err(invalid(statement, "a qubit operand and an angle")),
        (Shape::Pair(f), [Qubits(a), Qubits(b)]) => broadcast(statement, [a, b])?
            .into_iter()
            .map(|[a, b]| f(a, b))
            .collect(),
        (Shape::Pair(_), _) => return Err(invalid(statement, "two qubit operands")),
        (Shape::PairWithAngle(f), [Qubits(a), Qubits(b), Number(rot)]) => {
            broadcast(statement, [a, b])?
                .into_iter()
                .map(|[a, b]| f(a, b, *rot))
                .collect()
        }
        (Shape::PairWithAngle(_), _) => {
            return Err(invalid(statement, "two qubit operands and an angle"));
        }
        (Shape::PairWithK, [Qubits(a), Qubits(b), Number(k)])
            if k.fract() == 0. && *k >= 1. && *k <= Real::from(u32::MAX) =>
        {
            let rot = library::crk_angle(*k as u32);
            broadcast(statement, [a, b])?
                .into_iter()
                .map(|[control, target]| GateDefn::CPhase {
                    control,
                    target,
                    rot,
                })
                .collect()
        }
        (Shape::PairWithK, _) => {
            return Err(invalid(statement, "two qubit operands and a positive integer"));
        }
        (Shape::Triple, [Qubits(a), Qubits(b), Qubits(c)]) => broadcast(statement, [a, b, c])?
            .into_iter()
            .map(|[control1, control2, target]| GateDefn::CCX {
                control1,
                control2,
                target,
            })
            .collect(),
        (Shape::Triple, _) => return Err(invalid(statement, "three qubit operands")),
    };
    Ok(defns)
}

fn check_range(line: usize, num_qubits: usize, indices: &[usize]) -> Result<(), LoadError> {
    match indices.iter().find(|qi| **qi >= num_qubits) {
        Some(qubit) => Err(LoadError::QubitOutOfRange {
            line,
            qubit: *qubit,
            num_qubits,
        }),
        None => Ok(()),
    }
}

fn check_gate(statement: &Statement, num_qubits: usize, gate: &Gate) -> Result<(), LoadError> {
    check_range(statement.line, num_qubits, &gate.touches)?;
    for (i, qi) in gate.touches.iter().enumerate() {
        if gate.touches[..i].contains(qi) {
            return Err(LoadError::DuplicateOperand {
                line: statement.line,
                name: statement.name.clone(),
                qubit: *qi,
            });
        }
    }
    Ok(())
}

fn build_statement(
    num_qubits: usize,
    statement: &Statement,
) -> Result<Vec<Instruction>, LoadError> {
    let (name, controlled) = match statement.name.strip_prefix("c-") {
        Some(name) => (name, true),
        None => (statement.name.as_str(), false),
    };

    let shape = shape_of(name).ok_or_else(|| LoadError::UnsupportedOperation {
        line: statement.line,
        name: statement.name.clone(),
    })?;

    let operands = statement.operands.as_slice();
    let (control_bits, operands): (Option<Vec<BitIdx>>, &[Operand]) = match (controlled, operands) {
        (true, [Operand::Bits(bits), rest @ ..]) => {
            check_range(statement.line, num_qubits, bits)?;
            (Some(bits.clone()), rest)
        }
        (true, _) => return Err(invalid(statement, "a bit register operand first")),
        (false, operands) => (None, operands),
    };

    let mut instructions = vec![];
    for defn in gate_definitions(statement, shape, operands)? {
        let gate = Gate::new(defn);
        if control_bits.is_some() && !gate.is_unitary() {
            return Err(LoadError::ControlOnNonUnitary {
                line: statement.line,
                name: statement.name.clone(),
            });
        }
        check_gate(statement, num_qubits, &gate)?;
        let lowered = gate
            .instructions(control_bits.clone())
            .map_err(|source| LoadError::InvalidGate {
                line: statement.line,
                name: statement.name.clone(),
                source,
            })?;
        instructions.extend(lowered);
    }

    log::trace!(
        "line {}: {} lowered to {} instructions",
        statement.line,
        statement.name,
        instructions.len()
    );
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnitaryError;

    fn load(source: &str) -> Result<QuantumProgram, LoadError> {
        load_program(source)
    }

    #[test]
    fn test_load_bell() {
        let program = load("qubits 2\nh q[0]\ncnot q[0], q[1]\nmeasure_all\n").unwrap();
        assert_eq!(program.num_qubits, 2);
        assert_eq!(program.circuits.len(), 1);

        let circuit = &program.circuits[0];
        assert_eq!(circuit.name(), "default");
        match circuit.instructions() {
            [
                Instruction::Unitary1(h),
                Instruction::Unitary2(cnot),
                Instruction::MeasureAll,
            ] => {
                assert_eq!(h.matrix, library::h());
                assert_eq!(h.operands, [0]);
                assert_eq!(cnot.operands, [0, 1]);
            }
            other => panic!("unexpected instructions {:?}", other),
        }
    }

    #[test]
    fn test_broadcast() {
        let program = load("qubits 4\nx q[0:3]\ncnot q[0,1], q[2,3]\n").unwrap();
        let instructions = program.circuits[0].instructions();
        assert_eq!(instructions.len(), 6);
        match &instructions[5] {
            Instruction::Unitary2(u) => assert_eq!(u.operands, [1, 3]),
            other => panic!("unexpected instruction {:?}", other),
        }
    }

    #[test]
    fn test_composite_operations_are_decomposed() {
        let program = load("qubits 1\nmeasure_y q[0]\nprep_x q[0]\n").unwrap();
        let instructions = program.circuits[0].instructions();
        assert_eq!(instructions.len(), 5);
        assert!(matches!(instructions[2], Instruction::Measure { qubit: 0 }));
        assert!(matches!(instructions[3], Instruction::PrepZ { qubit: 0 }));
    }

    #[test]
    fn test_crk() {
        let program = load("qubits 2\ncrk q[0], q[1], 2\n").unwrap();
        match program.circuits[0].instructions() {
            [Instruction::Unitary2(u)] => assert_eq!(u.matrix, library::crk(2).unwrap()),
            other => panic!("unexpected instructions {:?}", other),
        }
        assert!(matches!(
            load("qubits 2\ncrk q[0], q[1], 1.5\n"),
            Err(LoadError::InvalidOperands { line: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_angle_is_rejected() {
        assert_eq!(
            load("qubits 2\nh q[0]\nrx q[1], nan\n").unwrap_err(),
            LoadError::InvalidGate {
                line: 3,
                name: "rx".into(),
                source: UnitaryError::NotUnitary
            }
        );
        assert!(matches!(
            load("qubits 2\ncr q[0], q[1], inf\n"),
            Err(LoadError::InvalidGate { line: 2, .. })
        ));
    }

    #[test]
    fn test_classical_control() {
        let program = load("qubits 2\nmeasure q[0]\nc-x b[0], q[1]\n").unwrap();
        match &program.circuits[0].instructions()[1] {
            Instruction::Unitary1(u) => {
                assert_eq!(u.control_bits, Some(vec![0]));
                assert_eq!(u.operands, [1]);
            }
            other => panic!("unexpected instruction {:?}", other),
        }

        assert_eq!(
            load("qubits 2\nc-measure b[0], q[1]\n").unwrap_err(),
            LoadError::ControlOnNonUnitary {
                line: 2,
                name: "c-measure".into()
            }
        );
        assert!(matches!(
            load("qubits 2\nc-x q[0], q[1]\n"),
            Err(LoadError::InvalidOperands { .. })
        ));
    }

    #[test]
    fn test_subcircuits() {
        let program = load("qubits 1\n.first\nx q[0]\n.second(3)\nh q[0]\n").unwrap();
        let summary: Vec<_> = program
            .circuits
            .iter()
            .map(|c| (c.name(), c.iterations(), c.len()))
            .collect();
        assert_eq!(summary, vec![("first", 1, 1), ("second", 3, 1)]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            load("qubits 2\nfoo q[0]\n").unwrap_err(),
            LoadError::UnsupportedOperation {
                line: 2,
                name: "foo".into()
            }
        );
        assert_eq!(
            load("qubits 2\nx q[2]\n").unwrap_err(),
            LoadError::QubitOutOfRange {
                line: 2,
                qubit: 2,
                num_qubits: 2
            }
        );
        assert_eq!(
            load("qubits 2\ncnot q[1], q[1]\n").unwrap_err(),
            LoadError::DuplicateOperand {
                line: 2,
                name: "cnot".into(),
                qubit: 1
            }
        );
        assert_eq!(
            load("qubits 3\ncnot q[0,1], q[2]\n").unwrap_err(),
            LoadError::OperandLengthMismatch {
                line: 2,
                name: "cnot".into()
            }
        );
        assert!(matches!(
            load("qubits 2\nrx q[0]\n"),
            Err(LoadError::InvalidOperands { line: 2, .. })
        ));
        assert!(matches!(
            load("qubits 2\nmeasure_all q[0]\n"),
            Err(LoadError::InvalidOperands { line: 2, .. })
        ));
    }
}

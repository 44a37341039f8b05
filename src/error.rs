//! Error types for the simulator.
//!
//! Contract violations (out-of-range bit indices, keys past the logical size of
//! a state) are assertions, not variants here.

use thiserror::Error;

use crate::config::QubitIdx;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnitaryError {
    #[error("matrix is not unitary")]
    NotUnitary,

    #[error("gate library identity violated: {0}")]
    IdentityViolated(&'static str),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoadError {
    #[error("line {line}: syntax error: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: unsupported gate or instruction: {name}")]
    UnsupportedOperation { line: usize, name: String },

    #[error("line {line}: unsupported statement: {statement}")]
    UnsupportedStatement { line: usize, statement: String },

    #[error("line {line}: {name} expects {expected}")]
    InvalidOperands {
        line: usize,
        name: String,
        expected: &'static str,
    },

    #[error("line {line}: qubit {qubit} out of range for {num_qubits} qubits")]
    QubitOutOfRange {
        line: usize,
        qubit: QubitIdx,
        num_qubits: usize,
    },

    #[error("line {line}: qubit {qubit} used twice in {name}")]
    DuplicateOperand {
        line: usize,
        name: String,
        qubit: QubitIdx,
    },

    #[error("line {line}: operand lists of {name} have different lengths")]
    OperandLengthMismatch { line: usize, name: String },

    #[error("line {line}: classical control is only allowed on unitary gates, found {name}")]
    ControlOnNonUnitary { line: usize, name: String },

    #[error("line {line}: invalid gate {name}: {source}")]
    InvalidGate {
        line: usize,
        name: String,
        #[source]
        source: UnitaryError,
    },

    #[error("missing qubit count")]
    MissingQubitCount,

    #[error("line {line}: invalid qubit count {count}, must be between 1 and {max}")]
    InvalidQubitCount { line: usize, count: usize, max: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("number of shots must be positive")]
    NoShots,

    #[error("program has no circuit to execute")]
    NoCircuits,
}

/// Everything the command line front end can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read or write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Unitary(#[from] UnitaryError),

    #[error("cannot serialize results: {0}")]
    Json(#[from] serde_json::Error),
}

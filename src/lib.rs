//! Sparse state-vector simulation of quantum circuits.
//!
//! A [`simulator::QuantumState`] stores only the basis vectors with a
//! non-negligible amplitude. Circuits are loaded from cQASM source with
//! [`circuit::builder::load_program`] and executed shot by shot with
//! [`simulator::runner::run`].

pub mod circuit;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod gate;
pub mod parser;
pub mod result;
pub mod simulator;

pub use circuit::Circuit;
pub use error::{Error, LoadError, SimulationError, UnitaryError};
pub use result::SimulationResult;
pub use simulator::{BasisVector, QuantumState};

pub mod basis;
pub mod runner;
pub mod sparse;
pub mod state;

pub use basis::BasisVector;
pub use sparse::SparseState;
pub use state::QuantumState;

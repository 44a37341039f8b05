use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::circuit::Circuit;
use crate::config::Real;
use crate::error::SimulationError;
use crate::result::{SimulationResult, SimulationResultAccumulator};
use crate::simulator::QuantumState;

macro_rules! profile {
    ($($exp:expr)+) => {
        {
            let _instant = std::time::Instant::now();
            let _result = {
                $($exp)+
            };
            let _duration = _instant.elapsed();

            (_duration, _result)
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub result: SimulationResult,
    /// State after the last shot.
    pub final_state: QuantumState,
}

/// Executes every circuit in order on a fresh |0...0> state.
///
/// The generator of shot `i` is seeded with `base_seed + i`.
pub fn run_shot(
    num_qubits: usize,
    circuits: &[Circuit],
    base_seed: u64,
    shot: u64,
) -> QuantumState {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(shot));
    let mut random_generator = || rng.r#gen::<Real>();

    let mut state = QuantumState::new(num_qubits);
    for circuit in circuits.iter() {
        circuit.execute(&mut state, &mut random_generator);
    }
    state
}

/// Runs `shots` independent shots, the last one on the calling thread so its
/// final state can be reported, the others on the rayon pool.
pub fn run(
    num_qubits: usize,
    circuits: &[Circuit],
    shots: u64,
    seed: Option<u64>,
) -> Result<RunOutcome, SimulationError> {
    if shots == 0 {
        return Err(SimulationError::NoShots);
    }
    if circuits.is_empty() {
        return Err(SimulationError::NoCircuits);
    }

    let base_seed = seed.unwrap_or_else(rand::random);
    log::info!(
        "running {} shots of {} circuits on {} qubits (seed {})",
        shots,
        circuits.len(),
        num_qubits,
        base_seed
    );

    let (duration, (accumulator, mut final_state)) = profile!({
        let final_state = run_shot(num_qubits, circuits, base_seed, shots - 1);

        let mut accumulator = (0..shots - 1)
            .into_par_iter()
            .fold(
                || SimulationResultAccumulator::new(num_qubits, shots),
                |mut accumulator, shot| {
                    let state = run_shot(num_qubits, circuits, base_seed, shot);
                    accumulator.append(*state.measurement_register());
                    accumulator
                },
            )
            .reduce(
                || SimulationResultAccumulator::new(num_qubits, shots),
                |mut left, right| {
                    left.merge(right);
                    left
                },
            );
        accumulator.append(*final_state.measurement_register());

        (accumulator, final_state)
    });

    let throughput = shots as Real / duration.as_secs_f64().max(Real::EPSILON);
    log::info!(
        "{} shots done in {:.4}s ({:.1} shots/s), {} non-zero amplitudes in the final state",
        accumulator.shots_done(),
        duration.as_secs_f64(),
        throughput,
        final_state.num_nonzeros()
    );

    let result = accumulator.get_simulation_result(&mut final_state);
    Ok(RunOutcome {
        result,
        final_state,
    })
}

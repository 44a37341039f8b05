use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value, json};

use crate::config::constants::{OUTPUT_DECIMALS, ZERO_THRESHOLD};
use crate::config::{Complex, Real};
use crate::simulator::{BasisVector, QuantumState};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub shots_requested: u64,
    pub shots_done: u64,
    /// Bitstring and probability (single shot) or frequency, ascending.
    pub results: Vec<(String, Real)>,
    /// Non-zero amplitudes of the final state, ascending.
    pub state: Vec<(String, Complex)>,
}

pub fn format_complex(c: &Complex) -> String {
    if c.im > -ZERO_THRESHOLD {
        format!("{:.p$}+{:.p$}i", c.re, c.im.abs(), p = OUTPUT_DECIMALS)
    } else {
        format!("{:.p$}-{:.p$}i", c.re, c.im.abs(), p = OUTPUT_DECIMALS)
    }
}

impl SimulationResult {
    pub fn to_json_value(&self) -> Value {
        let results: Map<String, Value> = self
            .results
            .iter()
            .map(|(bitstring, value)| (bitstring.clone(), json!(value)))
            .collect();
        let state: Map<String, Value> = self
            .state
            .iter()
            .map(|(bitstring, c)| (bitstring.clone(), json!({ "real": c.re, "imag": c.im })))
            .collect();

        json!({
            "info": {
                "shots_requested": self.shots_requested,
                "shots_done": self.shots_done,
            },
            "results": results,
            "state": state,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_json_value())
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-------------------------------------------")?;
        writeln!(f, "Final quantum state")?;
        for (bitstring, c) in self.state.iter() {
            writeln!(
                f,
                "{}       {}   (p = {:.p$})",
                bitstring,
                format_complex(c),
                c.norm_sqr(),
                p = OUTPUT_DECIMALS
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Measurement register averaging")?;
        for (bitstring, value) in self.results.iter() {
            writeln!(f, "{}       {:.p$}", bitstring, value, p = OUTPUT_DECIMALS)?;
        }
        Ok(())
    }
}

/// Counts measurement registers over shots.
///
/// Accumulators from disjoint sets of shots can be merged. The final state is
/// only borrowed when the result is produced.
#[derive(Debug, Clone)]
pub struct SimulationResultAccumulator {
    num_qubits: usize,
    shots_requested: u64,
    measured_states: BTreeMap<BasisVector, u64>,
    n_measurements: u64,
}

impl SimulationResultAccumulator {
    pub fn new(num_qubits: usize, shots_requested: u64) -> Self {
        Self {
            num_qubits,
            shots_requested,
            measured_states: BTreeMap::new(),
            n_measurements: 0,
        }
    }

    pub fn append(&mut self, measured_state: BasisVector) {
        *self.measured_states.entry(measured_state).or_default() += 1;
        self.n_measurements += 1;
    }

    pub fn merge(&mut self, other: SimulationResultAccumulator) {
        debug_assert_eq!(self.num_qubits, other.num_qubits);
        for (measured_state, count) in other.measured_states {
            *self.measured_states.entry(measured_state).or_default() += count;
        }
        self.n_measurements += other.n_measurements;
    }

    pub fn shots_done(&self) -> u64 {
        self.n_measurements
    }

    /// With a single shot the results are the probabilities of the final
    /// state; with more they are the register frequencies.
    pub fn get_simulation_result(&self, state: &mut QuantumState) -> SimulationResult {
        assert!(self.n_measurements > 0, "no shot was recorded");
        let num_qubits = self.num_qubits;

        let mut amplitudes = vec![];
        state.for_each(|basis_vector, c| {
            amplitudes.push((basis_vector.to_substring(num_qubits), *c));
        });

        let results = if self.n_measurements == 1 {
            amplitudes
                .iter()
                .map(|(bitstring, c)| (bitstring.clone(), c.norm_sqr()))
                .collect()
        } else {
            self.measured_states
                .iter()
                .map(|(measured_state, count)| {
                    (
                        measured_state.to_substring(num_qubits),
                        *count as Real / self.n_measurements as Real,
                    )
                })
                .collect()
        };

        SimulationResult {
            shots_requested: self.shots_requested,
            shots_done: self.n_measurements,
            results,
            state: amplitudes,
        }
    }
}

use qx_sim::circuit::builder::load_program;
use qx_sim::config::Complex;
use qx_sim::simulator::runner;
use qx_sim::{BasisVector, LoadError, QuantumState};

fn bv(s: &str) -> BasisVector {
    s.parse().unwrap()
}

const BELL: &str = "version 1.0
qubits 2

.bell
h q[0]
cnot q[0], q[1]
measure_all
";

#[test]
fn bell_pair_frequencies_converge() {
    let program = load_program(BELL).unwrap();
    let outcome = runner::run(program.num_qubits, &program.circuits, 1000, Some(2024)).unwrap();

    let result = &outcome.result;
    assert_eq!(result.shots_done, 1000);
    assert_eq!(result.results.len(), 2);
    for (bitstring, frequency) in result.results.iter() {
        assert!(bitstring == "00" || bitstring == "11");
        assert!(
            (frequency - 0.5).abs() < 0.1,
            "{} measured with frequency {}",
            bitstring,
            frequency
        );
    }

    let total: f64 = result.results.iter().map(|(_, f)| f).sum();
    assert!((total - 1.).abs() < 1e-12);
}

#[test]
fn final_state_is_collapsed_by_measure_all() {
    let program = load_program(BELL).unwrap();
    let mut outcome = runner::run(2, &program.circuits, 10, Some(5)).unwrap();

    let register = *outcome.final_state.measurement_register();
    assert!((outcome.final_state.amplitude(&register).norm() - 1.).abs() < 1e-12);
    assert_eq!(outcome.final_state.num_nonzeros(), 1);
    assert_eq!(outcome.result.state.len(), 1);
}

#[test]
fn single_shot_reports_state_probabilities() {
    let program = load_program("qubits 3\nh q[1]\n").unwrap();
    let outcome = runner::run(3, &program.circuits, 1, Some(0)).unwrap();

    let results = &outcome.result.results;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, "000");
    assert_eq!(results[1].0, "010");
    assert!((results[0].1 - 0.5).abs() < 1e-12);
}

#[test]
fn subcircuit_iterations_and_classical_control() {
    // qubit 0 is flipped three times, measured as 1, which enables the x on qubit 2
    let source = "qubits 3
.flip(3)
x q[0]
.check
measure q[0]
c-x b[0], q[2]
c-x b[1], q[1]
";
    let program = load_program(source).unwrap();
    let outcome = runner::run(3, &program.circuits, 4, Some(9)).unwrap();

    // only qubit 0 was measured, the register does not see qubit 2
    assert_eq!(outcome.result.results, vec![("001".to_string(), 1.)]);
    assert_eq!(outcome.final_state.amplitude(&bv("101")), Complex::new(1., 0.));
}

#[test]
fn prep_and_basis_measurements() {
    let source = "qubits 2
x q[0:1]
prep_z q[0]
prep_x q[1]
measure_x q[1]
";
    let program = load_program(source).unwrap();
    let outcome = runner::run(2, &program.circuits, 50, Some(3)).unwrap();

    // |+> measured in the x basis always gives 0, prep clears qubit 0
    assert_eq!(outcome.result.results, vec![("00".to_string(), 1.)]);
}

#[test]
fn seeded_runs_repeat() {
    let program = load_program("qubits 3\nh q[0:2]\nmeasure_all\n").unwrap();
    let a = runner::run(3, &program.circuits, 300, Some(77)).unwrap();
    let b = runner::run(3, &program.circuits, 300, Some(77)).unwrap();
    assert_eq!(a.result, b.result);
    assert_eq!(a.final_state.measurement_register(), b.final_state.measurement_register());
}

#[test]
fn json_output() {
    let program = load_program(BELL).unwrap();
    let outcome = runner::run(2, &program.circuits, 20, Some(1)).unwrap();

    let json = outcome.result.to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["info"]["shots_requested"], 20);
    assert_eq!(parsed["info"]["shots_done"], 20);
    assert!(parsed["results"].as_object().unwrap().keys().all(|k| k == "00" || k == "11"));
    assert_eq!(parsed["state"].as_object().unwrap().len(), 1);
}

#[test]
fn loader_errors_carry_line_numbers() {
    let err = load_program("qubits 2\nh q[0]\ncnot q[0], q[5]\n").unwrap_err();
    assert_eq!(
        err,
        LoadError::QubitOutOfRange {
            line: 3,
            qubit: 5,
            num_qubits: 2
        }
    );
    assert_eq!(err.to_string(), "line 3: qubit 5 out of range for 2 qubits");
}

#[test]
fn large_register_stays_sparse() {
    let mut state = QuantumState::new(64);
    let program = load_program("qubits 64\nh q[63]\ncnot q[63], q[0]\nx q[31]\n").unwrap();
    program.circuits[0].execute(&mut state, &mut || 0.5);

    assert_eq!(state.num_nonzeros(), 2);
    let top = BasisVector::zeros().with(63, true).with(31, true).with(0, true);
    assert!((state.amplitude(&top).norm_sqr() - 0.5).abs() < 1e-12);
}

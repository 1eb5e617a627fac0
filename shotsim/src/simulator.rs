use num_complex::Complex;
use rand::Rng;
use std::f64::consts::FRAC_1_SQRT_2;

use crate::circuit::Circuit;
use crate::gate::Gate;
use crate::state::StateVector;

/// Errors surfaced by circuit construction and simulation.
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    #[error("qubit index {qubit} out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },
    #[error("circuit register width {circuit} does not match simulator width {simulator}")]
    RegisterMismatch { circuit: usize, simulator: usize },
    #[error("gate {0} is not a Pauli operator")]
    NotAPauli(String),
}

pub type GateMatrix = [[Complex<f64>; 2]; 2];

pub const HADAMARD: GateMatrix = [
    [
        Complex::new(FRAC_1_SQRT_2, 0.0),
        Complex::new(FRAC_1_SQRT_2, 0.0),
    ],
    [
        Complex::new(FRAC_1_SQRT_2, 0.0),
        Complex::new(-FRAC_1_SQRT_2, 0.0),
    ],
];

pub const PAULI_X: GateMatrix = [
    [Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)],
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
];

pub const PAULI_Y: GateMatrix = [
    [Complex::new(0.0, 0.0), Complex::new(0.0, -1.0)],
    [Complex::new(0.0, 1.0), Complex::new(0.0, 0.0)],
];

pub const PAULI_Z: GateMatrix = [
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    [Complex::new(0.0, 0.0), Complex::new(-1.0, 0.0)],
];

pub const S_DAGGER: GateMatrix = [
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    [Complex::new(0.0, 0.0), Complex::new(0.0, -1.0)],
];

fn rotation_matrix(gate: &Gate) -> Option<GateMatrix> {
    let (cos, sin) = match gate {
        Gate::RX(_, theta) | Gate::RY(_, theta) | Gate::RZ(_, theta) => {
            ((theta / 2.0).cos(), (theta / 2.0).sin())
        }
        _ => return None,
    };
    match gate {
        Gate::RX(..) => Some([
            [Complex::new(cos, 0.0), Complex::new(0.0, -sin)],
            [Complex::new(0.0, -sin), Complex::new(cos, 0.0)],
        ]),
        Gate::RY(..) => Some([
            [Complex::new(cos, 0.0), Complex::new(-sin, 0.0)],
            [Complex::new(sin, 0.0), Complex::new(cos, 0.0)],
        ]),
        Gate::RZ(..) => Some([
            [Complex::new(cos, -sin), Complex::new(0.0, 0.0)],
            [Complex::new(0.0, 0.0), Complex::new(cos, sin)],
        ]),
        _ => None,
    }
}

/// Exact statevector simulator.
///
/// Executes a [`Circuit`] and exposes the resulting distribution either as
/// exact probabilities, as shot-sampled counts, or as a non-destructive
/// Pauli-string expectation value.
pub struct StatevectorSimulator {
    state: StateVector,
}

impl StatevectorSimulator {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            state: StateVector::new(num_qubits),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn apply_gate(&mut self, gate: &Gate) {
        match *gate {
            Gate::X(q) => self.state.apply_single_qubit_gate(&PAULI_X, q),
            Gate::Y(q) => self.state.apply_single_qubit_gate(&PAULI_Y, q),
            Gate::Z(q) => self.state.apply_single_qubit_gate(&PAULI_Z, q),
            Gate::H(q) => self.state.apply_single_qubit_gate(&HADAMARD, q),
            Gate::Sdg(q) => self.state.apply_single_qubit_gate(&S_DAGGER, q),
            Gate::CX(c, t) => self.state.apply_cx(c, t),
            Gate::RX(q, _) | Gate::RY(q, _) | Gate::RZ(q, _) => {
                let matrix = rotation_matrix(gate)
                    .expect("rotation gates always have a matrix");
                self.state.apply_single_qubit_gate(&matrix, q);
            }
        }
    }

    /// Resets the register and executes the whole circuit.
    pub fn run(&mut self, circuit: &Circuit) -> Result<(), SimError> {
        if circuit.num_qubits() != self.num_qubits() {
            return Err(SimError::RegisterMismatch {
                circuit: circuit.num_qubits(),
                simulator: self.num_qubits(),
            });
        }
        self.reset();
        for gate in circuit.gates() {
            self.apply_gate(gate);
        }
        Ok(())
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }

    /// Draws shot-sampled basis-state counts from the current state.
    pub fn sample(&self, shots: u32, rng: &mut impl Rng) -> Vec<u32> {
        self.state.sample_counts(shots, rng)
    }

    /// Non-destructive ⟨ψ|P|ψ⟩ for a Pauli string given as X/Y/Z gates.
    ///
    /// The operators are applied to a copy of the state and the inner
    /// product with the original is taken; the register is left untouched.
    pub fn pauli_expectation(&self, operators: &[Gate]) -> Result<f64, SimError> {
        let mut rotated = self.state.clone();
        for op in operators {
            match *op {
                Gate::X(q) => rotated.apply_single_qubit_gate(&PAULI_X, q),
                Gate::Y(q) => rotated.apply_single_qubit_gate(&PAULI_Y, q),
                Gate::Z(q) => rotated.apply_single_qubit_gate(&PAULI_Z, q),
                other => return Err(SimError::NotAPauli(format!("{other:?}"))),
            }
        }
        let mut expectation = Complex::new(0.0, 0.0);
        for (a, b) in self.state.amplitudes().iter().zip(rotated.amplitudes()) {
            expectation += a.conj() * b;
        }
        Ok(expectation.re)
    }
}

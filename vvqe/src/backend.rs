//! Execution backends: turn a circuit plus a Hamiltonian into an energy
//! estimate with a sampling error bar.

use molham::PauliOperator;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use shotsim::{Circuit, StatevectorSimulator};

use crate::Error;

/// One energy estimate.
///
/// `std_error` follows the backend convention of being reported already
/// divided by √shots; callers that want the absolute spread must multiply it
/// back (see [`crate::cost::CostModel`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub mean: f64,
    pub std_error: f64,
}

/// Narrow interface between the orchestration logic and whatever executes
/// circuits, so sweeps and the cost model can be tested against mocks.
pub trait EnergyBackend {
    fn evaluate(
        &mut self,
        circuit: &Circuit,
        hamiltonian: &PauliOperator,
        shots: u32,
    ) -> Result<Measurement, Error>;
}

impl EnergyBackend for Box<dyn EnergyBackend> {
    fn evaluate(
        &mut self,
        circuit: &Circuit,
        hamiltonian: &PauliOperator,
        shots: u32,
    ) -> Result<Measurement, Error> {
        (**self).evaluate(circuit, hamiltonian, shots)
    }
}

/// Shot-sampling backend.
///
/// Each non-identity Pauli term is measured in its own rotated basis with a
/// full batch of shots; the per-term ±1 statistics are combined into
/// `mean = Σ cᵢ·μᵢ` and `std_error = sqrt(Σ cᵢ²·(1−μᵢ²) / shots)`.
pub struct ShotBackend {
    rng: StdRng,
}

impl ShotBackend {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sampling for reproducible experiments.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ShotBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EnergyBackend for ShotBackend {
    fn evaluate(
        &mut self,
        circuit: &Circuit,
        hamiltonian: &PauliOperator,
        shots: u32,
    ) -> Result<Measurement, Error> {
        let mut simulator = StatevectorSimulator::new(circuit.num_qubits());
        let mut mean = 0.0;
        let mut variance = 0.0;

        for term in hamiltonian.terms() {
            if term.is_identity() {
                mean += term.coefficient;
                continue;
            }

            let mut measured = circuit.clone();
            for gate in term.basis_rotations() {
                measured.push(gate)?;
            }
            simulator.run(&measured)?;

            let counts = simulator.sample(shots, &mut self.rng);
            let mut term_mean = 0.0;
            for (state, &count) in counts.iter().enumerate() {
                term_mean += term.outcome_sign(state) * count as f64;
            }
            term_mean /= shots as f64;

            mean += term.coefficient * term_mean;
            // Outcomes are ±1, so E[x²] = 1 and Var = 1 − μ².
            variance += term.coefficient.powi(2) * (1.0 - term_mean.powi(2));
        }

        Ok(Measurement {
            mean,
            std_error: (variance / shots as f64).sqrt(),
        })
    }
}

/// Exact statevector backend: no sampling noise, zero standard error.
pub struct ExactBackend;

impl EnergyBackend for ExactBackend {
    fn evaluate(
        &mut self,
        circuit: &Circuit,
        hamiltonian: &PauliOperator,
        _shots: u32,
    ) -> Result<Measurement, Error> {
        let mut simulator = StatevectorSimulator::new(circuit.num_qubits());
        simulator.run(circuit)?;

        let mut mean = 0.0;
        for term in hamiltonian.terms() {
            if term.is_identity() {
                mean += term.coefficient;
            } else {
                mean += term.coefficient * simulator.pauli_expectation(&term.pauli_gates())?;
            }
        }
        Ok(Measurement {
            mean,
            std_error: 0.0,
        })
    }
}

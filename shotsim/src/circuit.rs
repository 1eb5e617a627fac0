use serde::{Deserialize, Serialize};

use crate::gate::Gate;
use crate::simulator::SimError;

/// An ordered gate sequence over a fixed-width qubit register.
///
/// Construction only; nothing is executed until the circuit is handed to a
/// simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: usize,
    gates: Vec<Gate>,
}

impl Circuit {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Appends a gate after checking its qubit indices against the register.
    pub fn push(&mut self, gate: Gate) -> Result<(), SimError> {
        let q = gate.max_qubit();
        if q >= self.num_qubits {
            return Err(SimError::QubitOutOfRange {
                qubit: q,
                num_qubits: self.num_qubits,
            });
        }
        self.gates.push(gate);
        Ok(())
    }

    pub fn x(&mut self, qubit: usize) -> Result<(), SimError> {
        self.push(Gate::X(qubit))
    }

    pub fn h(&mut self, qubit: usize) -> Result<(), SimError> {
        self.push(Gate::H(qubit))
    }

    pub fn sdg(&mut self, qubit: usize) -> Result<(), SimError> {
        self.push(Gate::Sdg(qubit))
    }

    pub fn ry(&mut self, qubit: usize, theta: f64) -> Result<(), SimError> {
        self.push(Gate::RY(qubit, theta))
    }

    pub fn rz(&mut self, qubit: usize, theta: f64) -> Result<(), SimError> {
        self.push(Gate::RZ(qubit, theta))
    }

    pub fn cx(&mut self, control: usize, target: usize) -> Result<(), SimError> {
        self.push(Gate::CX(control, target))
    }

    /// Number of parameterized rotation gates in the circuit.
    pub fn rotation_count(&self) -> usize {
        self.gates.iter().filter(|g| g.is_rotation()).count()
    }

    /// Number of two-qubit entangling gates in the circuit.
    pub fn entangler_count(&self) -> usize {
        self.gates
            .iter()
            .filter(|g| matches!(g, Gate::CX(..)))
            .count()
    }
}

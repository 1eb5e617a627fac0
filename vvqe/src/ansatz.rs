//! RyRz variational forms for the 4-qubit H2 register.
//!
//! Both forms share the same rotation structure and differ only in the
//! entangling pattern: all-pairs CX versus a nearest-neighbor chain.

use serde::{Deserialize, Serialize};
use shotsim::Circuit;
use std::fmt;

use crate::Error;

/// Width of the register; fixed by the 4-spin-orbital encoding.
pub const NUM_QUBITS: usize = 4;

/// Rotation/entangler sublayers per depth repetition.
const SUBLAYERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum VariationalForm {
    /// CX between every qubit pair in each sublayer (6 gates).
    Full,
    /// CX along the nearest-neighbor chain in each sublayer (3 gates).
    Linear,
}

impl fmt::Display for VariationalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariationalForm::Full => write!(f, "full entanglement"),
            VariationalForm::Linear => write!(f, "linear entanglement"),
        }
    }
}

impl VariationalForm {
    /// Parameters consumed by [`build_circuit`] at the given depth:
    /// 8 + 24·depth for the 4-qubit template.
    pub fn parameter_count(&self, depth: usize) -> usize {
        2 * NUM_QUBITS * (SUBLAYERS * depth + 1)
    }

    fn entangle(&self, circuit: &mut Circuit) -> Result<(), shotsim::SimError> {
        match self {
            VariationalForm::Full => {
                for control in 0..NUM_QUBITS {
                    for target in control + 1..NUM_QUBITS {
                        circuit.cx(control, target)?;
                    }
                }
            }
            VariationalForm::Linear => {
                for control in 0..NUM_QUBITS - 1 {
                    circuit.cx(control, control + 1)?;
                }
            }
        }
        Ok(())
    }
}

fn rotation_layer(
    circuit: &mut Circuit,
    params: &[f64],
    cursor: &mut usize,
) -> Result<(), shotsim::SimError> {
    for qubit in 0..NUM_QUBITS {
        circuit.ry(qubit, params[*cursor])?;
        *cursor += 1;
    }
    for qubit in 0..NUM_QUBITS {
        circuit.rz(qubit, params[*cursor])?;
        *cursor += 1;
    }
    Ok(())
}

/// Builds the RyRz circuit: X-prep on qubits 0 and 1, `depth` repetitions of
/// three (Ry layer, Rz layer, entangler) sublayers, then a final Ry and Rz
/// layer. Excess parameter entries are left unused.
pub fn build_circuit(
    form: VariationalForm,
    params: &[f64],
    depth: usize,
) -> Result<Circuit, Error> {
    let expected = form.parameter_count(depth);
    if params.len() < expected {
        return Err(Error::ParameterCount {
            expected,
            actual: params.len(),
        });
    }

    let mut circuit = Circuit::new(NUM_QUBITS);
    circuit.x(0)?;
    circuit.x(1)?;

    let mut cursor = 0;
    for _ in 0..depth {
        for _ in 0..SUBLAYERS {
            rotation_layer(&mut circuit, params, &mut cursor)?;
            form.entangle(&mut circuit)?;
        }
    }
    rotation_layer(&mut circuit, params, &mut cursor)?;
    Ok(circuit)
}

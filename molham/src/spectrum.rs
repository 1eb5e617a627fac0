use nalgebra::{DMatrix, SymmetricEigen};
use num_complex::Complex64;

use crate::pauli::{Pauli, PauliOperator};

fn pauli_matrix(pauli: Pauli) -> DMatrix<Complex64> {
    let (a, b, c, d) = match pauli {
        Pauli::I => (
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
        ),
        Pauli::X => (
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
        ),
        Pauli::Y => (
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, 0.0),
        ),
        Pauli::Z => (
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(-1.0, 0.0),
        ),
    };
    DMatrix::from_row_slice(2, 2, &[a, b, c, d])
}

/// Dense 2^n × 2^n realization of the operator, qubit 0 as the least
/// significant index bit.
pub fn operator_matrix(op: &PauliOperator, num_qubits: usize) -> DMatrix<Complex64> {
    let dim = 1usize << num_qubits;
    let mut total = DMatrix::<Complex64>::zeros(dim, dim);
    for term in op.terms() {
        let mut factor = DMatrix::<Complex64>::identity(1, 1);
        for q in (0..num_qubits).rev() {
            let pauli = term
                .operators()
                .iter()
                .find(|&&(qubit, _)| qubit == q)
                .map(|&(_, p)| p)
                .unwrap_or(Pauli::I);
            factor = factor.kronecker(&pauli_matrix(pauli));
        }
        total += factor * Complex64::new(term.coefficient, 0.0);
    }
    total
}

/// The `k` lowest exact eigenvalues of the operator, ascending.
///
/// The operator matrix is Hermitian by construction (real coefficients on
/// Pauli strings), so a symmetric eigendecomposition applies.
pub fn lowest_eigenvalues(op: &PauliOperator, num_qubits: usize, k: usize) -> Vec<f64> {
    let matrix = operator_matrix(op, num_qubits);
    let eigen = SymmetricEigen::new(matrix);
    let mut values: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    values.sort_by(|a, b| a.partial_cmp(b).expect("eigenvalues are finite"));
    values.truncate(k);
    values
}

use serde::{Deserialize, Serialize};
use shotsim::Gate;
use std::fmt;

/// A single Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// One weighted Pauli string: c · (P₀ ⊗ P₁ ⊗ ... ⊗ Pₙ).
///
/// Only non-identity factors are stored, sorted by qubit index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    pub coefficient: f64,
    operators: Vec<(usize, Pauli)>,
}

impl PauliTerm {
    pub fn new(coefficient: f64, mut operators: Vec<(usize, Pauli)>) -> Self {
        operators.retain(|&(_, p)| p != Pauli::I);
        operators.sort_by_key(|&(q, _)| q);
        Self {
            coefficient,
            operators,
        }
    }

    /// The identity term: a constant energy offset.
    pub fn identity(coefficient: f64) -> Self {
        Self::new(coefficient, Vec::new())
    }

    pub fn z(coefficient: f64, qubit: usize) -> Self {
        Self::new(coefficient, vec![(qubit, Pauli::Z)])
    }

    pub fn zz(coefficient: f64, a: usize, b: usize) -> Self {
        Self::new(coefficient, vec![(a, Pauli::Z), (b, Pauli::Z)])
    }

    pub fn operators(&self) -> &[(usize, Pauli)] {
        &self.operators
    }

    pub fn is_identity(&self) -> bool {
        self.operators.is_empty()
    }

    /// Gates that rotate each factor's eigenbasis into the Z basis, so the
    /// term can be estimated from computational-basis shots.
    pub fn basis_rotations(&self) -> Vec<Gate> {
        let mut gates = Vec::new();
        for &(qubit, pauli) in &self.operators {
            match pauli {
                Pauli::X => gates.push(Gate::H(qubit)),
                Pauli::Y => {
                    gates.push(Gate::Sdg(qubit));
                    gates.push(Gate::H(qubit));
                }
                Pauli::Z | Pauli::I => {}
            }
        }
        gates
    }

    /// Bitmask of the qubits this term measures.
    pub fn support_mask(&self) -> usize {
        self.operators.iter().fold(0, |mask, &(q, _)| mask | 1 << q)
    }

    /// The ±1 eigenvalue this term assigns to a computational-basis outcome
    /// (after the basis rotations of [`basis_rotations`]).
    ///
    /// [`basis_rotations`]: PauliTerm::basis_rotations
    pub fn outcome_sign(&self, basis_state: usize) -> f64 {
        if (basis_state & self.support_mask()).count_ones() % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }

    /// The Pauli factors as X/Y/Z gates, for exact expectation values.
    pub fn pauli_gates(&self) -> Vec<Gate> {
        self.operators
            .iter()
            .map(|&(q, p)| match p {
                Pauli::X => Gate::X(q),
                Pauli::Y => Gate::Y(q),
                Pauli::Z => Gate::Z(q),
                Pauli::I => unreachable!("identity factors are never stored"),
            })
            .collect()
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.8}", self.coefficient)?;
        for (qubit, pauli) in &self.operators {
            write!(f, " {pauli}{qubit}")?;
        }
        Ok(())
    }
}

/// A qubit Hamiltonian: a weighted sum of Pauli strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PauliOperator {
    terms: Vec<PauliTerm>,
}

impl PauliOperator {
    pub fn new(terms: Vec<PauliTerm>) -> Self {
        Self { terms }
    }

    pub fn with_term(mut self, term: PauliTerm) -> Self {
        self.terms.push(term);
        self
    }

    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Width of the register the operator acts on (1 + highest qubit index).
    pub fn num_qubits(&self) -> usize {
        self.terms
            .iter()
            .flat_map(|t| t.operators().iter().map(|&(q, _)| q + 1))
            .max()
            .unwrap_or(0)
    }

    /// Sum of the coefficients of identity terms.
    pub fn identity_coefficient(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(|t| t.coefficient)
            .sum()
    }
}

impl fmt::Display for PauliOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_factors_are_dropped_and_sorted() {
        let term = PauliTerm::new(0.5, vec![(2, Pauli::Z), (0, Pauli::X), (1, Pauli::I)]);
        assert_eq!(term.operators(), &[(0, Pauli::X), (2, Pauli::Z)]);
        assert_eq!(term.support_mask(), 0b101);
    }

    #[test]
    fn outcome_sign_is_parity_over_support() {
        let term = PauliTerm::zz(1.0, 0, 1);
        assert_eq!(term.outcome_sign(0b00), 1.0);
        assert_eq!(term.outcome_sign(0b01), -1.0);
        assert_eq!(term.outcome_sign(0b10), -1.0);
        assert_eq!(term.outcome_sign(0b11), 1.0);
        // A bit outside the support must not affect the sign.
        assert_eq!(term.outcome_sign(0b101), -1.0);
    }

    #[test]
    fn basis_rotations_cover_x_and_y() {
        let term = PauliTerm::new(1.0, vec![(0, Pauli::X), (1, Pauli::Y), (2, Pauli::Z)]);
        assert_eq!(
            term.basis_rotations(),
            vec![Gate::H(0), Gate::Sdg(1), Gate::H(1)]
        );
    }

    #[test]
    fn operator_width_and_identity_sum() {
        let op = PauliOperator::default()
            .with_term(PauliTerm::identity(-0.8))
            .with_term(PauliTerm::z(0.17, 3));
        assert_eq!(op.num_qubits(), 4);
        assert!((op.identity_coefficient() + 0.8).abs() < 1e-12);
    }

    #[test]
    fn display_lists_terms() {
        let op = PauliOperator::new(vec![
            PauliTerm::identity(-0.8105),
            PauliTerm::zz(0.1686, 0, 2),
        ]);
        let text = op.to_string();
        assert!(text.contains("-0.8105"));
        assert!(text.contains("Z0 Z2"));
    }
}

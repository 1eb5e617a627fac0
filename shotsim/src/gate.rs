use serde::{Deserialize, Serialize};

/// A single instruction in a circuit. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    X(usize),
    Y(usize),
    Z(usize),
    H(usize),
    /// Inverse phase gate S†, used to rotate a Y measurement into the Z basis.
    Sdg(usize),
    RX(usize, f64),
    RY(usize, f64),
    RZ(usize, f64),
    CX(usize, usize),
}

impl Gate {
    /// The highest qubit index this gate touches.
    pub fn max_qubit(&self) -> usize {
        match *self {
            Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::H(q)
            | Gate::Sdg(q)
            | Gate::RX(q, _)
            | Gate::RY(q, _)
            | Gate::RZ(q, _) => q,
            Gate::CX(c, t) => c.max(t),
        }
    }

    /// True for the parameterized rotation gates.
    pub fn is_rotation(&self) -> bool {
        matches!(self, Gate::RX(..) | Gate::RY(..) | Gate::RZ(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_qubit_covers_both_cx_operands() {
        assert_eq!(Gate::CX(0, 3).max_qubit(), 3);
        assert_eq!(Gate::CX(2, 1).max_qubit(), 2);
        assert_eq!(Gate::RY(1, 0.3).max_qubit(), 1);
    }

    #[test]
    fn rotation_classification() {
        assert!(Gate::RZ(0, 1.0).is_rotation());
        assert!(!Gate::X(0).is_rotation());
        assert!(!Gate::CX(0, 1).is_rotation());
    }
}

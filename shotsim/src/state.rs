use num_complex::Complex;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::Serialize;

/// Dense amplitude vector over the computational basis.
///
/// Qubit `q` maps to bit `q` of the basis-state index, so qubit 0 is the
/// least significant bit.
#[derive(Debug, Clone, Serialize)]
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Complex<f64>>,
}

impl StateVector {
    /// Creates |0...0⟩ on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// Returns the state to |0...0⟩.
    pub fn reset(&mut self) {
        for amp in &mut self.amplitudes {
            *amp = Complex::new(0.0, 0.0);
        }
        self.amplitudes[0] = Complex::new(1.0, 0.0);
    }

    /// Applies a 2x2 unitary to `target`, updating amplitude pairs in place.
    pub fn apply_single_qubit_gate(
        &mut self,
        matrix: &[[Complex<f64>; 2]; 2],
        target: usize,
    ) {
        let mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let lo = self.amplitudes[i];
                let hi = self.amplitudes[j];
                self.amplitudes[i] = matrix[0][0] * lo + matrix[0][1] * hi;
                self.amplitudes[j] = matrix[1][0] * lo + matrix[1][1] * hi;
            }
        }
    }

    /// Applies a controlled-X by swapping the target pair wherever the
    /// control bit is set.
    pub fn apply_cx(&mut self, control: usize, target: usize) {
        let control_mask = 1 << control;
        let target_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & control_mask != 0 && i & target_mask == 0 {
                self.amplitudes.swap(i, i | target_mask);
            }
        }
    }

    /// Measurement probabilities over the computational basis.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Draws `shots` computational-basis outcomes without collapsing the
    /// state; returns a count per basis state.
    pub fn sample_counts(&self, shots: u32, rng: &mut impl Rng) -> Vec<u32> {
        let probabilities = self.probabilities();
        let dist = WeightedIndex::new(&probabilities)
            .expect("statevector probabilities must be non-negative and sum above zero");
        let mut counts = vec![0u32; self.amplitudes.len()];
        for _ in 0..shots {
            counts[dist.sample(rng)] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: Complex<f64>, b: Complex<f64>) -> bool {
        (a.re - b.re).abs() < EPSILON && (a.im - b.im).abs() < EPSILON
    }

    const PAULI_X: [[Complex<f64>; 2]; 2] = [
        [Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)],
        [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    ];

    #[test]
    fn initial_state_is_all_zeros() {
        let state = StateVector::new(3);
        assert_eq!(state.amplitudes().len(), 8);
        assert!(approx_eq(state.amplitudes()[0], Complex::new(1.0, 0.0)));
        for amp in &state.amplitudes()[1..] {
            assert!(approx_eq(*amp, Complex::new(0.0, 0.0)));
        }
    }

    #[test]
    fn x_flips_the_addressed_bit() {
        let mut state = StateVector::new(2);
        state.apply_single_qubit_gate(&PAULI_X, 1);
        // |00> -> |10>, index 2 with qubit 1 as bit 1.
        assert!(approx_eq(state.amplitudes()[2], Complex::new(1.0, 0.0)));
    }

    #[test]
    fn cx_swaps_target_only_when_control_set() {
        let mut state = StateVector::new(2);
        state.apply_single_qubit_gate(&PAULI_X, 0);
        state.apply_cx(0, 1);
        // |01> -> |11>
        assert!(approx_eq(state.amplitudes()[3], Complex::new(1.0, 0.0)));
    }

    #[test]
    fn sample_counts_sum_to_shots() {
        let mut state = StateVector::new(2);
        state.apply_single_qubit_gate(&PAULI_X, 0);
        let mut rng = StdRng::seed_from_u64(7);
        let counts = state.sample_counts(500, &mut rng);
        assert_eq!(counts.iter().sum::<u32>(), 500);
        // The state is exactly |01>; every shot lands on index 1.
        assert_eq!(counts[1], 500);
    }

    #[test]
    fn reset_restores_ground_state() {
        let mut state = StateVector::new(1);
        state.apply_single_qubit_gate(&PAULI_X, 0);
        state.reset();
        assert!(approx_eq(state.amplitudes()[0], Complex::new(1.0, 0.0)));
        assert!(approx_eq(state.amplitudes()[1], Complex::new(0.0, 0.0)));
    }
}

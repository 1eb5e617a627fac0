//! The risk-adjusted objective handed to the classical optimizer.

use argmin::core::CostFunction;
use molham::PauliOperator;
use std::cell::RefCell;

use crate::Error;
use crate::ansatz::{self, VariationalForm};
use crate::backend::EnergyBackend;

/// Scalar cost `(1−α)·mean + α·std` over one circuit evaluation.
///
/// `α = 0` optimizes the energy alone; `α = 1` optimizes the sampling spread
/// alone. The backend sits behind a `RefCell` so the argmin `CostFunction`
/// contract (`&self`) can drive its mutable sampling state.
pub struct CostModel<'a, B> {
    backend: RefCell<&'a mut B>,
    hamiltonian: &'a PauliOperator,
    pub alpha: f64,
    pub shots: u32,
    pub depth: usize,
    pub form: VariationalForm,
}

impl<'a, B: EnergyBackend> CostModel<'a, B> {
    pub fn new(
        backend: &'a mut B,
        hamiltonian: &'a PauliOperator,
        alpha: f64,
        shots: u32,
        depth: usize,
        form: VariationalForm,
    ) -> Self {
        Self {
            backend: RefCell::new(backend),
            hamiltonian,
            alpha,
            shots,
            depth,
            form,
        }
    }

    /// Runs one evaluation and returns `(mean, std)` with the standard
    /// error rescaled back to absolute scale by √shots.
    pub fn measure(&self, params: &[f64]) -> Result<(f64, f64), Error> {
        let circuit = ansatz::build_circuit(self.form, params, self.depth)?;
        let m = self
            .backend
            .borrow_mut()
            .evaluate(&circuit, self.hamiltonian, self.shots)?;
        Ok((m.mean, m.std_error * (self.shots as f64).sqrt()))
    }

    /// The scalar objective.
    pub fn evaluate(&self, params: &[f64]) -> Result<f64, Error> {
        let (mean, std) = self.measure(params)?;
        Ok((1.0 - self.alpha) * mean + self.alpha * std)
    }
}

impl<B: EnergyBackend> CostFunction for CostModel<'_, B> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.evaluate(params)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ExactBackend, Measurement};
    use molham::PauliTerm;

    // A backend that always reports the same measurement; lets the convex
    // combination be checked exactly.
    struct FixedBackend {
        mean: f64,
        std_error: f64,
    }

    impl EnergyBackend for FixedBackend {
        fn evaluate(
            &mut self,
            _circuit: &shotsim::Circuit,
            _hamiltonian: &PauliOperator,
            _shots: u32,
        ) -> Result<Measurement, Error> {
            Ok(Measurement {
                mean: self.mean,
                std_error: self.std_error,
            })
        }
    }

    fn any_hamiltonian() -> PauliOperator {
        PauliOperator::new(vec![PauliTerm::z(1.0, 0)])
    }

    #[test]
    fn alpha_zero_returns_the_mean() {
        let op = any_hamiltonian();
        let mut backend = FixedBackend {
            mean: -1.2,
            std_error: 0.5,
        };
        let model = CostModel::new(&mut backend, &op, 0.0, 1000, 1, VariationalForm::Full);
        let cost = model.evaluate(&vec![0.0; 32]).unwrap();
        assert!((cost + 1.2).abs() < 1e-12);
    }

    #[test]
    fn alpha_one_returns_the_rescaled_std() {
        let op = any_hamiltonian();
        let mut backend = FixedBackend {
            mean: -1.2,
            std_error: 0.5,
        };
        let model = CostModel::new(&mut backend, &op, 1.0, 1000, 1, VariationalForm::Full);
        let cost = model.evaluate(&vec![0.0; 32]).unwrap();
        assert!((cost - 0.5 * 1000f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn rescaling_multiplies_by_sqrt_shots_once() {
        let op = any_hamiltonian();
        let mut backend = FixedBackend {
            mean: 0.0,
            std_error: 0.01,
        };
        let model = CostModel::new(&mut backend, &op, 1.0, 1000, 1, VariationalForm::Linear);
        let (_, std) = model.measure(&vec![0.0; 32]).unwrap();
        // shots = 1000 gives a factor of about 31.62.
        assert!((std - 0.01 * 31.6227766017).abs() < 1e-9);
    }

    #[test]
    fn short_parameter_vectors_propagate_the_ansatz_error() {
        let op = any_hamiltonian();
        let mut backend = ExactBackend;
        let model = CostModel::new(&mut backend, &op, 0.5, 1000, 1, VariationalForm::Full);
        assert!(matches!(
            model.evaluate(&vec![0.0; 8]),
            Err(Error::ParameterCount { .. })
        ));
    }
}

//! End-to-end check of the risk-adjusted cost against a deterministic
//! backend with a known measurement.

use molham::{Driver, PauliOperator, h2_hamiltonian};
use shotsim::Circuit;
use vvqe::{CostModel, EnergyBackend, Error, Measurement, VariationalForm};

struct FixedBackend {
    mean: f64,
    std_error: f64,
}

impl EnergyBackend for FixedBackend {
    fn evaluate(
        &mut self,
        _circuit: &Circuit,
        _hamiltonian: &PauliOperator,
        _shots: u32,
    ) -> Result<Measurement, Error> {
        Ok(Measurement {
            mean: self.mean,
            std_error: self.std_error,
        })
    }
}

#[test]
fn balanced_risk_weight_mixes_mean_and_rescaled_spread() {
    let (hamiltonian, _) = h2_hamiltonian(0.8, Driver::Sto3g).unwrap();
    let form = VariationalForm::Full;
    let params = vec![1.0; form.parameter_count(1)];

    let mut backend = FixedBackend {
        mean: -1.1,
        std_error: 0.01,
    };
    let model = CostModel::new(&mut backend, &hamiltonian, 0.5, 1000, 1, form);
    let cost = model.evaluate(&params).unwrap();

    let expected = 0.5 * (-1.1) + 0.5 * (0.01 * 1000f64.sqrt());
    assert!((cost - expected).abs() < 1e-12, "cost {cost} vs {expected}");
}

#[test]
fn extreme_risk_weights_return_each_component_alone() {
    let (hamiltonian, _) = h2_hamiltonian(0.8, Driver::Sto3g).unwrap();
    let form = VariationalForm::Linear;
    let params = vec![0.0; form.parameter_count(1)];

    let mut backend = FixedBackend {
        mean: -1.1,
        std_error: 0.01,
    };
    let model = CostModel::new(&mut backend, &hamiltonian, 0.0, 1000, 1, form);
    assert!((model.evaluate(&params).unwrap() + 1.1).abs() < 1e-12);

    let mut backend = FixedBackend {
        mean: -1.1,
        std_error: 0.01,
    };
    let model = CostModel::new(&mut backend, &hamiltonian, 1.0, 1000, 1, form);
    let spread_only = model.evaluate(&params).unwrap();
    assert!((spread_only - 0.01 * 1000f64.sqrt()).abs() < 1e-12);
}

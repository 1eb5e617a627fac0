//! Experiment sweeps: the orchestration layer that repeatedly runs the
//! optimizer and accumulates result matrices for the visualizer.

use molham::{Driver, PauliOperator, h2_hamiltonian, lowest_eigenvalues};
use nalgebra::DMatrix;
use serde::Serialize;
use tracing::info;

use crate::Error;
use crate::ansatz::{NUM_QUBITS, VariationalForm};
use crate::backend::EnergyBackend;
use crate::optimize::{OptimizeOptions, find_optimal_params};

/// Index of the spectrum entry closest to `mean` by absolute difference.
///
/// Scans from the lowest index up with a strict comparison, so the first of
/// two equidistant eigenvalues wins.
pub fn nearest_eigenvalue(spectrum: &[f64], mean: f64) -> (usize, f64) {
    let mut best_index = 0;
    let mut best_deviation = f64::INFINITY;
    for (index, value) in spectrum.iter().enumerate() {
        let deviation = (value - mean).abs();
        if deviation < best_deviation {
            best_deviation = deviation;
            best_index = index;
        }
    }
    (best_index, best_deviation)
}

#[derive(Debug, Clone, Serialize)]
pub struct FormSweepConfig {
    pub distance: f64,
    pub driver: Driver,
    pub alphas: Vec<f64>,
    pub forms: Vec<VariationalForm>,
    pub shots: u32,
    pub depth: usize,
    /// How many exact eigenvalues to compare against.
    pub eigenvalues: usize,
    pub options: OptimizeOptions,
}

/// Output of the variational-form sweep: N forms × M risk weights.
#[derive(Debug, Clone, Serialize)]
pub struct FormSweep {
    pub forms: Vec<VariationalForm>,
    pub alphas: Vec<f64>,
    /// Exact spectrum used for the nearest-eigenvalue labels (electronic,
    /// unshifted).
    pub spectrum: Vec<f64>,
    pub shift: f64,
    /// |mean − nearest eigenvalue| per (form, alpha).
    pub deviation: DMatrix<f64>,
    /// Rescaled standard deviation per (form, alpha).
    pub std: DMatrix<f64>,
    /// Index into `spectrum` of the closest eigenvalue per (form, alpha).
    pub nearest_state: DMatrix<usize>,
}

/// Runs one optimization per (form, alpha) pair from an all-ones start and
/// labels each recovered energy with its closest exact eigenvalue.
pub fn sweep_variational_forms<B: EnergyBackend>(
    config: &FormSweepConfig,
    backend: &mut B,
) -> Result<FormSweep, Error> {
    let (hamiltonian, shift) = h2_hamiltonian(config.distance, config.driver)?;
    let spectrum = lowest_eigenvalues(&hamiltonian, NUM_QUBITS, config.eigenvalues);
    info!(
        distance = config.distance,
        ground = spectrum.first().copied().unwrap_or(f64::NAN) + shift,
        "computed exact spectrum"
    );

    let n = config.forms.len();
    let m = config.alphas.len();
    let mut deviation = DMatrix::zeros(n, m);
    let mut std = DMatrix::zeros(n, m);
    let mut nearest_state = DMatrix::<usize>::zeros(n, m);

    for (i, &form) in config.forms.iter().enumerate() {
        let init = vec![1.0; form.parameter_count(config.depth)];
        for (j, &alpha) in config.alphas.iter().enumerate() {
            let optimum = find_optimal_params(
                &config.options,
                &init,
                alpha,
                &hamiltonian,
                config.shots,
                config.depth,
                form,
                backend,
            )?;
            let (index, dev) = nearest_eigenvalue(&spectrum, optimum.mean);
            info!(
                %form,
                alpha,
                energy = optimum.mean + shift,
                std = optimum.std,
                nearest = index,
                "optimization finished"
            );
            deviation[(i, j)] = dev;
            std[(i, j)] = optimum.std;
            nearest_state[(i, j)] = index;
        }
    }

    Ok(FormSweep {
        forms: config.forms.clone(),
        alphas: config.alphas.clone(),
        spectrum,
        shift,
        deviation,
        std,
        nearest_state,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskSweepConfig {
    pub distance: f64,
    pub driver: Driver,
    pub alphas: Vec<f64>,
    pub form: VariationalForm,
    /// Independent optimizations per risk weight.
    pub repetitions: usize,
    pub shots: u32,
    pub depth: usize,
    pub options: OptimizeOptions,
}

/// Output of the risk-weight sweep: len(alphas) × repetitions, raw values
/// with no aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct RiskSweep {
    pub alphas: Vec<f64>,
    pub form: VariationalForm,
    pub shift: f64,
    pub energy: DMatrix<f64>,
    pub std: DMatrix<f64>,
}

/// Repeats the optimization `repetitions` times per risk weight from a
/// zero-initialized start, recording every recovered energy and spread.
pub fn sweep_risk_weights<B: EnergyBackend>(
    config: &RiskSweepConfig,
    backend: &mut B,
) -> Result<RiskSweep, Error> {
    let (hamiltonian, shift) = h2_hamiltonian(config.distance, config.driver)?;
    let init = vec![0.0; config.form.parameter_count(config.depth)];

    let mut energy = DMatrix::zeros(config.alphas.len(), config.repetitions);
    let mut std = DMatrix::zeros(config.alphas.len(), config.repetitions);

    for (i, &alpha) in config.alphas.iter().enumerate() {
        for j in 0..config.repetitions {
            let optimum = run_one(config, &hamiltonian, alpha, &init, backend)?;
            info!(
                alpha,
                repetition = j + 1,
                energy = optimum.0 + shift,
                std = optimum.1,
                "optimization finished"
            );
            energy[(i, j)] = optimum.0;
            std[(i, j)] = optimum.1;
        }
    }

    Ok(RiskSweep {
        alphas: config.alphas.clone(),
        form: config.form,
        shift,
        energy,
        std,
    })
}

fn run_one<B: EnergyBackend>(
    config: &RiskSweepConfig,
    hamiltonian: &PauliOperator,
    alpha: f64,
    init: &[f64],
    backend: &mut B,
) -> Result<(f64, f64), Error> {
    let optimum = find_optimal_params(
        &config.options,
        init,
        alpha,
        hamiltonian,
        config.shots,
        config.depth,
        config.form,
        backend,
    )?;
    Ok((optimum.mean, optimum.std))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Measurement;
    use crate::optimize::Method;

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

    fn fast_options() -> OptimizeOptions {
        OptimizeOptions {
            method: Method::NelderMead,
            max_iters: Some(5),
            ..OptimizeOptions::default()
        }
    }

    #[test]
    fn nearest_eigenvalue_picks_smallest_absolute_difference() {
        let spectrum = [-1.0, -0.5, 0.2];
        let (index, deviation) = nearest_eigenvalue(&spectrum, -0.6);
        assert_eq!(index, 1);
        assert!((deviation - 0.1).abs() < 1e-12);
    }

    #[test]
    fn nearest_eigenvalue_ties_break_toward_the_lower_index() {
        let spectrum = [-1.0, 0.0];
        let (index, _) = nearest_eigenvalue(&spectrum, -0.5);
        assert_eq!(index, 0);
    }

    #[test]
    fn form_sweep_matrices_have_forms_by_alphas_shape() {
        let config = FormSweepConfig {
            distance: 0.8,
            driver: Driver::Sto3g,
            alphas: vec![0.0, 0.3, 0.7],
            forms: vec![VariationalForm::Full, VariationalForm::Linear],
            shots: 1000,
            depth: 1,
            eigenvalues: 9,
            options: fast_options(),
        };
        let mut backend = FixedBackend {
            mean: -1.2,
            std_error: 0.005,
        };
        let sweep = sweep_variational_forms(&config, &mut backend).unwrap();

        assert_eq!(sweep.deviation.shape(), (2, 3));
        assert_eq!(sweep.std.shape(), (2, 3));
        assert_eq!(sweep.nearest_state.shape(), (2, 3));
        assert_eq!(sweep.spectrum.len(), 9);
        // Fixed backend: every cell carries the rescaled constant spread.
        let expected_std = 0.005 * 1000f64.sqrt();
        for value in sweep.std.iter() {
            assert!((value - expected_std).abs() < 1e-9);
        }
        // All cells resolved against the same constant mean.
        let first = sweep.nearest_state[(0, 0)];
        for index in sweep.nearest_state.iter() {
            assert_eq!(*index, first);
        }
    }

    #[test]
    fn risk_sweep_records_every_repetition() {
        let config = RiskSweepConfig {
            distance: 0.8,
            driver: Driver::Sto3g,
            alphas: vec![0.1, 0.9],
            form: VariationalForm::Full,
            repetitions: 3,
            shots: 1000,
            depth: 1,
            options: fast_options(),
        };
        let mut backend = FixedBackend {
            mean: -1.1,
            std_error: 0.01,
        };
        let sweep = sweep_risk_weights(&config, &mut backend).unwrap();

        assert_eq!(sweep.energy.shape(), (2, 3));
        assert_eq!(sweep.std.shape(), (2, 3));
        for value in sweep.energy.iter() {
            assert!((value + 1.1).abs() < 1e-9);
        }
        assert!(sweep.shift > 0.0);
    }
}

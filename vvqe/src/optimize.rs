//! Classical optimizer driver wrapping argmin's derivative-free solvers.

use argmin::core::Executor;
use argmin::solver::neldermead::NelderMead;
use argmin::solver::particleswarm::ParticleSwarm;
use molham::PauliOperator;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;
use crate::ansatz::VariationalForm;
use crate::backend::EnergyBackend;
use crate::cost::CostModel;

/// Nelder-Mead stops once the simplex cost spread falls below this.
const SD_TOLERANCE: f64 = 1e-6;

/// Particle swarm has no convergence criterion of its own; cap it.
const DEFAULT_SWARM_ITERS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    NelderMead,
    ParticleSwarm,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::NelderMead => write!(f, "nelder-mead"),
            Method::ParticleSwarm => write!(f, "particle-swarm"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeOptions {
    pub method: Method,
    /// No explicit cap by default; Nelder-Mead relies on its own
    /// termination. Particle swarm falls back to an internal cap.
    pub max_iters: Option<u64>,
    /// Offset used to span the initial Nelder-Mead simplex.
    pub simplex_step: f64,
    /// Swarm size for the particle-swarm method.
    pub particles: usize,
    /// Symmetric parameter bound (±) for the particle-swarm method.
    pub bound: f64,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            method: Method::NelderMead,
            max_iters: None,
            simplex_step: 0.5,
            particles: 40,
            bound: std::f64::consts::PI,
        }
    }
}

/// Result of one optimization run: the best parameters found and the energy
/// statistics measured once more at that point (std already rescaled by
/// √shots).
#[derive(Debug, Clone, Serialize)]
pub struct Optimum {
    pub params: Vec<f64>,
    pub mean: f64,
    pub std: f64,
}

fn initial_simplex(init: &[f64], step: f64) -> Vec<Vec<f64>> {
    let mut simplex = Vec::with_capacity(init.len() + 1);
    simplex.push(init.to_vec());
    for i in 0..init.len() {
        let mut vertex = init.to_vec();
        vertex[i] += step;
        simplex.push(vertex);
    }
    simplex
}

/// Minimizes the risk-adjusted cost and re-measures at the optimizer's final
/// parameters.
///
/// Non-convergence is not surfaced as an error: the best-known point is
/// returned, which is a property of the underlying solvers.
#[allow(clippy::too_many_arguments)]
pub fn find_optimal_params<B: EnergyBackend>(
    options: &OptimizeOptions,
    init: &[f64],
    alpha: f64,
    hamiltonian: &PauliOperator,
    shots: u32,
    depth: usize,
    form: VariationalForm,
    backend: &mut B,
) -> Result<Optimum, Error> {
    let best_params = {
        let model = CostModel::new(&mut *backend, hamiltonian, alpha, shots, depth, form);
        match options.method {
            Method::NelderMead => {
                let solver = NelderMead::new(initial_simplex(init, options.simplex_step))
                    .with_sd_tolerance(SD_TOLERANCE)
                    .map_err(|e| Error::Optimizer(e.to_string()))?;
                let res = Executor::new(model, solver)
                    .configure(|state| match options.max_iters {
                        Some(iters) => state.max_iters(iters),
                        None => state,
                    })
                    .run()
                    .map_err(|e| Error::Optimizer(e.to_string()))?;
                res.state.best_param.ok_or(Error::EmptyOptimum)?
            }
            Method::ParticleSwarm => {
                let bounds = (vec![-options.bound; init.len()], vec![options.bound; init.len()]);
                let solver = ParticleSwarm::new(bounds, options.particles);
                let res = Executor::new(model, solver)
                    .configure(|state| {
                        state.max_iters(options.max_iters.unwrap_or(DEFAULT_SWARM_ITERS))
                    })
                    .run()
                    .map_err(|e| Error::Optimizer(e.to_string()))?;
                res.state
                    .best_individual
                    .map(|particle| particle.position)
                    .ok_or(Error::EmptyOptimum)?
            }
        }
    };

    let model = CostModel::new(backend, hamiltonian, alpha, shots, depth, form);
    let (mean, std) = model.measure(&best_params)?;
    Ok(Optimum {
        params: best_params,
        mean,
        std,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ExactBackend;
    use molham::{Driver, h2_hamiltonian};

    #[test]
    fn simplex_has_one_vertex_per_dimension_plus_one() {
        let simplex = initial_simplex(&[1.0, 2.0, 3.0], 0.5);
        assert_eq!(simplex.len(), 4);
        assert_eq!(simplex[0], vec![1.0, 2.0, 3.0]);
        assert_eq!(simplex[2], vec![1.0, 2.5, 3.0]);
    }

    #[test]
    fn nelder_mead_improves_on_the_initial_point() {
        let (hamiltonian, _) = h2_hamiltonian(0.8, Driver::Sto3g).unwrap();
        let form = VariationalForm::Full;
        let init = vec![1.0; form.parameter_count(1)];

        let mut backend = ExactBackend;
        let model = CostModel::new(&mut backend, &hamiltonian, 0.0, 1000, 1, form);
        let initial_cost = model.evaluate(&init).unwrap();

        let options = OptimizeOptions {
            max_iters: Some(300),
            ..OptimizeOptions::default()
        };
        let mut backend = ExactBackend;
        let optimum = find_optimal_params(
            &options,
            &init,
            0.0,
            &hamiltonian,
            1000,
            1,
            form,
            &mut backend,
        )
        .unwrap();

        assert!(optimum.mean <= initial_cost + 1e-9);
        // The exact backend reports zero spread regardless of parameters.
        assert_eq!(optimum.std, 0.0);
        assert_eq!(optimum.params.len(), init.len());
    }

    #[test]
    fn particle_swarm_returns_a_finite_optimum() {
        let (hamiltonian, _) = h2_hamiltonian(0.8, Driver::Sto3g).unwrap();
        let form = VariationalForm::Linear;
        let init = vec![0.0; form.parameter_count(1)];

        let options = OptimizeOptions {
            method: Method::ParticleSwarm,
            max_iters: Some(5),
            particles: 10,
            ..OptimizeOptions::default()
        };
        let mut backend = ExactBackend;
        let optimum = find_optimal_params(
            &options,
            &init,
            0.5,
            &hamiltonian,
            1000,
            1,
            form,
            &mut backend,
        )
        .unwrap();
        assert!(optimum.mean.is_finite());
    }
}

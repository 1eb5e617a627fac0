pub mod ansatz;
pub mod backend;
pub mod cost;
pub mod data;
pub mod experiment;
pub mod optimize;
pub mod plot;

use std::path::PathBuf;

pub use ansatz::VariationalForm;
pub use backend::{EnergyBackend, ExactBackend, Measurement, ShotBackend};
pub use cost::CostModel;
pub use optimize::{Method, OptimizeOptions, Optimum, find_optimal_params};

/// Errors raised by the experiment driver.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("variational form needs {expected} parameters, got {actual}")]
    ParameterCount { expected: usize, actual: usize },
    #[error(transparent)]
    Sim(#[from] shotsim::SimError),
    #[error(transparent)]
    Chem(#[from] molham::ChemError),
    #[error("optimizer finished without a best parameter vector")]
    EmptyOptimum,
    #[error("optimization failed: {0}")]
    Optimizer(String),
    #[error("scenario file {path}: {reason}")]
    Scenario { path: PathBuf, reason: String },
    #[error("scenario matrices have {rows} rows but {alphas} risk weights were given")]
    ScenarioShape { rows: usize, alphas: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

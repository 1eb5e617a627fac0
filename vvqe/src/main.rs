use clap::{Parser, Subcommand, ValueEnum};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

use vvqe::data::Scenario;
use vvqe::experiment::{
    FormSweepConfig, RiskSweepConfig, sweep_risk_weights, sweep_variational_forms,
};
use vvqe::plot;
use vvqe::{EnergyBackend, ExactBackend, Method, OptimizeOptions, ShotBackend, VariationalForm};

/// Variance-aware variational eigensolver experiments for molecular hydrogen.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare entanglement topologies across risk weights.
    Forms(FormsArgs),
    /// Study the effect of the risk weight with repeated optimizations.
    Risk(RiskArgs),
    /// Re-render histogram figures from previously saved result files.
    Replot(ReplotArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DriverArg {
    Sto3g,
    Sto6g,
}

impl From<DriverArg> for molham::Driver {
    fn from(value: DriverArg) -> Self {
        match value {
            DriverArg::Sto3g => molham::Driver::Sto3g,
            DriverArg::Sto6g => molham::Driver::Sto6g,
        }
    }
}

#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Interatomic distance in angstrom.
    #[arg(long, default_value_t = 0.8)]
    distance: f64,

    /// Quantum-chemistry basis set.
    #[arg(long, value_enum, default_value = "sto3g")]
    driver: DriverArg,

    /// Shots per energy evaluation.
    #[arg(long, default_value_t = 1000)]
    shots: u32,

    /// Circuit depth of the variational form.
    #[arg(long, default_value_t = 1)]
    depth: usize,

    /// Optimization method.
    #[arg(long, value_enum, default_value = "nelder-mead")]
    method: Method,

    /// Cap on optimizer iterations.
    #[arg(long)]
    max_iters: Option<u64>,

    /// Use the exact statevector backend instead of shot sampling.
    #[arg(long)]
    exact: bool,

    /// Seed for the shot-sampling backend; unseeded when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory the figures are written to.
    #[arg(long, default_value = "plots")]
    out_dir: PathBuf,

    /// Write the raw sweep results to this JSON file.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Preferred figure font; falls back to sans-serif if unavailable.
    #[arg(long, default_value = "Helvetica")]
    font: String,
}

#[derive(clap::Args, Debug)]
struct FormsArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Risk weights to sweep.
    #[arg(long, value_delimiter = ',', default_value = "0.0,0.2,0.4,0.6,0.8,1.0")]
    alphas: Vec<f64>,

    /// Number of exact eigenvalues to resolve against.
    #[arg(long, default_value_t = 9)]
    eigenvalues: usize,
}

#[derive(clap::Args, Debug)]
struct RiskArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Risk weights to sweep.
    #[arg(long, value_delimiter = ',', default_value = "0.0,0.5,1.0")]
    alphas: Vec<f64>,

    /// Variational form to optimize.
    #[arg(long, value_enum, default_value = "full")]
    form: VariationalForm,

    /// Independent optimizations per risk weight.
    #[arg(long, default_value_t = 30)]
    repetitions: usize,
}

#[derive(clap::Args, Debug)]
struct ReplotArgs {
    /// Directory holding alpha_list{n}.csv, energy_matrix{n}.csv and
    /// std_matrix{n}.csv files.
    #[arg(long)]
    dir: PathBuf,

    /// Scenario index to load.
    #[arg(long, default_value_t = 1)]
    index: usize,

    /// Interatomic distance the scenario was recorded at, for the
    /// nuclear-repulsion shift.
    #[arg(long, default_value_t = 0.8)]
    distance: f64,

    /// Basis set the scenario was recorded with.
    #[arg(long, value_enum, default_value = "sto3g")]
    driver: DriverArg,

    /// Variational form label for the figures.
    #[arg(long, value_enum, default_value = "full")]
    form: VariationalForm,

    /// Directory the figures are written to.
    #[arg(long, default_value = "plots")]
    out_dir: PathBuf,

    /// Preferred figure font; falls back to sans-serif if unavailable.
    #[arg(long, default_value = "Helvetica")]
    font: String,
}

fn make_backend(exact: bool, seed: Option<u64>) -> Box<dyn EnergyBackend> {
    if exact {
        Box::new(ExactBackend)
    } else {
        match seed {
            Some(seed) => Box::new(ShotBackend::seeded(seed)),
            None => Box::new(ShotBackend::new()),
        }
    }
}

fn optimize_options(common: &CommonArgs) -> OptimizeOptions {
    OptimizeOptions {
        method: common.method,
        max_iters: common.max_iters,
        ..OptimizeOptions::default()
    }
}

fn save_json<T: serde::Serialize>(value: &T, path: &PathBuf) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), "saved sweep results");
    Ok(())
}

fn run_forms(args: FormsArgs) -> anyhow::Result<()> {
    let config = FormSweepConfig {
        distance: args.common.distance,
        driver: args.common.driver.into(),
        alphas: args.alphas,
        forms: vec![VariationalForm::Full, VariationalForm::Linear],
        shots: args.common.shots,
        depth: args.common.depth,
        eigenvalues: args.eigenvalues,
        options: optimize_options(&args.common),
    };
    let mut backend = make_backend(args.common.exact, args.common.seed);
    let sweep = sweep_variational_forms(&config, &mut backend)?;

    if let Some(path) = &args.common.save {
        save_json(&sweep, path)?;
    }
    fs::create_dir_all(&args.common.out_dir)?;
    let font = plot::resolve_font(&args.common.font);
    plot::plot_form_sweep(&sweep, &args.common.out_dir, font)
        .map_err(|e| anyhow::anyhow!("rendering failed: {e}"))?;
    Ok(())
}

fn run_risk(args: RiskArgs) -> anyhow::Result<()> {
    let config = RiskSweepConfig {
        distance: args.common.distance,
        driver: args.common.driver.into(),
        alphas: args.alphas,
        form: args.form,
        repetitions: args.repetitions,
        shots: args.common.shots,
        depth: args.common.depth,
        options: optimize_options(&args.common),
    };
    let mut backend = make_backend(args.common.exact, args.common.seed);
    let sweep = sweep_risk_weights(&config, &mut backend)?;

    if let Some(path) = &args.common.save {
        save_json(&sweep, path)?;
    }
    fs::create_dir_all(&args.common.out_dir)?;
    let font = plot::resolve_font(&args.common.font);
    plot::plot_risk_histograms(&sweep, &args.common.out_dir, font)
        .map_err(|e| anyhow::anyhow!("rendering failed: {e}"))?;
    Ok(())
}

fn run_replot(args: ReplotArgs) -> anyhow::Result<()> {
    let scenario = Scenario::load(&args.dir, args.index)?;
    let (_, shift) = molham::h2_hamiltonian(args.distance, args.driver.into())?;
    info!(
        index = args.index,
        weights = scenario.alphas.len(),
        repetitions = scenario.energy.ncols(),
        "loaded scenario"
    );

    let sweep = scenario.into_risk_sweep(args.form, shift);
    fs::create_dir_all(&args.out_dir)?;
    let font = plot::resolve_font(&args.font);
    plot::plot_risk_histograms(&sweep, &args.out_dir, font)
        .map_err(|e| anyhow::anyhow!("rendering failed: {e}"))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Forms(args) => run_forms(args),
        Command::Risk(args) => run_risk(args),
        Command::Replot(args) => run_replot(args),
    }
}

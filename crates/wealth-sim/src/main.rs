//! Boltzmann Wealth Simulation
//!
//! Runs a single model or a parameter sweep and writes the collected tables.

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use wealth_sim::batch::{BatchError, SweepValues};
use wealth_sim::config::{default_config_toml, ConfigError, SimConfig};
use wealth_sim::model::{BoltzmannModel, ModelError};
use wealth_sim::output::{write_batch_outputs, write_run_outputs, OutputError};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "boltzmann")]
#[command(about = "Agent-based Boltzmann wealth simulation")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single model and export its tables
    Run(RunArgs),
    /// Sweep parameters across repeated runs
    Batch(BatchArgs),
    /// Write the default configuration file
    InitConfig {
        /// Destination file
        #[arg(long, default_value = "boltzmann.toml")]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Number of agents
    #[arg(long)]
    agents: Option<usize>,
    /// Grid width
    #[arg(long)]
    width: Option<usize>,
    /// Grid height
    #[arg(long)]
    height: Option<usize>,
    /// Number of steps to simulate
    #[arg(long)]
    steps: Option<u64>,
    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
    /// Output directory
    #[arg(long)]
    output: Option<PathBuf>,
    /// Skip the per-agent table
    #[arg(long)]
    no_agent_vars: bool,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Agent counts to sweep, replacing the configured sweep
    #[arg(long, value_delimiter = ',')]
    agents: Vec<u64>,
    /// Runs per parameter combination
    #[arg(long)]
    iterations: Option<usize>,
    /// Steps per run
    #[arg(long)]
    max_steps: Option<u64>,
    /// Worker threads
    #[arg(long)]
    threads: Option<usize>,
    /// Run on the current thread only
    #[arg(long)]
    sequential: bool,
    /// Output directory
    #[arg(long)]
    output: Option<PathBuf>,
}

impl RunArgs {
    /// Flags given on the command line replace file values
    fn apply(&self, config: &mut SimConfig) {
        if let Some(agents) = self.agents {
            config.model.num_agents = agents;
        }
        if let Some(width) = self.width {
            config.model.width = width;
        }
        if let Some(height) = self.height {
            config.model.height = height;
        }
        if let Some(steps) = self.steps {
            config.run.steps = steps;
        }
        if let Some(seed) = self.seed {
            config.run.seed = seed;
        }
        if let Some(output) = &self.output {
            config.output.dir = output.clone();
        }
        if self.no_agent_vars {
            config.output.write_agent_vars = false;
        }
    }
}

impl BatchArgs {
    fn apply(&self, config: &mut SimConfig) {
        if !self.agents.is_empty() {
            config.batch.sweep.num_agents = SweepValues::List(self.agents.clone());
        }
        if let Some(iterations) = self.iterations {
            config.batch.iterations = iterations;
        }
        if let Some(max_steps) = self.max_steps {
            config.batch.max_steps = max_steps;
        }
        if self.threads.is_some() {
            config.batch.threads = self.threads;
        }
        if self.sequential {
            config.batch.parallel = false;
        }
        if let Some(output) = &self.output {
            config.output.dir = output.clone();
        }
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
    #[error("could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Reads the config file when one is given, otherwise the defaults
fn load_config(path: Option<&Path>) -> Result<SimConfig, AppError> {
    match path {
        Some(path) => Ok(SimConfig::from_file(path)?),
        None => Ok(SimConfig::default()),
    }
}

fn run_cli(cli: Cli) -> Result<(), AppError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Run(args) => run_single(config, args),
        Command::Batch(args) => run_batch(config, args),
        Command::InitConfig { output, force } => init_config(&output, force),
    }
}

fn run_single(mut config: SimConfig, args: RunArgs) -> Result<(), AppError> {
    args.apply(&mut config);
    config.validate()?;

    tracing::info!(
        "running {} agents on a {}x{} grid for {} steps (seed {})",
        config.model.num_agents,
        config.model.width,
        config.model.height,
        config.run.steps,
        config.run.seed
    );

    let mut model =
        BoltzmannModel::with_collector(config.model, config.run.seed, config.run.collector())?;
    let progress_every = (config.run.steps / 10).max(1);
    for _ in 0..config.run.steps {
        model.step();
        let step = model.current_step();
        if step % progress_every == 0 {
            tracing::info!("step {} / {} (gini {:.3})", step, config.run.steps, model.gini());
        }
    }

    let (paths, summary) =
        write_run_outputs(&config.output.dir, &mut model, config.output.write_agent_vars)?;

    tracing::info!(
        "finished: gini {:.4}, max wealth {}, richest 10% hold {:.1}% ({} transfers)",
        summary.final_gini,
        summary.max_wealth,
        summary.top_decile_share * 100.0,
        model.total_transfers()
    );
    tracing::info!("wrote {}", paths.model_vars.display());
    if let Some(path) = &paths.agent_vars {
        tracing::info!("wrote {}", path.display());
    }
    tracing::info!("wrote {}", paths.histogram.display());
    tracing::info!("wrote {}", paths.summary.display());
    Ok(())
}

fn run_batch(mut config: SimConfig, args: BatchArgs) -> Result<(), AppError> {
    args.apply(&mut config);
    config.validate()?;

    let result = config.batch.runner(config.model.torus).run()?;
    let (paths, summary) =
        write_batch_outputs(&config.output.dir, &result, &config.batch.model_reporters)?;

    for s in &summary.summaries {
        tracing::info!(
            "agents={:>4} {}x{}: {} = {:.4} ± {:.4} over {} runs",
            s.params.num_agents,
            s.params.width,
            s.params.height,
            s.reporter,
            s.mean,
            s.std_dev,
            s.runs
        );
    }
    tracing::info!(
        "batch {} complete: {} runs, {} rows",
        summary.batch_id,
        summary.total_runs,
        summary.row_count
    );
    tracing::info!("wrote {}", paths.rows.display());
    tracing::info!("wrote {}", paths.rows_jsonl.display());
    tracing::info!("wrote {}", paths.summary.display());
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<(), AppError> {
    if path.exists() && !force {
        return Err(AppError::AlreadyExists(path.to_path_buf()));
    }
    fs::write(path, default_config_toml()).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

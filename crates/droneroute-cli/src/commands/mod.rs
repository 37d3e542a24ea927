//! Subcommand handlers.
//!
//! Each module handles one subcommand; main.rs only parses arguments and
//! dispatches.

pub mod algorithms;
pub mod mst;
pub mod route;
pub mod simulate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use droneroute_lib::{GraphMode, RunSummary, Simulation, SimulationConfig};

use droneroute_cli::output::OutputFormat;

/// Options shared by every subcommand that builds a network.
#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// JSON configuration file; every field is optional.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Seed for a reproducible run.
    #[arg(long, global = true)]
    pub seed: Option<u64>,
    /// Override the drone autonomy.
    #[arg(long, global = true)]
    pub autonomy: Option<f64>,
    /// Build a directed network.
    #[arg(long, global = true)]
    pub directed: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
}

impl GlobalOptions {
    /// Load the configuration file (if any) and apply command-line overrides.
    pub fn simulation_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_path(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?,
            None => SimulationConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(autonomy) = self.autonomy {
            config.autonomy = autonomy;
        }
        if self.directed {
            config.network.mode = GraphMode::Directed;
        }
        Ok(config)
    }
}

/// Network size requested on the command line.
#[derive(Args, Debug, Clone, Copy)]
pub struct NetworkSize {
    /// Number of vertices.
    #[arg(long, default_value_t = 20)]
    pub vertices: usize,
    /// Number of edges.
    #[arg(long, default_value_t = 40)]
    pub edges: usize,
}

/// Create a simulation and initialise a run.
pub fn start_run(
    options: &GlobalOptions,
    size: NetworkSize,
    orders: usize,
) -> Result<(Simulation, RunSummary)> {
    let config = options.simulation_config()?;
    let mut simulation = Simulation::new(config).context("invalid configuration")?;
    let summary = simulation
        .initialize(size.vertices, size.edges, orders)
        .context("failed to initialise the simulation")?;
    Ok((simulation, summary))
}

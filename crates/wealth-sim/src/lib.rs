//! Boltzmann Wealth Simulation Library
//!
//! Agents on a toroidal grid wander at random and hand one unit of wealth to
//! whoever they bump into. Starting from perfect equality the population
//! drifts toward a skewed, roughly exponential wealth distribution, which is
//! measured with the Gini coefficient.
//!
//! # Modules
//!
//! - [`components`]: agent components and the grid resource
//! - [`systems`]: activation order and the per-step agent behaviour
//! - [`setup`]: world construction and agent spawning
//! - [`model`]: the model wrapper that owns the world and schedule
//! - [`collector`]: typed model and agent reporters
//! - [`metrics`]: Gini coefficient and distribution helpers
//! - [`batch`]: parameter sweeps across repeated runs
//! - [`output`]: CSV and JSON export

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod batch;
pub mod collector;
pub mod components;
pub mod config;
pub mod metrics;
pub mod model;
pub mod output;
pub mod setup;
pub mod systems;

pub use components::*;

pub use batch::{BatchError, BatchResult, BatchRunner, CollectionPeriod, ParameterSweep, SweepValues};
pub use collector::{AgentReporter, DataCollector, ModelReporter};
pub use config::{default_config_toml, ConfigError, SimConfig};
pub use metrics::gini;
pub use model::{BoltzmannModel, ModelError, ModelParams};
pub use output::OutputError;

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

/// Resource: step counter and run flag for a model
#[derive(Resource, Debug, Clone, Default)]
pub struct ModelState {
    pub step: u64,
    pub running: bool,
}

//! Configuration loading for the simulation.
//!
//! Settings come from a TOML file; every section is optional and missing
//! fields fall back to the tutorial defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::batch::{BatchRunner, CollectionPeriod, ParameterSweep, SweepValues};
use crate::collector::{AgentReporter, DataCollector, ModelReporter};
use crate::model::ModelParams;

/// Complete simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Parameters for single runs
    #[serde(default)]
    pub model: ModelParams,
    /// Single-run settings
    #[serde(default)]
    pub run: RunConfig,
    /// Parameter sweep settings
    #[serde(default)]
    pub batch: BatchConfig,
    /// Where results are written
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.model
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[model] {}", e)))?;

        if self.batch.iterations == 0 {
            return Err(ConfigError::Invalid(
                "[batch] iterations must be at least 1".to_string(),
            ));
        }
        if self.batch.threads == Some(0) {
            return Err(ConfigError::Invalid(
                "[batch] threads must be at least 1 when set".to_string(),
            ));
        }
        if let CollectionPeriod::Every(0) = self.batch.collection {
            return Err(ConfigError::Invalid(
                "[batch] collection period must be at least 1".to_string(),
            ));
        }
        self.batch
            .sweep
            .combinations()
            .map_err(|e| ConfigError::Invalid(format!("[batch.sweep] {}", e)))?;

        Ok(())
    }
}

/// Single-run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Steps to simulate
    pub steps: u64,
    /// RNG seed
    pub seed: u64,
    /// Model-level columns, in order
    pub model_reporters: Vec<ModelReporter>,
    /// Agent-level columns, in order
    pub agent_reporters: Vec<AgentReporter>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: 100,
            seed: 42,
            model_reporters: vec![ModelReporter::Gini, ModelReporter::TotalWealth],
            agent_reporters: vec![AgentReporter::Wealth, AgentReporter::StepsNotGiven],
        }
    }
}

impl RunConfig {
    pub fn collector(&self) -> DataCollector {
        DataCollector::new(self.model_reporters.clone(), self.agent_reporters.clone())
    }
}

/// Parameter sweep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub sweep: ParameterSweep,
    /// Runs per parameter combination
    pub iterations: usize,
    pub max_steps: u64,
    pub collection: CollectionPeriod,
    /// One row per agent rather than per step
    pub include_agents: bool,
    /// Seed of run 0; run `i` uses `seed + i`
    pub seed: u64,
    pub parallel: bool,
    /// Worker threads; rayon's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    pub model_reporters: Vec<ModelReporter>,
    pub agent_reporters: Vec<AgentReporter>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            sweep: ParameterSweep {
                num_agents: SweepValues::Range {
                    start: 10,
                    end: 500,
                    step: 10,
                },
                ..ParameterSweep::default()
            },
            iterations: 5,
            max_steps: 100,
            collection: CollectionPeriod::EveryStep,
            include_agents: false,
            seed: 42,
            parallel: true,
            threads: None,
            model_reporters: vec![ModelReporter::Gini],
            agent_reporters: vec![AgentReporter::Wealth],
        }
    }
}

impl BatchConfig {
    /// A runner configured from these settings
    pub fn runner(&self, torus: bool) -> BatchRunner {
        BatchRunner::new(self.sweep.clone())
            .iterations(self.iterations)
            .max_steps(self.max_steps)
            .collection(self.collection)
            .include_agents(self.include_agents)
            .base_seed(self.seed)
            .parallel(self.parallel)
            .threads(self.threads)
            .torus(torus)
            .model_reporters(self.model_reporters.clone())
            .agent_reporters(self.agent_reporters.clone())
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for CSV and JSON output
    pub dir: PathBuf,
    /// Write the per-agent table for single runs
    pub write_agent_vars: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            write_agent_vars: true,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Boltzmann Wealth Simulation Configuration

[model]
num_agents = 100
width = 10
height = 10
initial_wealth = 1
torus = true

[run]
steps = 100
seed = 42
model_reporters = ["gini", "total_wealth"]
agent_reporters = ["wealth", "steps_not_given"]

[batch]
iterations = 5
max_steps = 100
collection = "every_step"
include_agents = false
seed = 42
parallel = true
model_reporters = ["gini"]
agent_reporters = ["wealth"]

[batch.sweep]
num_agents = { start = 10, end = 500, step = 10 }
width = 10
height = 10
initial_wealth = 1

[output]
dir = "output"
write_agent_vars = true
"#
    .to_string()
}

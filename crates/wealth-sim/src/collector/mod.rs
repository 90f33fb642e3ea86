//! Data Collector
//!
//! Records model-level and agent-level values at chosen steps and keeps them
//! as tables: one model row per collected step and one agent row per agent
//! per collected step.

pub mod reporters;

pub use reporters::{AgentReporter, AgentView, ModelReporter, Population, UnknownReporter};

use bevy_ecs::prelude::*;
use std::collections::BTreeSet;
use wealth_records::{AgentRow, ModelRow, ReporterValue, ReporterValues};

/// Accumulates reporter values over a run
#[derive(Debug, Clone)]
pub struct DataCollector {
    model_reporters: Vec<ModelReporter>,
    agent_reporters: Vec<AgentReporter>,
    model_rows: Vec<ModelRow>,
    agent_rows: Vec<AgentRow>,
    steps: BTreeSet<u64>,
}

impl Default for DataCollector {
    /// Gini at the model level; wealth and broke streak per agent.
    fn default() -> Self {
        Self::new(
            vec![ModelReporter::Gini],
            vec![AgentReporter::Wealth, AgentReporter::StepsNotGiven],
        )
    }
}

impl DataCollector {
    /// Duplicate reporters are dropped; first occurrence keeps its column slot.
    pub fn new(model_reporters: Vec<ModelReporter>, agent_reporters: Vec<AgentReporter>) -> Self {
        let mut models: Vec<ModelReporter> = Vec::with_capacity(model_reporters.len());
        for r in model_reporters {
            if !models.contains(&r) {
                models.push(r);
            }
        }
        let mut agents: Vec<AgentReporter> = Vec::with_capacity(agent_reporters.len());
        for r in agent_reporters {
            if !agents.contains(&r) {
                agents.push(r);
            }
        }

        Self {
            model_reporters: models,
            agent_reporters: agents,
            model_rows: Vec::new(),
            agent_rows: Vec::new(),
            steps: BTreeSet::new(),
        }
    }

    pub fn model_reporters(&self) -> &[ModelReporter] {
        &self.model_reporters
    }

    pub fn agent_reporters(&self) -> &[AgentReporter] {
        &self.agent_reporters
    }

    /// Read the world and record one step
    pub fn collect(&mut self, world: &mut World, step: u64) {
        let population = Population::gather(world, step);
        self.record(&population);
    }

    /// Record one step from an already-gathered population
    pub fn record(&mut self, population: &Population) {
        self.steps.insert(population.step);

        if !self.model_reporters.is_empty() {
            let mut values = ReporterValues::with_capacity(self.model_reporters.len());
            for reporter in &self.model_reporters {
                values.insert(reporter.name(), reporter.evaluate(population));
            }
            self.model_rows.push(ModelRow {
                step: population.step,
                values,
            });
        }

        if !self.agent_reporters.is_empty() {
            for agent in &population.agents {
                let mut values = ReporterValues::with_capacity(self.agent_reporters.len());
                for reporter in &self.agent_reporters {
                    values.insert(reporter.name(), reporter.evaluate(agent));
                }
                self.agent_rows.push(AgentRow {
                    step: population.step,
                    agent_id: agent.id,
                    values,
                });
            }
        }
    }

    /// Model table, one row per collected step
    pub fn model_vars(&self) -> &[ModelRow] {
        &self.model_rows
    }

    /// Agent table, ordered by step then agent id
    pub fn agent_vars(&self) -> &[AgentRow] {
        &self.agent_rows
    }

    /// One model reporter's values over time
    pub fn model_series(&self, reporter: ModelReporter) -> Vec<(u64, ReporterValue)> {
        self.model_rows
            .iter()
            .filter_map(|row| row.values.get(reporter.name()).map(|v| (row.step, v)))
            .collect()
    }

    /// All agent rows for one step
    pub fn agent_vars_at(&self, step: u64) -> Vec<&AgentRow> {
        self.agent_rows.iter().filter(|row| row.step == step).collect()
    }

    /// One agent's values for one reporter over time
    pub fn agent_series(&self, agent_id: u64, reporter: AgentReporter) -> Vec<(u64, ReporterValue)> {
        self.agent_rows
            .iter()
            .filter(|row| row.agent_id == agent_id)
            .filter_map(|row| row.values.get(reporter.name()).map(|v| (row.step, v)))
            .collect()
    }

    /// Number of distinct steps recorded
    pub fn steps_collected(&self) -> usize {
        self.steps.len()
    }

    pub fn clear(&mut self) {
        self.model_rows.clear();
        self.agent_rows.clear();
        self.steps.clear();
    }
}

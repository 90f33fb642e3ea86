//! Boltzmann Wealth Model
//!
//! Owns the ECS world and the per-step schedule. Building a model spawns the
//! population; each `step` reshuffles the activation order, lets every agent
//! move and trade, then records the step with the data collector.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wealth_records::{generate_run_label, ParameterSet, RunSummary, WealthSnapshot};

use crate::collector::{DataCollector, Population};
use crate::components::grid::{GridError, MultiGrid};
use crate::metrics::{gini, histogram, summarize};
use crate::setup::{get_spawn_summary, spawn_agents, SpawnConfig};
use crate::systems::{shuffle_activation, step_agents, ActivationOrder, TransferTally};
use crate::{ModelState, SimRng};

/// Errors from building or running a model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid model parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Parameters of a single model instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub num_agents: usize,
    pub width: usize,
    pub height: usize,
    /// Wealth each agent starts with
    pub initial_wealth: u64,
    /// Whether the grid edges wrap around
    pub torus: bool,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            num_agents: 100,
            width: 10,
            height: 10,
            initial_wealth: 1,
            torus: true,
        }
    }
}

impl ModelParams {
    pub fn new(num_agents: usize, width: usize, height: usize) -> Self {
        Self {
            num_agents,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.num_agents == 0 {
            return Err(ModelError::InvalidParams(
                "num_agents must be at least 1".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ModelError::InvalidParams(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if (self.num_agents as u128) * u128::from(self.initial_wealth) > u128::from(u64::MAX) {
            return Err(ModelError::InvalidParams(
                "total wealth does not fit in 64 bits".to_string(),
            ));
        }
        Ok(())
    }

    pub fn parameter_set(&self) -> ParameterSet {
        ParameterSet {
            num_agents: self.num_agents,
            width: self.width,
            height: self.height,
            initial_wealth: self.initial_wealth,
        }
    }

    pub fn from_parameter_set(set: ParameterSet, torus: bool) -> Self {
        Self {
            num_agents: set.num_agents,
            width: set.width,
            height: set.height,
            initial_wealth: set.initial_wealth,
            torus,
        }
    }
}

/// A running Boltzmann wealth model
pub struct BoltzmannModel {
    world: World,
    schedule: Schedule,
    collector: DataCollector,
    params: ModelParams,
    seed: u64,
    auto_collect: bool,
}

impl BoltzmannModel {
    /// Builds a model with the default collector, recording every step.
    pub fn new(params: ModelParams, seed: u64) -> Result<Self, ModelError> {
        Self::with_collector(params, seed, DataCollector::default())
    }

    /// Builds a model that records every step into `collector`.
    ///
    /// Step 0 (the initial population) is recorded immediately.
    pub fn with_collector(
        params: ModelParams,
        seed: u64,
        collector: DataCollector,
    ) -> Result<Self, ModelError> {
        let mut model = Self::build(params, seed, collector, true)?;
        model.collect();
        Ok(model)
    }

    /// Builds a model that only records when [`collect`](Self::collect) is called.
    pub fn with_manual_collection(
        params: ModelParams,
        seed: u64,
        collector: DataCollector,
    ) -> Result<Self, ModelError> {
        Self::build(params, seed, collector, false)
    }

    fn build(
        params: ModelParams,
        seed: u64,
        collector: DataCollector,
        auto_collect: bool,
    ) -> Result<Self, ModelError> {
        params.validate()?;

        let mut world = World::new();
        world.insert_resource(ModelState {
            step: 0,
            running: true,
        });
        world.insert_resource(MultiGrid::new(params.width, params.height, params.torus)?);
        world.insert_resource(ActivationOrder::default());
        world.insert_resource(TransferTally::new());

        let mut rng = SmallRng::seed_from_u64(seed);
        spawn_agents(
            &mut world,
            SpawnConfig {
                num_agents: params.num_agents,
                initial_wealth: params.initial_wealth,
            },
            &mut rng,
        )?;
        world.insert_resource(SimRng(rng));

        let summary = get_spawn_summary(&mut world);
        tracing::debug!(
            "spawned {} agents on {} cells (seed {})",
            summary.total_agents,
            summary.occupied_cells,
            seed
        );

        // Batch runs parallelise across models, so each model stays on one thread
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems((shuffle_activation, step_agents).chain());

        Ok(Self {
            world,
            schedule,
            collector,
            params,
            seed,
            auto_collect,
        })
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_step(&self) -> u64 {
        self.world.resource::<ModelState>().step
    }

    pub fn is_running(&self) -> bool {
        self.world.resource::<ModelState>().running
    }

    /// Stop further `run_until` progress
    pub fn stop(&mut self) {
        self.world.resource_mut::<ModelState>().running = false;
    }

    /// Advance one step
    pub fn step(&mut self) {
        self.schedule.run(&mut self.world);
        self.world.resource_mut::<ModelState>().step += 1;

        if self.auto_collect {
            self.collect();
        }
    }

    /// Advance a fixed number of steps, regardless of the running flag
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Step while running, up to `max_steps` total steps
    pub fn run_until(&mut self, max_steps: u64) {
        while self.is_running() && self.current_step() < max_steps {
            self.step();
        }
    }

    /// Record the current step in the collector
    pub fn collect(&mut self) {
        let step = self.current_step();
        self.collector.collect(&mut self.world, step);
    }

    pub fn collector(&self) -> &DataCollector {
        &self.collector
    }

    pub fn into_collector(self) -> DataCollector {
        self.collector
    }

    /// Current population, ordered by agent id
    pub fn population(&mut self) -> Population {
        let step = self.current_step();
        Population::gather(&mut self.world, step)
    }

    pub fn wealth_snapshot(&mut self) -> WealthSnapshot {
        self.population().snapshot()
    }

    pub fn total_wealth(&mut self) -> u64 {
        self.wealth_snapshot().total()
    }

    pub fn gini(&mut self) -> f64 {
        gini(&self.wealth_snapshot().wealths)
    }

    /// Transfers completed over the whole run
    pub fn total_transfers(&self) -> u64 {
        self.world.resource::<TransferTally>().total
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Condense the current state into a summary
    pub fn summary(&mut self, run_id: u64) -> RunSummary {
        let snapshot = self.wealth_snapshot();
        let stats = summarize(&snapshot.wealths);

        RunSummary {
            label: generate_run_label(run_id),
            seed: self.seed,
            num_agents: self.params.num_agents,
            width: self.params.width,
            height: self.params.height,
            steps: snapshot.step,
            total_wealth: stats.total,
            final_gini: gini(&snapshot.wealths),
            max_wealth: stats.max,
            mean_wealth: stats.mean,
            top_decile_share: stats.top_decile_share,
            histogram: histogram(&snapshot.wealths),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{AgentReporter, ModelReporter};

    #[test]
    fn test_params_validation() {
        assert!(ModelParams::default().validate().is_ok());
        assert!(ModelParams::new(0, 10, 10).validate().is_err());
        assert!(ModelParams::new(10, 0, 10).validate().is_err());

        let overflow = ModelParams {
            num_agents: 2,
            initial_wealth: u64::MAX,
            ..ModelParams::default()
        };
        assert!(matches!(overflow.validate(), Err(ModelError::InvalidParams(_))));
    }

    #[test]
    fn test_new_collects_initial_state() {
        let model = BoltzmannModel::new(ModelParams::new(20, 5, 5), 1).unwrap();
        assert_eq!(model.current_step(), 0);
        assert_eq!(model.collector().model_vars().len(), 1);
        assert_eq!(
            model.collector().model_series(ModelReporter::Gini)[0].1.as_f64(),
            0.0
        );
        assert_eq!(model.collector().agent_vars().len(), 20);
    }

    #[test]
    fn test_step_advances_and_collects() {
        let mut model = BoltzmannModel::new(ModelParams::new(30, 5, 5), 7).unwrap();
        model.run(10);
        assert_eq!(model.current_step(), 10);
        assert_eq!(model.collector().model_vars().len(), 11);
        assert_eq!(model.collector().agent_vars().len(), 30 * 11);
        assert_eq!(model.total_wealth(), 30);
    }

    #[test]
    fn test_manual_collection() {
        let mut model = BoltzmannModel::with_manual_collection(
            ModelParams::new(10, 3, 3),
            7,
            DataCollector::new(vec![ModelReporter::Gini], vec![AgentReporter::Wealth]),
        )
        .unwrap();
        model.run(5);
        assert!(model.collector().model_vars().is_empty());

        model.collect();
        assert_eq!(model.collector().model_vars().len(), 1);
        assert_eq!(model.collector().model_vars()[0].step, 5);
    }

    #[test]
    fn test_run_until_respects_stop() {
        let mut model = BoltzmannModel::new(ModelParams::new(10, 3, 3), 3).unwrap();
        model.run_until(4);
        assert_eq!(model.current_step(), 4);

        model.stop();
        model.run_until(10);
        assert_eq!(model.current_step(), 4);
        assert!(!model.is_running());
    }

    #[test]
    fn test_inequality_emerges() {
        let mut model = BoltzmannModel::new(ModelParams::new(100, 10, 10), 42).unwrap();
        assert!(model.gini().abs() < 1e-12);
        model.run(100);
        assert!(model.gini() > 0.2, "gini after 100 steps: {}", model.gini());
        assert!(model.total_transfers() > 0);
    }

    #[test]
    fn test_summary() {
        let mut model = BoltzmannModel::new(ModelParams::new(50, 10, 10), 9).unwrap();
        model.run(20);
        let summary = model.summary(3);

        assert_eq!(summary.label, "run_000003");
        assert_eq!(summary.steps, 20);
        assert_eq!(summary.total_wealth, 50);
        assert_eq!(summary.mean_wealth, 1.0);
        let counted: usize = summary.histogram.iter().map(|b| b.count).sum();
        assert_eq!(counted, 50);
    }
}

//! Batch Runner
//!
//! Expands a sweep into runs, executes them (in parallel on a rayon pool by
//! default) and merges their rows ordered by run, step and agent.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use uuid::Uuid;
use wealth_records::{BatchRow, BatchSummary, ParameterSet, ReporterSummary, ReporterValues};

use crate::collector::{AgentReporter, DataCollector, ModelReporter};
use crate::model::{BoltzmannModel, ModelError, ModelParams};

use super::sweep::{CollectionPeriod, ParameterSweep};

/// Errors from batch runs
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid sweep: {0}")]
    InvalidSweep(String),

    #[error("run {run_id} failed: {source}")]
    Run {
        run_id: u64,
        #[source]
        source: ModelError,
    },

    #[error("could not build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// One planned run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpec {
    pub run_id: u64,
    pub iteration: usize,
    pub params: ParameterSet,
    pub seed: u64,
}

/// Configures and executes a sweep
#[derive(Debug, Clone)]
pub struct BatchRunner {
    sweep: ParameterSweep,
    iterations: usize,
    max_steps: u64,
    collection: CollectionPeriod,
    include_agents: bool,
    base_seed: u64,
    parallel: bool,
    threads: Option<usize>,
    torus: bool,
    model_reporters: Vec<ModelReporter>,
    agent_reporters: Vec<AgentReporter>,
}

impl BatchRunner {
    pub fn new(sweep: ParameterSweep) -> Self {
        Self {
            sweep,
            iterations: 1,
            max_steps: 100,
            collection: CollectionPeriod::EveryStep,
            include_agents: false,
            base_seed: 42,
            parallel: true,
            threads: None,
            torus: true,
            model_reporters: vec![ModelReporter::Gini],
            agent_reporters: vec![AgentReporter::Wealth],
        }
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn collection(mut self, collection: CollectionPeriod) -> Self {
        self.collection = collection;
        self
    }

    /// Emit one row per agent (with the model values merged in) instead of
    /// one row per step
    pub fn include_agents(mut self, include: bool) -> Self {
        self.include_agents = include;
        self
    }

    pub fn base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Worker count; `None` uses rayon's default
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    pub fn torus(mut self, torus: bool) -> Self {
        self.torus = torus;
        self
    }

    pub fn model_reporters(mut self, reporters: Vec<ModelReporter>) -> Self {
        self.model_reporters = reporters;
        self
    }

    pub fn agent_reporters(mut self, reporters: Vec<AgentReporter>) -> Self {
        self.agent_reporters = reporters;
        self
    }

    /// Every run in execution order. Seeds are `base_seed + run_id`.
    pub fn plan(&self) -> Result<Vec<RunSpec>, BatchError> {
        if self.iterations == 0 {
            return Err(BatchError::InvalidSweep(
                "iterations must be at least 1".to_string(),
            ));
        }
        let sets = self.sweep.combinations().map_err(BatchError::InvalidSweep)?;

        let mut specs = Vec::with_capacity(sets.len() * self.iterations);
        for params in sets {
            for iteration in 0..self.iterations {
                let run_id = specs.len() as u64;
                specs.push(RunSpec {
                    run_id,
                    iteration,
                    params,
                    seed: self.base_seed.wrapping_add(run_id),
                });
            }
        }
        Ok(specs)
    }

    /// Execute every run and gather the rows
    pub fn run(&self) -> Result<BatchResult, BatchError> {
        let specs = self.plan()?;
        let total = specs.len();
        let done = AtomicUsize::new(0);

        tracing::info!(
            "starting batch: {} runs x {} steps ({})",
            total,
            self.max_steps,
            if self.parallel { "parallel" } else { "sequential" }
        );

        let execute = |spec: &RunSpec| {
            let rows = self.execute(spec);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if finished % progress_interval(total) == 0 || finished == total {
                tracing::info!("batch progress: {}/{} runs", finished, total);
            }
            rows
        };

        let results: Vec<Result<Vec<BatchRow>, BatchError>> = if self.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads.unwrap_or(0))
                .build()?;
            pool.install(|| specs.par_iter().map(execute).collect())
        } else {
            specs.iter().map(execute).collect()
        };

        let mut rows = Vec::new();
        for result in results {
            rows.extend(result?);
        }

        Ok(BatchResult {
            batch_id: Uuid::new_v4(),
            runs: specs,
            rows,
            iterations: self.iterations,
            max_steps: self.max_steps,
        })
    }

    /// Run a single spec to completion
    fn execute(&self, spec: &RunSpec) -> Result<Vec<BatchRow>, BatchError> {
        let agent_reporters = if self.include_agents {
            self.agent_reporters.clone()
        } else {
            Vec::new()
        };
        let collector = DataCollector::new(self.model_reporters.clone(), agent_reporters);
        let params = ModelParams::from_parameter_set(spec.params, self.torus);

        let mut model = BoltzmannModel::with_manual_collection(params, spec.seed, collector)
            .map_err(|source| BatchError::Run {
                run_id: spec.run_id,
                source,
            })?;

        loop {
            let step = model.current_step();
            if self.collection.should_collect(step, self.max_steps) {
                model.collect();
            }
            if step >= self.max_steps || !model.is_running() {
                break;
            }
            model.step();
        }

        tracing::debug!(
            "run {} finished (agents={}, seed={})",
            spec.run_id,
            spec.params.num_agents,
            spec.seed
        );

        Ok(self.rows_for(spec, &model.into_collector()))
    }

    fn rows_for(&self, spec: &RunSpec, collector: &DataCollector) -> Vec<BatchRow> {
        let row = |step: u64, agent_id: Option<u64>, values: ReporterValues| BatchRow {
            run_id: spec.run_id,
            iteration: spec.iteration,
            seed: spec.seed,
            params: spec.params,
            step,
            agent_id,
            values,
        };

        if !self.include_agents || collector.agent_reporters().is_empty() {
            return collector
                .model_vars()
                .iter()
                .map(|m| row(m.step, None, m.values.clone()))
                .collect();
        }

        let by_step: BTreeMap<u64, &ReporterValues> = collector
            .model_vars()
            .iter()
            .map(|m| (m.step, &m.values))
            .collect();

        collector
            .agent_vars()
            .iter()
            .map(|a| {
                let mut values = by_step.get(&a.step).map(|v| (*v).clone()).unwrap_or_default();
                for (name, value) in a.values.iter() {
                    values.insert(name, value);
                }
                row(a.step, Some(a.agent_id), values)
            })
            .collect()
    }
}

fn progress_interval(total: usize) -> usize {
    (total / 10).max(1)
}

/// Everything a sweep produced
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub runs: Vec<RunSpec>,
    pub rows: Vec<BatchRow>,
    pub iterations: usize,
    pub max_steps: u64,
}

impl BatchResult {
    /// Each run's rows at the last step it recorded
    pub fn final_rows(&self) -> Vec<&BatchRow> {
        let mut last_step: BTreeMap<u64, u64> = BTreeMap::new();
        for row in &self.rows {
            let entry = last_step.entry(row.run_id).or_insert(row.step);
            *entry = (*entry).max(row.step);
        }
        self.rows
            .iter()
            .filter(|row| last_step.get(&row.run_id) == Some(&row.step))
            .collect()
    }

    /// Mean, sample standard deviation and range of one reporter's final value,
    /// grouped by parameter set
    pub fn summarize(&self, reporter: ModelReporter) -> Vec<ReporterSummary> {
        summarize_rows(&self.rows, reporter)
    }

    /// Per-run mean of an agent reporter at the final step, grouped by
    /// parameter set. Empty unless the batch collected agents.
    pub fn summarize_agents(&self, reporter: AgentReporter) -> Vec<ReporterSummary> {
        summarize_agent_rows(&self.rows, reporter)
    }

    /// Summaries for every model reporter present in the rows
    pub fn summary(&self, reporters: &[ModelReporter]) -> BatchSummary {
        BatchSummary {
            batch_id: self.batch_id,
            total_runs: self.runs.len(),
            iterations: self.iterations,
            max_steps: self.max_steps,
            row_count: self.rows.len(),
            summaries: reporters
                .iter()
                .flat_map(|r| self.summarize(*r))
                .collect(),
        }
    }
}

/// Group each run's final value of a model reporter by parameter set.
///
/// Model values repeat on every agent row of a step, so runs collected with
/// agents still count once.
pub fn summarize_rows(rows: &[BatchRow], reporter: ModelReporter) -> Vec<ReporterSummary> {
    let name = reporter.name();
    let mut finals: BTreeMap<u64, (u64, ParameterSet, f64)> = BTreeMap::new();
    for row in rows {
        let Some(value) = row.values.get(name) else {
            continue;
        };
        match finals.get(&row.run_id) {
            Some((step, _, _)) if *step >= row.step => {}
            _ => {
                finals.insert(row.run_id, (row.step, row.params, value.as_f64()));
            }
        }
    }

    aggregate(name, finals.into_values().map(|(_, params, value)| (params, value)))
}

/// Group each run's mean agent value at its final step by parameter set.
///
/// Rows without an agent id are ignored.
pub fn summarize_agent_rows(rows: &[BatchRow], reporter: AgentReporter) -> Vec<ReporterSummary> {
    let name = reporter.name();
    // run -> (step, params, sum, agents)
    let mut finals: BTreeMap<u64, (u64, ParameterSet, f64, usize)> = BTreeMap::new();
    for row in rows {
        if row.agent_id.is_none() {
            continue;
        }
        let Some(value) = row.values.get(name) else {
            continue;
        };
        let value = value.as_f64();
        match finals.get_mut(&row.run_id) {
            Some(entry) if entry.0 > row.step => {}
            Some(entry) if entry.0 == row.step => {
                entry.2 += value;
                entry.3 += 1;
            }
            _ => {
                finals.insert(row.run_id, (row.step, row.params, value, 1));
            }
        }
    }

    aggregate(
        name,
        finals
            .into_values()
            .map(|(_, params, sum, agents)| (params, sum / agents as f64)),
    )
}

fn aggregate(
    reporter: &str,
    finals: impl Iterator<Item = (ParameterSet, f64)>,
) -> Vec<ReporterSummary> {
    let mut grouped: BTreeMap<ParameterSet, Vec<f64>> = BTreeMap::new();
    for (params, value) in finals {
        grouped.entry(params).or_default().push(value);
    }

    grouped
        .into_iter()
        .map(|(params, values)| {
            let runs = values.len();
            let mean = values.iter().sum::<f64>() / runs as f64;
            let std_dev = if runs > 1 {
                let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (runs - 1) as f64;
                var.sqrt()
            } else {
                0.0
            };
            ReporterSummary {
                params,
                reporter: reporter.to_string(),
                runs,
                mean,
                std_dev,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            }
        })
        .collect()
}

//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // wealth-records = { path = "../wealth-records", features = ["test-fixtures"] }
//!
//! use wealth_records::fixtures;
//!
//! let snapshot = fixtures::sample_snapshot();
//! let rows = fixtures::sample_batch_rows();
//! ```

use crate::{BatchRow, ModelRow, ParameterSet, ReporterValue, ReporterValues, WealthSnapshot};

/// A ten-agent snapshot holding ten units in total, moderately unequal.
pub fn sample_snapshot() -> WealthSnapshot {
    WealthSnapshot::new(20, vec![0, 0, 1, 1, 1, 1, 1, 2, 0, 3])
}

/// Three model rows with a Gini series rising from equality.
pub fn sample_model_rows() -> Vec<ModelRow> {
    [(0u64, 0.0f64), (1, 0.18), (2, 0.32)]
        .into_iter()
        .map(|(step, gini)| {
            let mut values = ReporterValues::new();
            values.insert("Gini", ReporterValue::Float(gini));
            values.insert("Total_Wealth", ReporterValue::Int(10));
            ModelRow { step, values }
        })
        .collect()
}

/// Final-step model rows for two parameter sets, two iterations each.
///
/// - 10 agents: Gini 0.4 and 0.6
/// - 20 agents: Gini 0.5 and 0.5
pub fn sample_batch_rows() -> Vec<BatchRow> {
    let params = |num_agents| ParameterSet {
        num_agents,
        width: 10,
        height: 10,
        initial_wealth: 1,
    };

    [(10usize, 0usize, 0.4f64), (10, 1, 0.6), (20, 0, 0.5), (20, 1, 0.5)]
        .into_iter()
        .enumerate()
        .map(|(run_id, (agents, iteration, gini))| {
            let mut values = ReporterValues::new();
            values.insert("Gini", ReporterValue::Float(gini));
            BatchRow {
                run_id: run_id as u64,
                iteration,
                seed: 42 + run_id as u64,
                params: params(agents),
                step: 100,
                agent_id: None,
                values,
            }
        })
        .collect()
}

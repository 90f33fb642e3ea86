//! Batch Records
//!
//! Rows and summaries produced by parameter sweeps.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ReporterValues;

/// Concrete parameter values used by one run of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterSet {
    pub num_agents: usize,
    pub width: usize,
    pub height: usize,
    pub initial_wealth: u64,
}

/// One collected row from a batch run.
///
/// Model-level rows leave `agent_id` empty; agent-level rows carry the agent
/// values merged after the model values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    pub run_id: u64,
    pub iteration: usize,
    pub seed: u64,
    pub params: ParameterSet,
    pub step: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<u64>,
    pub values: ReporterValues,
}

impl BatchRow {
    /// Serializes the row to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a row from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Aggregate of one reporter's final-step values for a parameter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReporterSummary {
    pub params: ParameterSet,
    pub reporter: String,
    pub runs: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Summary of a whole sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub total_runs: usize,
    pub iterations: usize,
    pub max_steps: u64,
    pub row_count: usize,
    pub summaries: Vec<ReporterSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReporterValue;

    #[test]
    fn test_model_row_omits_agent_id() {
        let mut values = ReporterValues::new();
        values.insert("Gini", ReporterValue::Float(0.5));

        let row = BatchRow {
            run_id: 1,
            iteration: 0,
            seed: 43,
            params: ParameterSet {
                num_agents: 10,
                width: 10,
                height: 10,
                initial_wealth: 1,
            },
            step: 100,
            agent_id: None,
            values,
        };

        let line = row.to_jsonl().unwrap();
        assert!(!line.contains("agent_id"));
        assert!(!line.contains('\n'));

        let parsed = BatchRow::from_jsonl(&line).unwrap();
        assert_eq!(parsed, row);
    }
}

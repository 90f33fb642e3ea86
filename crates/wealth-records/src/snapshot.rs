//! Snapshot Types
//!
//! Wealth snapshots and run summaries.
//!
//! A snapshot captures every agent's wealth at one step. Summaries condense a
//! finished run for analysis and are written out as JSON.

use serde::{Deserialize, Serialize};

/// Generates a run label with the given sequence number.
pub fn generate_run_label(run_id: u64) -> String {
    format!("run_{:06}", run_id)
}

/// A cell coordinate on the simulation grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: usize,
    pub y: usize,
}

impl GridPosition {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Per-agent wealth values at one step, ordered by agent id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WealthSnapshot {
    pub step: u64,
    pub wealths: Vec<u64>,
}

impl WealthSnapshot {
    pub fn new(step: u64, wealths: Vec<u64>) -> Self {
        Self { step, wealths }
    }

    /// Sum of all holdings, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        let exact: u128 = self.wealths.iter().map(|&w| u128::from(w)).sum();
        u64::try_from(exact).unwrap_or(u64::MAX)
    }

    pub fn len(&self) -> usize {
        self.wealths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wealths.is_empty()
    }
}

/// Number of agents holding exactly `wealth` units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub wealth: u64,
    pub count: usize,
}

/// Summary of a single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub label: String,
    pub seed: u64,
    pub num_agents: usize,
    pub width: usize,
    pub height: usize,
    pub steps: u64,
    pub total_wealth: u64,
    pub final_gini: f64,
    pub max_wealth: u64,
    pub mean_wealth: f64,
    /// Fraction of all wealth held by the richest tenth of agents
    pub top_decile_share: f64,
    #[serde(default)]
    pub histogram: Vec<HistogramBin>,
}

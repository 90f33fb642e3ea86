//! Batch Runs
//!
//! Sweeps model parameters across repeated iterations and gathers every run's
//! collected rows into one table for comparison.

pub mod runner;
pub mod sweep;

pub use runner::{summarize_agent_rows, summarize_rows, BatchError, BatchResult, BatchRunner, RunSpec};
pub use sweep::{CollectionPeriod, ParameterSweep, SweepValues};

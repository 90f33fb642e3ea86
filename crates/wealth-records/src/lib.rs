//! Shared record types for the Boltzmann wealth simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The simulation engine produces these records and any downstream
//! analysis tooling consumes them.

pub mod batch;
pub mod rows;
pub mod snapshot;
pub mod value;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export value types
pub use value::ReporterValue;

// Re-export row types
pub use rows::{AgentRow, ModelRow, ReporterValues};

// Re-export snapshot types
pub use snapshot::{
    generate_run_label, GridPosition, HistogramBin, RunSummary, WealthSnapshot,
};

// Re-export batch types
pub use batch::{BatchRow, BatchSummary, ParameterSet, ReporterSummary};

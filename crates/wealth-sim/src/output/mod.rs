//! Output
//!
//! CSV tables and JSON summaries written to an output directory.

pub mod csv;
pub mod summary;

pub use csv::{agent_vars_csv, batch_csv, histogram_csv, model_vars_csv};
pub use summary::{
    write_batch_outputs, write_json, write_jsonl, write_run_outputs, BatchOutputPaths, RunOutputPaths,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

//! Run and Batch Output
//!
//! Writes the full set of files for a finished run or sweep.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use wealth_records::{BatchRow, BatchSummary, RunSummary};

use crate::batch::BatchResult;
use crate::collector::ModelReporter;
use crate::model::BoltzmannModel;

use super::csv::{agent_vars_csv, batch_csv, histogram_csv, model_vars_csv, write_csv};
use super::OutputError;

/// Files written for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutputPaths {
    pub model_vars: PathBuf,
    pub agent_vars: Option<PathBuf>,
    pub histogram: PathBuf,
    pub summary: PathBuf,
}

/// Files written for a sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutputPaths {
    pub rows: PathBuf,
    pub rows_jsonl: PathBuf,
    pub summary: PathBuf,
}

/// Write any serializable value as pretty JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}

/// Write rows as JSON lines, one row per line
pub fn write_jsonl(path: &Path, rows: &[BatchRow]) -> Result<(), OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    for row in rows {
        writeln!(writer, "{}", row.to_jsonl()?).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Writes:
/// - `model_vars.csv` - model reporters per step
/// - `agent_vars.csv` - agent reporters per step (optional)
/// - `histogram.csv` - final wealth distribution
/// - `summary.json` - [`RunSummary`]
pub fn write_run_outputs(
    dir: &Path,
    model: &mut BoltzmannModel,
    write_agents: bool,
) -> Result<(RunOutputPaths, RunSummary), OutputError> {
    let summary = model.summary(0);
    let collector = model.collector();

    let paths = RunOutputPaths {
        model_vars: dir.join("model_vars.csv"),
        agent_vars: write_agents.then(|| dir.join("agent_vars.csv")),
        histogram: dir.join("histogram.csv"),
        summary: dir.join("summary.json"),
    };

    write_csv(&paths.model_vars, &model_vars_csv(collector.model_vars()))?;
    if let Some(path) = &paths.agent_vars {
        write_csv(path, &agent_vars_csv(collector.agent_vars()))?;
    }
    write_csv(&paths.histogram, &histogram_csv(&summary.histogram))?;
    write_json(&paths.summary, &summary)?;

    Ok((paths, summary))
}

/// Writes:
/// - `batch.csv` - every collected row
/// - `batch.jsonl` - the same rows as JSON lines
/// - `batch_summary.json` - [`BatchSummary`] of final values per parameter set
pub fn write_batch_outputs(
    dir: &Path,
    result: &BatchResult,
    reporters: &[ModelReporter],
) -> Result<(BatchOutputPaths, BatchSummary), OutputError> {
    let summary = result.summary(reporters);
    let paths = BatchOutputPaths {
        rows: dir.join("batch.csv"),
        rows_jsonl: dir.join("batch.jsonl"),
        summary: dir.join("batch_summary.json"),
    };

    write_csv(&paths.rows, &batch_csv(&result.rows))?;
    write_jsonl(&paths.rows_jsonl, &result.rows)?;
    write_json(&paths.summary, &summary)?;

    Ok((paths, summary))
}

//! CSV Tables
//!
//! Flat tables of collected rows. Every cell is numeric, so no quoting is needed.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use wealth_records::{AgentRow, BatchRow, HistogramBin, ModelRow, ReporterValues};

use super::OutputError;

/// Union of value column names in first-seen order
fn value_columns<'a>(values: impl Iterator<Item = &'a ReporterValues>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in values {
        for name in row.names() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }
    columns
}

fn push_values(out: &mut String, values: &ReporterValues, columns: &[String]) {
    for column in columns {
        out.push(',');
        if let Some(value) = values.get(column) {
            let _ = write!(out, "{}", value);
        }
    }
    out.push('\n');
}

/// `Step,<model reporters...>`
pub fn model_vars_csv(rows: &[ModelRow]) -> String {
    let columns = value_columns(rows.iter().map(|r| &r.values));
    let mut out = String::from("Step");
    for c in &columns {
        out.push(',');
        out.push_str(c);
    }
    out.push('\n');

    for row in rows {
        let _ = write!(out, "{}", row.step);
        push_values(&mut out, &row.values, &columns);
    }
    out
}

/// `Step,AgentID,<agent reporters...>`
pub fn agent_vars_csv(rows: &[AgentRow]) -> String {
    let columns = value_columns(rows.iter().map(|r| &r.values));
    let mut out = String::from("Step,AgentID");
    for c in &columns {
        out.push(',');
        out.push_str(c);
    }
    out.push('\n');

    for row in rows {
        let _ = write!(out, "{},{}", row.step, row.agent_id);
        push_values(&mut out, &row.values, &columns);
    }
    out
}

/// One line per batch row, parameters first. `AgentID` is blank on model rows.
pub fn batch_csv(rows: &[BatchRow]) -> String {
    let columns = value_columns(rows.iter().map(|r| &r.values));
    let mut out = String::from("RunId,iteration,seed,num_agents,width,height,initial_wealth,Step,AgentID");
    for c in &columns {
        out.push(',');
        out.push_str(c);
    }
    out.push('\n');

    for row in rows {
        let _ = write!(
            out,
            "{},{},{},{},{},{},{},{},",
            row.run_id,
            row.iteration,
            row.seed,
            row.params.num_agents,
            row.params.width,
            row.params.height,
            row.params.initial_wealth,
            row.step
        );
        if let Some(agent_id) = row.agent_id {
            let _ = write!(out, "{}", agent_id);
        }
        push_values(&mut out, &row.values, &columns);
    }
    out
}

/// `wealth,count`
pub fn histogram_csv(bins: &[HistogramBin]) -> String {
    let mut out = String::from("wealth,count\n");
    for bin in bins {
        let _ = writeln!(out, "{},{}", bin.wealth, bin.count);
    }
    out
}

/// Write a table, creating parent directories as needed
pub fn write_csv(path: &Path, content: &str) -> Result<(), OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}

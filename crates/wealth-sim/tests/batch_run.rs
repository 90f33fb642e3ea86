//! End-to-end batch runs

use std::collections::BTreeSet;

use wealth_sim::batch::{BatchRunner, CollectionPeriod, ParameterSweep, SweepValues};
use wealth_sim::collector::{AgentReporter, ModelReporter};
use wealth_sim::SimConfig;

fn small_sweep() -> ParameterSweep {
    ParameterSweep {
        num_agents: SweepValues::List(vec![10, 20]),
        width: SweepValues::Fixed(5),
        height: SweepValues::Fixed(5),
        initial_wealth: SweepValues::Fixed(1),
    }
}

#[test]
fn test_run_count_matches_sweep_times_iterations() {
    let result = BatchRunner::new(small_sweep())
        .iterations(3)
        .max_steps(10)
        .collection(CollectionPeriod::EndOnly)
        .run()
        .unwrap();

    assert_eq!(result.runs.len(), 6);
    let run_ids: BTreeSet<u64> = result.rows.iter().map(|r| r.run_id).collect();
    assert_eq!(run_ids.len(), 6);
}

#[test]
fn test_end_only_yields_one_row_per_run() {
    let result = BatchRunner::new(small_sweep())
        .iterations(2)
        .max_steps(15)
        .collection(CollectionPeriod::EndOnly)
        .run()
        .unwrap();

    assert_eq!(result.rows.len(), result.runs.len());
    assert!(result.rows.iter().all(|r| r.step == 15));
}

#[test]
fn test_every_step_collects_initial_and_final() {
    let result = BatchRunner::new(small_sweep())
        .max_steps(5)
        .collection(CollectionPeriod::EveryStep)
        .run()
        .unwrap();

    // Steps 0..=5 for each of the two runs
    assert_eq!(result.rows.len(), 2 * 6);
}

#[test]
fn test_agent_rows_carry_model_values() {
    let result = BatchRunner::new(small_sweep())
        .max_steps(5)
        .collection(CollectionPeriod::EndOnly)
        .include_agents(true)
        .model_reporters(vec![ModelReporter::Gini])
        .agent_reporters(vec![AgentReporter::Wealth])
        .run()
        .unwrap();

    assert_eq!(result.rows.len(), 10 + 20);
    for row in &result.rows {
        assert!(row.agent_id.is_some());
        assert!(row.values.get("Gini").is_some());
        assert!(row.values.get("Wealth").is_some());
    }
}

#[test]
fn test_batch_wealth_conserved_per_run() {
    let result = BatchRunner::new(small_sweep())
        .max_steps(20)
        .collection(CollectionPeriod::EndOnly)
        .model_reporters(vec![ModelReporter::TotalWealth])
        .run()
        .unwrap();

    for row in &result.rows {
        let total = row.values.get("Total_Wealth").and_then(|v| v.as_i64()).unwrap();
        assert_eq!(total as usize, row.params.num_agents);
    }
}

#[test]
fn test_config_driven_batch() {
    let config = SimConfig::from_str(
        r#"
[batch]
iterations = 2
max_steps = 10
collection = "end_only"
parallel = false

[batch.sweep]
num_agents = { start = 10, end = 30, step = 10 }
"#,
    )
    .unwrap();

    let result = config.batch.runner(config.model.torus).run().unwrap();
    let summary = result.summary(&config.batch.model_reporters);

    assert_eq!(summary.total_runs, 4);
    assert_eq!(summary.summaries.len(), 2);
    for s in &summary.summaries {
        assert_eq!(s.runs, 2);
        assert!(s.mean >= 0.0 && s.mean <= 1.0);
    }
}

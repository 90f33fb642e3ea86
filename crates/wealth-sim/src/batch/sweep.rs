//! Parameter Sweeps
//!
//! Each swept parameter is a fixed value, an explicit list, or a range.
//! The sweep is the Cartesian product of all of them.

use serde::{Deserialize, Serialize};
use wealth_records::ParameterSet;

/// Values taken by one swept parameter.
///
/// In TOML any of these work:
///
/// ```toml
/// width = 10
/// num_agents = [10, 50, 100]
/// num_agents = { start = 10, end = 500, step = 10 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SweepValues {
    Fixed(u64),
    List(Vec<u64>),
    /// `start` inclusive, `end` exclusive
    Range {
        start: u64,
        end: u64,
        #[serde(default = "default_range_step")]
        step: u64,
    },
}

fn default_range_step() -> u64 {
    1
}

impl SweepValues {
    /// Expand to concrete values. Fails on an empty list or a zero step.
    pub fn values(&self) -> Result<Vec<u64>, String> {
        let values = match self {
            SweepValues::Fixed(v) => vec![*v],
            SweepValues::List(vs) => vs.clone(),
            SweepValues::Range { start, end, step } => {
                if *step == 0 {
                    return Err("range step must be positive".to_string());
                }
                (*start..*end).step_by(*step as usize).collect()
            }
        };
        if values.is_empty() {
            return Err("sweep produces no values".to_string());
        }
        Ok(values)
    }
}

/// Sweep over every model parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSweep {
    pub num_agents: SweepValues,
    pub width: SweepValues,
    pub height: SweepValues,
    pub initial_wealth: SweepValues,
}

impl Default for ParameterSweep {
    fn default() -> Self {
        Self {
            num_agents: SweepValues::Fixed(100),
            width: SweepValues::Fixed(10),
            height: SweepValues::Fixed(10),
            initial_wealth: SweepValues::Fixed(1),
        }
    }
}

impl ParameterSweep {
    /// Every combination, with `num_agents` varying slowest.
    pub fn combinations(&self) -> Result<Vec<ParameterSet>, String> {
        let agents = self.num_agents.values().map_err(|e| format!("num_agents: {}", e))?;
        let widths = self.width.values().map_err(|e| format!("width: {}", e))?;
        let heights = self.height.values().map_err(|e| format!("height: {}", e))?;
        let wealths = self
            .initial_wealth
            .values()
            .map_err(|e| format!("initial_wealth: {}", e))?;

        let mut sets = Vec::with_capacity(agents.len() * widths.len() * heights.len() * wealths.len());
        for &num_agents in &agents {
            for &width in &widths {
                for &height in &heights {
                    for &initial_wealth in &wealths {
                        sets.push(ParameterSet {
                            num_agents: num_agents as usize,
                            width: width as usize,
                            height: height as usize,
                            initial_wealth,
                        });
                    }
                }
            }
        }
        Ok(sets)
    }
}

/// When a batch run records data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionPeriod {
    /// Every step including the initial state
    #[default]
    EveryStep,
    /// Every `n` steps, plus the final step
    Every(u64),
    /// Only the final step
    EndOnly,
}

impl CollectionPeriod {
    pub fn should_collect(&self, step: u64, max_steps: u64) -> bool {
        match *self {
            CollectionPeriod::EveryStep => true,
            CollectionPeriod::Every(n) => step == max_steps || (n > 0 && step % n == 0),
            CollectionPeriod::EndOnly => step == max_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_values() {
        assert_eq!(SweepValues::Fixed(5).values().unwrap(), vec![5]);
        assert_eq!(SweepValues::List(vec![1, 3]).values().unwrap(), vec![1, 3]);
        assert_eq!(
            SweepValues::Range { start: 10, end: 50, step: 10 }.values().unwrap(),
            vec![10, 20, 30, 40]
        );
        assert!(SweepValues::List(vec![]).values().is_err());
        assert!(SweepValues::Range { start: 0, end: 5, step: 0 }.values().is_err());
        assert!(SweepValues::Range { start: 5, end: 5, step: 1 }.values().is_err());
    }

    #[test]
    fn test_tutorial_range() {
        // range(10, 500, 10)
        let values = SweepValues::Range { start: 10, end: 500, step: 10 }.values().unwrap();
        assert_eq!(values.len(), 49);
        assert_eq!(values.first(), Some(&10));
        assert_eq!(values.last(), Some(&490));
    }

    #[test]
    fn test_combinations_order() {
        let sweep = ParameterSweep {
            num_agents: SweepValues::List(vec![10, 20]),
            width: SweepValues::List(vec![5, 10]),
            ..ParameterSweep::default()
        };
        let sets = sweep.combinations().unwrap();
        assert_eq!(sets.len(), 4);
        assert_eq!((sets[0].num_agents, sets[0].width), (10, 5));
        assert_eq!((sets[1].num_agents, sets[1].width), (10, 10));
        assert_eq!((sets[2].num_agents, sets[2].width), (20, 5));
    }

    #[test]
    fn test_combinations_error_names_parameter() {
        let sweep = ParameterSweep {
            height: SweepValues::List(vec![]),
            ..ParameterSweep::default()
        };
        assert!(sweep.combinations().unwrap_err().starts_with("height"));
    }

    #[test]
    fn test_sweep_from_toml() {
        let toml = r#"
            num_agents = { start = 10, end = 40, step = 10 }
            width = [5, 10]
            height = 10
        "#;
        let sweep: ParameterSweep = toml::from_str(toml).unwrap();
        assert_eq!(sweep.num_agents.values().unwrap(), vec![10, 20, 30]);
        assert_eq!(sweep.width, SweepValues::List(vec![5, 10]));
        assert_eq!(sweep.height, SweepValues::Fixed(10));
        assert_eq!(sweep.initial_wealth, SweepValues::Fixed(1));
    }

    #[test]
    fn test_range_default_step() {
        let sweep: ParameterSweep = toml::from_str("num_agents = { start = 1, end = 4 }").unwrap();
        assert_eq!(sweep.num_agents.values().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_collection_period() {
        assert!(CollectionPeriod::EveryStep.should_collect(0, 10));
        assert!(CollectionPeriod::EndOnly.should_collect(10, 10));
        assert!(!CollectionPeriod::EndOnly.should_collect(9, 10));

        let every = CollectionPeriod::Every(4);
        let steps: Vec<u64> = (0..=10).filter(|&s| every.should_collect(s, 10)).collect();
        assert_eq!(steps, vec![0, 4, 8, 10]);
    }

    #[test]
    fn test_collection_period_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            collection: CollectionPeriod,
        }
        let w: Wrapper = toml::from_str(r#"collection = "end_only""#).unwrap();
        assert_eq!(w.collection, CollectionPeriod::EndOnly);
        let w: Wrapper = toml::from_str("collection = { every = 5 }").unwrap();
        assert_eq!(w.collection, CollectionPeriod::Every(5));
    }
}

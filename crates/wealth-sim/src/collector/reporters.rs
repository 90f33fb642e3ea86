//! Reporters
//!
//! The fixed set of quantities the collector knows how to record. Reporters
//! are chosen when the collector is built; each maps to one column.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use wealth_records::{GridPosition, ReporterValue, WealthSnapshot};

use crate::components::agent::{Agent, AgentId, Position, StepsNotGiven, Wealth};
use crate::metrics::gini;
use crate::systems::exchange::TransferTally;

/// One agent's collectable state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentView {
    pub id: u64,
    pub wealth: u64,
    pub steps_not_given: u64,
    pub position: GridPosition,
}

/// Every agent's state at one step, ordered by agent id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Population {
    pub step: u64,
    pub agents: Vec<AgentView>,
    pub transfers: u64,
}

impl Population {
    /// Read the population out of the world
    pub fn gather(world: &mut World, step: u64) -> Self {
        let mut query = world
            .query_filtered::<(&AgentId, &Wealth, &StepsNotGiven, &Position), With<Agent>>();
        let mut agents: Vec<AgentView> = query
            .iter(world)
            .map(|(id, wealth, steps_not_given, position)| AgentView {
                id: id.0,
                wealth: wealth.0,
                steps_not_given: steps_not_given.0,
                position: position.0,
            })
            .collect();
        agents.sort_unstable_by_key(|a| a.id);

        let transfers = world
            .get_resource::<TransferTally>()
            .map(|t| t.this_step)
            .unwrap_or(0);

        Self {
            step,
            agents,
            transfers,
        }
    }

    pub fn wealths(&self) -> Vec<u64> {
        self.agents.iter().map(|a| a.wealth).collect()
    }

    pub fn snapshot(&self) -> WealthSnapshot {
        WealthSnapshot::new(self.step, self.wealths())
    }
}

/// Error for unknown reporter names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reporter '{0}'")]
pub struct UnknownReporter(pub String);

/// Model-level reporters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelReporter {
    /// Gini coefficient of all agents' wealth
    Gini,
    /// Sum of all wealth; constant over a run
    TotalWealth,
    AgentCount,
    MaxWealth,
    /// Transfers completed during the step just run
    Transfers,
}

impl ModelReporter {
    pub const ALL: [ModelReporter; 5] = [
        ModelReporter::Gini,
        ModelReporter::TotalWealth,
        ModelReporter::AgentCount,
        ModelReporter::MaxWealth,
        ModelReporter::Transfers,
    ];

    /// Column name
    pub fn name(&self) -> &'static str {
        match self {
            ModelReporter::Gini => "Gini",
            ModelReporter::TotalWealth => "Total_Wealth",
            ModelReporter::AgentCount => "Agent_Count",
            ModelReporter::MaxWealth => "Max_Wealth",
            ModelReporter::Transfers => "Transfers",
        }
    }

    /// Config key, matching the serde name
    pub fn key(&self) -> &'static str {
        match self {
            ModelReporter::Gini => "gini",
            ModelReporter::TotalWealth => "total_wealth",
            ModelReporter::AgentCount => "agent_count",
            ModelReporter::MaxWealth => "max_wealth",
            ModelReporter::Transfers => "transfers",
        }
    }

    pub fn evaluate(&self, population: &Population) -> ReporterValue {
        match self {
            ModelReporter::Gini => ReporterValue::Float(gini(&population.wealths())),
            ModelReporter::TotalWealth => {
                ReporterValue::from(population.agents.iter().map(|a| a.wealth).sum::<u64>())
            }
            ModelReporter::AgentCount => ReporterValue::from(population.agents.len()),
            ModelReporter::MaxWealth => ReporterValue::from(
                population.agents.iter().map(|a| a.wealth).max().unwrap_or(0),
            ),
            ModelReporter::Transfers => ReporterValue::from(population.transfers),
        }
    }
}

impl fmt::Display for ModelReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelReporter {
    type Err = UnknownReporter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace('-', "_");
        ModelReporter::ALL
            .into_iter()
            .find(|r| r.key() == wanted || r.name().to_lowercase() == wanted)
            .ok_or_else(|| UnknownReporter(s.to_string()))
    }
}

/// Agent-level reporters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentReporter {
    Wealth,
    /// Consecutive steps the agent had nothing to give
    StepsNotGiven,
    PositionX,
    PositionY,
}

impl AgentReporter {
    pub const ALL: [AgentReporter; 4] = [
        AgentReporter::Wealth,
        AgentReporter::StepsNotGiven,
        AgentReporter::PositionX,
        AgentReporter::PositionY,
    ];

    /// Column name
    pub fn name(&self) -> &'static str {
        match self {
            AgentReporter::Wealth => "Wealth",
            AgentReporter::StepsNotGiven => "Steps_Not_Given",
            AgentReporter::PositionX => "X",
            AgentReporter::PositionY => "Y",
        }
    }

    /// Config key, matching the serde name
    pub fn key(&self) -> &'static str {
        match self {
            AgentReporter::Wealth => "wealth",
            AgentReporter::StepsNotGiven => "steps_not_given",
            AgentReporter::PositionX => "position_x",
            AgentReporter::PositionY => "position_y",
        }
    }

    pub fn evaluate(&self, agent: &AgentView) -> ReporterValue {
        match self {
            AgentReporter::Wealth => ReporterValue::from(agent.wealth),
            AgentReporter::StepsNotGiven => ReporterValue::from(agent.steps_not_given),
            AgentReporter::PositionX => ReporterValue::from(agent.position.x),
            AgentReporter::PositionY => ReporterValue::from(agent.position.y),
        }
    }
}

impl fmt::Display for AgentReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgentReporter {
    type Err = UnknownReporter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace('-', "_");
        AgentReporter::ALL
            .into_iter()
            .find(|r| r.key() == wanted || r.name().to_lowercase() == wanted)
            .ok_or_else(|| UnknownReporter(s.to_string()))
    }
}

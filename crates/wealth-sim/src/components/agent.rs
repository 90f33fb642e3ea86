//! Agent Components
//!
//! Components carried by every wealth-holding agent.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use wealth_records::GridPosition;

/// Marker component identifying an entity as an agent
#[derive(Component, Debug, Clone, Default)]
pub struct Agent;

/// Unique identifier for an agent, dense from 0 in spawn order
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AgentId(pub u64);

/// Units of wealth currently held
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wealth(pub u64);

/// Consecutive steps the agent was broke and could not give anything
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepsNotGiven(pub u64);

/// Component: An agent's current cell on the grid
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position(pub GridPosition);

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self(GridPosition::new(x, y))
    }
}

/// Everything needed to spawn one agent
#[derive(Bundle)]
pub struct AgentBundle {
    pub agent: Agent,
    pub id: AgentId,
    pub wealth: Wealth,
    pub steps_not_given: StepsNotGiven,
    pub position: Position,
}

impl AgentBundle {
    pub fn new(id: u64, wealth: u64, position: GridPosition) -> Self {
        Self {
            agent: Agent,
            id: AgentId(id),
            wealth: Wealth(wealth),
            steps_not_given: StepsNotGiven(0),
            position: Position(position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_bundle() {
        let mut world = World::new();
        let entity = world.spawn(AgentBundle::new(3, 1, GridPosition::new(2, 4))).id();

        assert_eq!(world.get::<AgentId>(entity), Some(&AgentId(3)));
        assert_eq!(world.get::<Wealth>(entity), Some(&Wealth(1)));
        assert_eq!(world.get::<StepsNotGiven>(entity), Some(&StepsNotGiven(0)));
        assert_eq!(world.get::<Position>(entity), Some(&Position::new(2, 4)));
        assert!(world.get::<Agent>(entity).is_some());
    }
}

//! Agent Spawning
//!
//! Places the initial population on the grid.

use bevy_ecs::prelude::*;
use rand::Rng;
use wealth_records::GridPosition;

use crate::components::agent::{Agent, AgentBundle, Wealth};
use crate::components::grid::{GridError, MultiGrid};

/// Configuration for agent spawning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnConfig {
    pub num_agents: usize,
    pub initial_wealth: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            num_agents: 100,
            initial_wealth: 1,
        }
    }
}

/// Pick a uniformly random cell
fn random_cell<R: Rng + ?Sized>(grid: &MultiGrid, rng: &mut R) -> GridPosition {
    GridPosition::new(rng.gen_range(0..grid.width()), rng.gen_range(0..grid.height()))
}

/// Spawn agents with ids `0..num_agents`, each on a random cell.
///
/// The world must already hold a [`MultiGrid`] resource. Returns the spawned
/// entities in id order.
pub fn spawn_agents<R: Rng + ?Sized>(
    world: &mut World,
    config: SpawnConfig,
    rng: &mut R,
) -> Result<Vec<Entity>, GridError> {
    let mut entities = Vec::with_capacity(config.num_agents);

    world.resource_scope(|world, mut grid: Mut<MultiGrid>| {
        for id in 0..config.num_agents {
            let cell = random_cell(&grid, rng);
            let entity = world
                .spawn(AgentBundle::new(id as u64, config.initial_wealth, cell))
                .id();
            grid.place_agent(entity, cell)?;
            entities.push(entity);
        }
        Ok::<(), GridError>(())
    })?;

    Ok(entities)
}

/// Population totals after spawning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnSummary {
    pub total_agents: usize,
    pub total_wealth: u64,
    pub occupied_cells: usize,
}

/// Count what was spawned
pub fn get_spawn_summary(world: &mut World) -> SpawnSummary {
    let mut query = world.query_filtered::<&Wealth, With<Agent>>();
    let (total_agents, total_wealth) = query
        .iter(world)
        .fold((0usize, 0u64), |(n, w), wealth| (n + 1, w + wealth.0));

    let grid = world.resource::<MultiGrid>();
    let mut occupied_cells = 0;
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            if let Ok(false) = grid.is_cell_empty(GridPosition::new(x, y)) {
                occupied_cells += 1;
            }
        }
    }

    SpawnSummary {
        total_agents,
        total_wealth,
        occupied_cells,
    }
}

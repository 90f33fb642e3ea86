//! Agent Step System
//!
//! Runs each agent's turn in activation order: move, then give.

use bevy_ecs::prelude::*;

use crate::components::agent::{Agent, Position, StepsNotGiven, Wealth};
use crate::components::grid::MultiGrid;
use crate::SimRng;

use super::activation::ActivationOrder;
use super::exchange::{choose_recipient, transfer_one, TransferTally};
use super::movement::choose_destination;

/// System: every agent moves to a random neighbouring cell and, if it has any
/// wealth, gives one unit to a random other agent sharing its new cell.
///
/// Agents act strictly one after another, so later agents see the moves and
/// transfers of earlier ones within the same step.
pub fn step_agents(
    mut rng: ResMut<SimRng>,
    mut grid: ResMut<MultiGrid>,
    mut tally: ResMut<TransferTally>,
    order: Res<ActivationOrder>,
    mut agents: Query<(&mut Position, &mut Wealth, &mut StepsNotGiven), With<Agent>>,
) {
    tally.begin_step();

    for entity in order.0.iter() {
        let Ok((mut position, wealth, mut steps_not_given)) = agents.get_mut(entity) else {
            continue;
        };

        // Move
        let from = position.0;
        match choose_destination(&grid, from, &mut rng.0) {
            Ok(Some(to)) => match grid.move_agent(entity, from, to) {
                Ok(()) => position.0 = to,
                Err(e) => tracing::warn!("agent {:?} could not move: {}", entity, e),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!("agent {:?} has no valid neighbourhood: {}", entity, e),
        }

        if wealth.0 == 0 {
            steps_not_given.0 += 1;
            continue;
        }
        steps_not_given.0 = 0;
        let here = position.0;

        // Give
        let recipient = match grid.cell_contents(here) {
            Ok(cellmates) => choose_recipient(cellmates, entity, &mut rng.0),
            Err(e) => {
                tracing::warn!("agent {:?} is off the grid: {}", entity, e);
                None
            }
        };
        let Some(recipient) = recipient else {
            continue;
        };

        if let Ok([(_, mut giver, _), (_, mut receiver, _)]) =
            agents.get_many_mut([entity, recipient])
        {
            if transfer_one(&mut giver, &mut receiver) {
                tally.record();
            }
        }
    }
}

//! Activation Order
//!
//! Agents act one at a time each step, in an order reshuffled every step.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::agent::{Agent, AgentId};
use crate::SimRng;

/// An ordered collection of agents with no duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentSet {
    agents: Vec<Entity>,
}

impl AgentSet {
    /// Builds a set keeping the first occurrence of each agent
    pub fn new(agents: impl IntoIterator<Item = Entity>) -> Self {
        let mut set = Self::default();
        for agent in agents {
            set.insert(agent);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, agent: Entity) -> bool {
        self.agents.contains(&agent)
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.agents.iter().copied()
    }

    /// Appends an agent; returns false if it was already present
    pub fn insert(&mut self, agent: Entity) -> bool {
        if self.contains(agent) {
            return false;
        }
        self.agents.push(agent);
        true
    }

    /// Removes an agent; returns false if it was not present
    pub fn remove(&mut self, agent: Entity) -> bool {
        match self.agents.iter().position(|&a| a == agent) {
            Some(index) => {
                self.agents.remove(index);
                true
            }
            None => false,
        }
    }

    /// Agents passing the filter, order preserved
    pub fn select(&self, mut filter: impl FnMut(Entity) -> bool) -> AgentSet {
        AgentSet {
            agents: self.agents.iter().copied().filter(|&a| filter(a)).collect(),
        }
    }

    /// A copy in random order
    pub fn shuffle<R: Rng + ?Sized>(&self, rng: &mut R) -> AgentSet {
        let mut agents = self.agents.clone();
        agents.shuffle(rng);
        AgentSet { agents }
    }

    /// A copy ordered by key; ties keep their current relative order
    pub fn sort_by_key<K: Ord>(&self, key: impl FnMut(&Entity) -> K) -> AgentSet {
        let mut agents = self.agents.clone();
        agents.sort_by_key(key);
        AgentSet { agents }
    }

    /// A copy ordered by descending key (richest first, say); ties keep their
    /// current relative order
    pub fn sort_by_key_desc<K: Ord>(&self, mut key: impl FnMut(&Entity) -> K) -> AgentSet {
        let mut agents = self.agents.clone();
        agents.sort_by(|a, b| key(b).cmp(&key(a)));
        AgentSet { agents }
    }

    /// Shuffle this set in place
    pub fn shuffle_in_place<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.agents.shuffle(rng);
    }

    /// Keep only agents passing the filter, order preserved
    pub fn retain(&mut self, mut filter: impl FnMut(Entity) -> bool) {
        self.agents.retain(|&a| filter(a));
    }
}

/// Resource: the order agents act in during the current step
#[derive(Resource, Debug, Clone, Default)]
pub struct ActivationOrder(pub AgentSet);

/// System: draw a fresh random activation order.
///
/// Agents are first put in id order so the shuffle only depends on the RNG,
/// not on how the ECS happens to store them.
pub fn shuffle_activation(
    mut rng: ResMut<SimRng>,
    mut order: ResMut<ActivationOrder>,
    agents: Query<(Entity, &AgentId), With<Agent>>,
) {
    let mut by_id: Vec<(AgentId, Entity)> = agents.iter().map(|(e, id)| (*id, e)).collect();
    by_id.sort_unstable_by_key(|(id, _)| *id);

    let mut all = AgentSet::new(by_id.into_iter().map(|(_, e)| e));
    all.shuffle_in_place(&mut rng.0);
    order.0 = all;
}

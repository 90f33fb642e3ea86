//! Wealth Exchange
//!
//! An agent with money hands one unit to a random cellmate.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::agent::Wealth;

/// Resource: counts of completed transfers
#[derive(Resource, Debug, Clone, Default)]
pub struct TransferTally {
    pub this_step: u64,
    pub total: u64,
}

impl TransferTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_step(&mut self) {
        self.this_step = 0;
    }

    pub fn record(&mut self) {
        self.this_step += 1;
        self.total += 1;
    }
}

/// Picks a uniformly random agent from `cellmates` other than `giver`.
pub fn choose_recipient<R: Rng + ?Sized>(
    cellmates: &[Entity],
    giver: Entity,
    rng: &mut R,
) -> Option<Entity> {
    let others: Vec<Entity> = cellmates.iter().copied().filter(|&e| e != giver).collect();
    others.choose(rng).copied()
}

/// Moves one unit from `giver` to `receiver`. Returns false if the giver is broke.
pub fn transfer_one(giver: &mut Wealth, receiver: &mut Wealth) -> bool {
    if giver.0 == 0 {
        return false;
    }
    giver.0 -= 1;
    receiver.0 += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_transfer_conserves_total() {
        let mut a = Wealth(3);
        let mut b = Wealth(0);
        assert!(transfer_one(&mut a, &mut b));
        assert_eq!((a.0, b.0), (2, 1));
        assert_eq!(a.0 + b.0, 3);
    }

    #[test]
    fn test_broke_giver_transfers_nothing() {
        let mut a = Wealth(0);
        let mut b = Wealth(5);
        assert!(!transfer_one(&mut a, &mut b));
        assert_eq!((a.0, b.0), (0, 5));
    }

    #[test]
    fn test_never_chooses_self() {
        let giver = Entity::from_raw(1);
        let other = Entity::from_raw(2);
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..50 {
            assert_eq!(choose_recipient(&[giver, other], giver, &mut rng), Some(other));
        }
        assert_eq!(choose_recipient(&[giver], giver, &mut rng), None);
        assert_eq!(choose_recipient(&[], giver, &mut rng), None);
    }

    #[test]
    fn test_tally() {
        let mut tally = TransferTally::new();
        tally.record();
        tally.record();
        tally.begin_step();
        tally.record();
        assert_eq!(tally.this_step, 1);
        assert_eq!(tally.total, 3);
    }
}

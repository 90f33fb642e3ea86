//! Movement
//!
//! Agents wander to a random adjacent cell each step.

use rand::seq::SliceRandom;
use rand::Rng;
use wealth_records::GridPosition;

use crate::components::grid::{GridError, MultiGrid, NeighborhoodKind};

/// Picks a uniformly random Moore neighbour of `from`, centre excluded.
///
/// Returns `None` when the grid has no other cell to move to (a 1x1 grid).
pub fn choose_destination<R: Rng + ?Sized>(
    grid: &MultiGrid,
    from: GridPosition,
    rng: &mut R,
) -> Result<Option<GridPosition>, GridError> {
    let options = grid.neighborhood(from, NeighborhoodKind::Moore, false, 1)?;
    Ok(options.choose(rng).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_destination_is_adjacent() {
        let grid = MultiGrid::new(10, 10, true).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let from = GridPosition::new(0, 0);

        for _ in 0..100 {
            let to = choose_destination(&grid, from, &mut rng).unwrap().unwrap();
            assert_ne!(to, from);
            let dx = (to.x as i64 - from.x as i64).rem_euclid(10);
            let dy = (to.y as i64 - from.y as i64).rem_euclid(10);
            assert!(dx == 0 || dx == 1 || dx == 9);
            assert!(dy == 0 || dy == 1 || dy == 9);
        }
    }

    #[test]
    fn test_single_cell_grid_stays_put() {
        let grid = MultiGrid::new(1, 1, true).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        assert_eq!(
            choose_destination(&grid, GridPosition::new(0, 0), &mut rng).unwrap(),
            None
        );
    }

    #[test]
    fn test_out_of_bounds_origin() {
        let grid = MultiGrid::new(3, 3, true).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(choose_destination(&grid, GridPosition::new(5, 5), &mut rng).is_err());
    }
}

//! Grid Resource
//!
//! A rectangular multi-occupancy grid. Any number of agents may share a cell.
//! On a torus the edges wrap, so every cell has a full neighbourhood.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wealth_records::GridPosition;

/// Which cells count as adjacent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborhoodKind {
    /// All eight surrounding cells
    #[default]
    Moore,
    /// The four orthogonal cells
    VonNeumann,
}

/// Errors from grid operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("entity {entity:?} is not in cell ({x}, {y})")]
    NotInCell { entity: Entity, x: usize, y: usize },
}

/// Resource: the grid and the agents standing in each cell
#[derive(Resource, Debug, Clone)]
pub struct MultiGrid {
    width: usize,
    height: usize,
    torus: bool,
    cells: Vec<Vec<Entity>>,
}

impl MultiGrid {
    pub fn new(width: usize, height: usize, torus: bool) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        Ok(Self {
            width,
            height,
            torus,
            cells: vec![Vec::new(); width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn torus(&self) -> bool {
        self.torus
    }

    /// Total number of placed agents
    pub fn agent_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn in_bounds(&self, pos: GridPosition) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: GridPosition) -> Result<usize, GridError> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.y * self.width + pos.x)
    }

    /// Put an agent into a cell
    pub fn place_agent(&mut self, entity: Entity, pos: GridPosition) -> Result<(), GridError> {
        let index = self.index(pos)?;
        self.cells[index].push(entity);
        Ok(())
    }

    /// Take an agent out of a cell
    pub fn remove_agent(&mut self, entity: Entity, pos: GridPosition) -> Result<(), GridError> {
        let index = self.index(pos)?;
        let cell = &mut self.cells[index];
        match cell.iter().position(|&e| e == entity) {
            Some(slot) => {
                cell.remove(slot);
                Ok(())
            }
            None => Err(GridError::NotInCell {
                entity,
                x: pos.x,
                y: pos.y,
            }),
        }
    }

    /// Move an agent between cells. The agent must currently be in `from`.
    pub fn move_agent(
        &mut self,
        entity: Entity,
        from: GridPosition,
        to: GridPosition,
    ) -> Result<(), GridError> {
        // Validate the destination before touching the source cell
        self.index(to)?;
        self.remove_agent(entity, from)?;
        self.place_agent(entity, to)
    }

    /// Agents in a cell, in arrival order
    pub fn cell_contents(&self, pos: GridPosition) -> Result<&[Entity], GridError> {
        let index = self.index(pos)?;
        Ok(&self.cells[index])
    }

    pub fn is_cell_empty(&self, pos: GridPosition) -> Result<bool, GridError> {
        Ok(self.cell_contents(pos)?.is_empty())
    }

    /// Cells around `pos` within `radius`.
    ///
    /// On a torus coordinates wrap; otherwise cells past the edge are dropped.
    /// The result has no duplicates, even when the radius wraps around a
    /// small grid onto the same cell twice.
    pub fn neighborhood(
        &self,
        pos: GridPosition,
        kind: NeighborhoodKind,
        include_center: bool,
        radius: usize,
    ) -> Result<Vec<GridPosition>, GridError> {
        self.index(pos)?;

        let r = radius as i64;
        let (width, height) = (self.width as i64, self.height as i64);
        let (px, py) = (pos.x as i64, pos.y as i64);
        let mut cells = Vec::new();

        for dx in -r..=r {
            for dy in -r..=r {
                if kind == NeighborhoodKind::VonNeumann && dx.abs() + dy.abs() > r {
                    continue;
                }
                if dx == 0 && dy == 0 && !include_center {
                    continue;
                }

                let (mut x, mut y) = (px + dx, py + dy);
                if self.torus {
                    x = x.rem_euclid(width);
                    y = y.rem_euclid(height);
                } else if x < 0 || y < 0 || x >= width || y >= height {
                    continue;
                }

                let cell = GridPosition::new(x as usize, y as usize);
                if cell == pos && !include_center {
                    continue;
                }
                if !cells.contains(&cell) {
                    cells.push(cell);
                }
            }
        }

        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(raw: u32) -> Entity {
        Entity::from_raw(raw)
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert_eq!(
            MultiGrid::new(0, 5, true).unwrap_err(),
            GridError::EmptyGrid { width: 0, height: 5 }
        );
    }

    #[test]
    fn test_place_and_move() {
        let mut grid = MultiGrid::new(3, 3, true).unwrap();
        let a = entity(1);
        let b = entity(2);
        let origin = GridPosition::new(0, 0);
        let target = GridPosition::new(2, 1);

        grid.place_agent(a, origin).unwrap();
        grid.place_agent(b, origin).unwrap();
        assert_eq!(grid.cell_contents(origin).unwrap(), &[a, b]);

        grid.move_agent(a, origin, target).unwrap();
        assert_eq!(grid.cell_contents(origin).unwrap(), &[b]);
        assert_eq!(grid.cell_contents(target).unwrap(), &[a]);
        assert_eq!(grid.agent_count(), 2);
    }

    #[test]
    fn test_move_from_wrong_cell_fails() {
        let mut grid = MultiGrid::new(3, 3, true).unwrap();
        let a = entity(1);
        grid.place_agent(a, GridPosition::new(1, 1)).unwrap();

        let err = grid
            .move_agent(a, GridPosition::new(0, 0), GridPosition::new(2, 2))
            .unwrap_err();
        assert!(matches!(err, GridError::NotInCell { .. }));
        assert_eq!(grid.cell_contents(GridPosition::new(1, 1)).unwrap(), &[a]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = MultiGrid::new(2, 2, false).unwrap();
        let err = grid.place_agent(entity(1), GridPosition::new(2, 0)).unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { x: 2, y: 0, .. }));
    }

    #[test]
    fn test_moore_neighborhood_torus_wraps() {
        let grid = MultiGrid::new(10, 10, true).unwrap();
        let cells = grid
            .neighborhood(GridPosition::new(0, 0), NeighborhoodKind::Moore, false, 1)
            .unwrap();

        assert_eq!(cells.len(), 8);
        assert!(cells.contains(&GridPosition::new(9, 9)));
        assert!(cells.contains(&GridPosition::new(1, 1)));
        assert!(!cells.contains(&GridPosition::new(0, 0)));
    }

    #[test]
    fn test_moore_neighborhood_clipped_without_torus() {
        let grid = MultiGrid::new(10, 10, false).unwrap();
        let corner = grid
            .neighborhood(GridPosition::new(0, 0), NeighborhoodKind::Moore, false, 1)
            .unwrap();
        assert_eq!(corner.len(), 3);

        let with_center = grid
            .neighborhood(GridPosition::new(5, 5), NeighborhoodKind::Moore, true, 1)
            .unwrap();
        assert_eq!(with_center.len(), 9);
    }

    #[test]
    fn test_von_neumann_neighborhood() {
        let grid = MultiGrid::new(10, 10, true).unwrap();
        let cells = grid
            .neighborhood(GridPosition::new(5, 5), NeighborhoodKind::VonNeumann, false, 1)
            .unwrap();
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&GridPosition::new(5, 4)));
        assert!(!cells.contains(&GridPosition::new(4, 4)));
    }

    #[test]
    fn test_small_torus_deduplicates() {
        let grid = MultiGrid::new(2, 2, true).unwrap();
        let cells = grid
            .neighborhood(GridPosition::new(0, 0), NeighborhoodKind::Moore, false, 1)
            .unwrap();
        assert_eq!(cells.len(), 3);

        let single = MultiGrid::new(1, 1, true).unwrap();
        let none = single
            .neighborhood(GridPosition::new(0, 0), NeighborhoodKind::Moore, false, 1)
            .unwrap();
        assert!(none.is_empty());
    }
}

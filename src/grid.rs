use std::collections::HashSet;

use rand::Rng;

use crate::error::{GameError, Result};

/// One discrete grid coordinate.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Cells that a newly placed item must avoid, built once per tick.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct OccupiedSet {
    cells: HashSet<Cell>,
}

impl OccupiedSet {
    #[must_use]
    pub fn from_cells<I: IntoIterator<Item = Cell>>(cells: I) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, cell: Cell) {
        self.cells.insert(cell);
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Fixed-size playing field. The cell list is computed once at construction.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid and precomputes every cell, column by column.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidGrid { width, height });
        }

        let mut cells = Vec::with_capacity(usize::from(width) * usize::from(height));
        for x in 0..i32::from(width) {
            for y in 0..i32::from(height) {
                cells.push(Cell { x, y });
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Every cell of the grid, in generation order.
    #[must_use]
    pub fn all_cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.x < i32::from(self.width)
            && cell.y < i32::from(self.height)
    }

    /// Wraps `cell` into bounds, each axis independently.
    #[must_use]
    pub fn wrap(&self, cell: Cell) -> Cell {
        Cell {
            x: cell.x.rem_euclid(i32::from(self.width)),
            y: cell.y.rem_euclid(i32::from(self.height)),
        }
    }

    /// Picks a cell uniformly among those not in `excluded`.
    pub fn random_free_cell<R: Rng + ?Sized>(
        &self,
        excluded: &OccupiedSet,
        rng: &mut R,
    ) -> Result<Cell> {
        let candidates: Vec<Cell> = self
            .cells
            .iter()
            .copied()
            .filter(|cell| !excluded.contains(*cell))
            .collect();

        if candidates.is_empty() {
            return Err(GameError::NoFreeCell {
                width: self.width,
                height: self.height,
            });
        }

        Ok(candidates[rng.gen_range(0..candidates.len())])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{Cell, Grid, OccupiedSet};
    use crate::error::GameError;

    #[test]
    fn all_cells_covers_every_coordinate_once() {
        let grid = Grid::new(4, 3).expect("grid should build");

        let unique: HashSet<Cell> = grid.all_cells().iter().copied().collect();
        assert_eq!(grid.all_cells().len(), 12);
        assert_eq!(unique.len(), 12);
        assert!(unique.iter().all(|cell| grid.contains(*cell)));
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(GameError::InvalidGrid {
                width: 0,
                height: 5
            })
        ));
    }

    #[test]
    fn wrap_handles_both_edges() {
        let grid = Grid::new(10, 8).expect("grid should build");

        assert_eq!(grid.wrap(Cell::new(-1, 3)), Cell::new(9, 3));
        assert_eq!(grid.wrap(Cell::new(4, 8)), Cell::new(4, 0));
        assert_eq!(grid.wrap(Cell::new(10, -1)), Cell::new(0, 7));
    }

    #[test]
    fn random_free_cell_never_returns_excluded() {
        let grid = Grid::new(6, 4).expect("grid should build");
        let excluded = OccupiedSet::from_cells((0..6).map(|x| Cell::new(x, 1)));
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let cell = grid
                .random_free_cell(&excluded, &mut rng)
                .expect("free cells remain");
            assert!(!excluded.contains(cell));
            assert!(grid.contains(cell));
        }
    }

    #[test]
    fn random_free_cell_eventually_reaches_every_free_cell() {
        let grid = Grid::new(5, 5).expect("grid should build");
        let excluded = OccupiedSet::from_cells([Cell::new(0, 0), Cell::new(2, 2), Cell::new(4, 4)]);
        let mut rng = StdRng::seed_from_u64(11);

        let mut seen = HashSet::new();
        for _ in 0..5_000 {
            seen.insert(
                grid.random_free_cell(&excluded, &mut rng)
                    .expect("free cells remain"),
            );
        }

        assert_eq!(seen.len(), grid.total_cells() - excluded.len());
    }

    #[test]
    fn exhausted_grid_reports_no_free_cell() {
        let grid = Grid::new(2, 2).expect("grid should build");
        let excluded = OccupiedSet::from_cells(grid.all_cells().iter().copied());
        let mut rng = StdRng::seed_from_u64(1);

        assert!(matches!(
            grid.random_free_cell(&excluded, &mut rng),
            Err(GameError::NoFreeCell { .. })
        ));
    }
}

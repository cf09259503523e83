use rand::Rng;

use crate::display::{FrameBuffer, Renderable};
use crate::error::Result;
use crate::grid::{Cell, Grid, OccupiedSet};

/// Default glyph for the food item.
pub const DEFAULT_FOOD_GLYPH: char = '#';

/// The single food item on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    cell: Cell,
    glyph: char,
}

impl Food {
    #[must_use]
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            glyph: DEFAULT_FOOD_GLYPH,
        }
    }

    /// Places food on a random cell outside `occupied`.
    pub fn spawn<R: Rng + ?Sized>(grid: &Grid, occupied: &OccupiedSet, rng: &mut R) -> Result<Self> {
        Ok(Self::new(grid.random_free_cell(occupied, rng)?))
    }

    #[must_use]
    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    #[must_use]
    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn reposition(&mut self, cell: Cell) {
        self.cell = cell;
    }
}

impl Renderable for Food {
    fn render(&self, buffer: &mut FrameBuffer) {
        buffer.set(self.cell, self.glyph);
    }
}

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

/// A position on the board, counted from the top-left corner
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[serde(from = "(u16, u16)")]
pub(crate) struct Cell {
    pub(crate) row: u16,
    pub(crate) col: u16,
}

impl Cell {
    pub(crate) const fn new(row: u16, col: u16) -> Cell {
        Cell { row, col }
    }
}

impl From<(u16, u16)> for Cell {
    fn from((row, col): (u16, u16)) -> Cell {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The dimensions of a board.  Movement wraps around at every edge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Bounds {
    pub(crate) fn contains(self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Iterate over every cell on the board in row-major order
    pub(crate) fn cells(self) -> impl Iterator<Item = Cell> {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Cell { row, col }))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Board {
    bounds: Bounds,
    food: Option<Cell>,
}

impl Board {
    pub(crate) fn new(bounds: Bounds) -> Board {
        Board { bounds, food: None }
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(crate) fn is_occupied(&self, cell: Cell, occupied: &HashSet<Cell>) -> bool {
        occupied.contains(&cell)
    }

    /// Return all cells on the board that are not in `occupied`, in row-major
    /// order.  The result is empty when `occupied` covers the whole board.
    pub(crate) fn free_cells(&self, occupied: &HashSet<Cell>) -> Vec<Cell> {
        self.bounds
            .cells()
            .filter(|&cell| !self.is_occupied(cell, occupied))
            .collect()
    }

    pub(crate) fn place_food(&mut self, cell: Cell) {
        debug_assert!(self.bounds.contains(cell), "food placed off the board");
        self.food = Some(cell);
    }

    pub(crate) fn clear_food(&mut self) {
        self.food = None;
    }

    pub(crate) fn food(&self) -> Option<Cell> {
        self.food
    }
}

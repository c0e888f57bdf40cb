use super::board::{Bounds, Cell};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Return the cell one step from `cell` in this direction, wrapping
    /// around the edges of `bounds`
    pub(crate) fn advance(self, cell: Cell, bounds: Bounds) -> Cell {
        let Cell { mut row, mut col } = cell;
        match self {
            Direction::Up => row = decrement_wrapping(row, bounds.height),
            Direction::Down => row = increment_wrapping(row, bounds.height),
            Direction::Left => col = decrement_wrapping(col, bounds.width),
            Direction::Right => col = increment_wrapping(col, bounds.width),
        }
        Cell { row, col }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Determine which direction a single step from `from` to `to` within
    /// `bounds` was taken in.  A plain one-cell delta decides first; only a
    /// step that is not adjacent in raw coordinates is treated as crossing the
    /// wraparound seam.  Returns `None` if `to` is not one step away from
    /// `from`.
    pub(crate) fn between(from: Cell, to: Cell, bounds: Bounds) -> Option<Direction> {
        if from.row == to.row {
            let forward = step_along(from.col, to.col, bounds.width)?;
            Some(if forward {
                Direction::Right
            } else {
                Direction::Left
            })
        } else if from.col == to.col {
            let forward = step_along(from.row, to.row, bounds.height)?;
            Some(if forward {
                Direction::Down
            } else {
                Direction::Up
            })
        } else {
            None
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Is `to` one step forwards (`Some(true)`) or backwards (`Some(false)`) from
/// `from` on an axis of length `len`?
fn step_along(from: u16, to: u16, len: u16) -> Option<bool> {
    if from == to {
        return None;
    }
    if from.checked_add(1) == Some(to) {
        return Some(true);
    }
    if to.checked_add(1) == Some(from) {
        return Some(false);
    }
    if increment_wrapping(from, len) == to {
        return Some(true);
    }
    if decrement_wrapping(from, len) == to {
        return Some(false);
    }
    None
}

fn decrement_wrapping(x: u16, max: u16) -> u16 {
    x.checked_sub(1).unwrap_or_else(|| max.saturating_sub(1))
}

fn increment_wrapping(x: u16, max: u16) -> u16 {
    x.checked_add(1).filter(|&xx| xx < max).unwrap_or(0)
}

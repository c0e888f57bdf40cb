use super::board::{Board, Cell};
use rand::{seq::IndexedRandom, Rng};
use std::collections::HashSet;
use thiserror::Error;

/// How new food is positioned
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum SpawnMode {
    /// Pick uniformly among the free cells
    #[default]
    Random,

    /// Always use this cell when it is free; fall back to random placement
    /// when it is not
    Fixed(Cell),
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct FoodSpawner {
    mode: SpawnMode,
}

impl FoodSpawner {
    pub(crate) fn new(mode: SpawnMode) -> FoodSpawner {
        FoodSpawner { mode }
    }

    /// Place a new piece of food on `board` in a cell not in `occupied` and
    /// return where it went.
    ///
    /// # Errors
    ///
    /// Returns [`BoardFull`] if every cell of the board is occupied.
    pub(crate) fn spawn<R: Rng>(
        &self,
        board: &mut Board,
        occupied: &HashSet<Cell>,
        rng: &mut R,
    ) -> Result<Cell, BoardFull> {
        if let SpawnMode::Fixed(cell) = self.mode {
            if board.bounds().contains(cell) && !board.is_occupied(cell, occupied) {
                log::debug!("Spawning food at fixed cell {cell}");
                board.place_food(cell);
                return Ok(cell);
            }
            log::debug!("Fixed food cell {cell} unavailable; choosing randomly");
        }
        let free = board.free_cells(occupied);
        let &cell = free.choose(rng).ok_or(BoardFull)?;
        log::debug!("Spawning food at {cell}");
        board.place_food(cell);
        Ok(cell)
    }
}

/// There is nowhere left to put food
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("no free cell left for food")]
pub(crate) struct BoardFull;

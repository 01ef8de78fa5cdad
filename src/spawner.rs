use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Cell};
use crate::snake::Snake;

/// Places collectibles on free cells, using an injected generator so placements can be replayed.
pub struct Spawner<R> {
    rng: R,
}

impl<R: Rng> Spawner<R> {
    pub fn new(rng: R) -> Self {
        Spawner { rng }
    }

    /// Picks a free cell uniformly and adds it to `collectibles`.
    /// Returns `None` without touching the set when the board has no free cell left.
    pub fn spawn(&mut self, board: &Board, snake: &Snake, collectibles: &mut Vec<Cell>) -> Option<Cell> {
        let choices = free_cells(board, snake, collectibles);
        let res = choices.choose(&mut self.rng).copied();

        if let Some(cell) = res {
            collectibles.push(cell);
        }

        res
    }
}

pub fn free_cells(board: &Board, snake: &Snake, collectibles: &[Cell]) -> Vec<Cell> {
    board.cells()
        .filter(|cell| !snake.occupies(*cell) && !collectibles.contains(cell))
        .collect()
}

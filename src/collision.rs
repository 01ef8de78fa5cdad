use crate::board::{Board, Cell};
use crate::snake::Snake;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    OutOfBounds,
    SelfCollision,
    Free,
}

impl Collision {
    pub fn is_fatal(self) -> bool {
        !matches!(self, Collision::Free)
    }
}

/// Classifies the cell the head is about to enter. Bounds are checked first.
///
/// The current head is skipped since it moves away this tick. The tail is not skipped
/// even though it also moves away when the snake isn't growing, so chasing your own
/// tail into its cell is fatal.
pub fn classify(next_head: Cell, snake: &Snake, board: &Board) -> Collision {
    if !board.in_bounds(next_head) {
        return Collision::OutOfBounds;
    }

    if snake.body()[1..].contains(&next_head) {
        return Collision::SelfCollision;
    }

    Collision::Free
}

use crate::board::Cell;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// The snake's segments, head first, plus the committed and the pending direction.
pub struct Snake {
    body: Vec<Cell>,
    direction: Direction,
    pending: Direction,
}

impl Snake {
    /// All segments start collapsed onto `start` and unfold as the snake moves.
    pub fn new(start: Cell, segments: usize) -> Self {
        Snake { body: vec![start; segments], direction: Right, pending: Right }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    pub fn next_head(&self, direction: Direction) -> Cell {
        self.head().offset(direction.delta())
    }

    /// Shifts every segment onto its predecessor's cell and puts the head on `next_head`.
    /// The caller is responsible for having checked `next_head` for collisions.
    pub fn advance(&mut self, next_head: Cell) {
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        self.body[0] = next_head;
    }

    /// Appends a tail segment at `at`, or on top of the current tail.
    pub fn grow(&mut self, at: Option<Cell>) {
        let cell = at.unwrap_or_else(|| self.tail());
        self.body.push(cell);
    }

    /// Queues a direction change. Reversals are checked against the committed direction,
    /// not the pending one, so a quick turn-then-correct between two ticks is kept.
    pub fn steer(&mut self, new_direction: Direction) -> bool {
        if self.direction.is_opposite(new_direction) {
            return false;
        }
        self.pending = new_direction;
        true
    }

    pub fn commit_direction(&mut self) -> Direction {
        self.direction = self.pending;
        self.direction
    }
}

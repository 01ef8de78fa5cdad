/// One grid position. Signed so that a head stepping off the board can still be represented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Cell { x: self.x + dx, y: self.y + dy }
    }
}

/// Fixed-size playing field. Holds no mutable state, it only answers questions about positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
}

impl Board {
    pub fn new(width: i32, height: i32) -> Self {
        Board { width, height }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    /// Every cell of the board, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_bounds_accepts_exactly_the_grid() {
        let board = Board::new(4, 3);

        for y in -2..5 {
            for x in -2..6 {
                let expected = (0..4).contains(&x) && (0..3).contains(&y);
                assert_eq!(board.in_bounds(Cell::new(x, y)), expected, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn cells_enumerates_every_position_once() {
        let board = Board::new(5, 2);
        let cells: Vec<Cell> = board.cells().collect();

        assert_eq!(cells.len(), 10);
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[9], Cell::new(4, 1));
        assert!(cells.iter().all(|c| board.in_bounds(*c)));
    }

    #[test]
    fn center_rounds_down() {
        assert_eq!(Board::new(20, 15).center(), Cell::new(10, 7));
        assert_eq!(Board::new(5, 5).center(), Cell::new(2, 2));
    }
}

use crate::error::GameError;
use crate::Coord;

/// Smallest board that fits the fixed starting body (row 2, columns 2..=5)
/// strictly inside the playable interior with room to move.
pub const MIN_DIMENSION: i32 = 7;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Cell {
    Empty,
    Segment,
    Food,
}

/// The board: a rows x columns matrix of cells, row-major. Created once per
/// session and never resized. Access is unchecked by design; staying in
/// bounds is the collision logic's job, not the grid's.
pub struct Grid {
    rows: i32,
    columns: i32,
    cells: Vec<Cell>,
}

pub fn check_dimensions(rows: i32, columns: i32) -> Result<(), GameError> {
    if rows < MIN_DIMENSION || columns < MIN_DIMENSION {
        Err(GameError::InvalidDimensions { rows, columns })
    } else {
        Ok(())
    }
}

impl Grid {
    pub fn new(rows: i32, columns: i32) -> Result<Self, GameError> {
        check_dimensions(rows, columns)?;
        let cells = vec![Cell::Empty; (rows * columns) as usize];
        Ok(Grid { rows, columns, cells })
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn get(&self, pos: Coord) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Coord, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    /// Every coordinate of the board in row-major order, the candidate
    /// universe for food placement.
    pub fn positions(&self) -> impl Iterator<Item = Coord> {
        let (rows, columns) = (self.rows, self.columns);
        (0..rows).flat_map(move |r| (0..columns).map(move |c| (r, c)))
    }

    fn index(&self, (row, column): Coord) -> usize {
        (row * self.columns + column) as usize
    }
}

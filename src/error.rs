use std::io;

use thiserror::Error;

use crate::grid::MIN_DIMENSION;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("board of {rows} rows x {columns} columns is too small to play on (minimum is {MIN_DIMENSION}x{MIN_DIMENSION})")]
    InvalidDimensions { rows: i32, columns: i32 },

    #[error("the snake crashed at row {row}, column {column}")]
    Collision { row: i32, column: i32 },

    #[error("no free cell left to place food on")]
    BoardFull,

    #[error("high score file error: {0}")]
    Persistence(#[from] io::Error),
}

use std::collections::VecDeque;

use crate::grid::{Cell, Grid};
use crate::Coord;
use Direction::*;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row, column) delta of a single step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// Fixed priority order in which tail neighbors are probed on growth.
const PROBE_ORDER: [Direction; 4] = [Up, Down, Left, Right];

/// The snake body, tail at the front of the deque, head at the back.
pub struct Snake {
    body: VecDeque<Coord>,
    direction: Direction,
}

impl Snake {
    /// Builds a snake from an initial body and writes its segments into the
    /// grid. The body runs tail-first and must be contiguous on the board.
    pub fn new(body: Vec<Coord>, direction: Direction, grid: &mut Grid) -> Self {
        debug_assert!(!body.is_empty());
        debug_assert!(body
            .windows(2)
            .all(|w| (w[0].0 - w[1].0).abs() + (w[0].1 - w[1].1).abs() == 1));

        for &segment in &body {
            grid.set(segment, Cell::Segment);
        }

        Snake { body: body.into(), direction }
    }

    pub fn head(&self) -> Coord {
        *self.body.back().unwrap()
    }

    pub fn tail(&self) -> Coord {
        *self.body.front().unwrap()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: Coord) -> bool {
        self.body.contains(&pos)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Ignores requests to reverse into the snake's own neck.
    pub fn set_direction(&mut self, new_direction: Direction) {
        if new_direction != self.direction.reversed() {
            self.direction = new_direction;
        }
    }

    pub fn advance(&mut self, new_head: Coord) {
        self.body.push_back(new_head);
    }

    pub fn drop_tail(&mut self) -> Coord {
        self.body.pop_front().unwrap()
    }

    /// Extends the body by one segment at the tail end: the four neighbors of
    /// the current tail are probed in the order Up, Down, Left, Right, and
    /// the first unblocked one is prepended and returned. Returns `None` when
    /// every neighbor is blocked, in which case the snake does not grow.
    pub fn grow_from(&mut self, is_blocked: impl Fn(Coord) -> bool) -> Option<Coord> {
        let (row, column) = self.tail();

        for dir in PROBE_ORDER {
            let (dr, dc) = dir.offset();
            let candidate = (row + dr, column + dc);
            if !is_blocked(candidate) {
                self.body.push_front(candidate);
                return Some(candidate);
            }
        }

        None
    }
}

use log::debug;
use rand::seq::SliceRandom;

use crate::error::GameError;
use crate::grid::{Cell, Grid};
use crate::snake::{Direction, Snake};
use crate::Coord;

/// What a successful tick did, for the driver's benefit. `grew` can lag
/// behind `ate_food` when every probe cell around the tail was blocked: the
/// score still goes up, the length does not.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub ate_food: bool,
    pub grew: bool,
}

/// Owns the whole game state for one session and advances it one tick at a
/// time. Terminal state machine: running until a collision, then over.
pub struct Game {
    grid: Grid,
    snake: Snake,
    score: u32,
    over: bool,
}

impl Game {
    pub fn new(rows: i32, columns: i32) -> Result<Self, GameError> {
        let mut grid = Grid::new(rows, columns)?;
        let body = (2..6).map(|c| (2, c)).collect();
        let snake = Snake::new(body, Direction::Right, &mut grid);
        Ok(Game { grid, snake, score: 0, over: false })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Applied on the next tick; between ticks the last request wins, and
    /// reversals are dropped by the snake itself.
    pub fn set_direction(&mut self, direction: Direction) {
        self.snake.set_direction(direction);
    }

    /// Advances the game one step: move the head, resolve collisions, eat and
    /// respawn food. `Collision` is the expected end of every session; the
    /// caller runs the game-over sequence when it sees it.
    pub fn tick(&mut self) -> Result<TickOutcome, GameError> {
        debug_assert!(!self.over);

        let (row, column) = self.snake.head();
        let (dr, dc) = self.snake.direction().offset();
        let new_head = (row + dr, column + dc);

        if is_blocked(&self.grid, new_head) {
            self.over = true;
            return Err(GameError::Collision { row: new_head.0, column: new_head.1 });
        }

        let mut outcome = TickOutcome::default();

        if self.grid.get(new_head) == Cell::Food {
            // The probe must not take the cell the head is about to occupy.
            let grid = &self.grid;
            let grown = self
                .snake
                .grow_from(|p| p == new_head || is_blocked(grid, p));

            if let Some(segment) = grown {
                self.grid.set(segment, Cell::Segment);
            }
            self.score += 1;
            outcome.ate_food = true;
            outcome.grew = grown.is_some();

            if let Err(err) = self.spawn_food() {
                self.over = true;
                return Err(err);
            }
        }

        // A move always drops exactly one tail segment; combined with the
        // growth insertion above, eating nets +1 length and a plain move
        // keeps the length unchanged.
        self.grid.set(new_head, Cell::Segment);
        self.snake.advance(new_head);
        let old_tail = self.snake.drop_tail();
        self.grid.set(old_tail, Cell::Empty);

        Ok(outcome)
    }

    /// Places one food on a uniformly random free cell. Food never appears on
    /// row 0, column 0 or the last column; the last row stays eligible, which
    /// mirrors where the snake itself may move.
    pub fn spawn_food(&mut self) -> Result<Coord, GameError> {
        let candidates: Vec<Coord> = self
            .grid
            .positions()
            .filter(|&p| self.food_allowed(p))
            .collect();

        let &pos = candidates
            .choose(&mut rand::thread_rng())
            .ok_or(GameError::BoardFull)?;

        self.grid.set(pos, Cell::Food);
        debug!("food spawned at {:?}", pos);
        Ok(pos)
    }

    fn food_allowed(&self, (row, column): Coord) -> bool {
        !(row == 0
            || column == 0
            || column == self.grid.columns() - 1
            || self.snake.contains((row, column))
            || self.grid.get((row, column)) == Cell::Food)
    }

    #[cfg(test)]
    fn place_food(&mut self, pos: Coord) {
        self.grid.set(pos, Cell::Food);
    }
}

/// A cell the head (or a growth probe) may not enter: outside the playable
/// interior, or already part of the body. Row 0 and column 0 are the reserved
/// border; the last row and column of the buffer are equally off limits.
fn is_blocked(grid: &Grid, (row, column): Coord) -> bool {
    row < 1
        || column < 1
        || row >= grid.rows()
        || column >= grid.columns()
        || grid.get((row, column)) == Cell::Segment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;

    fn count_food(grid: &Grid) -> usize {
        grid.positions().filter(|&p| grid.get(p) == Cell::Food).count()
    }

    #[test]
    fn plain_move_keeps_length_and_swaps_cells() {
        let mut game = Game::new(7, 7).unwrap();

        let outcome = game.tick().unwrap();

        assert_eq!(outcome, TickOutcome { ate_food: false, grew: false });
        assert_eq!(game.snake.len(), 4);
        assert_eq!(game.snake.head(), (2, 6));
        assert_eq!(game.grid.get((2, 6)), Cell::Segment);
        assert_eq!(game.grid.get((2, 2)), Cell::Empty);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn eating_grows_scores_and_respawns_food() {
        let mut game = Game::new(7, 7).unwrap();
        game.place_food((2, 6));

        let outcome = game.tick().unwrap();

        assert!(outcome.ate_food);
        assert!(outcome.grew);
        assert_eq!(game.score(), 1);
        assert_eq!(game.snake.len(), 5);
        assert_eq!(game.snake.head(), (2, 6));
        assert_eq!(game.snake.tail(), (2, 2));
        assert_eq!(game.grid.get((2, 6)), Cell::Segment);
        // Exactly one replacement food, somewhere else.
        assert_eq!(count_food(&game.grid), 1);
    }

    #[test]
    fn grid_cells_match_the_body_after_eating() {
        let mut game = Game::new(7, 7).unwrap();
        game.place_food((2, 6));
        game.tick().unwrap();

        let segments: Vec<Coord> = game
            .grid
            .positions()
            .filter(|&p| game.grid.get(p) == Cell::Segment)
            .collect();
        assert_eq!(segments.len(), game.snake.len());
        assert!(segments.iter().all(|&p| game.snake.contains(p)));
    }

    #[test]
    fn reversal_requests_never_change_course() {
        let mut game = Game::new(7, 7).unwrap();
        game.set_direction(Left);
        assert_eq!(game.snake.direction(), Right);

        game.set_direction(Up);
        game.set_direction(Down);
        assert_eq!(game.snake.direction(), Up);
    }

    #[test]
    fn running_into_the_top_border_is_fatal() {
        let mut game = Game::new(7, 7).unwrap();
        game.set_direction(Up);
        game.tick().unwrap(); // head (1, 5)
        assert_eq!(game.snake.head(), (1, 5));

        let err = game.tick().unwrap_err();
        assert!(matches!(err, GameError::Collision { row: 0, column: 5 }));
        assert!(game.is_over());
    }

    #[test]
    fn running_into_the_right_border_is_fatal() {
        let mut game = Game::new(7, 7).unwrap();
        game.tick().unwrap(); // head (2, 6)

        let err = game.tick().unwrap_err();
        assert!(matches!(err, GameError::Collision { row: 2, column: 7 }));
    }

    #[test]
    fn running_into_the_body_is_fatal() {
        let mut grid = Grid::new(7, 7).unwrap();
        // A hook: the head at (3, 3) turning Up would hit (2, 3).
        let body = vec![(2, 2), (2, 3), (2, 4), (3, 4), (3, 3)];
        let snake = Snake::new(body, Up, &mut grid);
        let mut game = Game { grid, snake, score: 0, over: false };

        let err = game.tick().unwrap_err();
        assert!(matches!(err, GameError::Collision { row: 2, column: 3 }));
    }

    #[test]
    fn blocked_cells_cover_every_border_and_segment() {
        let game = Game::new(7, 7).unwrap();
        let grid = &game.grid;

        assert!(is_blocked(grid, (0, 3)));
        assert!(is_blocked(grid, (-1, 3)));
        assert!(is_blocked(grid, (3, 0)));
        assert!(is_blocked(grid, (3, -1)));
        assert!(is_blocked(grid, (7, 3)));
        assert!(is_blocked(grid, (3, 7)));
        assert!(is_blocked(grid, (2, 4))); // body
        assert!(!is_blocked(grid, (5, 5)));
        assert!(!is_blocked(grid, (6, 6))); // last buffer row/column are playable
    }

    #[test]
    fn food_avoids_borders_and_the_body() {
        // Random placement, so check the invariant over many spawns.
        for _ in 0..50 {
            let mut game = Game::new(7, 7).unwrap();
            let (row, column) = game.spawn_food().unwrap();
            assert_ne!(row, 0);
            assert_ne!(column, 0);
            assert_ne!(column, 6);
            assert!(!game.snake.contains((row, column)));
        }
    }

    #[test]
    fn second_food_never_lands_on_the_first() {
        for _ in 0..50 {
            let mut game = Game::new(7, 7).unwrap();
            game.spawn_food().unwrap();
            game.spawn_food().unwrap();
            assert_eq!(count_food(&game.grid), 2);
        }
    }

    #[test]
    fn full_board_fails_loudly_instead_of_spawning() {
        let mut grid = Grid::new(7, 7).unwrap();
        // Serpentine body covering every cell food could legally occupy:
        // rows 1..=6, columns 1..=5.
        let mut body = Vec::new();
        for row in 1..=6 {
            let columns: Vec<i32> = if row % 2 == 1 {
                (1..=5).collect()
            } else {
                (1..=5).rev().collect()
            };
            for column in columns {
                body.push((row, column));
            }
        }
        let snake = Snake::new(body, Direction::Down, &mut grid);
        let mut game = Game { grid, snake, score: 0, over: false };

        assert!(matches!(game.spawn_food(), Err(GameError::BoardFull)));
    }

    #[test]
    fn blocked_growth_still_scores_but_keeps_length() {
        let mut grid = Grid::new(7, 7).unwrap();
        // Tail (1, 1) is walled in: Up and Left leave the interior, Down and
        // Right are body segments.
        let body = vec![(1, 1), (1, 2), (2, 2), (2, 1)];
        let snake = Snake::new(body, Down, &mut grid);
        let mut game = Game { grid, snake, score: 0, over: false };
        game.place_food((3, 1));

        let outcome = game.tick().unwrap();

        assert!(outcome.ate_food);
        assert!(!outcome.grew);
        assert_eq!(game.score(), 1);
        assert_eq!(game.snake.len(), 4);
        assert_eq!(game.snake.head(), (3, 1));
        assert_eq!(game.grid.get((1, 1)), Cell::Empty);
    }
}

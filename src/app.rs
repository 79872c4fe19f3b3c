use std::{cmp::max, process::exit, thread::sleep, time::Duration};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, error, info};

use crate::engine::Game;
use crate::error::GameError;
use crate::grid::check_dimensions;
use crate::score::ScoreStore;
use crate::snake::Direction;
use crate::term::{direction_for, TermManager};

/// Pacing between ticks; spacing, not a wall-clock schedule.
const TICK_INTERVAL_MS: u64 = 110;

/// The outer driver: owns the terminal and the score store, and runs one game
/// session at a time against the engine.
pub struct App {
    rows: i32,
    columns: i32,
    paused: bool,
    term: TermManager,
    store: ScoreStore,
}

impl App {
    pub fn new(store: ScoreStore) -> Self {
        App { rows: 0, columns: 0, paused: false, term: TermManager::new(), store }
    }

    /// Terminal setup and dimension checks, before any game state exists.
    /// Each cell is two character columns wide and the bottom line is
    /// reserved for the footer, hence the halving and the dropped row.
    pub fn initialize(&mut self) -> Result<(), GameError> {
        self.term.setup();

        let (w, h) = self.term.size();
        self.columns = (w / 2) as i32;
        self.rows = (h - 1) as i32;
        check_dimensions(self.rows, self.columns)?;
        info!("board is {} rows x {} columns", self.rows, self.columns);

        if let Err(err) = self.store.ensure_exists() {
            error!("could not initialize the high score file: {}", err);
        }

        Ok(())
    }

    pub fn show_intro(&mut self) {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.term.show_message(lines);

        if is_ctrl_c(&self.term.read_key_blocking()) {
            self.clean_exit()
        }

        self.term.hide_message();
    }

    /// One full session: tick loop until the snake crashes, then the
    /// game-over sequence. Returns only on fatal errors or to offer another
    /// session; Ctrl+C exits cleanly from anywhere.
    pub fn play(&mut self) -> Result<(), GameError> {
        self.term.clear();
        self.term.draw_borders();
        self.term.hide_message();

        let high_score = self.store.load();
        let mut game = Game::new(self.rows, self.columns)?;
        game.spawn_food()?;

        let mut dir_change: Option<Direction> = None;

        loop {
            sleep(Duration::from_millis(TICK_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue() {
                match &key_ev {
                    ev if is_ctrl_c(ev) => self.clean_exit(),
                    KeyEvent { code: KeyCode::Esc, .. } => self.toggle_pause(),
                    KeyEvent { code, .. } => {
                        // Between ticks the last direction request wins
                        if let Some(dir) = direction_for(*code) {
                            dir_change = Some(dir);
                        }
                    }
                }
            }

            if self.paused {
                continue;
            }

            if let Some(dir) = dir_change.take() {
                game.set_direction(dir);
            }

            match game.tick() {
                Ok(outcome) => {
                    if outcome.ate_food {
                        debug!("score is now {} (grew: {})", game.score(), outcome.grew);
                    }
                    self.term.render(game.grid(), game.score(), high_score);
                }
                Err(GameError::Collision { row, column }) => {
                    info!(
                        "crashed at ({}, {}) with a score of {}",
                        row,
                        column,
                        game.score()
                    );
                    self.game_over(game.score(), high_score);
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        // Quit if the user CTRL+C's after the game
        if is_ctrl_c(&self.term.read_key_blocking()) {
            self.clean_exit()
        }

        Ok(())
    }

    pub fn restore(&mut self) {
        self.term.restore();
    }

    ///////////////////////////////////////////////////////////////////////////

    fn clean_exit(&mut self) {
        self.term.restore();
        exit(0);
    }

    /// Persists the score exactly once, then shows the final tally.
    fn game_over(&mut self, score: u32, high_score: u32) {
        match self.store.save_if_higher(score) {
            Ok(true) => info!("new high score: {}", score),
            Ok(false) => {}
            Err(err) => error!("could not persist the high score: {}", err),
        }

        self.term.show_message(&[
            "Game over!",
            &*format!("Score: {}", score),
            &*format!("Highest score: {}", max(score, high_score)),
            "",
            "Press any key to play again,",
            "or CTRL+C to quit.",
        ]);
    }

    fn toggle_pause(&mut self) {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"]);
        } else {
            self.term.hide_message();
        }

        self.paused = !self.paused;
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

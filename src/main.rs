mod app;
mod engine;
mod error;
mod grid;
mod score;
mod snake;
mod term;

use std::fs::File;
use std::process::exit;

use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::App;
use crate::score::ScoreStore;

pub type TermInt = u16;
/// Terminal coordinates as (x, y).
pub type Coords = (u16, u16);
/// Board coordinates as (row, column), zero-based.
pub type Coord = (i32, i32);

const HIGH_SCORE_FILE: &str = ".serpent_highscore";
const LOG_FILE: &str = "serpent.log";

fn main() {
    init_logger();

    let mut app = App::new(ScoreStore::new(HIGH_SCORE_FILE));

    if let Err(err) = app.initialize() {
        app.restore();
        eprintln!("{}", err);
        exit(1);
    }

    app.show_intro();

    loop {
        // The main game loop takes care of exiting cleanly on CTRL+C
        if let Err(err) = app.play() {
            app.restore();
            eprintln!("{}", err);
            exit(1);
        }
    }
}

// The terminal belongs to the game, so logs go to a file. A logger that
// cannot be set up just means a silent run.
fn init_logger() {
    if let Ok(file) = File::create(LOG_FILE) {
        let _ = WriteLogger::init(LevelFilter::Info, Config::default(), file);
    }
}

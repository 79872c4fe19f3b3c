use std::{io::{stdout, Stdout, Write}, time::Duration};

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, style::Color, terminal};

use crate::grid::{Cell, Grid};
use crate::snake::Direction;
use crate::{Coords, TermInt};

const SEGMENT_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const BG_CHAR: char = ' ';

const SEGMENT_COLOR: Color = Color::Green;
const FOOD_COLOR: Color = Color::Red;

/// Maps a raw key code to a direction command: arrows and WASD, both cases.
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

/// Owns the terminal for the lifetime of the process: raw mode, the alternate
/// screen, and a shadow buffer of what is on it so message overlays can be
/// undone.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Self {
        let (width, height) = terminal::size().expect("Error reading size.");
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        TermManager { width, height, stdout, screen, current_msg: None }
    }

    pub fn setup(&mut self) {
        execute!(self.stdout, EnterAlternateScreen).expect("Error entering alt screen");
        self.set_raw_mode(true);
        self.set_cursor_visibility(false);
    }

    pub fn restore(&mut self) {
        self.set_raw_mode(false);
        self.set_cursor_visibility(true);
        execute!(self.stdout, LeaveAlternateScreen).expect("Error leaving alt screen");
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn read_key_blocking(&self) -> KeyEvent {
        loop {
            if let Event::Key(ev) = read().unwrap() {
                return ev;
            }
        }
    }

    pub fn read_key_events_queue(&self) -> Vec<KeyEvent> {
        let mut events = vec![];

        while poll(Duration::from_millis(1)).unwrap() {
            if let Event::Key(ev) = read().unwrap() {
                events.push(ev);
            }
        }

        events
    }

    /// Full-board redraw, called once per tick. Each cell is two character
    /// columns wide; row 0 and column 0 sit under the border box, and the
    /// bottom terminal line holds the footer.
    pub fn render(&mut self, grid: &Grid, score: u32, high_score: u32) {
        for row in 1..grid.rows() {
            for column in 1..grid.columns() {
                let pos = (column as TermInt * 2, row as TermInt);
                match grid.get((row, column)) {
                    Cell::Segment => self.print_colored(pos, SEGMENT_CHAR, SEGMENT_COLOR),
                    Cell::Food => self.print_colored(pos, FOOD_CHAR, FOOD_COLOR),
                    Cell::Empty => self.print_at(pos, BG_CHAR),
                }
            }
        }

        self.draw_footer(score, high_score);
        self.flush();
    }

    pub fn draw_borders(&mut self) {
        let end_x = self.width - 1;
        let end_y = self.height - 1;

        for x in 0..self.width {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            self.print_at((x, 0), ch);
            self.print_at((x, end_y), ch);
        }

        for y in 1..end_y {
            self.print_at((0, y), '|');
            self.print_at((end_x, y), '|');
        }

        self.flush();
    }

    pub fn show_message(&mut self, lines: &[&str]) {
        if self.has_message() {
            self.hide_message();
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap() + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0 - msg_width / 2, center.1 - msg_height / 2);

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, y), ' ');
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.char_indices() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch);
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush();
    }

    pub fn hide_message(&mut self) {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return,
        };
        let top_left = msg.top_left;

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                let ch = self.screen[self.width as usize * y as usize + x as usize];
                self.print_at_no_save((x, y), ch);
            }
        }

        self.flush();
    }

    pub fn clear(&mut self) {
        execute!(self.stdout, terminal::Clear(ClearType::All)).expect("Error clearing.");
        self.screen = vec![' '; self.width as usize * self.height as usize]
    }

    pub fn flush(&mut self) {
        self.stdout.flush().expect("Error flushing.");
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_footer(&mut self, score: u32, high_score: u32) {
        let y = self.height - 1;
        let text = format!("  Score: {}  Highest score: {}  ", score, high_score);

        for (i, ch) in text.chars().enumerate() {
            self.print_at((2 + i as TermInt, y), ch);
        }
    }

    fn print_at(&mut self, pos: Coords, ch: char) {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).unwrap();
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = ch;
    }

    fn print_colored(&mut self, pos: Coords, ch: char, color: Color) {
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(color),
            style::Print(ch),
            style::ResetColor
        )
        .unwrap();
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = ch;
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).unwrap();
    }

    fn set_raw_mode(&self, option: bool) {
        let res = if option {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        };

        res.expect("Error setting raw mode.");
    }

    fn set_cursor_visibility(&mut self, option: bool) {
        let res = if option {
            execute!(self.stdout, cursor::Show)
        } else {
            execute!(self.stdout, cursor::Hide)
        };

        res.expect("Error setting cursor visibility.");
    }
}

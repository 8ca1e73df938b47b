//! Reference consumer: a box that moves around a bordered grid.
//!
//! One frame per tick: clear the terminal, print the raw state of the twelve
//! mapped buttons as a diagnostic line, nudge the player by the held
//! direction buttons, then draw the 40×20 world. Purely a demonstration of
//! consuming [`ButtonVector`] snapshots; it keeps no pad history.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use crate::bus::{Button, ButtonVector};

pub const GRID_WIDTH: u32 = 40;
pub const GRID_HEIGHT: u32 = 20;

/// Distance moved per tick per held direction button.
const MOVE_STEP: f32 = 0.1;

/// World state: a single tracked position inside the bordered grid.
pub struct BoxGame {
    x: f32,
    y: f32,
}

impl BoxGame {
    pub fn new() -> Self {
        Self { x: 20.0, y: 10.0 }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Applies one tick of movement from the held direction buttons.
    ///
    /// Opposite directions held together cancel out. Position is not
    /// clamped; the original behaves the same way.
    pub fn apply_input(&mut self, snapshot: &ButtonVector) {
        if snapshot.pressed(Button::Up) {
            self.y -= MOVE_STEP;
        }
        if snapshot.pressed(Button::Down) {
            self.y += MOVE_STEP;
        }
        if snapshot.pressed(Button::Left) {
            self.x -= MOVE_STEP;
        }
        if snapshot.pressed(Button::Right) {
            self.x += MOVE_STEP;
        }
    }

    fn cell(&self, x: u32, y: u32) -> char {
        if y == 0 || y == GRID_HEIGHT - 1 || x == 0 || x == GRID_WIDTH - 1 {
            '*'
        } else if self.x as u32 == x && self.y as u32 == y {
            '#'
        } else {
            ' '
        }
    }

    /// Renders the world as rows of characters, one newline per row.
    pub fn render_grid(&self) -> String {
        let mut grid = String::with_capacity(((GRID_WIDTH + 1) * GRID_HEIGHT) as usize);
        for y in 0..GRID_HEIGHT {
            for x in 0..GRID_WIDTH {
                grid.push(self.cell(x, y));
            }
            grid.push('\n');
        }
        grid
    }

    /// Diagnostic line showing the raw state of the twelve mapped buttons.
    pub fn status_line(snapshot: &ButtonVector) -> String {
        let mut line = String::new();
        for button in Button::ALL {
            line.push_str(&format!(
                " {}={}",
                button.label(),
                u8::from(snapshot.pressed(button))
            ));
        }
        line.push(' ');
        line
    }

    /// Draws one frame for this tick's snapshot.
    pub fn frame(&mut self, snapshot: &ButtonVector, out: &mut impl Write) -> io::Result<()> {
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        writeln!(out, "{}", Self::status_line(snapshot))?;
        writeln!(out)?;
        self.apply_input(snapshot);
        write!(out, "{}", self.render_grid())?;
        out.flush()
    }
}

impl Default for BoxGame {
    fn default() -> Self {
        Self::new()
    }
}

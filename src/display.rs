//! Terminal status display
//!
//! Renders the per-block [`Status`](crate::Status) snapshot as a live
//! cursor-addressed view on stderr: symbol rate, carrier offset colored by
//! lock state, and a character-grid scatter plot of the last flushed output
//! block. Strictly a consumer of the snapshot; it holds no pipeline state
//! and rendering failures are ignored.

use std::io::{self, Write};

use crate::demod::Status;

const ANSI_NO_COLOR: u8 = 0;
const ANSI_BOLD: u8 = 1;
const ANSI_FG_RED: u8 = 31;
const ANSI_FG_GREEN: u8 = 32;

/// Cursor-addressed stderr renderer.
///
/// Resizes the terminal to 36×72 on creation and restores 24×80 on drop.
pub struct TerminalUi {
    out: io::Stderr,
}

impl TerminalUi {
    pub fn new() -> Self {
        let mut ui = Self { out: io::stderr() };
        let _ = ui.reset();
        let _ = ui.resize(36, 72);
        ui
    }

    fn reset(&mut self) -> io::Result<()> {
        write!(self.out, "\x1bc")
    }

    fn clear(&mut self) -> io::Result<()> {
        write!(self.out, "\x1b[2J")
    }

    fn resize(&mut self, height: u16, width: u16) -> io::Result<()> {
        write!(self.out, "\x1b[8;{};{}t", height, width)
    }

    fn goto(&mut self, y: u16, x: u16) -> io::Result<()> {
        write!(self.out, "\x1b[{};{}H", y, x)
    }

    fn color(&mut self, color: u8) -> io::Result<()> {
        write!(self.out, "\x1b[{}m", color)
    }

    fn put_char(&mut self, y: u16, x: u16, c: char) -> io::Result<()> {
        self.goto(y, x)?;
        write!(self.out, "{}", c)
    }

    fn draw(&mut self, status: &Status<'_>) -> io::Result<()> {
        self.clear()?;

        self.goto(1, 0)?;
        self.color(ANSI_BOLD)?;
        self.color(ANSI_FG_GREEN)?;
        write!(self.out, "Meteor-M2 LRPT demodulator")?;
        self.color(ANSI_NO_COLOR)?;

        self.goto(2, 0)?;
        write!(self.out, "Symbol rate: {:.5}", status.symbol_rate)?;

        self.goto(3, 0)?;
        write!(self.out, "Carrier offset: ")?;
        self.color(ANSI_BOLD)?;
        self.color(if status.locked {
            ANSI_FG_GREEN
        } else {
            ANSI_FG_RED
        })?;
        write!(self.out, "{:.2} Hz", status.carrier_offset_hz)?;
        self.color(ANSI_NO_COLOR)?;
        self.color(ANSI_BOLD)?;

        // Scatter plot of the last flushed block: x from I, y from Q
        for pair in status.constellation.chunks_exact(2) {
            let cx = pair[0] as i8;
            let cy = pair[1] as i8;
            let col = (36 + cx as i16 / 4) as u16;
            let row = (20 + cy as i16 / 8) as u16;
            self.put_char(row, col, '#')?;
        }

        self.color(ANSI_NO_COLOR)?;
        self.out.flush()
    }

    /// Render one status snapshot, ignoring I/O errors (best effort).
    pub fn render(&mut self, status: &Status<'_>) {
        let _ = self.draw(status);
    }
}

impl Default for TerminalUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalUi {
    fn drop(&mut self) {
        let _ = self.resize(24, 80);
        let _ = self.reset();
    }
}

use chip8_machine::emulator::display::{Display, SCREEN_HEIGHT, SCREEN_WIDTH};

use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, ErrorKind};
use std::io::{self, stdout, Stdout, Write};

/// Turn a crossterm error into the `io::Error` that `main` returns.
pub fn io_error(err: ErrorKind) -> io::Error {
    match err {
        ErrorKind::IoError(err) => err,
        other => io::Error::new(io::ErrorKind::Other, other),
    }
}

/// Draws the machine's display in the terminal, two characters per pixel.
pub struct CrosstermOutput {
    out: Stdout,
    cells: [u64; SCREEN_HEIGHT],
}

impl CrosstermOutput {
    pub fn new() -> crossterm::Result<CrosstermOutput> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        let mut output = CrosstermOutput {
            out,
            cells: [0; SCREEN_HEIGHT],
        };
        output.draw_border()?;
        Ok(output)
    }

    fn draw_border(&mut self) -> crossterm::Result<()> {
        let bottom = SCREEN_HEIGHT + 1;
        let right = 2 * SCREEN_WIDTH + 1;
        for y in 0..=bottom {
            for x in 0..=right {
                let c = match (x, y) {
                    (0, 0) => '┏',
                    (x, 0) if x == right => '┓',
                    (0, y) if y == bottom => '┗',
                    (x, y) if x == right && y == bottom => '┛',
                    (_, y) if y == 0 || y == bottom => '━',
                    (x, _) if x == 0 || x == right => '┃',
                    _ => continue,
                };
                queue!(self.out, cursor::MoveTo(x as u16, y as u16), Print(c))?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Redraw the pixels that changed since the last frame.
    pub fn draw(&mut self, display: &Display) -> crossterm::Result<()> {
        for y in 0..SCREEN_HEIGHT {
            let row = display.row(y);
            let changed = row ^ self.cells[y];
            if changed == 0 {
                continue;
            }
            for x in 0..SCREEN_WIDTH {
                let mask = 1u64 << (SCREEN_WIDTH - 1 - x);
                if changed & mask != 0 {
                    let cell = if row & mask != 0 { "██" } else { "  " };
                    queue!(self.out, cursor::MoveTo(2 * x as u16 + 1, y as u16 + 1), Print(cell))?;
                }
            }
            self.cells[y] = row;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Ring the terminal bell.
    pub fn beep(&mut self) -> crossterm::Result<()> {
        queue!(self.out, Print('\x07'))?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for CrosstermOutput {
    fn drop(&mut self) {
        let _ = execute!(self.out, LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

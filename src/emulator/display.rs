use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// The 64x32 monochrome framebuffer, one bit per pixel.
///
/// Each row is packed into a `u64` with x = 0 in the most significant bit.
#[derive(Clone, PartialEq, Eq)]
pub struct Display {
    rows: [u64; SCREEN_HEIGHT],
    dirty: bool,
}

impl Display {
    pub fn new() -> Display {
        Display {
            rows: [0; SCREEN_HEIGHT],
            dirty: false,
        }
    }

    fn mask(x: usize) -> u64 {
        1 << (SCREEN_WIDTH - 1 - x)
    }

    /// Whether the pixel at (x, y) is on. Coordinates wrap around the screen.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.rows[y % SCREEN_HEIGHT] & Self::mask(x % SCREEN_WIDTH) != 0
    }

    /// The packed bits of row `y`.
    pub fn row(&self, y: usize) -> u64 {
        self.rows[y % SCREEN_HEIGHT]
    }

    pub fn clear(&mut self) {
        self.rows = [0; SCREEN_HEIGHT];
        self.dirty = true;
    }

    /// XOR an 8-pixel wide sprite onto the screen with its top left corner at (x, y).
    ///
    /// Every pixel wraps around the edges on its own, so a sprite at the right edge
    /// continues at the left. Returns true if any pixel was switched off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let x0 = x as usize % SCREEN_WIDTH;
        let y0 = y as usize % SCREEN_HEIGHT;

        let mut collision = false;
        for (dy, &row) in sprite.iter().enumerate() {
            let screen_row = &mut self.rows[(y0 + dy) % SCREEN_HEIGHT];
            for dx in 0..8 {
                if row >> (7 - dx) & 1 == 0 {
                    continue;
                }
                let mask = Self::mask((x0 + dx) % SCREEN_WIDTH);
                collision |= *screen_row & mask != 0;
                *screen_row ^= mask;
                self.dirty = true;
            }
        }

        collision
    }

    /// True if the contents changed since the last `clear_dirty`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Iterate over the rows as booleans, top to bottom.
    pub fn pixels(&self) -> impl Iterator<Item = impl Iterator<Item = bool> + '_> + '_ {
        self.rows
            .iter()
            .map(|row| (0..SCREEN_WIDTH).map(move |x| row & Self::mask(x) != 0))
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.pixels() {
            for on in row {
                write!(f, "{}", if on { "#" } else { " " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("rows", &format_args!("{:016x?}", self.rows))
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_display_is_blank_and_clean() {
        let display = Display::new();
        assert!(display.pixels().flatten().all(|on| !on));
        assert!(!display.is_dirty());
    }

    #[test]
    fn draw_places_msb_at_the_left() {
        let mut display = Display::new();
        assert!(!display.draw_sprite(2, 1, &[0b1000_0001]));
        assert!(display.get(2, 1));
        assert!(display.get(9, 1));
        assert!(!display.get(3, 1));
        assert!(display.is_dirty());
    }

    #[test]
    fn drawing_twice_erases_and_collides() {
        let mut display = Display::new();
        let sprite = [0xF0, 0x90, 0xF0];
        assert!(!display.draw_sprite(10, 10, &sprite));
        assert!(display.draw_sprite(10, 10, &sprite));
        assert_eq!(display.clone(), {
            let mut blank = Display::new();
            blank.dirty = true;
            blank
        });
    }

    #[test]
    fn blank_sprite_leaves_display_clean() {
        let mut display = Display::new();
        assert!(!display.draw_sprite(5, 5, &[]));
        assert!(!display.draw_sprite(5, 5, &[0x00, 0x00]));
        assert!(!display.is_dirty());
    }

    #[test]
    fn pixels_wrap_independently() {
        let mut display = Display::new();
        display.draw_sprite(63, 31, &[0xC0, 0xC0]);
        assert!(display.get(63, 31));
        assert!(display.get(0, 31));
        assert!(display.get(63, 0));
        assert!(display.get(0, 0));
    }

    #[test]
    fn start_coordinates_wrap() {
        let mut display = Display::new();
        display.draw_sprite(64 + 3, 32 + 2, &[0x80]);
        assert!(display.get(3, 2));
    }

    #[test]
    fn clear_blanks_and_marks_dirty() {
        let mut display = Display::new();
        display.draw_sprite(0, 0, &[0xFF]);
        display.clear_dirty();
        display.clear();
        assert_eq!(display.row(0), 0);
        assert!(display.is_dirty());
    }

    #[test]
    fn renders_as_text() {
        let mut display = Display::new();
        display.draw_sprite(0, 0, &[0xA0]);
        let text = display.to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(&first[..4], "# # ");
        assert_eq!(text.lines().count(), SCREEN_HEIGHT);
    }
}

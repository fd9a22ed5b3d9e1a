use crossterm::event::{poll, read, Event, KeyCode};
use std::time::{Duration, Instant};

/// Terminals only report key presses, never releases, so a key counts
/// as held for this long after its last press or auto-repeat.
const HOLD_TIMEOUT: Duration = Duration::from_millis(250);

/// Keeps track of which hex keys are held, and which changed since last asked.
pub struct KeyManager {
    timeout: Duration,
    last_pressed: [Option<Instant>; 16],
    held: [bool; 16],
    quit: bool,
}

impl KeyManager {
    pub fn new() -> KeyManager {
        KeyManager::with_timeout(HOLD_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> KeyManager {
        KeyManager {
            timeout,
            last_pressed: [None; 16],
            held: [false; 16],
            quit: false,
        }
    }

    /// Read every pending terminal event without blocking.
    pub fn poll_events(&mut self) -> crossterm::Result<()> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = read()? {
                log::trace!("Got key {:?}", key_event);
                self.press(key_event.code, Instant::now());
            }
        }
        Ok(())
    }

    fn press(&mut self, code: KeyCode, at: Instant) {
        match code {
            KeyCode::Esc => self.quit = true,
            code => {
                if let Some(key) = key_to_u8(code) {
                    self.last_pressed[key as usize] = Some(at);
                }
            }
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Keys whose held state changed, as (key, pressed) pairs.
    pub fn changes(&mut self, now: Instant) -> Vec<(u8, bool)> {
        let mut changes = Vec::new();
        for key in 0..16 {
            let held = self.last_pressed[key]
                .map(|at| now.saturating_duration_since(at) < self.timeout)
                .unwrap_or(false);
            if held != self.held[key] {
                self.held[key] = held;
                changes.push((key as u8, held));
            }
        }
        changes
    }
}

/// Map 0-9 and a-f to the hex keypad.
pub fn key_to_u8(key: KeyCode) -> Option<u8> {
    match key {
        KeyCode::Char(c) => c.to_digit(16).map(|digit| digit as u8),
        _ => None,
    }
}

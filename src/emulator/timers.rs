/// The delay and sound timers.
///
/// Both count down towards zero once per call to `tick`, which the driver
/// calls at 60 Hz. Executing instructions never decrements them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Timers {
        Timers::default()
    }

    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

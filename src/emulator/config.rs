/// Where the shift instructions (8XY6 and 8XYE) take their operand from.
/// CHIP-8 interpreters disagree on this, and programs are written for one or the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftQuirk {
    /// Shift Vx in place and ignore Vy.
    VxOnly,
    /// Shift Vy and store the result in Vx, as the COSMAC VIP did.
    VyToVx,
}

impl Default for ShiftQuirk {
    fn default() -> Self {
        ShiftQuirk::VxOnly
    }
}

/// Behaviour switches for a `Machine`. Kept across resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub shift_quirk: ShiftQuirk,
}

impl Config {
    pub fn with_shift_quirk(self, shift_quirk: ShiftQuirk) -> Config {
        Config { shift_quirk, ..self }
    }

    /// The register 8XY6 and 8XYE read their operand from.
    pub fn shift_source(&self, x: u8, y: u8) -> u8 {
        match self.shift_quirk {
            ShiftQuirk::VxOnly => x,
            ShiftQuirk::VyToVx => y,
        }
    }
}

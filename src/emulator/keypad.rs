use super::error::MachineError;

pub const NUM_KEYS: usize = 16;

/// The state of the 16-key hexadecimal keypad, written by whatever
/// input device the frontend provides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; NUM_KEYS],
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    pub fn set(&mut self, index: u8, pressed: bool) -> Result<(), MachineError> {
        let key = self
            .keys
            .get_mut(index as usize)
            .ok_or(MachineError::InvalidKeyIndex { index })?;
        *key = pressed;
        Ok(())
    }

    /// Whether the key in the low nibble of `index` is held down.
    pub fn is_pressed(&self, index: u8) -> bool {
        self.keys[(index & 0xF) as usize]
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.keys
    }
}

use super::memory::PROGRAM_START;

pub const NUM_REGISTERS: usize = 16;

/// Index of VF, the register instructions write their flags to.
pub const FLAG: u8 = 0xF;

/// V0..VF, the index register I and the program counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    v: [u8; NUM_REGISTERS],
    pub i: u16,
    pub pc: u16,
}

impl Registers {
    pub fn new() -> Registers {
        Registers {
            v: [0; NUM_REGISTERS],
            i: 0,
            pc: PROGRAM_START,
        }
    }

    /// Read Vx. Only the low nibble of `x` is used.
    pub fn get(&self, x: u8) -> u8 {
        self.v[(x & 0xF) as usize]
    }

    pub fn set(&mut self, x: u8, value: u8) {
        self.v[(x & 0xF) as usize] = value;
    }

    /// Write the result of an operation and then its flag.
    /// The flag is written last, so it wins when x is VF.
    pub fn set_with_flag(&mut self, x: u8, value: u8, flag: bool) {
        self.set(x, value);
        self.set(FLAG, flag as u8);
    }

    pub fn flag(&self) -> u8 {
        self.get(FLAG)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.v
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_program_start() {
        let registers = Registers::new();
        assert_eq!(registers.pc, 0x200);
        assert_eq!(registers.i, 0);
        assert_eq!(registers.as_slice(), &[0; 16]);
    }

    #[test]
    fn flag_is_written_after_result() {
        let mut registers = Registers::new();
        registers.set_with_flag(FLAG, 0x42, true);
        assert_eq!(registers.flag(), 1);
        registers.set_with_flag(0x3, 0x42, false);
        assert_eq!(registers.get(0x3), 0x42);
        assert_eq!(registers.flag(), 0);
    }
}

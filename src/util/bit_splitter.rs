/// A structure for splitting a 16-bit opcode into the fields
/// the CHIP-8 instruction set is encoded with: four nibbles,
/// the low byte (`kk`) and the low 12 bits (`nnn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSplitter(u8, u8);

impl BitSplitter {
    pub fn from_u16(value: u16) -> BitSplitter {
        BitSplitter((value >> 8) as u8, (value & 0x00FF) as u8)
    }

    pub fn new(left: u8, right: u8) -> BitSplitter {
        BitSplitter(left, right)
    }

    /// Big-endian join of the two bytes.
    pub fn as_u16(&self) -> u16 {
        ((self.0 as u16) << 8) | self.1 as u16
    }

    /// The four nibbles, most significant first.
    pub fn as_four_u8(&self) -> (u8, u8, u8, u8) {
        (self.0 >> 4, self.0 & 0x0F, self.1 >> 4, self.1 & 0x0F)
    }

    pub fn last_8_bits(&self) -> u8 {
        self.1
    }

    pub fn last_12_bits(&self) -> u16 {
        self.as_u16() & 0x0FFF
    }
}

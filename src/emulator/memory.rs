//! The 4 KiB address space, with the hexadecimal font at the bottom
//! and programs loaded from 0x200.

pub const MEM_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEM_SIZE - PROGRAM_START as usize;
pub const FONT_START: u16 = 0x000;
pub const GLYPH_SIZE: u16 = 5;
const ADDRESS_MASK: u16 = (MEM_SIZE - 1) as u16;

const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Flat byte-addressable memory.
///
/// Addresses are 12 bits wide; anything above 0xFFF wraps around,
/// so a misbehaving program can never index out of bounds.
pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {
    /// Zeroed memory with the font loaded.
    pub fn new() -> Memory {
        let mut bytes = [0; MEM_SIZE];
        let font_start = FONT_START as usize;
        bytes[font_start..font_start + FONT.len()].copy_from_slice(&FONT);
        Memory { bytes }
    }

    /// Address of the glyph for the low nibble of `digit`.
    pub fn glyph_address(digit: u8) -> u16 {
        FONT_START + GLYPH_SIZE * (digit & 0x0F) as u16
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[(addr & ADDRESS_MASK) as usize]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & ADDRESS_MASK) as usize] = value;
    }

    /// Big-endian 16-bit word at `addr`.
    pub fn read_word(&self, addr: u16) -> u16 {
        (self.read(addr) as u16) << 8 | self.read(addr.wrapping_add(1)) as u16
    }

    /// Copy a program into memory at 0x200, returning how many bytes fit.
    pub fn load_program(&mut self, program: &[u8]) -> usize {
        let len = program.len().min(MAX_PROGRAM_SIZE);
        let start = PROGRAM_START as usize;
        self.bytes[start..start + len].copy_from_slice(&program[..len]);
        len
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

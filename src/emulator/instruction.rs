use crate::util::bit_splitter::BitSplitter;
use std::fmt;

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
/// - PC: Program counter
/// - I: 16 bit register for memory address
/// - VN: One of the 16 available variables (register identifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    MachineCall(Addr), // 0NNN
    ClearScreen, // 00E0
    Return, // 00EE
    Goto(Addr), // 1NNN
    Call(Addr), // 2NNN
    IfRegEqConst(Reg, Const), // 3XNN
    IfRegNeqConst(Reg, Const), // 4XNN
    IfRegEqReg(Reg, Reg), // 5XY0
    SetRegToConst(Reg, Const), // 6XNN
    IncRegByConst(Reg, Const), // 7XNN
    SetRegToReg(Reg, Reg), // 8XY0
    BitwiseOr(Reg, Reg), // 8XY1
    BitwiseAnd(Reg, Reg), // 8XY2
    BitwiseXor(Reg, Reg), // 8XY3
    IncRegByReg(Reg, Reg), // 8XY4
    DecRegByReg(Reg, Reg), // 8XY5
    BitshiftRight(Reg, Reg), // 8XY6
    SetVxVyMinusVx(Reg, Reg), // 8XY7
    BitshiftLeft(Reg, Reg), // 8XYE
    IfRegNeqReg(Reg, Reg), // 9XY0
    SetI(Addr), // ANNN
    SetPcToV0PlusAddr(Addr), // BNNN
    SetVxRand(Reg, Const), // CXNN
    Draw(Reg, Reg, Const), // DXYN
    IfKeyEqVx(Reg), // EX9E
    IfKeyNeqVx(Reg), // EXA1
    SetRegToDelayTimer(Reg), // FX07
    SetRegToGetKey(Reg), // FX0A
    SetDelayTimerToReg(Reg), // FX15
    SetSoundTimerToReg(Reg), // FX18
    AddRegToI(Reg), // FX1E
    SetIToSpriteAddrVx(Reg), // FX29
    SetIToBcdOfReg(Reg), // FX33
    RegDump(Reg), // FX55
    RegLoad(Reg), // FX65
}

impl Instruction {
    pub fn from_u16(value: u16) -> Option<Instruction> {
        Self::decode(BitSplitter::from_u16(value))
    }

    pub fn from_two_u8(left: u8, right: u8) -> Option<Instruction> {
        Self::decode(BitSplitter::new(left, right))
    }

    /// Decode an opcode, or `None` if it is not part of the instruction set.
    fn decode(opcode: BitSplitter) -> Option<Instruction> {
        let nnn = Addr(opcode.last_12_bits());
        let kk = Const(opcode.last_8_bits());
        let instruction = match opcode.as_four_u8() {
            (0, 0, 0xE, 0) => Instruction::ClearScreen,
            (0, 0, 0xE, 0xE) => Instruction::Return,
            (0, _, _, _) => Instruction::MachineCall(nnn),
            (1, _, _, _) => Instruction::Goto(nnn),
            (2, _, _, _) => Instruction::Call(nnn),
            (3, x, _, _) => Instruction::IfRegEqConst(Reg(x), kk),
            (4, x, _, _) => Instruction::IfRegNeqConst(Reg(x), kk),
            (5, x, y, 0) => Instruction::IfRegEqReg(Reg(x), Reg(y)),
            (6, x, _, _) => Instruction::SetRegToConst(Reg(x), kk),
            (7, x, _, _) => Instruction::IncRegByConst(Reg(x), kk),
            (8, x, y, 0) => Instruction::SetRegToReg(Reg(x), Reg(y)),
            (8, x, y, 1) => Instruction::BitwiseOr(Reg(x), Reg(y)),
            (8, x, y, 2) => Instruction::BitwiseAnd(Reg(x), Reg(y)),
            (8, x, y, 3) => Instruction::BitwiseXor(Reg(x), Reg(y)),
            (8, x, y, 4) => Instruction::IncRegByReg(Reg(x), Reg(y)),
            (8, x, y, 5) => Instruction::DecRegByReg(Reg(x), Reg(y)),
            (8, x, y, 6) => Instruction::BitshiftRight(Reg(x), Reg(y)),
            (8, x, y, 7) => Instruction::SetVxVyMinusVx(Reg(x), Reg(y)),
            (8, x, y, 0xE) => Instruction::BitshiftLeft(Reg(x), Reg(y)),
            (9, x, y, 0) => Instruction::IfRegNeqReg(Reg(x), Reg(y)),
            (0xA, _, _, _) => Instruction::SetI(nnn),
            (0xB, _, _, _) => Instruction::SetPcToV0PlusAddr(nnn),
            (0xC, x, _, _) => Instruction::SetVxRand(Reg(x), kk),
            (0xD, x, y, n) => Instruction::Draw(Reg(x), Reg(y), Const(n)),
            (0xE, x, 9, 0xE) => Instruction::IfKeyEqVx(Reg(x)),
            (0xE, x, 0xA, 1) => Instruction::IfKeyNeqVx(Reg(x)),
            (0xF, x, 0, 7) => Instruction::SetRegToDelayTimer(Reg(x)),
            (0xF, x, 0, 0xA) => Instruction::SetRegToGetKey(Reg(x)),
            (0xF, x, 1, 5) => Instruction::SetDelayTimerToReg(Reg(x)),
            (0xF, x, 1, 8) => Instruction::SetSoundTimerToReg(Reg(x)),
            (0xF, x, 1, 0xE) => Instruction::AddRegToI(Reg(x)),
            (0xF, x, 2, 9) => Instruction::SetIToSpriteAddrVx(Reg(x)),
            (0xF, x, 3, 3) => Instruction::SetIToBcdOfReg(Reg(x)),
            (0xF, x, 5, 5) => Instruction::RegDump(Reg(x)),
            (0xF, x, 6, 5) => Instruction::RegLoad(Reg(x)),
            _ => return None,
        };
        Some(instruction)
    }
}

/// Assembly-like mnemonics, mostly for logging.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            MachineCall(Addr(nnn)) => write!(f, "SYS {:#05x}", nnn),
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Goto(Addr(nnn)) => write!(f, "JP {:#05x}", nnn),
            Call(Addr(nnn)) => write!(f, "CALL {:#05x}", nnn),
            IfRegEqConst(Reg(x), Const(kk)) => write!(f, "SE V{:X}, {:#04x}", x, kk),
            IfRegNeqConst(Reg(x), Const(kk)) => write!(f, "SNE V{:X}, {:#04x}", x, kk),
            IfRegEqReg(Reg(x), Reg(y)) => write!(f, "SE V{:X}, V{:X}", x, y),
            SetRegToConst(Reg(x), Const(kk)) => write!(f, "LD V{:X}, {:#04x}", x, kk),
            IncRegByConst(Reg(x), Const(kk)) => write!(f, "ADD V{:X}, {:#04x}", x, kk),
            SetRegToReg(Reg(x), Reg(y)) => write!(f, "LD V{:X}, V{:X}", x, y),
            BitwiseOr(Reg(x), Reg(y)) => write!(f, "OR V{:X}, V{:X}", x, y),
            BitwiseAnd(Reg(x), Reg(y)) => write!(f, "AND V{:X}, V{:X}", x, y),
            BitwiseXor(Reg(x), Reg(y)) => write!(f, "XOR V{:X}, V{:X}", x, y),
            IncRegByReg(Reg(x), Reg(y)) => write!(f, "ADD V{:X}, V{:X}", x, y),
            DecRegByReg(Reg(x), Reg(y)) => write!(f, "SUB V{:X}, V{:X}", x, y),
            BitshiftRight(Reg(x), Reg(y)) => write!(f, "SHR V{:X}, V{:X}", x, y),
            SetVxVyMinusVx(Reg(x), Reg(y)) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            BitshiftLeft(Reg(x), Reg(y)) => write!(f, "SHL V{:X}, V{:X}", x, y),
            IfRegNeqReg(Reg(x), Reg(y)) => write!(f, "SNE V{:X}, V{:X}", x, y),
            SetI(Addr(nnn)) => write!(f, "LD I, {:#05x}", nnn),
            SetPcToV0PlusAddr(Addr(nnn)) => write!(f, "JP V0, {:#05x}", nnn),
            SetVxRand(Reg(x), Const(kk)) => write!(f, "RND V{:X}, {:#04x}", x, kk),
            Draw(Reg(x), Reg(y), Const(n)) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            IfKeyEqVx(Reg(x)) => write!(f, "SKP V{:X}", x),
            IfKeyNeqVx(Reg(x)) => write!(f, "SKNP V{:X}", x),
            SetRegToDelayTimer(Reg(x)) => write!(f, "LD V{:X}, DT", x),
            SetRegToGetKey(Reg(x)) => write!(f, "LD V{:X}, K", x),
            SetDelayTimerToReg(Reg(x)) => write!(f, "LD DT, V{:X}", x),
            SetSoundTimerToReg(Reg(x)) => write!(f, "LD ST, V{:X}", x),
            AddRegToI(Reg(x)) => write!(f, "ADD I, V{:X}", x),
            SetIToSpriteAddrVx(Reg(x)) => write!(f, "LD F, V{:X}", x),
            SetIToBcdOfReg(Reg(x)) => write!(f, "LD B, V{:X}", x),
            RegDump(Reg(x)) => write!(f, "LD [I], V0..V{:X}", x),
            RegLoad(Reg(x)) => write!(f, "LD V0..V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn opcodes_are_parsed_correctly() {
        let parsed = |value| Instruction::from_u16(value).unwrap();
        assert_eq!(Instruction::MachineCall(Addr(0x123)), parsed(0x0123));
        assert_eq!(Instruction::ClearScreen, parsed(0x00E0));
        assert_eq!(Instruction::Return, parsed(0x00EE));
        assert_eq!(Instruction::Goto(Addr(0x25)), parsed(0x1025));
        assert_eq!(Instruction::Call(Addr(0x37)), parsed(0x2037));
        assert_eq!(Instruction::IfRegEqConst(Reg(0xA), Const(8)), parsed(0x3A08));
        assert_eq!(Instruction::IfRegNeqConst(Reg(0xA), Const(8)), parsed(0x4A08));
        assert_eq!(Instruction::IfRegEqReg(Reg(0xA), Reg(0xB)), parsed(0x5AB0));
        assert_eq!(Instruction::SetRegToConst(Reg(0xB), Const(0x23)), parsed(0x6B23));
        assert_eq!(Instruction::IncRegByConst(Reg(0xC), Const(0xA1)), parsed(0x7CA1));
        assert_eq!(Instruction::SetRegToReg(Reg(0xA), Reg(0xB)), parsed(0x8AB0));
        assert_eq!(Instruction::BitwiseOr(Reg(0xD), Reg(0xE)), parsed(0x8DE1));
        assert_eq!(Instruction::BitwiseAnd(Reg(0xD), Reg(0xE)), parsed(0x8DE2));
        assert_eq!(Instruction::BitwiseXor(Reg(0xD), Reg(0xE)), parsed(0x8DE3));
        assert_eq!(Instruction::IncRegByReg(Reg(0xA), Reg(0xB)), parsed(0x8AB4));
        assert_eq!(Instruction::DecRegByReg(Reg(0xA), Reg(0xB)), parsed(0x8AB5));
        assert_eq!(Instruction::BitshiftRight(Reg(0xA), Reg(0xB)), parsed(0x8AB6));
        assert_eq!(Instruction::SetVxVyMinusVx(Reg(0xA), Reg(0xB)), parsed(0x8AB7));
        assert_eq!(Instruction::BitshiftLeft(Reg(0xA), Reg(0)), parsed(0x8A0E));
        assert_eq!(Instruction::IfRegNeqReg(Reg(0xA), Reg(0xB)), parsed(0x9AB0));
        assert_eq!(Instruction::SetI(Addr(0x25)), parsed(0xA025));
        assert_eq!(Instruction::SetPcToV0PlusAddr(Addr(0x25)), parsed(0xB025));
        assert_eq!(Instruction::SetVxRand(Reg(0xA), Const(0x23)), parsed(0xCA23));
        assert_eq!(Instruction::Draw(Reg(0xA), Reg(0xB), Const(0xC)), parsed(0xDABC));
        assert_eq!(Instruction::IfKeyEqVx(Reg(0xA)), parsed(0xEA9E));
        assert_eq!(Instruction::IfKeyNeqVx(Reg(0xA)), parsed(0xEAA1));
        assert_eq!(Instruction::SetRegToDelayTimer(Reg(0xA)), parsed(0xFA07));
        assert_eq!(Instruction::SetRegToGetKey(Reg(0xA)), parsed(0xFA0A));
        assert_eq!(Instruction::SetDelayTimerToReg(Reg(0xA)), parsed(0xFA15));
        assert_eq!(Instruction::SetSoundTimerToReg(Reg(0xA)), parsed(0xFA18));
        assert_eq!(Instruction::AddRegToI(Reg(0xA)), parsed(0xFA1E));
        assert_eq!(Instruction::SetIToSpriteAddrVx(Reg(0xA)), parsed(0xFA29));
        assert_eq!(Instruction::SetIToBcdOfReg(Reg(0xA)), parsed(0xFA33));
        assert_eq!(Instruction::RegDump(Reg(0xA)), parsed(0xFA55));
        assert_eq!(Instruction::RegLoad(Reg(0xA)), parsed(0xFA65));
    }

    #[test]
    fn from_two_u8_equals_from_u16() {
        assert_eq!(Instruction::from_two_u8(0x12, 0x34), Instruction::from_u16(0x1234));
        assert_eq!(Instruction::from_two_u8(0x2F, 0x2F), Instruction::from_u16(0x2F2F));
        assert_eq!(Instruction::from_two_u8(0xF0, 0x00), Instruction::from_u16(0xF000));
    }

    #[test_case(0x5AB1 ; "skip with nonzero low nibble")]
    #[test_case(0x9AB3 ; "skip not equal with nonzero low nibble")]
    #[test_case(0x8AB8 ; "alu op 8")]
    #[test_case(0x8ABF ; "alu op f")]
    #[test_case(0xEA00 ; "key op")]
    #[test_case(0xFA00 ; "misc op 00")]
    #[test_case(0xFAFF ; "misc op ff")]
    fn unknown_opcodes_are_rejected(opcode: u16) {
        assert_eq!(Instruction::from_u16(opcode), None);
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Instruction::from_u16(0x00E0).unwrap().to_string(), "CLS");
        assert_eq!(Instruction::from_u16(0x2ABC).unwrap().to_string(), "CALL 0xabc");
        assert_eq!(Instruction::from_u16(0x8AB4).unwrap().to_string(), "ADD VA, VB");
        assert_eq!(Instruction::from_u16(0xD125).unwrap().to_string(), "DRW V1, V2, 5");
        assert_eq!(Instruction::from_u16(0x6F0A).unwrap().to_string(), "LD VF, 0x0a");
    }
}

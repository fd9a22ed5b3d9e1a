use thiserror::Error;

/// Everything that can go wrong while the machine runs a program.
///
/// None of these abort the emulator. Non-fatal conditions are logged and
/// counted, fatal ones additionally halt the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("unknown opcode {opcode:#06x} at {address:#05x}")]
    UnknownOpcode { opcode: u16, address: u16 },

    #[error("stack overflow calling from {address:#05x}")]
    StackOverflow { address: u16 },

    #[error("stack underflow returning from {address:#05x}")]
    StackUnderflow { address: u16 },

    #[error("key index {index} is outside 0..=0xF")]
    InvalidKeyIndex { index: u8 },

    #[error("program of {size} bytes truncated to {loaded} bytes")]
    ProgramTooLarge { size: usize, loaded: usize },
}

impl MachineError {
    /// Fatal errors leave control flow in an unknown state, so the machine halts on them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MachineError::StackOverflow { .. } | MachineError::StackUnderflow { .. }
        )
    }
}

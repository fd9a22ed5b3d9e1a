use super::error::MachineError;

pub const STACK_SIZE: usize = 16;

/// Return addresses for subroutine calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStack {
    addresses: [u16; STACK_SIZE],
    pointer: usize,
}

impl CallStack {
    pub fn new() -> CallStack {
        CallStack {
            addresses: [0; STACK_SIZE],
            pointer: 0,
        }
    }

    /// Push a return address. `from` is the address of the calling instruction,
    /// used only for reporting.
    pub fn push(&mut self, return_address: u16, from: u16) -> Result<(), MachineError> {
        if self.pointer == STACK_SIZE {
            return Err(MachineError::StackOverflow { address: from });
        }
        self.addresses[self.pointer] = return_address;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self, from: u16) -> Result<u16, MachineError> {
        if self.pointer == 0 {
            return Err(MachineError::StackUnderflow { address: from });
        }
        self.pointer -= 1;
        Ok(self.addresses[self.pointer])
    }

    pub fn depth(&self) -> usize {
        self.pointer
    }

    pub fn is_empty(&self) -> bool {
        self.pointer == 0
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}

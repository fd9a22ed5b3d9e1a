use super::error::MachineError;
use std::collections::VecDeque;

const RECENT_CAPACITY: usize = 32;

/// Counts and keeps the latest of every error the machine reported.
///
/// The emulator never fails a `step`, so this is where a frontend
/// looks to find out why a program misbehaves. Every report is also logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub unknown_opcodes: u64,
    pub stack_overflows: u64,
    pub stack_underflows: u64,
    pub invalid_keys: u64,
    pub truncated_loads: u64,
    recent: VecDeque<MachineError>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn record(&mut self, error: MachineError) {
        if error.is_fatal() {
            log::error!("{}", error);
        } else {
            log::warn!("{}", error);
        }

        let counter = match error {
            MachineError::UnknownOpcode { .. } => &mut self.unknown_opcodes,
            MachineError::StackOverflow { .. } => &mut self.stack_overflows,
            MachineError::StackUnderflow { .. } => &mut self.stack_underflows,
            MachineError::InvalidKeyIndex { .. } => &mut self.invalid_keys,
            MachineError::ProgramTooLarge { .. } => &mut self.truncated_loads,
        };
        *counter += 1;

        if self.recent.len() == RECENT_CAPACITY {
            self.recent.pop_front();
        }
        self.recent.push_back(error);
    }

    pub fn total(&self) -> u64 {
        self.unknown_opcodes
            + self.stack_overflows
            + self.stack_underflows
            + self.invalid_keys
            + self.truncated_loads
    }

    /// The most recent reports, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &MachineError> {
        self.recent.iter()
    }

    pub fn last(&self) -> Option<&MachineError> {
        self.recent.back()
    }

    /// Take the recent reports, leaving the counters alone.
    pub fn drain(&mut self) -> Vec<MachineError> {
        self.recent.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record(MachineError::InvalidKeyIndex { index: 20 });
        diagnostics.record(MachineError::InvalidKeyIndex { index: 21 });
        diagnostics.record(MachineError::StackUnderflow { address: 0x200 });
        assert_eq!(diagnostics.invalid_keys, 2);
        assert_eq!(diagnostics.stack_underflows, 1);
        assert_eq!(diagnostics.total(), 3);
        assert_eq!(diagnostics.last(), Some(&MachineError::StackUnderflow { address: 0x200 }));
    }

    #[test]
    fn keeps_only_the_latest_reports() {
        let mut diagnostics = Diagnostics::new();
        for opcode in 0..40 {
            diagnostics.record(MachineError::UnknownOpcode { opcode, address: 0x200 });
        }
        assert_eq!(diagnostics.unknown_opcodes, 40);
        assert_eq!(diagnostics.recent().count(), RECENT_CAPACITY);
        assert_eq!(
            diagnostics.recent().next(),
            Some(&MachineError::UnknownOpcode { opcode: 8, address: 0x200 })
        );
    }

    #[test]
    fn drain_empties_recent_but_keeps_counts() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record(MachineError::ProgramTooLarge { size: 4000, loaded: 3584 });
        assert_eq!(diagnostics.drain().len(), 1);
        assert_eq!(diagnostics.recent().count(), 0);
        assert_eq!(diagnostics.truncated_loads, 1);
    }
}

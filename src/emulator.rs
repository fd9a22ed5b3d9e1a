//! The CHIP-8 machine and the parts it is built from.

pub mod audio;
pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod display;
pub mod error;
pub mod instruction;
pub mod keypad;
pub mod machine;
pub mod memory;
pub mod registers;
pub mod stack;
pub mod timers;

pub use config::{Config, ShiftQuirk};
pub use error::MachineError;
pub use machine::{ExecutionMode, Machine, StepOutcome};

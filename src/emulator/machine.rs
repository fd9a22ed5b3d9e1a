//! The CHIP-8 virtual machine as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use super::config::Config;
use super::diagnostics::Diagnostics;
use super::display::Display;
use super::error::MachineError;
use super::instruction::*;
use super::keypad::Keypad;
use super::memory::{Memory, MAX_PROGRAM_SIZE};
use super::registers::{Registers, FLAG};
use super::stack::CallStack;
use super::timers::Timers;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// What the machine is doing between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Running,
    /// Suspended by FX0A until a key is pressed. The key goes into `register`.
    WaitingForKey { register: u8 },
    /// Stopped for good after a fatal error. Only `reset` leaves this mode.
    Halted,
}

/// The result of a call to `Machine::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction was executed. `None` if the opcode was not recognized.
    Executed(Option<Instruction>),
    /// Nothing was done, the machine is waiting for a key press.
    WaitingForKey,
    /// Nothing was done, the machine has halted.
    Halted,
}

impl StepOutcome {
    pub fn did_work(&self) -> bool {
        matches!(self, StepOutcome::Executed(_))
    }
}

/// How an instruction moves the program counter.
enum Next {
    Advance,
    Skip,
    Jump(u16),
    Stay,
}

impl Next {
    fn skip_if(condition: bool) -> Next {
        if condition {
            Next::Skip
        } else {
            Next::Advance
        }
    }
}

/// A CHIP-8 machine. `R` is the source of randomness for CXNN.
pub struct Machine<R: RngCore = StdRng> {
    memory: Memory,
    registers: Registers,
    stack: CallStack,
    timers: Timers,
    display: Display,
    keypad: Keypad,
    mode: ExecutionMode,
    diagnostics: Diagnostics,
    config: Config,
    rng: R,
}

impl Machine<StdRng> {
    /// Create a new machine with the default configuration and a randomly seeded generator.
    pub fn new() -> Machine<StdRng> {
        Machine::with_rng(StdRng::from_entropy(), Config::default())
    }

    /// Create a new machine whose random numbers are fixed by `seed`.
    pub fn with_seed(seed: u64) -> Machine<StdRng> {
        Machine::with_rng(StdRng::seed_from_u64(seed), Config::default())
    }
}

impl Default for Machine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> Machine<R> {
    /// Create a new machine drawing random numbers from `rng`.
    pub fn with_rng(rng: R, config: Config) -> Machine<R> {
        Machine {
            memory: Memory::new(),
            registers: Registers::new(),
            stack: CallStack::new(),
            timers: Timers::new(),
            display: Display::new(),
            keypad: Keypad::new(),
            mode: ExecutionMode::Running,
            diagnostics: Diagnostics::new(),
            config,
            rng,
        }
    }

    /// Put the machine back in its power-on state. The loaded program is erased,
    /// the configuration and random generator are kept.
    pub fn reset(&mut self) {
        log::debug!("Resetting machine");
        self.memory = Memory::new();
        self.registers = Registers::new();
        self.stack = CallStack::new();
        self.timers = Timers::new();
        self.display = Display::new();
        self.keypad = Keypad::new();
        self.mode = ExecutionMode::Running;
        self.diagnostics = Diagnostics::new();
    }

    /// Copy a program into memory at 0x200 and return how many bytes were loaded.
    /// Anything beyond 3584 bytes is cut off.
    pub fn load_program(&mut self, program: &[u8]) -> usize {
        let loaded = self.memory.load_program(program);
        if loaded < program.len() {
            self.diagnostics.record(MachineError::ProgramTooLarge {
                size: program.len(),
                loaded,
            });
        }
        log::debug!("Loaded {} of {} program bytes", loaded, program.len());
        loaded
    }

    /// Fetch, decode and execute the instruction at PC.
    pub fn step(&mut self) -> StepOutcome {
        if let Some(idle) = self.idle_outcome() {
            return idle;
        }

        let pc = self.registers.pc;
        let opcode = self.memory.read_word(pc);
        match Instruction::from_u16(opcode) {
            Some(instruction) => {
                log::trace!("{:#05x}: {:04x} {}", pc, opcode, instruction);
                self.run(instruction);
                StepOutcome::Executed(Some(instruction))
            }
            None => {
                self.diagnostics.record(MachineError::UnknownOpcode { opcode, address: pc });
                self.registers.pc = pc.wrapping_add(2);
                StepOutcome::Executed(None)
            }
        }
    }

    /// Step up to `count` times, stopping early if the machine halts or waits for a key.
    /// Returns the number of steps that did work.
    pub fn step_many(&mut self, count: usize) -> usize {
        let mut executed = 0;
        while executed < count && self.step().did_work() {
            executed += 1;
        }
        executed
    }

    /// Count the delay and sound timers down by one. Call this at 60 Hz.
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    /// Press or release a key. A press while waiting on FX0A resumes execution.
    pub fn set_key(&mut self, index: u8, pressed: bool) -> Result<(), MachineError> {
        if let Err(err) = self.keypad.set(index, pressed) {
            self.diagnostics.record(err.clone());
            return Err(err);
        }

        if let ExecutionMode::WaitingForKey { register } = self.mode {
            if pressed {
                log::debug!("Key {:X} pressed, resuming", index);
                self.registers.set(register, index);
                self.registers.pc = self.registers.pc.wrapping_add(2);
                self.mode = ExecutionMode::Running;
            }
        }
        Ok(())
    }

    /// Execute a single instruction as if it was located at PC.
    ///
    /// Like `step`, this does nothing while the machine is halted or waiting for a key.
    pub fn execute(&mut self, instruction: Instruction) -> StepOutcome {
        if let Some(idle) = self.idle_outcome() {
            return idle;
        }
        self.run(instruction);
        StepOutcome::Executed(Some(instruction))
    }

    /// Execute many instructions in order, stopping early if the machine halts or
    /// waits for a key. Returns the number of instructions executed.
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> usize {
        instructions
            .iter()
            .take_while(|&&instruction| self.execute(instruction).did_work())
            .count()
    }

    fn idle_outcome(&self) -> Option<StepOutcome> {
        match self.mode {
            ExecutionMode::Halted => Some(StepOutcome::Halted),
            ExecutionMode::WaitingForKey { .. } => Some(StepOutcome::WaitingForKey),
            ExecutionMode::Running => None,
        }
    }

    fn run(&mut self, instruction: Instruction) {
        let pc = self.registers.pc;
        let next = self.execute_single(instruction);
        self.registers.pc = match next {
            Next::Advance => pc.wrapping_add(2),
            Next::Skip => pc.wrapping_add(4),
            Next::Jump(addr) => addr,
            Next::Stay => pc,
        };
    }

    fn execute_single(&mut self, instruction: Instruction) -> Next {
        let pc = self.registers.pc;
        let regs = &mut self.registers;

        match instruction {
            // Programs for the original RCA 1802 can't run here
            Instruction::MachineCall(Addr(addr)) => {
                log::info!("Skipping machine code call to {:#05x}", addr);
                self.diagnostics.record(MachineError::UnknownOpcode {
                    opcode: addr,
                    address: pc,
                });
            }

            Instruction::ClearScreen => self.display.clear(),

            // Return to the previous call site via the stack.
            Instruction::Return => match self.stack.pop(pc) {
                Ok(addr) => return Next::Jump(addr),
                Err(err) => return self.halt(err),
            },

            Instruction::Goto(Addr(addr)) => return Next::Jump(addr),

            // Store the return address on the stack, then jump to the specified address
            Instruction::Call(Addr(addr)) => match self.stack.push(pc.wrapping_add(2), pc) {
                Ok(()) => return Next::Jump(addr),
                Err(err) => return self.halt(err),
            },

            Instruction::IfRegEqConst(Reg(x), Const(n)) => return Next::skip_if(regs.get(x) == n),

            Instruction::IfRegNeqConst(Reg(x), Const(n)) => return Next::skip_if(regs.get(x) != n),

            Instruction::IfRegEqReg(Reg(x), Reg(y)) => {
                return Next::skip_if(regs.get(x) == regs.get(y))
            }

            Instruction::SetRegToConst(Reg(x), Const(n)) => regs.set(x, n),

            // Wraps around, VF is left alone
            Instruction::IncRegByConst(Reg(x), Const(n)) => regs.set(x, regs.get(x).wrapping_add(n)),

            Instruction::SetRegToReg(Reg(x), Reg(y)) => regs.set(x, regs.get(y)),

            Instruction::BitwiseOr(Reg(x), Reg(y)) => regs.set(x, regs.get(x) | regs.get(y)),

            Instruction::BitwiseAnd(Reg(x), Reg(y)) => regs.set(x, regs.get(x) & regs.get(y)),

            Instruction::BitwiseXor(Reg(x), Reg(y)) => regs.set(x, regs.get(x) ^ regs.get(y)),

            // VF is 1 on carry
            Instruction::IncRegByReg(Reg(x), Reg(y)) => {
                let (sum, carry) = regs.get(x).overflowing_add(regs.get(y));
                regs.set_with_flag(x, sum, carry);
            }

            // VF is 0 on borrow, 1 otherwise
            Instruction::DecRegByReg(Reg(x), Reg(y)) => {
                let (difference, borrow) = regs.get(x).overflowing_sub(regs.get(y));
                regs.set_with_flag(x, difference, !borrow);
            }

            Instruction::SetVxVyMinusVx(Reg(x), Reg(y)) => {
                let (difference, borrow) = regs.get(y).overflowing_sub(regs.get(x));
                regs.set_with_flag(x, difference, !borrow);
            }

            // VF gets the bit shifted out
            Instruction::BitshiftRight(Reg(x), Reg(y)) => {
                let value = regs.get(self.config.shift_source(x, y));
                regs.set_with_flag(x, value >> 1, value & 0x01 != 0);
            }

            Instruction::BitshiftLeft(Reg(x), Reg(y)) => {
                let value = regs.get(self.config.shift_source(x, y));
                regs.set_with_flag(x, value << 1, value & 0x80 != 0);
            }

            Instruction::IfRegNeqReg(Reg(x), Reg(y)) => {
                return Next::skip_if(regs.get(x) != regs.get(y))
            }

            Instruction::SetI(Addr(addr)) => regs.i = addr,

            Instruction::SetPcToV0PlusAddr(Addr(addr)) => {
                return Next::Jump(regs.get(0) as u16 + addr)
            }

            Instruction::SetVxRand(Reg(x), Const(n)) => {
                let random: u8 = self.rng.gen();
                regs.set(x, random & n);
            }

            Instruction::Draw(Reg(x), Reg(y), Const(height)) => {
                let mut sprite = [0; 15];
                for (row, byte) in sprite.iter_mut().enumerate().take(height as usize) {
                    *byte = self.memory.read(regs.i.wrapping_add(row as u16));
                }
                let collision =
                    self.display
                        .draw_sprite(regs.get(x), regs.get(y), &sprite[..height as usize]);
                regs.set(FLAG, collision as u8);
            }

            Instruction::IfKeyEqVx(Reg(x)) => return Next::skip_if(self.keypad.is_pressed(regs.get(x))),

            Instruction::IfKeyNeqVx(Reg(x)) => {
                return Next::skip_if(!self.keypad.is_pressed(regs.get(x)))
            }

            Instruction::SetRegToDelayTimer(Reg(x)) => regs.set(x, self.timers.delay),

            // Suspend until `set_key` delivers a press, which also moves PC along
            Instruction::SetRegToGetKey(Reg(x)) => {
                log::debug!("Waiting for a key press into V{:X}", x);
                self.mode = ExecutionMode::WaitingForKey { register: x };
                return Next::Stay;
            }

            Instruction::SetDelayTimerToReg(Reg(x)) => self.timers.delay = regs.get(x),

            Instruction::SetSoundTimerToReg(Reg(x)) => self.timers.sound = regs.get(x),

            Instruction::AddRegToI(Reg(x)) => regs.i = regs.i.wrapping_add(regs.get(x) as u16),

            // Each font glyph is 5 bytes tall
            Instruction::SetIToSpriteAddrVx(Reg(x)) => regs.i = Memory::glyph_address(regs.get(x)),

            Instruction::SetIToBcdOfReg(Reg(x)) => {
                let value = regs.get(x);
                let i = regs.i;
                self.memory.write(i, value / 100);
                self.memory.write(i.wrapping_add(1), value / 10 % 10);
                self.memory.write(i.wrapping_add(2), value % 10);
            }

            // Dump register values up to Vx
            Instruction::RegDump(Reg(x)) => {
                for reg_no in 0..=x {
                    self.memory.write(regs.i.wrapping_add(reg_no as u16), regs.get(reg_no));
                }
            }

            // Load register values up to Vx
            Instruction::RegLoad(Reg(x)) => {
                for reg_no in 0..=x {
                    regs.set(reg_no, self.memory.read(regs.i.wrapping_add(reg_no as u16)));
                }
            }
        };

        Next::Advance
    }

    fn halt(&mut self, err: MachineError) -> Next {
        self.diagnostics.record(err);
        log::error!("Machine halted at {:#05x}", self.registers.pc);
        self.mode = ExecutionMode::Halted;
        Next::Stay
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn is_halted(&self) -> bool {
        self.mode == ExecutionMode::Halted
    }

    pub fn is_waiting_for_key(&self) -> bool {
        matches!(self.mode, ExecutionMode::WaitingForKey { .. })
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Hand out the display if it changed since the last call, marking it as drawn.
    pub fn take_frame(&mut self) -> Option<&Display> {
        if self.display.is_dirty() {
            self.display.clear_dirty();
            Some(&self.display)
        } else {
            None
        }
    }

    /// True while the sound timer is running.
    pub fn sound_active(&self) -> bool {
        self.timers.sound_active()
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// The largest program `load_program` accepts without truncating.
    pub fn max_program_size() -> usize {
        MAX_PROGRAM_SIZE
    }
}

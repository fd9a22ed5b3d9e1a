/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

The machine executes one instruction per call to `step` and never blocks.
Everything around it, drawing the screen, reading the keyboard, playing sound
and deciding how fast to run, belongs to the frontend driving it.

# Crossterm Frontend

If you want to try the emulator on some programs, there is a ready-to-use implementation
you can run by using `cargo run --release --bin crossterm_frontend -- <program>`.
You can then use the keys 0-9 and a-f to give input, but which ones to use depend on the CHIP-8 program.
Press escape to quit.

# Library

The main way of running a program is to load it as bytes and step through it.

```rust
use chip8_machine::emulator::Machine;

let mut machine = Machine::new();

// Load a program at address 0x200.
let clear_display = [0x00, 0xE0];
machine.load_program(&clear_display);
machine.step(); // Will now clear the display
assert!(machine.take_frame().is_some());
```

Alternatively, you can experiment by executing instructions manually.

```rust
use chip8_machine::emulator::Machine;
use chip8_machine::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut machine = Machine::with_seed(7);

// Execute instructions manually
machine.execute(Instruction::ClearScreen);

// Or many sequentially
machine.execute_many(&[
    Instruction::Goto(Addr(0x250)),
    Instruction::SetRegToConst(Reg(0xA), Const(35)),
    Instruction::SetRegToReg(Reg(0xB), Reg(0xA))
]);
assert_eq!(machine.registers().get(0xB), 35);
```

## Timers and input

The delay and sound timers are not tied to instruction execution.
Call `tick_timers` 60 times a second, however fast you call `step`.
`emulator::clock::Scheduler` works out how many of each are due.

Key presses are delivered with `set_key`. An FX0A instruction suspends the machine
until a key is pressed, `step` does nothing in the meantime.

```rust
use chip8_machine::emulator::{ExecutionMode, Machine};

let mut machine = Machine::with_seed(7);
machine.load_program(&[0xF3, 0x0A]); // Wait for a key and put it in V3
machine.step();
assert_eq!(machine.mode(), ExecutionMode::WaitingForKey { register: 3 });

machine.set_key(0xB, true).unwrap();
assert_eq!(machine.registers().get(3), 0xB);
```
*/

pub mod emulator;
pub mod util;

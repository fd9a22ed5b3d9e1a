use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;

use chip8_machine::emulator::clock::{Scheduler, TIMER_HZ};
use chip8_machine::emulator::instruction::Instruction;
use chip8_machine::emulator::{Config, Machine, ShiftQuirk};

/// Run a program without a screen and print what it drew.
#[derive(StructOpt, Debug)]
#[structopt(name = "no_frontend")]
struct Opt {
    /// Verbose mode (-v, -vv, -vvv)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Number of 60 Hz frames to run for
    #[structopt(long, default_value = "600")]
    frames: u32,

    /// Instructions per second
    #[structopt(long, default_value = "700")]
    hz: u32,

    /// Seed for the random number generator
    #[structopt(long)]
    seed: Option<u64>,

    /// Shift VY into VX in 8XY6 and 8XYE, as the COSMAC VIP did
    #[structopt(long)]
    shift_vy: bool,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn main() -> std::io::Result<()> {
    // Get configuration and read input file
    let opt = Opt::from_args();
    init_logging(opt.verbose);
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let quirk = if opt.shift_vy { ShiftQuirk::VyToVx } else { ShiftQuirk::VxOnly };
    let config = Config::default().with_shift_quirk(quirk);
    let seed = opt.seed.unwrap_or_else(rand::random);
    log::debug!("Using seed {}", seed);

    let mut machine = Machine::with_rng(StdRng::seed_from_u64(seed), config);
    machine.load_program(&program);

    // Simulated time, there is nobody to watch in real time
    let mut scheduler = Scheduler::new(opt.hz);
    let frame = Duration::from_secs(1) / TIMER_HZ;
    for _ in 0..opt.frames {
        let due = scheduler.advance(frame);
        machine.step_many(due.steps as usize);
        for _ in 0..due.ticks {
            machine.tick_timers();
        }
        if machine.is_halted() {
            break;
        }
    }

    print!("{}", machine.display());
    println!("mode: {:?}, pc: {:#05x}", machine.mode(), machine.pc());
    if machine.is_halted() {
        let opcode = machine.memory().read_word(machine.pc());
        match Instruction::from_u16(opcode) {
            Some(instruction) => println!("halted on: {:04x} {}", opcode, instruction),
            None => println!("halted on: {:04x}", opcode),
        }
    }
    let diagnostics = machine.diagnostics();
    if diagnostics.total() > 0 {
        println!(
            "unknown opcodes: {}, stack overflows: {}, stack underflows: {}, truncated loads: {}",
            diagnostics.unknown_opcodes,
            diagnostics.stack_overflows,
            diagnostics.stack_underflows,
            diagnostics.truncated_loads
        );
        if let Some(last) = diagnostics.last() {
            println!("last error: {}", last);
        }
    }

    Ok(())
}

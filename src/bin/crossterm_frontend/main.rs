use std::path::PathBuf;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;

use chip8_machine::emulator::audio::{SoundEdge, SoundWatcher};
use chip8_machine::emulator::clock::Scheduler;
use chip8_machine::emulator::{Config, Machine, ShiftQuirk};

mod crossterm_io;
mod key_manager;
use crossterm_io::{io_error, CrosstermOutput};
use key_manager::KeyManager;

/// The program options.
#[derive(StructOpt)]
struct Opt {
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

fn main() -> std::io::Result<()> {
    env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let quirk = if opt.shift_vy { ShiftQuirk::VyToVx } else { ShiftQuirk::VxOnly };
    let rng = match opt.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut machine = Machine::with_rng(rng, Config::default().with_shift_quirk(quirk));
    machine.load_program(&program);

    let mut keys = KeyManager::new();
    let mut output = CrosstermOutput::new().map_err(io_error)?;
    let mut sound = SoundWatcher::new();
    let mut scheduler = Scheduler::new(opt.hz);
    let mut last = Instant::now();

    // Start execution
    while !keys.quit_requested() {
        keys.poll_events().map_err(io_error)?;
        let now = Instant::now();
        for (key, pressed) in keys.changes(now) {
            if let Err(err) = machine.set_key(key, pressed) {
                log::warn!("Ignoring key {}: {}", key, err);
            }
        }

        let due = scheduler.advance(now - last);
        last = now;
        machine.step_many(due.steps as usize);
        for _ in 0..due.ticks {
            machine.tick_timers();
        }

        if let Some(display) = machine.take_frame() {
            output.draw(display).map_err(io_error)?;
        }
        if sound.observe(machine.sound_active()) == Some(SoundEdge::Started) {
            output.beep().map_err(io_error)?;
        }

        std::thread::sleep(scheduler.until_next_tick().max(Duration::from_millis(1)));
    }

    drop(output);
    let diagnostics = machine.diagnostics();
    if diagnostics.total() > 0 {
        eprintln!("{} errors, last: {:?}", diagnostics.total(), diagnostics.last());
    }

    Ok(())
}

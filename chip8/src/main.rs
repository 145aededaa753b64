use std::path::PathBuf;

use clap::Parser;
use log::error;

use emu8_core::{Options, UnknownOpcodePolicy};

mod audio;
mod clock;
mod keymap;
mod run;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum UnknownOpcodes {
    /// Log the opcode and move on to the next one
    Skip,
    /// Stop the interpreter
    Halt,
}

impl From<UnknownOpcodes> for UnknownOpcodePolicy {
    fn from(value: UnknownOpcodes) -> Self {
        match value {
            UnknownOpcodes::Skip => UnknownOpcodePolicy::Skip,
            UnknownOpcodes::Halt => UnknownOpcodePolicy::Halt,
        }
    }
}

#[derive(clap::Parser, Debug)]
#[command(name = "emu8", about = "A Chip-8 interpreter")]
pub struct Args {
    /// Raw ROM image to run
    #[arg(value_name = "ROM")]
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    clock_hz: u32,

    /// Window pixels per Chip-8 pixel
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=64))]
    scale: u32,

    /// Seed for the random number instruction
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// What to do with opcodes outside the instruction set
    #[arg(long, value_enum, default_value_t = UnknownOpcodes::Skip)]
    unknown_opcodes: UnknownOpcodes,

    /// Buzzer frequency
    #[arg(long, default_value_t = 440, value_parser = clap::value_parser!(u32).range(20..=20_000))]
    tone_hz: u32,
}

impl Args {
    fn options(&self) -> Options {
        Options {
            unknown_opcodes: self.unknown_opcodes.into(),
            seed: self.seed,
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run::run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

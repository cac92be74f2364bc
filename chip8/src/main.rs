use std::path::PathBuf;

use clap::Parser;
use log::error;

mod debugger;
mod keymap;
mod peripherals;
mod run;

/// Runs a CHIP-8 ROM in an SDL2 window
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Path to a raw CHIP-8 program image
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(short, long, default_value_t = 700)]
    clock: u32,

    /// Size of each CHIP-8 pixel on screen
    #[arg(short, long, default_value_t = 10)]
    scale: u32,

    /// Seed for the RND instruction, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Print the registers and wait for Enter before every instruction
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run::run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

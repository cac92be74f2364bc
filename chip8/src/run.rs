use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::time::{Duration, Instant};

use log::info;

use c8_core::Chip8;
use c8_display::Display;

use crate::debugger;
use crate::peripherals::SdlPeripherals;
use crate::Args;

/// Frames (and display refreshes) per second
const FRAME_RATE: u32 = 60;

pub fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl, args.scale)?;
    let mut chip8 = Chip8::new(SdlPeripherals::new(&sdl)?);
    if let Some(seed) = args.seed {
        chip8 = chip8.with_seed(seed);
    }

    // Load ROM
    let file = File::open(&args.rom)?;
    let mut reader = BufReader::new(file);
    chip8.load_rom(&mut reader)?;
    info!("running {}", args.rom.display());

    // In debug mode every instruction is its own frame
    let cycles_per_frame = if args.debug {
        1
    } else {
        (args.clock / FRAME_RATE).max(1)
    };
    let frame_time = Duration::from_secs(1) / FRAME_RATE;

    'frame: loop {
        let frame_start = Instant::now();

        // Update state
        for _ in 0..cycles_per_frame {
            if args.debug {
                debugger::pause(&chip8)?;
            }
            chip8.step()?;
            if chip8.peripherals().quit_requested() {
                break 'frame;
            }
        }

        // Handle input
        if !chip8.peripherals_mut().pump() {
            break;
        }

        // Only render frames that changed
        if let Some(frame) = chip8.get_frame() {
            display.render(&frame)?;
        }

        // Handle timing
        let elapsed = frame_start.elapsed();
        if !args.debug && frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    info!("window closed, exiting");
    Ok(())
}

//! A CHIP-8 interpreter core.
//!
//! The host supplies the keypad and speaker through `Peripherals`, calls
//! `Chip8::step` at whatever rate it likes and renders the `FrameBuffer`.

pub use chip8::Chip8;
pub use error::{Error, Result};
pub use instruction::Instruction;
pub use peripherals::Peripherals;
pub use state::{FrameBuffer, State};
pub use timer::{Clock, SystemClock};

mod chip8;
pub mod constants;
mod error;
mod instruction;
pub mod opcode;
mod peripherals;
pub mod state;
pub mod timer;

#[cfg(test)]
mod testing;

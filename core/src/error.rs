use thiserror::Error;

/// Faults raised while loading or running a program.
///
/// All of them are fatal to the instruction stream; the host decides whether
/// that means exiting or building a fresh machine.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid instruction at {pc:#06X}: {opcode:#06X}")]
    InvalidInstruction { pc: u16, opcode: u16 },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("stack overflow: call at {pc:#06X} exceeds the call stack depth")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#06X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("unable to read ROM")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

use std::ops::Range;
use std::time::Instant;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_ADDR, MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT,
    SPRITE_SHEET, STACK_DEPTH,
};
use crate::error::{Error, Result};
use crate::timer::Timer;

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is overwritten as a flag by arithmetic, shifts and draws
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, bumped past each instruction as it is fetched
///
/// Pointer
/// - (sp) the number of return addresses currently on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound) that decay with wall-clock time
///
/// ## Memory
/// - 16 entry call stack of return addresses
/// - 4096 bytes of addressable memory, with the sprite sheet at 0x000
/// - 32x64 frame buffer
///     - stores the contents of the next frame to be drawn
///
/// Every memory and stack access is bounds checked and reports an `Error`
/// instead of wrapping.
#[derive(Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub delay_timer: Timer,
    pub sound_timer: Timer,
}

impl State {
    /// A freshly powered-on machine whose timers last ticked at `now`
    pub fn new(now: Instant) -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[FONT_ADDR..FONT_ADDR + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            delay_timer: Timer::new(now),
            sound_timer: Timer::new(now),
        }
    }

    /// Checks that `len` bytes starting at `addr` lie within memory.
    /// The reported address is the first one that doesn't.
    fn range(addr: usize, len: usize) -> Result<Range<usize>> {
        let end = addr + len;
        if end > MEMORY_SIZE {
            Err(Error::MemoryOutOfBounds {
                address: addr.max(MEMORY_SIZE),
            })
        } else {
            Ok(addr..end)
        }
    }

    pub fn read_byte(&self, addr: usize) -> Result<u8> {
        self.memory
            .get(addr)
            .copied()
            .ok_or(Error::MemoryOutOfBounds { address: addr })
    }

    pub fn write_byte(&mut self, addr: usize, byte: u8) -> Result<()> {
        let cell = self
            .memory
            .get_mut(addr)
            .ok_or(Error::MemoryOutOfBounds { address: addr })?;
        *cell = byte;
        Ok(())
    }

    /// Reads the big-endian word at `addr`.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let left = u16::from(self.read_byte(addr)?);
        let right = u16::from(self.read_byte(addr + 1)?);
        Ok(left << 8 | right)
    }

    pub fn read_slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        Ok(&self.memory[State::range(addr, len)?])
    }

    /// Writes all of `data` at `addr`, or nothing at all if it doesn't fit
    pub fn write_slice(&mut self, addr: usize, data: &[u8]) -> Result<()> {
        let range = State::range(addr, data.len())?;
        self.memory[range].copy_from_slice(data);
        Ok(())
    }

    /// Pushes a return address.
    /// Must be called while executing, i.e. after `pc` has moved past the CALL.
    pub fn push(&mut self, addr: u16) -> Result<()> {
        if self.sp == STACK_DEPTH {
            return Err(Error::StackOverflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    /// Pops a return address.
    /// Must be called while executing, i.e. after `pc` has moved past the RET.
    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    /// if condition then pc += 2
    pub fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    pub fn clear_screen(&mut self) {
        self.frame_buffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.draw_flag = true;
    }

    /// XORs an `n` row sprite from memory at `I` onto the FrameBuffer at (Vx, Vy).
    ///
    /// Coordinates wrap around both edges of the display. VF is set if any lit
    /// pixel gets erased and cleared otherwise.
    pub fn draw_sprite(&mut self, x: usize, y: usize, n: u8) -> Result<()> {
        let sprite = State::range(self.i as usize, n as usize)?;
        let origin_x = self.v[x] as usize;
        let origin_y = self.v[y] as usize;
        let mut collision = false;

        for (row, addr) in sprite.enumerate() {
            let byte = self.memory[addr];
            let py = (origin_y + row) % DISPLAY_HEIGHT;
            for col in 0..8 {
                let px = (origin_x + col) % DISPLAY_WIDTH;
                let bit = (byte >> (7 - col)) & 1 == 1;
                collision |= bit && self.frame_buffer[py][px];
                self.frame_buffer[py][px] ^= bit;
            }
        }

        self.v[0xF] = collision as u8;
        self.draw_flag = true;
        Ok(())
    }
}

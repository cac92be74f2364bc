use std::io::{self, Read as _};

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{FONT_ADDR, FONT_SPRITE_SIZE, MAX_PROGRAM_SIZE, PROGRAM_START};
use crate::error::{Error, Result};
use crate::instruction::Instruction;
use crate::peripherals::Peripherals;
use crate::state::{FrameBuffer, State};
use crate::timer::{Clock, SystemClock};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the host's `peripherals` (keypad and speaker)
///  - a `clock` the timers decay against
///  - the random source behind `RND`
///
/// Supplies interfaces for:
/// - loading roms
/// - stepping the CPU one instruction at a time
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8<P, C = SystemClock> {
    state: State,
    peripherals: P,
    clock: C,
    rng: StdRng,
}

impl<P: Peripherals> Chip8<P> {
    pub fn new(peripherals: P) -> Self {
        Chip8::with_clock(peripherals, SystemClock)
    }
}

impl<P: Peripherals, C: Clock> Chip8<P, C> {
    pub fn with_clock(peripherals: P, clock: C) -> Self {
        Chip8 {
            state: State::new(clock.now()),
            peripherals,
            clock,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replaces the OS-seeded random source so runs are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Copies a ROM image into memory at 0x200.
    ///
    /// An image that doesn't fit is rejected without touching memory.
    pub fn load(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_PROGRAM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        self.state.write_slice(PROGRAM_START as usize, rom)?;
        info!("loaded {} byte ROM at {:#05X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn io::Read) -> Result<()> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load(&rom)
    }

    /// The current contents of the display
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn.
    /// The draw flag is cleared, so an unchanged frame is only handed out once.
    pub fn get_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn peripherals(&self) -> &P {
        &self.peripherals
    }

    pub fn peripherals_mut(&mut self) -> &mut P {
        &mut self.peripherals
    }

    /// Decodes the instruction at `addr` without executing it.
    /// `None` if the word there isn't a Chip-8 instruction.
    pub fn disassemble(&self, addr: u16) -> Result<Option<Instruction>> {
        let op = self.state.read_word(addr as usize)?;
        Ok(Instruction::decode(op))
    }

    /// Advances the CPU by a single instruction
    /// - decays the timers
    /// - fetches the opcode pointed at by the pc and moves the pc past it
    /// - decodes and executes it
    pub fn step(&mut self) -> Result<()> {
        self.advance_timers();

        let pc = self.state.pc;
        let op = self.state.read_word(pc as usize)?;
        self.state.pc = pc.wrapping_add(2);

        let instruction =
            Instruction::decode(op).ok_or(Error::InvalidInstruction { pc, opcode: op })?;
        trace!("{:04X}: {:04X} {}", pc, op, instruction);
        self.execute(instruction)
    }

    /// Steps `cycles` times, stopping at the first fault
    pub fn run(&mut self, cycles: usize) -> Result<()> {
        for _ in 0..cycles {
            self.step()?;
        }
        Ok(())
    }

    /// Handles the delay and sound timers
    /// - decrements each by the number of periods since it last ticked
    /// - beeps whenever the sound timer goes down
    fn advance_timers(&mut self) {
        let now = self.clock.now();
        if self.state.delay_timer.tick(now) {
            trace!("delay timer at {}", self.state.delay_timer.value());
        }
        if self.state.sound_timer.tick(now) {
            trace!("sound timer at {}", self.state.sound_timer.value());
            self.peripherals.play_sound();
        }
    }

    fn execute(&mut self, instruction: Instruction) -> Result<()> {
        use Instruction::*;

        let state = &mut self.state;
        match instruction {
            Cls => state.clear_screen(),
            Ret => state.pc = state.pop()?,
            Jump(addr) => state.pc = addr,
            Call(addr) => {
                state.push(state.pc)?;
                state.pc = addr;
            }
            SkipEqByte { x, kk } => state.skip_if(state.v[x] == kk),
            SkipNeByte { x, kk } => state.skip_if(state.v[x] != kk),
            SkipEqReg { x, y } => state.skip_if(state.v[x] == state.v[y]),
            LoadByte { x, kk } => state.v[x] = kk,
            AddByte { x, kk } => state.v[x] = state.v[x].wrapping_add(kk),
            Move { x, y } => state.v[x] = state.v[y],
            Or { x, y } => state.v[x] |= state.v[y],
            And { x, y } => state.v[x] &= state.v[y],
            Xor { x, y } => state.v[x] ^= state.v[y],
            AddReg { x, y } => {
                let (res, carry) = state.v[x].overflowing_add(state.v[y]);
                state.v[x] = res;
                state.v[0xF] = carry as u8;
            }
            Sub { x, y } => {
                let (vx, vy) = (state.v[x], state.v[y]);
                state.v[x] = vx.wrapping_sub(vy);
                state.v[0xF] = (vx >= vy) as u8;
            }
            ShiftRight { x, y } => {
                let vy = state.v[y];
                state.v[x] = vy >> 1;
                state.v[0xF] = vy & 0x1;
            }
            SubN { x, y } => {
                let (vx, vy) = (state.v[x], state.v[y]);
                state.v[x] = vy.wrapping_sub(vx);
                state.v[0xF] = (vy >= vx) as u8;
            }
            ShiftLeft { x, y } => {
                let vy = state.v[y];
                state.v[x] = vy << 1;
                state.v[0xF] = vy >> 7;
            }
            SkipNeReg { x, y } => state.skip_if(state.v[x] != state.v[y]),
            LoadI(addr) => state.i = addr,
            JumpV0(addr) => state.pc = addr.wrapping_add(u16::from(state.v[0x0])),
            Random { x, kk } => state.v[x] = self.rng.gen::<u8>() & kk,
            Draw { x, y, n } => state.draw_sprite(x, y, n)?,
            SkipPressed { x } => {
                let held = self.peripherals.key_pressed(state.v[x] & 0xF);
                state.skip_if(held);
            }
            SkipNotPressed { x } => {
                let held = self.peripherals.key_pressed(state.v[x] & 0xF);
                state.skip_if(!held);
            }
            LoadDelay { x } => state.v[x] = state.delay_timer.value(),
            WaitKey { x } => {
                debug!("waiting for a key press into V{:X}", x);
                state.v[x] = self.peripherals.get_key();
            }
            SetDelay { x } => state.delay_timer.set(state.v[x], self.clock.now()),
            SetSound { x } => state.sound_timer.set(state.v[x], self.clock.now()),
            AddI { x } => state.i = state.i.wrapping_add(u16::from(state.v[x])),
            LoadFont { x } => {
                state.i = FONT_ADDR as u16 + u16::from(state.v[x] & 0xF) * FONT_SPRITE_SIZE
            }
            Bcd { x } => {
                let vx = state.v[x];
                state.write_slice(state.i as usize, &[vx / 100, vx / 10 % 10, vx % 10])?;
            }
            Store { x } => {
                let v = state.v;
                state.write_slice(state.i as usize, &v[..=x])?;
            }
            Read { x } => {
                let mut v = state.v;
                v[..=x].copy_from_slice(state.read_slice(state.i as usize, x + 1)?);
                state.v = v;
            }
        }
        Ok(())
    }
}

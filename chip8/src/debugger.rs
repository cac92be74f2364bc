use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use log::debug;

use c8_core::{Chip8, Clock, Peripherals};

/// Prints the machine state about to be executed and waits for Enter.
pub fn pause<P: Peripherals, C: Clock>(chip8: &Chip8<P, C>) -> io::Result<()> {
    let dump = dump(chip8);
    debug!("paused at {:04X}", chip8.state().pc);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(dump.as_bytes())?;
    out.flush()?;

    io::stdin().lock().read_line(&mut String::new())?;
    Ok(())
}

/// PC, the opcode there and its mnemonic, I, V0..VF, the timers and SP
fn dump<P: Peripherals, C: Clock>(chip8: &Chip8<P, C>) -> String {
    let state = chip8.state();
    let pc = state.pc;
    let op = match state.read_word(pc as usize) {
        Ok(op) => format!("{:04X}", op),
        Err(_) => "----".to_string(),
    };
    let mnemonic = match chip8.disassemble(pc) {
        Ok(Some(instruction)) => instruction.to_string(),
        Ok(None) => "???".to_string(),
        Err(e) => e.to_string(),
    };

    // Writing into a String can't fail
    let mut out = String::new();
    let _ = writeln!(out, "PC: {:04X} M[PC]: {} ({}) I: {:04X}", pc, op, mnemonic, state.i);
    for (row, regs) in state.v.chunks(4).enumerate() {
        let first = row * 4;
        let _ = writeln!(
            out,
            "V{:X}-{:X}: {:02X} {:02X} {:02X} {:02X}",
            first,
            first + 3,
            regs[0],
            regs[1],
            regs[2],
            regs[3]
        );
    }
    let _ = writeln!(
        out,
        "DT: {:02X} ST: {:02X} SP: {}",
        state.delay_timer.value(),
        state.sound_timer.value(),
        state.sp
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl Peripherals for Idle {
        fn key_pressed(&mut self, _key: u8) -> bool {
            false
        }

        fn get_key(&mut self) -> u8 {
            0
        }

        fn play_sound(&mut self) {}
    }

    #[test]
    fn test_dump_shows_next_instruction() {
        let mut chip8 = Chip8::new(Idle);
        chip8.load(&[0x6A, 0x42]).unwrap();
        let dump = dump(&chip8);
        assert!(dump.starts_with("PC: 0200 M[PC]: 6A42 "));
        assert!(dump.contains("I: 0000"));
    }

    #[test]
    fn test_dump_shows_registers_and_timers() {
        let mut chip8 = Chip8::new(Idle);
        chip8.load(&[0x6A, 0x42]).unwrap();
        chip8.step().unwrap();
        let dump = dump(&chip8);
        assert!(dump.contains("V8-B: 00 00 42 00"));
        assert!(dump.contains("DT: 00 ST: 00 SP: 0"));
        assert_eq!(dump.lines().count(), 6);
    }

    #[test]
    fn test_dump_flags_undefined_opcodes() {
        let mut chip8 = Chip8::new(Idle);
        chip8.load(&[0x80, 0x09]).unwrap();
        assert!(dump(&chip8).contains("M[PC]: 8009 (???)"));
    }
}

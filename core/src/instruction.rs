use std::fmt;

use crate::opcode::Opcode;

/// A decoded Chip-8 instruction.
///
/// Register operands are carried as indices into the register file so `Vx` and
/// `Vy` may safely name the same register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0: clear the display
    Cls,
    /// 00EE: PC = STACK.pop()
    Ret,
    /// 1nnn: PC = addr
    Jump(u16),
    /// 2nnn: STACK.push(PC); PC = addr
    Call(u16),
    /// 3xkk: if Vx == kk then skip
    SkipEqByte { x: usize, kk: u8 },
    /// 4xkk: if Vx != kk then skip
    SkipNeByte { x: usize, kk: u8 },
    /// 5xy0: if Vx == Vy then skip
    SkipEqReg { x: usize, y: usize },
    /// 6xkk: Vx = kk
    LoadByte { x: usize, kk: u8 },
    /// 7xkk: Vx += kk, no carry
    AddByte { x: usize, kk: u8 },
    /// 8xy0: Vx = Vy
    Move { x: usize, y: usize },
    /// 8xy1: Vx |= Vy
    Or { x: usize, y: usize },
    /// 8xy2: Vx &= Vy
    And { x: usize, y: usize },
    /// 8xy3: Vx ^= Vy
    Xor { x: usize, y: usize },
    /// 8xy4: Vx += Vy; VF = carry
    AddReg { x: usize, y: usize },
    /// 8xy5: Vx -= Vy; VF = !borrow
    Sub { x: usize, y: usize },
    /// 8xy6: Vx = Vy >> 1; VF = lsb(Vy)
    ShiftRight { x: usize, y: usize },
    /// 8xy7: Vx = Vy - Vx; VF = !borrow
    SubN { x: usize, y: usize },
    /// 8xyE: Vx = Vy << 1; VF = msb(Vy)
    ShiftLeft { x: usize, y: usize },
    /// 9xy0: if Vx != Vy then skip
    SkipNeReg { x: usize, y: usize },
    /// Annn: I = addr
    LoadI(u16),
    /// Bnnn: PC = V0 + addr
    JumpV0(u16),
    /// Cxkk: Vx = rand_byte & kk
    Random { x: usize, kk: u8 },
    /// Dxyn: draw_sprite(x=Vx y=Vy size=n)
    Draw { x: usize, y: usize, n: u8 },
    /// Ex9E: if Vx.pressed then skip
    SkipPressed { x: usize },
    /// ExA1: if !Vx.pressed then skip
    SkipNotPressed { x: usize },
    /// Fx07: Vx = DT
    LoadDelay { x: usize },
    /// Fx0A: Vx = await keypress
    WaitKey { x: usize },
    /// Fx15: DT = Vx
    SetDelay { x: usize },
    /// Fx18: ST = Vx
    SetSound { x: usize },
    /// Fx1E: I += Vx
    AddI { x: usize },
    /// Fx29: I = glyph address of Vx
    LoadFont { x: usize },
    /// Fx33: mem[I..I+3] = bcd(Vx)
    Bcd { x: usize },
    /// Fx55: mem[I..=I+x] = V0..=Vx
    Store { x: usize },
    /// Fx65: V0..=Vx = mem[I..=I+x]
    Read { x: usize },
}

impl Instruction {
    /// Selects the Instruction for a given Opcode.
    ///
    /// Returns `None` for any word outside the Chip-8 instruction set; the caller
    /// knows where the word was fetched from and reports the fault.
    pub fn decode(op: u16) -> Option<Instruction> {
        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Cls,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Ret,
            (0x1, ..) => Instruction::Jump(addr),
            (0x2, ..) => Instruction::Call(addr),
            (0x3, ..) => Instruction::SkipEqByte { x, kk },
            (0x4, ..) => Instruction::SkipNeByte { x, kk },
            (0x5, .., 0x0) => Instruction::SkipEqReg { x, y },
            (0x6, ..) => Instruction::LoadByte { x, kk },
            (0x7, ..) => Instruction::AddByte { x, kk },
            (0x8, .., 0x0) => Instruction::Move { x, y },
            (0x8, .., 0x1) => Instruction::Or { x, y },
            (0x8, .., 0x2) => Instruction::And { x, y },
            (0x8, .., 0x3) => Instruction::Xor { x, y },
            (0x8, .., 0x4) => Instruction::AddReg { x, y },
            (0x8, .., 0x5) => Instruction::Sub { x, y },
            (0x8, .., 0x6) => Instruction::ShiftRight { x, y },
            (0x8, .., 0x7) => Instruction::SubN { x, y },
            (0x8, .., 0xE) => Instruction::ShiftLeft { x, y },
            (0x9, .., 0x0) => Instruction::SkipNeReg { x, y },
            (0xA, ..) => Instruction::LoadI(addr),
            (0xB, ..) => Instruction::JumpV0(addr),
            (0xC, ..) => Instruction::Random { x, kk },
            (0xD, ..) => Instruction::Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => Instruction::SkipPressed { x },
            (0xE, _, 0xA, 0x1) => Instruction::SkipNotPressed { x },
            (0xF, _, 0x0, 0x7) => Instruction::LoadDelay { x },
            (0xF, _, 0x0, 0xA) => Instruction::WaitKey { x },
            (0xF, _, 0x1, 0x5) => Instruction::SetDelay { x },
            (0xF, _, 0x1, 0x8) => Instruction::SetSound { x },
            (0xF, _, 0x1, 0xE) => Instruction::AddI { x },
            (0xF, _, 0x2, 0x9) => Instruction::LoadFont { x },
            (0xF, _, 0x3, 0x3) => Instruction::Bcd { x },
            (0xF, _, 0x5, 0x5) => Instruction::Store { x },
            (0xF, _, 0x6, 0x5) => Instruction::Read { x },
            _ => return None,
        };
        Some(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump(addr) => write!(f, "JP {:#05X}", addr),
            Call(addr) => write!(f, "CALL {:#05X}", addr),
            SkipEqByte { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SkipNeByte { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadByte { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubN { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI(addr) => write!(f, "LD I, {:#05X}", addr),
            JumpV0(addr) => write!(f, "JP V0, {:#05X}", addr),
            Random { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipPressed { x } => write!(f, "SKP V{:X}", x),
            SkipNotPressed { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LoadFont { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Read { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;

    #[test]
    fn test_decodes_fixed_opcodes() {
        assert_eq!(Instruction::decode(0x00E0), Some(Instruction::Cls));
        assert_eq!(Instruction::decode(0x00EE), Some(Instruction::Ret));
    }

    #[test]
    fn test_decodes_addresses() {
        assert_eq!(Instruction::decode(0x1ABC), Some(Instruction::Jump(0xABC)));
        assert_eq!(Instruction::decode(0x2123), Some(Instruction::Call(0x123)));
        assert_eq!(Instruction::decode(0xAABC), Some(Instruction::LoadI(0xABC)));
        assert_eq!(Instruction::decode(0xB300), Some(Instruction::JumpV0(0x300)));
    }

    #[test]
    fn test_decodes_register_operands() {
        assert_eq!(
            Instruction::decode(0x3A42),
            Some(Instruction::SkipEqByte { x: 0xA, kk: 0x42 })
        );
        assert_eq!(
            Instruction::decode(0x812E),
            Some(Instruction::ShiftLeft { x: 0x1, y: 0x2 })
        );
        assert_eq!(
            Instruction::decode(0xD125),
            Some(Instruction::Draw { x: 0x1, y: 0x2, n: 0x5 })
        );
        assert_eq!(
            Instruction::decode(0xFE65),
            Some(Instruction::Read { x: 0xE })
        );
    }

    #[test]
    fn test_rejects_undefined_alu_selector() {
        for n in [0x8, 0x9, 0xA, 0xB, 0xC, 0xD, 0xF] {
            assert_eq!(Instruction::decode(0x8000 | n), None);
        }
    }

    #[test]
    fn test_rejects_undefined_low_bytes() {
        assert_eq!(Instruction::decode(0x0123), None);
        assert_eq!(Instruction::decode(0x5121), None);
        assert_eq!(Instruction::decode(0x912F), None);
        assert_eq!(Instruction::decode(0xE19F), None);
        assert_eq!(Instruction::decode(0xF100), None);
        assert_eq!(Instruction::decode(0xF1FF), None);
    }

    #[test]
    fn test_only_the_full_opcode_matches() {
        // 0nnn machine calls aren't supported, even with an E0 low byte
        assert_eq!(Instruction::decode(0x01E0), None);
        assert_eq!(Instruction::decode(0x02EE), None);
        // 5xy0 and 9xy0 need the trailing 0
        assert_eq!(Instruction::decode(0x5011), None);
        assert_eq!(Instruction::decode(0x9121), None);
    }

    #[test]
    fn test_every_defined_family_decodes() {
        let ops = [
            0x00E0, 0x00EE, 0x1200, 0x2200, 0x3000, 0x4000, 0x5010, 0x6000, 0x7000, 0x8010,
            0x8011, 0x8012, 0x8013, 0x8014, 0x8015, 0x8016, 0x8017, 0x801E, 0x9010, 0xA000,
            0xB000, 0xC000, 0xD011, 0xE09E, 0xE0A1, 0xF007, 0xF00A, 0xF015, 0xF018, 0xF01E,
            0xF029, 0xF033, 0xF055, 0xF065,
        ];
        for op in ops.iter() {
            assert!(Instruction::decode(*op).is_some(), "{:04X} should decode", op);
        }
    }

    #[test]
    fn test_mnemonics() {
        let cases = [
            (0x00E0, "CLS"),
            (0x1ABC, "JP 0xABC"),
            (0x6122, "LD V1, 0x22"),
            (0x8AB4, "ADD VA, VB"),
            (0xB2F0, "JP V0, 0x2F0"),
            (0xD015, "DRW V0, V1, 5"),
            (0xF30A, "LD V3, K"),
            (0xFF55, "LD [I], VF"),
        ];
        for (op, text) in cases.iter() {
            let instruction = Instruction::decode(*op).unwrap();
            assert_eq!(instruction.to_string(), *text);
        }
    }
}

use std::fmt;

use crate::bits::extract;

/// A fully decoded Chip-8 instruction
///
/// One variant per opcode pattern; anything a 16-bit word can hold that isn't
/// listed here is undecodable and `decode` returns `None`. Decoding is kept
/// separate from execution so the same decoder drives both the engine and the
/// debugger's disassembly listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0 - clear the display
    Cls,
    /// 00EE - return from a subroutine
    Ret,
    /// 1nnn - jump to addr
    Jp(u16),
    /// 2nnn - call the subroutine at addr
    Call(u16),
    /// 3xkk - skip the next instruction if Vx == kk
    SeByte(u8, u8),
    /// 4xkk - skip the next instruction if Vx != kk
    SneByte(u8, u8),
    /// 5xy0 - skip the next instruction if Vx == Vy
    SeReg(u8, u8),
    /// 6xkk - Vx = kk
    LdByte(u8, u8),
    /// 7xkk - Vx += kk without a carry flag
    AddByte(u8, u8),
    /// 8xy0 - Vx = Vy
    LdReg(u8, u8),
    /// 8xy1 - Vx |= Vy
    Or(u8, u8),
    /// 8xy2 - Vx &= Vy
    And(u8, u8),
    /// 8xy3 - Vx ^= Vy
    Xor(u8, u8),
    /// 8xy4 - Vx += Vy; VF = carry
    AddReg(u8, u8),
    /// 8xy5 - Vx -= Vy; VF = !borrow
    Sub(u8, u8),
    /// 8xy6 - Vx = Vy >> 1; VF = shifted-out bit
    Shr(u8, u8),
    /// 8xy7 - Vx = Vy - Vx; VF = !borrow
    Subn(u8, u8),
    /// 8xyE - Vx = Vy << 1; VF = shifted-out bit
    Shl(u8, u8),
    /// 9xy0 - skip the next instruction if Vx != Vy
    SneReg(u8, u8),
    /// Annn - I = addr
    LdI(u16),
    /// Bnnn - jump to addr + V0
    JpV0(u16),
    /// Cxkk - Vx = random byte & kk
    Rnd(u8, u8),
    /// Dxyn - draw the n-byte sprite at I to (Vx, Vy); VF = collision
    Drw(u8, u8, u8),
    /// Ex9E - skip the next instruction if key Vx is down
    Skp(u8),
    /// ExA1 - skip the next instruction if key Vx is not down
    Sknp(u8),
    /// Fx07 - Vx = DT
    LdVxDt(u8),
    /// Fx0A - block until a key press; Vx = the key
    LdKey(u8),
    /// Fx15 - DT = Vx
    LdDtVx(u8),
    /// Fx18 - ST = Vx
    LdStVx(u8),
    /// Fx1E - I += Vx
    AddI(u8),
    /// Fx29 - I = the font glyph address for digit Vx
    LdFont(u8),
    /// Fx33 - memory[I..I+3] = the decimal digits of Vx
    LdBcd(u8),
    /// Fx55 - memory[I..=I+x] = V0..Vx; I += x + 1
    LdMemVx(u8),
    /// Fx65 - V0..Vx = memory[I..=I+x]; I += x + 1
    LdVxMem(u8),
}

impl Instruction {
    /// Decode a 16-bit word, or None if it matches no opcode pattern
    ///
    /// Operand fields overlap: `x` is bits 8..12, `y` is bits 4..8, `n` is
    /// the low nibble, `kk` the low byte, and `addr` the low 12 bits. Which
    /// of them are meaningful depends on the pattern matched below.
    pub fn decode(op: u16) -> Option<Instruction> {
        use Instruction::*;

        let x = extract(op, 8, 4) as u8;
        let y = extract(op, 4, 4) as u8;
        let n = extract(op, 0, 4) as u8;
        let kk = extract(op, 0, 8) as u8;
        let addr = extract(op, 0, 12);
        let nibbles = (
            extract(op, 12, 4),
            extract(op, 8, 4),
            extract(op, 4, 4),
            extract(op, 0, 4),
        );
        let instruction = match nibbles {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x1, ..) => Jp(addr),
            (0x2, ..) => Call(addr),
            (0x3, ..) => SeByte(x, kk),
            (0x4, ..) => SneByte(x, kk),
            (0x5, .., 0x0) => SeReg(x, y),
            (0x6, ..) => LdByte(x, kk),
            (0x7, ..) => AddByte(x, kk),
            (0x8, .., 0x0) => LdReg(x, y),
            (0x8, .., 0x1) => Or(x, y),
            (0x8, .., 0x2) => And(x, y),
            (0x8, .., 0x3) => Xor(x, y),
            (0x8, .., 0x4) => AddReg(x, y),
            (0x8, .., 0x5) => Sub(x, y),
            (0x8, .., 0x6) => Shr(x, y),
            (0x8, .., 0x7) => Subn(x, y),
            (0x8, .., 0xE) => Shl(x, y),
            (0x9, .., 0x0) => SneReg(x, y),
            (0xA, ..) => LdI(addr),
            (0xB, ..) => JpV0(addr),
            (0xC, ..) => Rnd(x, kk),
            (0xD, ..) => Drw(x, y, n),
            (0xE, .., 0x9, 0xE) => Skp(x),
            (0xE, .., 0xA, 0x1) => Sknp(x),
            (0xF, .., 0x0, 0x7) => LdVxDt(x),
            (0xF, .., 0x0, 0xA) => LdKey(x),
            (0xF, .., 0x1, 0x5) => LdDtVx(x),
            (0xF, .., 0x1, 0x8) => LdStVx(x),
            (0xF, .., 0x1, 0xE) => AddI(x),
            (0xF, .., 0x2, 0x9) => LdFont(x),
            (0xF, .., 0x3, 0x3) => LdBcd(x),
            (0xF, .., 0x5, 0x5) => LdMemVx(x),
            (0xF, .., 0x6, 0x5) => LdVxMem(x),
            _ => return None,
        };
        Some(instruction)
    }
}

/// Renders the conventional assembly mnemonics, e.g. `LD V1, 22` or
/// `DRW V0, V1, 5`; used by the debugger's disassembly listing
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp(addr) => write!(f, "JP {:03X}", addr),
            Call(addr) => write!(f, "CALL {:03X}", addr),
            SeByte(x, kk) => write!(f, "SE V{:X}, {:02X}", x, kk),
            SneByte(x, kk) => write!(f, "SNE V{:X}, {:02X}", x, kk),
            SeReg(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte(x, kk) => write!(f, "LD V{:X}, {:02X}", x, kk),
            AddByte(x, kk) => write!(f, "ADD V{:X}, {:02X}", x, kk),
            LdReg(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr(x, y) => write!(f, "SHR V{:X}, V{:X}", x, y),
            Subn(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl(x, y) => write!(f, "SHL V{:X}, V{:X}", x, y),
            SneReg(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI(addr) => write!(f, "LD I, {:03X}", addr),
            JpV0(addr) => write!(f, "JP V0, {:03X}", addr),
            Rnd(x, kk) => write!(f, "RND V{:X}, {:02X}", x, kk),
            Drw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {:X}", x, y, n),
            Skp(x) => write!(f, "SKP V{:X}", x),
            Sknp(x) => write!(f, "SKNP V{:X}", x),
            LdVxDt(x) => write!(f, "LD V{:X}, DT", x),
            LdKey(x) => write!(f, "LD V{:X}, K", x),
            LdDtVx(x) => write!(f, "LD DT, V{:X}", x),
            LdStVx(x) => write!(f, "LD ST, V{:X}", x),
            AddI(x) => write!(f, "ADD I, V{:X}", x),
            LdFont(x) => write!(f, "LD F, V{:X}", x),
            LdBcd(x) => write!(f, "LD B, V{:X}", x),
            LdMemVx(x) => write!(f, "LD [I], V{:X}", x),
            LdVxMem(x) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;

    #[test]
    fn test_decodes_fixed_patterns() {
        assert_eq!(Instruction::decode(0x00E0), Some(Instruction::Cls));
        assert_eq!(Instruction::decode(0x00EE), Some(Instruction::Ret));
    }

    #[test]
    fn test_decodes_address_family() {
        assert_eq!(Instruction::decode(0x1ABC), Some(Instruction::Jp(0xABC)));
        assert_eq!(Instruction::decode(0x2ABC), Some(Instruction::Call(0xABC)));
        assert_eq!(Instruction::decode(0xAABC), Some(Instruction::LdI(0xABC)));
        assert_eq!(Instruction::decode(0xBABC), Some(Instruction::JpV0(0xABC)));
    }

    #[test]
    fn test_decodes_byte_family() {
        assert_eq!(
            Instruction::decode(0x3122),
            Some(Instruction::SeByte(0x1, 0x22))
        );
        assert_eq!(
            Instruction::decode(0x4122),
            Some(Instruction::SneByte(0x1, 0x22))
        );
        assert_eq!(
            Instruction::decode(0x6122),
            Some(Instruction::LdByte(0x1, 0x22))
        );
        assert_eq!(
            Instruction::decode(0x7122),
            Some(Instruction::AddByte(0x1, 0x22))
        );
        assert_eq!(
            Instruction::decode(0xC122),
            Some(Instruction::Rnd(0x1, 0x22))
        );
    }

    #[test]
    fn test_decodes_alu_family() {
        assert_eq!(Instruction::decode(0x8120), Some(Instruction::LdReg(1, 2)));
        assert_eq!(Instruction::decode(0x8121), Some(Instruction::Or(1, 2)));
        assert_eq!(Instruction::decode(0x8122), Some(Instruction::And(1, 2)));
        assert_eq!(Instruction::decode(0x8123), Some(Instruction::Xor(1, 2)));
        assert_eq!(Instruction::decode(0x8124), Some(Instruction::AddReg(1, 2)));
        assert_eq!(Instruction::decode(0x8125), Some(Instruction::Sub(1, 2)));
        assert_eq!(Instruction::decode(0x8126), Some(Instruction::Shr(1, 2)));
        assert_eq!(Instruction::decode(0x8127), Some(Instruction::Subn(1, 2)));
        assert_eq!(Instruction::decode(0x812E), Some(Instruction::Shl(1, 2)));
    }

    #[test]
    fn test_decodes_skip_and_draw() {
        assert_eq!(Instruction::decode(0x5120), Some(Instruction::SeReg(1, 2)));
        assert_eq!(Instruction::decode(0x9120), Some(Instruction::SneReg(1, 2)));
        assert_eq!(Instruction::decode(0xD125), Some(Instruction::Drw(1, 2, 5)));
        assert_eq!(Instruction::decode(0xE19E), Some(Instruction::Skp(1)));
        assert_eq!(Instruction::decode(0xE1A1), Some(Instruction::Sknp(1)));
    }

    #[test]
    fn test_decodes_f_family() {
        assert_eq!(Instruction::decode(0xF107), Some(Instruction::LdVxDt(1)));
        assert_eq!(Instruction::decode(0xF10A), Some(Instruction::LdKey(1)));
        assert_eq!(Instruction::decode(0xF115), Some(Instruction::LdDtVx(1)));
        assert_eq!(Instruction::decode(0xF118), Some(Instruction::LdStVx(1)));
        assert_eq!(Instruction::decode(0xF11E), Some(Instruction::AddI(1)));
        assert_eq!(Instruction::decode(0xF129), Some(Instruction::LdFont(1)));
        assert_eq!(Instruction::decode(0xF133), Some(Instruction::LdBcd(1)));
        assert_eq!(Instruction::decode(0xF455), Some(Instruction::LdMemVx(4)));
        assert_eq!(Instruction::decode(0xF465), Some(Instruction::LdVxMem(4)));
    }

    #[test]
    fn test_operand_fields_land_in_place() {
        // x is the second nibble, y the third, n the last, kk the low byte,
        // and addresses are the low 12 bits
        assert_eq!(Instruction::decode(0xD789), Some(Instruction::Drw(7, 8, 9)));
        assert_eq!(
            Instruction::decode(0x6ABC),
            Some(Instruction::LdByte(0xA, 0xBC))
        );
        assert_eq!(Instruction::decode(0x1FFF), Some(Instruction::Jp(0xFFF)));
        assert_eq!(Instruction::decode(0xF455), Some(Instruction::LdMemVx(4)));
    }

    #[test]
    fn test_rejects_unknown_patterns() {
        assert_eq!(Instruction::decode(0x0000), None);
        assert_eq!(Instruction::decode(0x0123), None);
        assert_eq!(Instruction::decode(0x5121), None);
        assert_eq!(Instruction::decode(0x8128), None);
        assert_eq!(Instruction::decode(0x9121), None);
        assert_eq!(Instruction::decode(0xE100), None);
        assert_eq!(Instruction::decode(0xF1FF), None);
    }

    #[test]
    fn test_renders_mnemonics() {
        assert_eq!(Instruction::decode(0x00E0).unwrap().to_string(), "CLS");
        assert_eq!(Instruction::decode(0x1ABC).unwrap().to_string(), "JP ABC");
        assert_eq!(
            Instruction::decode(0x6122).unwrap().to_string(),
            "LD V1, 22"
        );
        assert_eq!(
            Instruction::decode(0xD125).unwrap().to_string(),
            "DRW V1, V2, 5"
        );
        assert_eq!(
            Instruction::decode(0xF455).unwrap().to_string(),
            "LD [I], V4"
        );
        assert_eq!(
            Instruction::decode(0xF465).unwrap().to_string(),
            "LD V4, [I]"
        );
        assert_eq!(Instruction::decode(0xF10A).unwrap().to_string(), "LD V1, K");
    }
}

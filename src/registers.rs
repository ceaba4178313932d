use crate::constants::PROGRAM_START;

/// The Chip-8 register file
///
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is overwritten as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
/// - (pc) a 16-bit program counter, starting at the program origin
/// - 2 8-bit timers (delay & sound) that decrement towards 0 at 50Hz
///
/// The return address stack lives outside the register file; programs can
/// only touch it through CALL and RET.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registers {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            delay_timer: 0,
            sound_timer: 0,
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

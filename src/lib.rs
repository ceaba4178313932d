pub use chip8::Chip8;
pub use constants::CLOCK_SPEED;
pub use debugger::Debugger;
pub use display::Display;
pub use error::Error;
pub use instruction::Instruction;
pub use keypad::Keypad;
pub use memory::Memory;
pub use registers::Registers;

mod bits;
mod chip8;
pub mod constants;
mod debugger;
mod display;
mod error;
mod instruction;
mod keypad;
mod memory;
mod registers;

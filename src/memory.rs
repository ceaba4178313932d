use log::info;

use crate::constants::{MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET};
use crate::error::Error;

/// The Chip-8 address space
///
/// 4096 bytes with the font sprite sheet at the very beginning and programs
/// starting at 0x200. Every access is bounds checked; an out of range address
/// is a fatal engine fault rather than a silent wraparound, so a runaway
/// program counter or I register surfaces immediately.
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        // 0x000 - 0x050 is reserved for the sprite sheet
        let mut bytes = [0; MEMORY_SIZE];
        bytes[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    /// Copy a program into memory starting at the program origin
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        let max_size = MEMORY_SIZE - PROGRAM_START as usize;
        if program.len() > max_size {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max_size,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);
        info!("loaded program [size: {}]", program.len());
        Ok(())
    }

    pub fn read(&self, addr: u16) -> Result<u8, Error> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Error::OutOfBounds { addr })
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), Error> {
        *self
            .bytes
            .get_mut(addr as usize)
            .ok_or(Error::OutOfBounds { addr })? = value;
        Ok(())
    }

    /// Read the big-endian 16-bit word at `addr`; this is how instructions
    /// are fetched
    pub fn read_word(&self, addr: u16) -> Result<u16, Error> {
        let left = self.read(addr)?;
        let right = self.read(addr.wrapping_add(1))?;
        Ok(u16::from(left) << 8 | u16::from(right))
    }

    pub fn slice(&self, addr: u16, len: usize) -> Result<&[u8], Error> {
        let start = addr as usize;
        start
            .checked_add(len)
            .and_then(|end| self.bytes.get(start..end))
            .ok_or(Error::OutOfBounds { addr })
    }

    pub fn slice_mut(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Error> {
        let start = addr as usize;
        start
            .checked_add(len)
            .and_then(|end| self.bytes.get_mut(start..end))
            .ok_or(Error::OutOfBounds { addr })
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test_memory {
    use super::*;

    #[test]
    fn test_seeds_sprite_sheet() {
        let memory = Memory::new();
        // The 0x0 glyph
        assert_eq!(
            memory.slice(0, 5).unwrap(),
            &[0xF0, 0x90, 0x90, 0x90, 0xF0]
        );
    }

    #[test]
    fn test_loads_program_at_origin() {
        let mut memory = Memory::new();
        memory.load_program(&[0xAA, 0xBB]).unwrap();
        assert_eq!(memory.read(0x200).unwrap(), 0xAA);
        assert_eq!(memory.read(0x201).unwrap(), 0xBB);
    }

    #[test]
    fn test_rejects_oversized_program() {
        let mut memory = Memory::new();
        let program = vec![0; MEMORY_SIZE - 0x200 + 1];
        assert_eq!(
            memory.load_program(&program),
            Err(Error::ProgramTooLarge {
                size: program.len(),
                max_size: MEMORY_SIZE - 0x200,
            })
        );
    }

    #[test]
    fn test_reads_word() {
        let mut memory = Memory::new();
        memory.load_program(&[0xAA, 0xBB]).unwrap();
        assert_eq!(memory.read_word(0x200).unwrap(), 0xAABB);
    }

    #[test]
    fn test_faults_out_of_bounds_read() {
        let memory = Memory::new();
        assert_eq!(
            memory.read(0x1000),
            Err(Error::OutOfBounds { addr: 0x1000 })
        );
    }

    #[test]
    fn test_faults_word_fetch_at_last_byte() {
        let memory = Memory::new();
        assert!(memory.read_word(0xFFF).is_err());
    }

    #[test]
    fn test_faults_out_of_bounds_slice() {
        let memory = Memory::new();
        assert!(memory.slice(0xFFE, 3).is_err());
        assert!(memory.slice(0xFFE, 2).is_ok());
    }
}

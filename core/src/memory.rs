use log::debug;

use crate::constants::{FONT_SHEET, FONT_START, MEMORY_SIZE, PROGRAM_START};
use crate::error::Chip8Error;

/// # Memory
/// 4096 bytes of flat, byte-addressable memory.
///
/// ```text
/// 0x000 ┬ reserved
/// 0x050 ┼ font sheet (16 glyphs x 5 bytes)
/// 0x0A0 ┼ reserved
/// 0x200 ┼ program
/// 0xFFF ┴
/// ```
///
/// Every access is bounds checked; addresses at or past `MEMORY_SIZE` are a
/// `MemoryOutOfRange` error rather than wrapping.
#[derive(Copy, Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the font sheet in place
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        bytes[font..font + FONT_SHEET.len()].copy_from_slice(&FONT_SHEET);
        Memory { bytes }
    }

    /// Copies a raw program image to `PROGRAM_START`.
    ///
    /// Nothing is written if the image doesn't fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        let start = PROGRAM_START as usize;
        let capacity = MEMORY_SIZE - start;
        if program.len() > capacity {
            return Err(Chip8Error::LoadOverflow {
                size: program.len(),
                capacity,
            });
        }
        self.bytes[start..start + program.len()].copy_from_slice(program);
        debug!("loaded {} byte program at {:#05X}", program.len(), start);
        Ok(())
    }

    /// The byte at `address`, for callers inspecting memory through `Chip8::memory`
    pub fn read(&self, address: usize) -> Result<u8, Chip8Error> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfRange { address })
    }

    /// `len` bytes starting at `start`
    pub fn slice(&self, start: usize, len: usize) -> Result<&[u8], Chip8Error> {
        Self::check_range(start, len)?;
        Ok(&self.bytes[start..start + len])
    }

    /// `len` mutable bytes starting at `start`
    pub fn slice_mut(&mut self, start: usize, len: usize) -> Result<&mut [u8], Chip8Error> {
        Self::check_range(start, len)?;
        Ok(&mut self.bytes[start..start + len])
    }

    /// Gets the opcode at `pc`.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&self, pc: u16) -> Result<u16, Chip8Error> {
        let word = self.slice(pc as usize, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reports the first address of `start..start + len` that falls outside of memory
    fn check_range(start: usize, len: usize) -> Result<(), Chip8Error> {
        match start.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(()),
            _ => Err(Chip8Error::MemoryOutOfRange {
                address: start.max(MEMORY_SIZE),
            }),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_is_preloaded() {
        let memory = Memory::new();
        let font = FONT_START as usize;
        assert_eq!(memory.bytes[font..font + 5], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(memory.bytes[font + 75..font + 80], [0xF0, 0x80, 0xF0, 0x80, 0x80]);
    }

    #[test]
    fn test_memory_zeroed_outside_font() {
        let memory = Memory::new();
        assert!(memory.bytes[..FONT_START as usize].iter().all(|&b| b == 0));
        assert!(memory.bytes[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_loads_program() {
        let mut memory = Memory::new();
        memory.load_program(&[0x00, 0xE0, 0x12, 0x00]).unwrap();
        assert_eq!(memory.bytes[0x200..0x204], [0x00, 0xE0, 0x12, 0x00]);
    }

    #[test]
    fn test_loads_program_filling_memory() {
        let mut memory = Memory::new();
        let program = [0xAB; MEMORY_SIZE - 0x200];
        memory.load_program(&program).unwrap();
        assert_eq!(memory.bytes[MEMORY_SIZE - 1], 0xAB);
    }

    #[test]
    fn test_rejects_oversized_program_without_copying() {
        let mut memory = Memory::new();
        let program = [0xAB; MEMORY_SIZE - 0x200 + 1];
        assert_eq!(
            memory.load_program(&program),
            Err(Chip8Error::LoadOverflow {
                size: MEMORY_SIZE - 0x200 + 1,
                capacity: MEMORY_SIZE - 0x200,
            })
        );
        assert!(memory.bytes[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fetch_is_big_endian() {
        let mut memory = Memory::new();
        memory.bytes[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(memory.fetch(0x200), Ok(0xAABB));
    }

    #[test]
    fn test_fetch_past_end() {
        let memory = Memory::new();
        assert_eq!(
            memory.fetch(0xFFF),
            Err(Chip8Error::MemoryOutOfRange { address: 0x1000 })
        );
    }

    #[test]
    fn test_read_bounds() {
        let mut memory = Memory::new();
        memory.bytes[0xFFF] = 0x42;
        assert_eq!(memory.read(0xFFF), Ok(0x42));
        assert_eq!(
            memory.read(0x1000),
            Err(Chip8Error::MemoryOutOfRange { address: 0x1000 })
        );
        assert_eq!(
            memory.read(0x1234),
            Err(Chip8Error::MemoryOutOfRange { address: 0x1234 })
        );
    }

    #[test]
    fn test_slice_bounds() {
        let mut memory = Memory::new();
        assert_eq!(memory.slice(0xFFD, 3).map(|s| s.len()), Ok(3));
        assert!(memory.slice(0xFFE, 3).is_err());
        assert!(memory.slice_mut(0x2000, 1).is_err());
    }
}

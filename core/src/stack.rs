use crate::constants::STACK_DEPTH;
use crate::error::Chip8Error;

/// # Stack
/// Return addresses of in-progress subroutine calls, at most `STACK_DEPTH` deep.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    frames: [u16; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            frames: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn push(&mut self, address: u16) -> Result<(), Chip8Error> {
        let frame = self
            .frames
            .get_mut(self.sp)
            .ok_or(Chip8Error::StackOverflow)?;
        *frame = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.frames[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

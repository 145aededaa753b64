use crate::frame::FrameBuffer;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::stack::Stack;
use crate::timers::Timers;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// - `registers` V0..VF, the address register and the program counter
/// - `stack` return addresses of in-progress subroutine calls
/// - `timers` the delay and sound timers
///
/// ## Memory
/// - 4096 bytes of addressable memory with the font sheet preloaded
/// - 64x32 frame buffer holding the contents of the next frame to be drawn
/// - `draw_flag` whether the frame buffer changed since it was last taken
///
/// ## Input
/// - Execution halts until a key is held when `waiting_for_key` names a register
///
/// Instructions never mutate a `State` in place; they build the next one. A failing
/// instruction therefore leaves the previous state intact.
#[derive(Copy, Clone)]
pub struct State {
    pub registers: Registers,
    pub stack: Stack,
    pub timers: Timers,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub waiting_for_key: Option<usize>,
}

impl State {
    pub fn new() -> Self {
        State {
            registers: Registers::new(),
            stack: Stack::new(),
            timers: Timers::new(),
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            waiting_for_key: None,
        }
    }

    /// Vx
    pub fn v(&self, x: usize) -> u8 {
        self.registers.v[x]
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    pub fn i(&self) -> u16 {
        self.registers.i
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

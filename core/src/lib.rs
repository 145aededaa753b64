pub use chip8::{Chip8, Options, UnknownOpcodePolicy};
pub use constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, TIMER_HZ};
pub use error::Chip8Error;
pub use frame::FrameBuffer;
pub use memory::Memory;
pub use registers::Registers;

mod chip8;
pub mod constants;
mod error;
mod frame;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod operations;
mod registers;
mod stack;
mod state;
mod timers;

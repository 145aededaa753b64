use thiserror::Error;

/// Everything that can go wrong while loading or stepping a Chip-8.
///
/// Errors are local to the `load_program` or `step` call that raised them; the machine
/// state is left exactly as it was before that call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("program is {size} bytes but the program region only holds {capacity}")]
    LoadOverflow { size: usize, capacity: usize },

    #[error("memory access out of range at {address:#06X}")]
    MemoryOutOfRange { address: usize },

    #[error("subroutine call with a full call stack")]
    StackOverflow,

    #[error("subroutine return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode {opcode:#06X} at {address:#05X}")]
    UnknownOpcode { opcode: u16, address: u16 },
}

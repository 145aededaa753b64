use log::{trace, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::constants::KEY_COUNT;
use crate::error::Chip8Error;
use crate::frame::FrameBuffer;
use crate::instruction::decode;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::operations::{resume_with_key, Context};
use crate::registers::Registers;
use crate::state::State;

/// What `step` does with an opcode outside the classic instruction set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownOpcodePolicy {
    /// Log it and carry on with the next instruction
    #[default]
    Skip,
    /// Fail the step with `Chip8Error::UnknownOpcode`
    Halt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub unknown_opcodes: UnknownOpcodePolicy,
    /// Seed for the CXNN random source; OS entropy when absent
    pub seed: Option<u64>,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `keypad` with the held status of all 16 keys
///  - `rng` the random source behind CXNN
///
/// Supplies interfaces for:
/// - loading programs
/// - setting the held keys
/// - stepping the CPU
/// - ticking its timers
/// - inspecting its frame buffer for rendering by some display
///
/// Nothing here is synchronised; whoever owns the `Chip8` drives steps, ticks and key
/// updates one after another.
pub struct Chip8 {
    state: State,
    keypad: Keypad,
    rng: Box<dyn RngCore + Send>,
    options: Options,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(options, Box::new(rng))
    }

    /// Uses `rng` for CXNN regardless of `options.seed`
    pub fn with_rng(options: Options, rng: Box<dyn RngCore + Send>) -> Self {
        Chip8 {
            state: State::new(),
            keypad: Keypad::new(),
            rng,
            options,
        }
    }

    /// Copy a raw program image into memory at 0x200
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        self.state.memory.load_program(program)
    }

    /// Advances the CPU by a single cycle and returns whether the frame buffer changed.
    /// - while waiting for a key, only checks whether one is held
    /// - otherwise fetches, decodes and executes the opcode at pc
    ///
    /// On error the machine is left exactly as it was before the call.
    pub fn step(&mut self) -> Result<bool, Chip8Error> {
        if self.state.waiting_for_key.is_some() {
            if let Some(key) = self.keypad.first_pressed() {
                self.state = resume_with_key(&self.state, key);
            }
            return Ok(false);
        }

        let pc = self.state.pc();
        let op = self.state.memory.fetch(pc)?;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.registers.v,
            self.state.i(),
            pc
        );

        let mut fetched = self.state;
        fetched.registers.pc += 0x2;
        fetched.draw_flag = false;

        let next = match decode(&op) {
            Some(operation) => {
                let mut ctx = Context {
                    keypad: &self.keypad,
                    rng: &mut *self.rng,
                };
                operation(&op, &fetched, &mut ctx)?
            }
            None => match self.options.unknown_opcodes {
                UnknownOpcodePolicy::Halt => {
                    return Err(Chip8Error::UnknownOpcode { opcode: op, address: pc });
                }
                UnknownOpcodePolicy::Skip => {
                    warn!("skipping unknown opcode {:04X} at {:04X}", op, pc);
                    fetched
                }
            },
        };

        let redraw = next.draw_flag;
        let pending = self.state.draw_flag;
        self.state = next;
        self.state.draw_flag |= pending;
        Ok(redraw)
    }

    pub fn tick_delay_timer(&mut self) {
        self.state.timers.tick_delay();
    }

    pub fn tick_sound_timer(&mut self) {
        self.state.timers.tick_sound();
    }

    /// One 60Hz tick of both timers
    pub fn tick_timers(&mut self) {
        self.state.timers.tick();
    }

    /// Replace the held status of every key
    ///
    /// # Arguments
    /// * `keys` one flag per key, indexed by key value
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keypad.set_all(keys);
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if it changed since it was last taken
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn sound_active(&self) -> bool {
        self.state.timers.sound_active()
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.timers.sound
    }

    pub fn registers(&self) -> &Registers {
        &self.state.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    pub fn stack_depth(&self) -> usize {
        self.state.stack.depth()
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.state.waiting_for_key.is_some()
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

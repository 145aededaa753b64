use log::debug;
use rand::{Rng, RngCore};

use crate::constants::{FONT_GLYPH_SIZE, FONT_START, MEMORY_SIZE, VF};
use crate::error::Chip8Error;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::state::State;

/// What an operation can see besides the machine state
pub struct Context<'a> {
    pub keypad: &'a Keypad,
    pub rng: &'a mut dyn RngCore,
}

/// Every operation receives the state with the program counter already advanced past its
/// own opcode.
pub type Operation = fn(&dyn Opcode, &State, &mut Context) -> Result<State, Chip8Error>;

/// Skips the next instruction if `condition` holds
fn skip_if(condition: bool, state: &State) -> State {
    let mut next = *state;
    if condition {
        next.registers.pc += 0x2;
    }
    next
}

/// Sets Vx to `value`, then VF to `flag`
fn set_with_flag(state: &State, x: usize, value: u8, flag: bool) -> State {
    let mut next = *state;
    next.registers.v[x] = value;
    next.registers.v[VF] = flag as u8;
    next
}

/// clear
pub fn clr(_op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.frame_buffer.clear();
    next.draw_flag = true;
    Ok(next)
}

/// PC = STACK.pop()
pub fn rts(_op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.pc = next.stack.pop()?;
    Ok(next)
}

/// PC = addr
pub fn jump(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.pc = op.nnn();
    Ok(next)
}

/// STACK.push(PC); PC = addr
pub fn call(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.stack.push(state.pc())?;
    next.registers.pc = op.nnn();
    Ok(next)
}

/// if Vx == nn then pc += 2
pub fn ske(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    Ok(skip_if(state.v(op.x()) == op.nn(), state))
}

/// if Vx != nn then pc += 2
pub fn skne(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    Ok(skip_if(state.v(op.x()) != op.nn(), state))
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    Ok(skip_if(state.v(op.x()) == state.v(op.y()), state))
}

/// Vx = nn
pub fn load(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.v[op.x()] = op.nn();
    Ok(next)
}

/// Vx += nn
/// Add nn to Vx; allow for overflow but implicitly drop it, VF is untouched
pub fn add(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.v[op.x()] = state.v(op.x()).wrapping_add(op.nn());
    Ok(next)
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.v[op.x()] = state.v(op.y());
    Ok(next)
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.v[op.x()] |= state.v(op.y());
    Ok(next)
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.v[op.x()] &= state.v(op.y());
    Ok(next)
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.v[op.x()] ^= state.v(op.y());
    Ok(next)
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let (res, over) = state.v(op.x()).overflowing_add(state.v(op.y()));
    Ok(set_with_flag(state, op.x(), res, over))
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let (res, under) = state.v(op.x()).overflowing_sub(state.v(op.y()));
    Ok(set_with_flag(state, op.x(), res, !under))
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let vx = state.v(op.x());
    Ok(set_with_flag(state, op.x(), vx >> 1, vx & 0x1 == 0x1))
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let (res, under) = state.v(op.y()).overflowing_sub(state.v(op.x()));
    Ok(set_with_flag(state, op.x(), res, !under))
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let vx = state.v(op.x());
    Ok(set_with_flag(state, op.x(), vx << 1, vx & 0x80 == 0x80))
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    Ok(skip_if(state.v(op.x()) != state.v(op.y()), state))
}

/// I = addr
pub fn loadi(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.i = op.nnn();
    Ok(next)
}

/// PC = V0 + addr
pub fn jumpi(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.pc = op.nnn() + u16::from(state.v(0x0));
    Ok(next)
}

/// Vx = rand_byte & nn
pub fn rand(op: &dyn Opcode, state: &State, ctx: &mut Context) -> Result<State, Chip8Error> {
    let rand_byte: u8 = ctx.rng.gen();
    let mut next = *state;
    next.registers.v[op.x()] = rand_byte & op.nn();
    Ok(next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
pub fn draw(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let sprite = state.memory.slice(state.i() as usize, op.n() as usize)?;
    let mut next = *state;
    let collision = next.frame_buffer.draw_sprite(
        state.v(op.x()) as usize,
        state.v(op.y()) as usize,
        sprite,
    );
    next.registers.v[VF] = collision as u8;
    next.draw_flag = true;
    Ok(next)
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &dyn Opcode, state: &State, ctx: &mut Context) -> Result<State, Chip8Error> {
    Ok(skip_if(ctx.keypad.is_pressed(state.v(op.x())), state))
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &dyn Opcode, state: &State, ctx: &mut Context) -> Result<State, Chip8Error> {
    Ok(skip_if(!ctx.keypad.is_pressed(state.v(op.x())), state))
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.v[op.x()] = state.timers.delay;
    Ok(next)
}

/// await keypress for Vx
/// Takes a held key straight away; otherwise rewinds onto this opcode and parks the machine
/// until `resume_with_key`
pub fn keyd(op: &dyn Opcode, state: &State, ctx: &mut Context) -> Result<State, Chip8Error> {
    if let Some(key) = ctx.keypad.first_pressed() {
        let mut next = *state;
        next.registers.v[op.x()] = key;
        return Ok(next);
    }
    debug!("V{:X} waiting for a key", op.x());
    let mut next = *state;
    next.registers.pc -= 0x2;
    next.waiting_for_key = Some(op.x());
    Ok(next)
}

/// Vx = key; moves past the parked FX0A
pub fn resume_with_key(state: &State, key: u8) -> State {
    let mut next = *state;
    if let Some(x) = state.waiting_for_key {
        debug!("V{:X} received key {:X}", x, key);
        next.registers.v[x] = key;
        next.registers.pc += 0x2;
        next.waiting_for_key = None;
    }
    next
}

/// DT = Vx
pub fn loads(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.timers.delay = state.v(op.x());
    Ok(next)
}

/// ST = Vx
pub fn ld(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.timers.sound = state.v(op.x());
    Ok(next)
}

/// I += Vx
/// The sum is not masked; running off the end of memory is an error
pub fn addi(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let address = state.i() as usize + state.v(op.x()) as usize;
    if address >= MEMORY_SIZE {
        return Err(Chip8Error::MemoryOutOfRange { address });
    }
    let mut next = *state;
    next.registers.i = address as u16;
    Ok(next)
}

/// I = FONT_START + Vx * 5
/// Set I to the memory address of the glyph for the low nibble of Vx
/// See constants::FONT_SHEET for more details
pub fn ldspr(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let digit = u16::from(state.v(op.x()) & 0xF);
    let mut next = *state;
    next.registers.i = FONT_START + digit * FONT_GLYPH_SIZE;
    Ok(next)
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let vx = state.v(op.x());
    let bcd = [vx / 100, vx / 10 % 10, vx % 10];
    let mut next = *state;
    next.memory
        .slice_mut(state.i() as usize, bcd.len())?
        .copy_from_slice(&bcd);
    Ok(next)
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.memory
        .slice_mut(state.i() as usize, op.x() + 1)?
        .copy_from_slice(&state.registers.v[..=op.x()]);
    Ok(next)
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, Chip8Error> {
    let mut next = *state;
    next.registers.v[..=op.x()]
        .copy_from_slice(state.memory.slice(state.i() as usize, op.x() + 1)?);
    Ok(next)
}

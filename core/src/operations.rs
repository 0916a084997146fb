use log::debug;
use rand::random;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, PIXEL_OFF, PIXEL_ON, SPRITE_WIDTH, STACK_DEPTH,
};
use crate::error::MachineError;
use crate::opcode::Opcode;
use crate::quirks::Quirks;
use crate::sprites::glyph_address;
use crate::state::State;

/// Everything an operation may read besides the machine state.
#[derive(Clone, Copy, Default)]
pub struct Context {
    /// The input latch as sampled at the start of the step
    pub pressed_keys: [u8; 16],
    pub quirks: Quirks,
}

type Step = Result<State, MachineError>;

fn next(state: &State) -> u16 {
    state.pc + 0x2
}

fn skip_if(state: &State, condition: bool) -> u16 {
    if condition {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    }
}

fn key_pressed(op: &dyn Opcode, state: &State, ctx: &Context) -> Result<bool, MachineError> {
    let key = state.v[op.x() as usize];
    ctx.pressed_keys
        .get(key as usize)
        .map(|&slot| slot == 0x1)
        .ok_or(MachineError::KeyOutOfRange { key })
}

/// clear
pub fn clr(_op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    Ok(State {
        pc: next(state),
        frame_buffer: [PIXEL_OFF; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    })
}

/// PC = STACK.pop() + 2
/// The stored address is the call itself, so step past it.
pub fn rts(_op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    let sp = state
        .sp
        .checked_sub(0x1)
        .ok_or(MachineError::StackUnderflow { pc: state.pc })?;
    let mut stack = state.stack;
    let pc = stack[sp as usize] + 0x2;
    stack[sp as usize] = 0;
    Ok(State {
        pc,
        sp,
        stack,
        ..*state
    })
}

/// PC = nnn
pub fn jump(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    Ok(State {
        pc: op.nnn(),
        ..*state
    })
}

/// STACK.push(PC); PC = nnn
pub fn call(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    if state.sp as usize >= STACK_DEPTH {
        return Err(MachineError::StackOverflow {
            pc: state.pc,
            depth: STACK_DEPTH,
        });
    }
    let mut stack = state.stack;
    stack[state.sp as usize] = state.pc;
    Ok(State {
        pc: op.nnn(),
        sp: state.sp + 0x1,
        stack,
        ..*state
    })
}

/// if Vx == nn then pc += 2
pub fn ske(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    let pc = skip_if(state, state.v[op.x() as usize] == op.nn());
    Ok(State { pc, ..*state })
}

/// if Vx != nn then pc += 2
pub fn skne(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    let pc = skip_if(state, state.v[op.x() as usize] != op.nn());
    Ok(State { pc, ..*state })
}

/// Vx = nn
pub fn load(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    let mut v = state.v;
    v[op.x() as usize] = op.nn();
    Ok(State {
        pc: next(state),
        v,
        ..*state
    })
}

/// Vx += nn
/// Overflow wraps and VF is left alone
pub fn add(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    let mut v = state.v;
    v[op.x() as usize] = v[op.x() as usize].wrapping_add(op.nn());
    Ok(State {
        pc: next(state),
        v,
        ..*state
    })
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    let mut v = state.v;
    v[op.x() as usize] = v[op.y() as usize];
    Ok(State {
        pc: next(state),
        v,
        ..*state
    })
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    let mut v = state.v;
    v[op.x() as usize] &= v[op.y() as usize];
    Ok(State {
        pc: next(state),
        v,
        ..*state
    })
}

/// VF = carry; Vx += Vy
/// The flag is written first, so VF as an operand sees the new flag
pub fn addr(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    let (x, y) = (op.x() as usize, op.y() as usize);
    let mut v = state.v;
    let (_, carry) = v[x].overflowing_add(v[y]);
    v[0xF] = u8::from(carry);
    v[x] = v[x].wrapping_add(v[y]);
    Ok(State {
        pc: next(state),
        v,
        ..*state
    })
}

/// VF = !borrow; Vx -= Vy
/// The flag is written first, so VF as an operand sees the new flag
pub fn sub(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    let (x, y) = (op.x() as usize, op.y() as usize);
    let mut v = state.v;
    v[0xF] = u8::from(v[x] >= v[y]);
    v[x] = v[x].wrapping_sub(v[y]);
    Ok(State {
        pc: next(state),
        v,
        ..*state
    })
}

/// I = nnn
pub fn loadi(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    Ok(State {
        pc: next(state),
        i: op.nnn(),
        ..*state
    })
}

/// Vx = rand_byte & nn
pub fn rnd(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    let mut v = state.v;
    v[op.x() as usize] = random::<u8>() & op.nn();
    Ok(State {
        pc: next(state),
        v,
        ..*state
    })
}

/// draw_sprite(x=Vx y=Vy size=n)
/// Copies an 8xn sprite from memory I..I+n onto the FrameBuffer at (Vx, Vy).
///
/// Every column of the sprite is written, so unset bits turn pixels off. VF is
/// raised when a lit pixel is turned off and is otherwise left as it was.
/// With `Quirks::xor_sprites` the sprite is XORed on instead and VF is cleared
/// before drawing.
///
/// Nothing wraps: a sprite that doesn't fit the display is an error.
pub fn draw(op: &dyn Opcode, state: &State, ctx: &Context) -> Step {
    let (x, y) = (state.v[op.x() as usize], state.v[op.y() as usize]);
    let height = op.n();
    if x as usize + SPRITE_WIDTH > DISPLAY_WIDTH || y as usize + height as usize > DISPLAY_HEIGHT
    {
        return Err(MachineError::SpriteOutOfBounds { x, y, height });
    }

    let sprite = state.read_slice(state.i as usize, height as usize)?;
    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;

    if ctx.quirks.xor_sprites {
        v[0xF] = 0x0;
    }

    for (row, byte) in sprite.iter().enumerate() {
        let offset = (y as usize + row) * DISPLAY_WIDTH + x as usize;
        for bit in 0..SPRITE_WIDTH {
            let pixel = if (byte >> (7 - bit)) & 0x1 == 0x1 {
                PIXEL_ON
            } else {
                PIXEL_OFF
            };
            let current = &mut frame_buffer[offset + bit];
            if ctx.quirks.xor_sprites {
                if *current == PIXEL_ON && pixel == PIXEL_ON {
                    v[0xF] = 0x1;
                }
                *current ^= pixel;
            } else {
                if *current == PIXEL_ON && pixel == PIXEL_OFF {
                    v[0xF] = 0x1;
                }
                *current = pixel;
            }
        }
    }

    Ok(State {
        pc: next(state),
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &dyn Opcode, state: &State, ctx: &Context) -> Step {
    let pc = skip_if(state, key_pressed(op, state, ctx)?);
    Ok(State { pc, ..*state })
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &dyn Opcode, state: &State, ctx: &Context) -> Step {
    let pc = skip_if(state, !key_pressed(op, state, ctx)?);
    Ok(State { pc, ..*state })
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    let mut v = state.v;
    v[op.x() as usize] = state.delay_timer;
    Ok(State {
        pc: next(state),
        v,
        ..*state
    })
}

/// DT = Vx
pub fn loadd(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    Ok(State {
        pc: next(state),
        delay_timer: state.v[op.x() as usize],
        ..*state
    })
}

/// ST = Vx
pub fn loads(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    Ok(State {
        pc: next(state),
        sound_timer: state.v[op.x() as usize],
        ..*state
    })
}

/// I += Vx
pub fn addi(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    Ok(State {
        pc: next(state),
        i: state.i.wrapping_add(u16::from(state.v[op.x() as usize])),
        ..*state
    })
}

/// I = FONT_START + Vx * 5
/// Set I to the memory address of the glyph for the digit in Vx
/// See sprites::SPRITE_SHEET for more details
pub fn ldspr(op: &dyn Opcode, state: &State, _ctx: &Context) -> Step {
    Ok(State {
        pc: next(state),
        i: glyph_address(state.v[op.x() as usize]),
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
/// The digits are only stored with `Quirks::bcd_stores`
pub fn bcd(op: &dyn Opcode, state: &State, ctx: &Context) -> Step {
    let value = state.v[op.x() as usize];
    let digits = [value / 100, value / 10 % 10, value % 10];
    let mut memory = state.memory;
    if ctx.quirks.bcd_stores {
        let start = state.i as usize;
        memory
            .get_mut(start..start + digits.len())
            .ok_or_else(|| MachineError::MemoryOutOfRange {
                address: start + digits.len() - 1,
            })?
            .copy_from_slice(&digits);
    } else {
        debug!("bcd of V{:X} is {:?}; not stored", op.x(), digits);
    }
    Ok(State {
        pc: next(state),
        memory,
        ..*state
    })
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
/// Without `Quirks::load_fills_range` every byte lands in Vx, so only the last survives
pub fn read(op: &dyn Opcode, state: &State, ctx: &Context) -> Step {
    let x = op.x() as usize;
    let bytes = state.read_slice(state.i as usize, x + 1)?;
    let mut v = state.v;
    if ctx.quirks.load_fills_range {
        v[..=x].copy_from_slice(bytes);
    } else {
        for &byte in bytes {
            v[x] = byte;
        }
    }
    Ok(State {
        pc: next(state),
        i: state.i.wrapping_add(x as u16 + 1),
        v,
        ..*state
    })
}

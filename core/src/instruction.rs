use crate::error::MachineError;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// A pure state transition for a single opcode
pub type Operation = fn(op: &dyn Opcode, state: &State, ctx: &Context) -> Result<State, MachineError>;

/// A decoded opcode: what to call it in traces and what it does
#[derive(Clone, Copy)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub operation: Operation,
}

impl Instruction {
    fn new(mnemonic: &'static str, operation: Operation) -> Self {
        Instruction {
            mnemonic,
            operation,
        }
    }

    pub fn execute(&self, op: &dyn Opcode, state: &State, ctx: &Context) -> Result<State, MachineError> {
        (self.operation)(op, state, ctx)
    }
}

/// Selects the correct Instruction for a given Opcode.
///
/// Only a subset of the instruction set is implemented; anything else
/// (including `5xy0`, `9xy0`, `Bnnn`, `Fx0A` and `Fx55`) decodes to `None`.
pub fn from_op(op: &dyn Opcode) -> Option<Instruction> {
    match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => Some(Instruction::new("CLS", clr)),
        (0x0, 0x0, 0xE, 0xE) => Some(Instruction::new("RET", rts)),
        (0x1, ..) => Some(Instruction::new("JP", jump)),
        (0x2, ..) => Some(Instruction::new("CALL", call)),
        (0x3, ..) => Some(Instruction::new("SE", ske)),
        (0x4, ..) => Some(Instruction::new("SNE", skne)),
        (0x6, ..) => Some(Instruction::new("LD", load)),
        (0x7, ..) => Some(Instruction::new("ADD", add)),
        (0x8, .., 0x0) => Some(Instruction::new("LD Vx, Vy", mv)),
        (0x8, .., 0x2) => Some(Instruction::new("AND", and)),
        (0x8, .., 0x4) => Some(Instruction::new("ADD Vx, Vy", addr)),
        (0x8, .., 0x5) => Some(Instruction::new("SUB", sub)),
        (0xA, ..) => Some(Instruction::new("LD I", loadi)),
        (0xC, ..) => Some(Instruction::new("RND", rnd)),
        (0xD, ..) => Some(Instruction::new("DRW", draw)),
        (0xE, .., 0x9, 0xE) => Some(Instruction::new("SKP", skpr)),
        (0xE, .., 0xA, 0x1) => Some(Instruction::new("SKNP", skup)),
        (0xF, .., 0x0, 0x7) => Some(Instruction::new("LD Vx, DT", moved)),
        (0xF, .., 0x1, 0x5) => Some(Instruction::new("LD DT", loadd)),
        (0xF, .., 0x1, 0x8) => Some(Instruction::new("LD ST", loads)),
        (0xF, .., 0x1, 0xE) => Some(Instruction::new("ADD I", addi)),
        (0xF, .., 0x2, 0x9) => Some(Instruction::new("LD F", ldspr)),
        (0xF, .., 0x3, 0x3) => Some(Instruction::new("LD B", bcd)),
        (0xF, .., 0x6, 0x5) => Some(Instruction::new("LD Vx, [I]", read)),
        _ => None,
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;
    use crate::constants::{DISPLAY_WIDTH, PIXEL_OFF, PIXEL_ON, STACK_DEPTH};
    use crate::quirks::Quirks;

    fn exec_with(op: u16, state: &State, ctx: &Context) -> Result<State, MachineError> {
        from_op(&op)
            .expect("opcode should be implemented")
            .execute(&op, state, ctx)
    }

    fn exec(op: u16, state: &State) -> State {
        exec_with(op, state, &Context::default()).unwrap()
    }

    fn conventional() -> Context {
        Context {
            quirks: Quirks::CONVENTIONAL,
            ..Context::default()
        }
    }

    fn row(state: &State, y: usize) -> &[u8] {
        &state.frame_buffer[y * DISPLAY_WIDTH..(y + 1) * DISPLAY_WIDTH]
    }

    #[test]
    fn test_unimplemented_opcodes_dont_decode() {
        for op in [
            0x5AB0u16, 0x9120, 0xB123, 0x8121, 0x8123, 0x8126, 0x8127, 0x812E, 0xF10A, 0xF155,
            0x0123, 0xE1FF,
        ] {
            assert!(from_op(&op).is_none(), "{:04X} should not decode", op);
        }
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = State::new();
        state.frame_buffer[0] = PIXEL_ON;
        state.frame_buffer[DISPLAY_WIDTH * 31 + 63] = PIXEL_ON;
        let state = exec(0x00E0, &state);
        assert!(state.frame_buffer.iter().all(|&p| p == PIXEL_OFF));
        assert!(state.draw_flag);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = State::new();
        state.sp = 0x1;
        state.stack[0] = 0x0ABC;
        let state = exec(0x00EE, &state);
        assert_eq!(state.sp, 0x0);
        assert_eq!(state.stack[0], 0x0);
        // The stored address is the call site, so the return lands just after it
        assert_eq!(state.pc, 0x0ABC + 0x2);
    }

    #[test]
    fn test_00ee_ret_underflows() {
        let state = State::new();
        assert_eq!(
            exec_with(0x00EE, &state, &Context::default()).err(),
            Some(MachineError::StackUnderflow { pc: 0x200 })
        );
    }

    #[test]
    fn test_1nnn_jp() {
        let state = exec(0x1ABC, &State::new());
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = State::new();
        state.pc = 0x0ABC;
        let state = exec(0x2123, &state);
        assert_eq!(state.sp, 0x1);
        assert_eq!(state.stack[0], 0x0ABC);
        assert_eq!(state.pc, 0x0123);
    }

    #[test]
    fn test_2nnn_call_then_00ee_ret() {
        let mut state = State::new();
        state.pc = 0x0300;
        let state = exec(0x2400, &state);
        let state = exec(0x00EE, &state);
        assert_eq!(state.pc, 0x0302);
        assert_eq!(state.sp, 0x0);
    }

    #[test]
    fn test_2nnn_call_overflows() {
        let mut state = State::new();
        for _ in 0..STACK_DEPTH {
            state = exec(0x2200, &state);
        }
        assert_eq!(state.sp as usize, STACK_DEPTH);
        assert_eq!(
            exec_with(0x2200, &state, &Context::default()).err(),
            Some(MachineError::StackOverflow {
                pc: 0x200,
                depth: STACK_DEPTH
            })
        );
    }

    #[test]
    fn test_3xnn_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        assert_eq!(exec(0x3111, &state).pc, 0x0204);
    }

    #[test]
    fn test_3xnn_se_doesntskip() {
        assert_eq!(exec(0x3111, &State::new()).pc, 0x0202);
    }

    #[test]
    fn test_4xnn_sne_skips() {
        assert_eq!(exec(0x4111, &State::new()).pc, 0x0204);
    }

    #[test]
    fn test_4xnn_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        assert_eq!(exec(0x4111, &state).pc, 0x0202);
    }

    #[test]
    fn test_6xnn_ld() {
        let state = exec(0x6122, &State::new());
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_6xnn_then_7xnn_wraps() {
        for (first, second) in [(0x00u8, 0x00u8), (0x01, 0xFE), (0xFF, 0x01), (0x80, 0x80), (0xC8, 0x64)] {
            let state = exec(0x6300 | u16::from(first), &State::new());
            let state = exec(0x7300 | u16::from(second), &state);
            assert_eq!(state.v[0x3], first.wrapping_add(second));
            assert_eq!(state.v[0xF], 0x0, "7xnn must not touch VF");
        }
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = State::new();
        state.v[0x2] = 0x1;
        assert_eq!(exec(0x8120, &state).v[0x1], 0x1);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        assert_eq!(exec(0x8122, &state).v[0x1], 0x2);
    }

    #[test]
    fn test_8xy4_add_nocarry() {
        let mut state = State::new();
        state.v[0x1] = 0xEE;
        state.v[0x2] = 0x11;
        let state = exec(0x8124, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[0x2] = 0x01;
        let state = exec(0x8124, &state);
        assert_eq!(state.v[0x1], 0x00);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy4_add_clears_stale_carry() {
        let mut state = State::new();
        state.v[0xF] = 0x1;
        state.v[0x1] = 0x01;
        state.v[0x2] = 0x01;
        let state = exec(0x8124, &state);
        assert_eq!(state.v[0x1], 0x02);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy5_sub_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x33;
        state.v[0x2] = 0x11;
        let state = exec(0x8125, &state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_equal_is_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = exec(0x8125, &state);
        assert_eq!(state.v[0x1], 0x00);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x12;
        let state = exec(0x8125, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_annn_ld() {
        assert_eq!(exec(0xAABC, &State::new()).i, 0xABC);
    }

    #[test]
    fn test_cxnn_rnd_is_masked() {
        let mut state = State::new();
        state.v[0x1] = 0xAA;
        assert_eq!(exec(0xC100, &state).v[0x1], 0x00);
        for _ in 0..32 {
            assert_eq!(exec(0xC10F, &state).v[0x1] & 0xF0, 0x00);
        }
    }

    #[test]
    fn test_dxyn_drw_draws() {
        let mut state = State::new();
        state.v[0x0] = 0x1;
        // Draw the glyph for 0 with a 1x 1y offset
        state.i = 0x050;
        let state = exec(0xD005, &state);
        let on = PIXEL_ON;
        assert_eq!(row(&state, 0), &[PIXEL_OFF; 64][..]);
        assert_eq!(row(&state, 1)[0..6], [0, on, on, on, on, 0]);
        assert_eq!(row(&state, 2)[0..6], [0, on, 0, 0, on, 0]);
        assert_eq!(row(&state, 5)[0..6], [0, on, on, on, on, 0]);
        assert_eq!(row(&state, 6), &[PIXEL_OFF; 64][..]);
        assert_eq!(state.v[0xF], 0x0);
        assert!(state.draw_flag);
        assert_eq!(state.i, 0x050);
    }

    #[test]
    fn test_dxyn_drw_overwrites() {
        let mut state = State::new();
        // on off on off -> Set
        state.frame_buffer[2..6].copy_from_slice(&[PIXEL_ON, PIXEL_OFF, PIXEL_ON, PIXEL_OFF]);
        // 1 1 0 0 -> Draw
        state.memory[0x300] = 0b0011_0000;
        state.i = 0x300;
        let state = exec(0xD001, &state);
        assert_eq!(
            state.frame_buffer[2..6],
            [PIXEL_ON, PIXEL_ON, PIXEL_OFF, PIXEL_OFF]
        );
        // the lit pixel at x=4 was turned off
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_dxyn_drw_never_clears_flag() {
        let mut state = State::new();
        state.v[0xF] = 0x1;
        state.i = 0x050;
        let state = exec(0xD005, &state);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_dxyn_drw_redraw_is_idempotent() {
        let mut state = State::new();
        state.i = 0x050;
        let first = exec(0xD005, &state);
        let second = exec(0xD005, &first);
        assert_eq!(first.frame_buffer[..], second.frame_buffer[..]);
        assert_eq!(second.v[0xF], 0x0);
    }

    #[test]
    fn test_dxyn_drw_conventional_redraw_erases() {
        let mut state = State::new();
        state.i = 0x050;
        let first = exec_with(0xD005, &state, &conventional()).unwrap();
        assert_eq!(first.v[0xF], 0x0);
        let second = exec_with(0xD005, &first, &conventional()).unwrap();
        assert!(second.frame_buffer.iter().all(|&p| p == PIXEL_OFF));
        assert_eq!(second.v[0xF], 0x1);
    }

    #[test]
    fn test_dxyn_drw_conventional_xors() {
        let mut state = State::new();
        state.v[0xF] = 0x1;
        state.frame_buffer[2..6].copy_from_slice(&[PIXEL_OFF, PIXEL_ON, PIXEL_OFF, PIXEL_ON]);
        state.memory[0x300] = 0b0011_0000;
        state.i = 0x300;
        let state = exec_with(0xD001, &state, &conventional()).unwrap();
        assert_eq!(
            state.frame_buffer[2..6],
            [PIXEL_ON, PIXEL_OFF, PIXEL_OFF, PIXEL_ON]
        );
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_dxyn_drw_conventional_resets_flag() {
        let mut state = State::new();
        state.v[0xF] = 0x1;
        state.i = 0x050;
        let state = exec_with(0xD005, &state, &conventional()).unwrap();
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_dxyn_drw_fits_bottom_right() {
        let mut state = State::new();
        state.v[0x0] = 56;
        state.v[0x1] = 27;
        state.i = 0x050;
        let state = exec(0xD015, &state);
        assert_eq!(state.pixel(56, 27), PIXEL_ON);
        assert_eq!(state.pixel(59, 31), PIXEL_ON);
    }

    #[test]
    fn test_dxyn_drw_out_of_bounds() {
        let mut state = State::new();
        state.v[0x0] = 57;
        state.i = 0x050;
        assert_eq!(
            exec_with(0xD015, &state, &Context::default()).err(),
            Some(MachineError::SpriteOutOfBounds {
                x: 57,
                y: 0,
                height: 5
            })
        );
        state.v[0x0] = 0;
        state.v[0x1] = 28;
        assert!(exec_with(0xD015, &state, &Context::default()).is_err());
    }

    #[test]
    fn test_dxyn_drw_sprite_past_end_of_memory() {
        let mut state = State::new();
        state.i = 0xFFE;
        assert_eq!(
            exec_with(0xD003, &state, &Context::default()).err(),
            Some(MachineError::MemoryOutOfRange { address: 0x1000 })
        );
    }

    #[test]
    fn test_dxyn_drw_zero_rows() {
        // I is still 0 from power on
        let mut state = State::new();
        state.frame_buffer[0] = PIXEL_ON;
        for ctx in [Context::default(), conventional()] {
            let next = exec_with(0xD000, &state, &ctx).unwrap();
            assert_eq!(next.frame_buffer[..], state.frame_buffer[..]);
            assert_eq!(next.v[0xF], 0x0);
            assert!(next.draw_flag);
            assert_eq!(next.pc, 0x0202);
        }
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut state = State::new();
        let mut ctx = Context::default();
        ctx.pressed_keys[0xE] = 0x1;
        state.v[0x1] = 0xE;
        assert_eq!(exec_with(0xE19E, &state, &ctx).unwrap().pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesntskip() {
        assert_eq!(exec(0xE19E, &State::new()).pc, 0x0202);
    }

    #[test]
    fn test_ex9e_skp_key_off_the_pad() {
        let mut state = State::new();
        state.v[0x1] = 0x10;
        assert_eq!(
            exec_with(0xE19E, &state, &Context::default()).err(),
            Some(MachineError::KeyOutOfRange { key: 0x10 })
        );
    }

    #[test]
    fn test_exa1_sknp_skips() {
        assert_eq!(exec(0xE1A1, &State::new()).pc, 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesntskip() {
        let mut state = State::new();
        let mut ctx = Context::default();
        ctx.pressed_keys[0xE] = 0x1;
        state.v[0x1] = 0xE;
        assert_eq!(exec_with(0xE1A1, &state, &ctx).unwrap().pc, 0x0202);
    }

    #[test]
    fn test_fx07_ld() {
        let mut state = State::new();
        state.delay_timer = 0xF;
        assert_eq!(exec(0xF107, &state).v[0x1], 0xF);
    }

    #[test]
    fn test_fx15_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        assert_eq!(exec(0xF115, &state).delay_timer, 0xF);
    }

    #[test]
    fn test_fx18_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        assert_eq!(exec(0xF118, &state).sound_timer, 0xF);
    }

    #[test]
    fn test_fx1e_add() {
        let mut state = State::new();
        state.i = 0x1;
        state.v[0x1] = 0x1;
        assert_eq!(exec(0xF11E, &state).i, 0x2);
    }

    #[test]
    fn test_fx29_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xA;
        assert_eq!(exec(0xF129, &state).i, 0x050 + 50);
    }

    #[test]
    fn test_fx33_ld_computes_but_doesnt_store() {
        let mut state = State::new();
        // 0x7B -> 123
        state.v[0x1] = 0x7B;
        state.i = 0x300;
        let state = exec(0xF133, &state);
        assert_eq!(state.memory[0x300..0x303], [0x0, 0x0, 0x0]);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx33_ld_conventional_stores() {
        let mut state = State::new();
        state.v[0x1] = 0x7B;
        state.i = 0x300;
        let state = exec_with(0xF133, &state, &conventional()).unwrap();
        assert_eq!(state.memory[0x300..0x303], [0x1, 0x2, 0x3]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx33_ld_conventional_past_end_of_memory() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.i = 0xFFE;
        assert_eq!(
            exec_with(0xF133, &state, &conventional()).err(),
            Some(MachineError::MemoryOutOfRange { address: 0x1000 })
        );
    }

    #[test]
    fn test_fx65_ld_fills_only_vx() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x305].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        let state = exec(0xF465, &state);
        assert_eq!(state.v[0x0..0x5], [0x0, 0x0, 0x0, 0x0, 0x5]);
        assert_eq!(state.i, 0x305);
    }

    #[test]
    fn test_fx65_ld_conventional_fills_range() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x305].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        let state = exec_with(0xF465, &state, &conventional()).unwrap();
        assert_eq!(state.v[0x0..0x5], [0x1, 0x2, 0x3, 0x4, 0x5]);
        assert_eq!(state.v[0x5], 0x0);
        assert_eq!(state.i, 0x305);
    }

    #[test]
    fn test_fx65_ld_past_end_of_memory() {
        let mut state = State::new();
        state.i = 0xFFE;
        for ctx in [Context::default(), conventional()] {
            assert_eq!(
                exec_with(0xF265, &state, &ctx).err(),
                Some(MachineError::MemoryOutOfRange { address: 0x1000 })
            );
        }
        // the last two bytes still fit
        let state = exec(0xF165, &state);
        assert_eq!(state.i, 0x1000);
    }
}

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, MEMORY_SIZE, PIXEL_OFF, PROGRAM_START, STACK_DEPTH,
};
use crate::error::MachineError;
use crate::opcode::from_bytes;
use crate::sprites::SPRITE_SHEET;

/// The FrameBuffer is a flat, row-major buffer indexed as `[y * DISPLAY_WIDTH + x]`.
/// Each pixel is a whole byte: `PIXEL_OFF` or `PIXEL_ON`.
pub type FrameBuffer = [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT];

/// A snapshot of the Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, always pointing at the next instruction
///
/// Pointer
/// - (sp) a 16-bit stack pointer; the number of return addresses in use
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented once per executed instruction
///
/// ## Memory
/// - 24 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the font
///     - 0x200.. holds the program
/// - 64x32 byte frame buffer
///
/// `draw_flag` records whether the last instruction touched the frame buffer.
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: [PIXEL_OFF; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            draw_flag: false,
        }
    }

    /// Reads the byte at `address`.
    pub fn read(&self, address: usize) -> Result<u8, MachineError> {
        self.memory
            .get(address)
            .copied()
            .ok_or(MachineError::MemoryOutOfRange { address })
    }

    /// Reads `len` bytes starting at `address`.
    pub fn read_slice(&self, address: usize, len: usize) -> Result<&[u8], MachineError> {
        self.memory
            .get(address..address + len)
            .ok_or_else(|| MachineError::MemoryOutOfRange {
                address: (address + len).saturating_sub(1),
            })
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&self) -> Result<u16, MachineError> {
        let pc = self.pc as usize;
        Ok(from_bytes(self.read(pc)?, self.read(pc + 1)?))
    }

    /// The pixel at column `x` of row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.frame_buffer[y * DISPLAY_WIDTH + x]
    }

    /// Decrements both timers, neither past zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

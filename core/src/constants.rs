/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Where ROMs are loaded and execution begins
pub const PROGRAM_START: u16 = 0x200;

/// Where the hexadecimal font is copied at power on
pub const FONT_START: u16 = 0x050;

/// Bytes per font glyph
pub const GLYPH_SIZE: u16 = 5;

/// Return addresses the call stack can hold
pub const STACK_DEPTH: usize = 24;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Sprites are always a single byte wide
pub const SPRITE_WIDTH: usize = 8;

pub const PIXEL_ON: u8 = 0xFF;
pub const PIXEL_OFF: u8 = 0x00;

/// Nanoseconds between ticks; one instruction and one timer decrement per tick
pub const CLOCK_SPEED: u64 = 16_000_000;

/// Zoom handed to render observers when the caller doesn't pick one
pub const DEFAULT_SCALE: u32 = 10;

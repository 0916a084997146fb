/// # Opcodes
///
/// Opcodes are 16-bit words stored big-endian. Operands live at fixed bit positions:
/// ```text
/// 0xD X Y N
///     | | `- N    low 4 bits; sprite height or a sub-operation selector
///     | `--- Y    bits 4..8; the register Vy
///     `----- X    bits 8..12; the register Vx
///       ---- NN   low 8 bits; an immediate byte
///     ------ NNN  low 12 bits; an address
/// ```
/// The high nibble picks the family of the operation; within a family the
/// remaining nibbles either carry operands or select the exact operation.
pub trait Opcode {
    /// The raw instruction word.
    fn word(&self) -> u16;

    /// All four nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.n())
    }

    /// `[o___]`
    fn family(&self) -> u8 {
        ((self.word() & 0xF000) >> 12) as u8
    }

    /// `[_x__]`
    fn x(&self) -> u8 {
        ((self.word() & 0x0F00) >> 8) as u8
    }

    /// `[__y_]`
    fn y(&self) -> u8 {
        ((self.word() & 0x00F0) >> 4) as u8
    }

    /// `[___n]`
    fn n(&self) -> u8 {
        (self.word() & 0x000F) as u8
    }

    /// `[__nn]`
    fn nn(&self) -> u8 {
        (self.word() & 0x00FF) as u8
    }

    /// `[_nnn]`
    fn nnn(&self) -> u16 {
        self.word() & 0x0FFF
    }
}

impl Opcode for u16 {
    fn word(&self) -> u16 {
        *self
    }
}

/// Combines the two bytes of an instruction, high byte first.
pub fn from_bytes(high: u8, low: u8) -> u16 {
    u16::from(high) << 8 | u16::from(low)
}

use thiserror::Error;

/// Reasons a step can fail. Every one of them stops the machine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MachineError {
    #[error("opcode {opcode:#06X} at {pc:#05X} is not implemented")]
    Unimplemented { opcode: u16, pc: u16 },

    #[error("call at {pc:#05X} overflows the {depth}-entry stack")]
    StackOverflow { pc: u16, depth: usize },

    #[error("return at {pc:#05X} with an empty stack")]
    StackUnderflow { pc: u16 },

    #[error("memory access at {address:#06X} is out of range")]
    MemoryOutOfRange { address: usize },

    #[error("sprite of height {height} at ({x}, {y}) does not fit the display")]
    SpriteOutOfBounds { x: u8, y: u8, height: u8 },

    #[error("key {key:#04X} does not exist on the keypad")]
    KeyOutOfRange { key: u8 },

    #[error("the machine is stopped")]
    Stopped,
}

/// Reasons a ROM can't be loaded.
#[derive(Debug, Error)]
pub enum RomError {
    #[error("ROM is {size} bytes but only {capacity} fit in program memory")]
    TooLarge { size: usize, capacity: usize },

    #[error("unable to read ROM")]
    Io(#[from] std::io::Error),
}

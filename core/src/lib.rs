pub use chip8::{Chip8, Cycle, Status};
pub use constants::{CLOCK_SPEED, DEFAULT_SCALE};
pub use error::{MachineError, RomError};
pub use keypad::Keypad;
pub use quirks::Quirks;
pub use render::{Frame, OwnedFrame, Render};
pub use runner::{Runner, StopHandle};

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod keypad;
mod opcode;
mod operations;
mod quirks;
mod render;
mod runner;
mod sprites;
pub mod state;

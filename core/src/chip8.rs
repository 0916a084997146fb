use std::io::Read;

use log::{error, info, trace};

use crate::constants::{MEMORY_SIZE, PROGRAM_START};
use crate::error::{MachineError, RomError};
use crate::instruction::from_op;
use crate::keypad::Keypad;
use crate::operations::Context;
use crate::quirks::Quirks;
use crate::state::{FrameBuffer, State};

/// Whether the machine will execute another instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Stopped,
}

/// What a successful step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// An instruction ran and the display is unchanged
    Executed,
    /// An instruction ran and changed the display
    Drew,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - whether it is running or stopped
///  - a read view of the `Keypad` shared with whoever handles input
///  - which `Quirks` its operations follow
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU and its timers by a single step
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    status: Status,
    keypad: Keypad,
    quirks: Quirks,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        Chip8 {
            state: State::new(),
            status: Status::Running,
            keypad: Keypad::new(),
            quirks,
        }
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a reader over the raw ROM bytes
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), RomError> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load_program(&rom)
    }

    /// Copies `program` into memory at 0x200.
    /// Memory is left untouched if it doesn't fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), RomError> {
        let start = PROGRAM_START as usize;
        let capacity = MEMORY_SIZE - start;
        if program.len() > capacity {
            return Err(RomError::TooLarge {
                size: program.len(),
                capacity,
            });
        }
        self.state.memory[start..start + program.len()].copy_from_slice(program);
        info!("loaded {} byte program at {:#05X}", program.len(), start);
        Ok(())
    }

    /// A handle to the input latch; clones write to the same slots.
    pub fn keypad(&self) -> Keypad {
        self.keypad.clone()
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&self, key: u8) {
        self.keypad.press(key);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&self, key: u8) {
        self.keypad.release(key);
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Marks a stopped machine as running again; execution resumes at the current pc.
    pub fn restart(&mut self) {
        self.status = Status::Running;
    }

    /// Requests that no further steps run.
    pub fn stop(&mut self) {
        self.status = Status::Stopped;
    }

    /// Advances the machine by a single step
    /// - fetches the opcode at the pc and decodes it
    /// - executes it against a snapshot of the keypad
    /// - decrements both timers
    ///
    /// Any error stops the machine and leaves its state exactly as it was.
    pub fn step(&mut self) -> Result<Cycle, MachineError> {
        if self.status == Status::Stopped {
            return Err(MachineError::Stopped);
        }
        match self.execute() {
            Ok(state) => {
                self.state = state;
                Ok(if state.draw_flag {
                    Cycle::Drew
                } else {
                    Cycle::Executed
                })
            }
            Err(e) => {
                error!("{}; stopping", e);
                self.status = Status::Stopped;
                Err(e)
            }
        }
    }

    fn execute(&self) -> Result<State, MachineError> {
        let op = self.state.fetch()?;
        let instruction = from_op(&op).ok_or(MachineError::Unimplemented {
            opcode: op,
            pc: self.state.pc,
        })?;
        trace!(
            "{:04X} {:<10} v{:02X?} i{:04X} pc{:04X}",
            op,
            instruction.mnemonic,
            self.state.v,
            self.state.i,
            self.state.pc
        );

        let ctx = Context {
            pressed_keys: self.keypad.snapshot(),
            quirks: self.quirks,
        };
        let current = State {
            draw_flag: false,
            ..self.state
        };
        let mut next = instruction.execute(&op, &current, &ctx)?;
        next.tick_timers();
        Ok(next)
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::info;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::EventPump;

use vm8_core::{Chip8, Keypad, OwnedFrame, Runner};
use vm8_display::Display;

use crate::config::Config;
use crate::keymap::keymap;

/// How long the event loop idles between polls
const POLL_INTERVAL: Duration = Duration::from_millis(2);

pub fn run(rom: &Path, config: &Config) -> Result<()> {
    let mut chip8 = Chip8::with_quirks(config.quirks);

    // Load ROM
    let file = File::open(rom).with_context(|| format!("unable to open {}", rom.display()))?;
    chip8
        .load_rom(&mut BufReader::new(file))
        .with_context(|| format!("unable to load {}", rom.display()))?;
    info!("loaded ROM {}", rom.display());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let name = rom
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut display = Display::new(&sdl, &format!("vm8 - {}", name), config.scale)
        .map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let keypad = chip8.keypad();
    let (frames, rx) = channel();
    let runner = Runner::start(chip8, config.scale, frames);

    let result = present(&runner, &mut display, &mut events, &keypad, &rx);

    runner.stop();
    let chip8 = runner.join();
    info!(
        "interpreter {:?} at pc {:#05X}",
        chip8.status(),
        chip8.state().pc
    );
    result
}

/// Pumps SDL events into the keypad and the newest frame into the window until
/// the window closes or the interpreter stops by itself.
fn present(
    runner: &Runner,
    display: &mut Display,
    events: &mut EventPump,
    keypad: &Keypad,
    frames: &Receiver<OwnedFrame>,
) -> Result<()> {
    'event: while runner.is_running() {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(slot) = keymap(key) {
                        keypad.press(slot);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(slot) = keymap(key) {
                        keypad.release(slot);
                    }
                }
                _ => {}
            }
        }

        // Older frames are already stale
        if let Some(frame) = frames.try_iter().last() {
            display.render(&frame.as_frame()).map_err(|e| anyhow!(e))?;
        }

        thread::sleep(POLL_INTERVAL);
    }
    Ok(())
}

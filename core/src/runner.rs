use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::info;

use crate::chip8::{Chip8, Cycle};
use crate::constants::CLOCK_SPEED;
use crate::render::{Frame, Render};

/// Asks a running interpreter to stop once its current step is done.
#[derive(Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// # Runner
/// Drives a `Chip8` on its own thread: one step per tick, a frame pushed to the
/// `Render` observer after every step that changed the display.
///
/// The loop ends when `stop` is called or when a step fails. Stopping is only
/// noticed between steps, never during one.
pub struct Runner {
    handle: StopHandle,
    worker: JoinHandle<Chip8>,
}

impl Runner {
    /// Starts ticking from the machine's current state, restarting it if it was stopped.
    ///
    /// # Arguments
    /// * `chip8` the machine to run; handed back by `join`
    /// * `scale` passed through to the observer untouched
    /// * `render` the observer notified with each new frame
    pub fn start<R>(mut chip8: Chip8, scale: u32, mut render: R) -> Runner
    where
        R: Render + Send + 'static,
    {
        chip8.restart();
        let handle = StopHandle {
            running: Arc::new(AtomicBool::new(true)),
        };
        let running = handle.clone();
        let worker = thread::spawn(move || {
            run(&mut chip8, scale, &mut render, &running);
            chip8
        });
        Runner { handle, worker }
    }

    pub fn stop(&self) {
        self.handle.stop();
    }

    /// A handle that can stop the interpreter from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running() && !self.worker.is_finished()
    }

    /// Waits for the loop to end and returns the machine.
    pub fn join(self) -> Chip8 {
        self.worker
            .join()
            .unwrap_or_else(|e| panic::resume_unwind(e))
    }
}

fn run(chip8: &mut Chip8, scale: u32, render: &mut dyn Render, running: &StopHandle) {
    let cycle_time = Duration::from_nanos(CLOCK_SPEED);
    let mut last_cycle = Instant::now();
    info!("interpreter started at pc {:#05X}", chip8.state().pc);

    while running.is_running() {
        match chip8.step() {
            Ok(Cycle::Drew) => render.render(Frame::new(chip8.frame(), scale)),
            Ok(Cycle::Executed) => {}
            // step has already logged it
            Err(_) => break,
        }

        // Handle timing
        let elapsed_cycle_time = last_cycle.elapsed();
        if cycle_time > elapsed_cycle_time {
            thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = Instant::now();
    }

    running.stop();
    chip8.stop();
    info!("interpreter stopped at pc {:#05X}", chip8.state().pc);
}

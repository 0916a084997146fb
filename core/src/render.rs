use std::sync::mpsc::Sender;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::state::FrameBuffer;

/// A read-only view of the display handed to a `Render` observer.
///
/// `scale` is whatever zoom the caller asked for; the interpreter never uses it.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub pixels: &'a FrameBuffer,
    pub width: usize,
    pub height: usize,
    pub scale: u32,
}

impl<'a> Frame<'a> {
    pub fn new(pixels: &'a FrameBuffer, scale: u32) -> Self {
        Frame {
            pixels,
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
            scale,
        }
    }

    pub fn snapshot(&self) -> OwnedFrame {
        OwnedFrame {
            pixels: *self.pixels,
            width: self.width,
            height: self.height,
            scale: self.scale,
        }
    }
}

/// A copy of a `Frame` that can cross threads.
#[derive(Clone)]
pub struct OwnedFrame {
    pub pixels: FrameBuffer,
    pub width: usize,
    pub height: usize,
    pub scale: u32,
}

impl OwnedFrame {
    pub fn as_frame(&self) -> Frame<'_> {
        Frame {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
            scale: self.scale,
        }
    }
}

/// # Render
/// Receives the display after every instruction that changed it.
pub trait Render {
    fn render(&mut self, frame: Frame<'_>);
}

impl<F> Render for F
where
    F: FnMut(Frame<'_>),
{
    fn render(&mut self, frame: Frame<'_>) {
        self(frame)
    }
}

/// Forwards a copy of each frame; a hung up receiver is ignored.
impl Render for Sender<OwnedFrame> {
    fn render(&mut self, frame: Frame<'_>) {
        let _ = self.send(frame.snapshot());
    }
}

use log::debug;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;

use vm8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use vm8_core::Frame;

/// # Display
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// The interpreter stores each pixel as a whole byte, 0x00 for off and 0xFF for on.
/// The display only gets a call to `render` when the interpreter reports a new frame.
pub struct Display {
    canvas: WindowCanvas,
    textures: TextureCreator<WindowContext>,
}

impl Display {
    /// Creates a window bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `title` the window title
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, title: &str, scale: u32) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                title,
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let mut canvas = window
            .into_canvas()
            .build()
            .map_err(|e| e.to_string())?;
        canvas.clear();
        canvas.present();
        let textures = canvas.texture_creator();
        debug!("opened {}x{} window", DISPLAY_WIDTH as u32 * scale, DISPLAY_HEIGHT as u32 * scale);

        Ok(Display { canvas, textures })
    }

    /// Formats a frame for rendering as an SDL2 texture.
    ///
    /// An SDL2 RGB24 texture is a 1D array of bytes that represent concatenated rows of RGB pixels.
    /// The frame is already a 1D array of 0x00/0xFF intensities, so each is repeated once per channel.
    fn frame_to_sdl_texture(frame: &Frame<'_>) -> Vec<u8> {
        frame
            .pixels
            .iter()
            .take(frame.width * frame.height)
            .flat_map(|&pixel| std::iter::repeat(pixel).take(3))
            .collect()
    }

    /// Formats the frame as an SDL2 RGB24 texture and stretches it across the window.
    pub fn render(&mut self, frame: &Frame<'_>) -> Result<(), String> {
        let rgb = Display::frame_to_sdl_texture(frame);
        let mut texture = self
            .textures
            .create_texture_streaming(PixelFormatEnum::RGB24, frame.width as u32, frame.height as u32)
            .map_err(|e| e.to_string())?;
        texture.update(None, &rgb, frame.width * 3).map_err(|e| e.to_string())?;
        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

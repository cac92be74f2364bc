use log::info;
use sdl2::pixels::PixelFormatEnum;

use c8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use c8_core::FrameBuffer;

const WINDOW_TITLE: &str = "CHIP-8";

/// # Display
/// The Chip-8 display is composed of 64x32 pixels black/white pixels.
/// The on/off state of these pixels is encoded as true/false respectively in a 2d array.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                WINDOW_TITLE,
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window
            .into_canvas()
            .build()
            .map_err(|e| e.to_string())?;
        info!(
            "opened {}x{} window",
            DISPLAY_WIDTH as u32 * scale,
            DISPLAY_HEIGHT as u32 * scale
        );

        let mut display = Display { canvas };
        display.render(&[[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT])?;
        Ok(display)
    }

    /// Formats a Chip-8 FrameBuffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 texture is a 1D array of ints that represent concatenated rows of RGB pixels.
    ///
    /// This creates a black and white rendering by:
    /// - Flattening the 2D frame buffer into a 1D array by concatenating its rows
    /// - Mapping each pixel to 0 or 255 intensity
    /// - Triplicating each element of that 1D array to represent the RGB values of each pixel
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    fn frame_to_sdl_texture(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| row.iter())
            .map(|lit| if *lit { 255 } else { 0 })
            .flat_map(|intensity| std::iter::repeat(intensity).take(3))
            .collect()
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    /// The texture is stretched over the whole window.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        let pixels = Display::frame_to_sdl_texture(frame);
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            // rows may be padded out past width * 3
            for (y, row) in pixels.chunks(DISPLAY_WIDTH * 3).enumerate() {
                buffer[y * pitch..y * pitch + row.len()].copy_from_slice(row);
            }
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_sdl_texture() {
        let mut frame: FrameBuffer = [[false; 64]; 32];
        frame[0][0..2].copy_from_slice(&[false, true]);
        frame[1][0..2].copy_from_slice(&[true, false]);
        let frame = Display::frame_to_sdl_texture(&frame);

        let mut expected: Vec<u8> = vec![0; 6144];
        expected[0..6].copy_from_slice(&[0, 0, 0, 255, 255, 255]);
        expected[192..198].copy_from_slice(&[255, 255, 255, 0, 0, 0]);

        assert_eq!(frame, expected);
    }

    #[test]
    fn test_window_is_titled_after_the_machine() {
        assert_eq!(WINDOW_TITLE, "CHIP-8");
    }

    #[test]
    fn test_blank_frame_is_black() {
        let frame: FrameBuffer = [[false; 64]; 32];
        assert!(Display::frame_to_sdl_texture(&frame).iter().all(|c| *c == 0));
    }
}

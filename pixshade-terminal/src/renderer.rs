//! ASCII renderer for terminal output
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use pixshade_core::frame::{color_to_rgba8, luminance};
use pixshade_core::Frame;
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Converts rendered frames into coloured terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Copy `frame` into the character and colour buffers.
    ///
    /// Frames of a different size are cropped to the renderer's grid.
    pub fn render_frame(&mut self, frame: &Frame) {
        self.clear();
        for y in 0..self.height.min(frame.height()) {
            for x in 0..self.width.min(frame.width()) {
                if let Some(color) = frame.get(x, y) {
                    let [r, g, b, _] = color_to_rgba8(color);
                    let idx = y * self.width + x;
                    self.char_buffer[idx] = shade_char(luminance(color));
                    self.color_buffer[idx] = Color::Rgb { r, g, b };
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map a luminance to a ramp character; values past 1 saturate at the brightest
fn shade_char(luma: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    if luma.is_nan() {
        return LUMINOSITY_RAMP[0];
    }
    let index = (luma.clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

//! Evaluating a shader over a grid of cells
use nalgebra::Vector2;

use crate::error::{Error, Result};
use crate::scene::{Color, Shader};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rec. 709 luma of a colour, alpha ignored
pub fn luminance(color: &Color) -> f32 {
    0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z
}

/// A rendered grid of colours, row 0 at the top
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Frame {
    /// Evaluate `shader` once per cell of a `columns` x `rows` grid.
    ///
    /// The grid is stretched over `resolution` pixels: cell `(c, r)` is
    /// sampled at its centre, with the y axis flipped so that the shader sees
    /// a bottom-left origin.
    pub fn render(
        shader: &dyn Shader,
        columns: usize,
        rows: usize,
        resolution: &Vector2<f32>,
        time: f32,
    ) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(Error::invalid(format!(
                "frame of {}x{} cells has nothing to render",
                columns, rows
            )));
        }

        let cell = Vector2::new(resolution.x / columns as f32, resolution.y / rows as f32);
        let shade_row = |row: usize, out: &mut [Color]| {
            let y = (rows - 1 - row) as f32 + 0.5;
            for (column, pixel) in out.iter_mut().enumerate() {
                let frag = Vector2::new((column as f32 + 0.5) * cell.x, y * cell.y);
                *pixel = shader.render_pixel(&frag, resolution, time);
            }
        };

        let mut pixels = vec![Color::zeros(); columns * rows];

        #[cfg(feature = "parallel")]
        pixels
            .par_chunks_mut(columns)
            .enumerate()
            .for_each(|(row, out)| shade_row(row, out));

        #[cfg(not(feature = "parallel"))]
        pixels
            .chunks_mut(columns)
            .enumerate()
            .for_each(|(row, out)| shade_row(row, out));

        log::trace!("rendered {}x{} frame at t={:.3}", columns, rows, time);

        Ok(Self {
            width: columns,
            height: rows,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Colour at column `x`, row `y` (row 0 at the top)
    pub fn get(&self, x: usize, y: usize) -> Option<&Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x)
    }

    /// Row-major RGBA bytes, each channel clamped to [0, 1] first
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba8(color));
        }
        bytes
    }
}

/// Clamp a colour to [0, 1] per channel and quantize it to bytes
pub fn color_to_rgba8(color: &Color) -> [u8; 4] {
    [
        to_byte(color.x),
        to_byte(color.y),
        to_byte(color.z),
        to_byte(color.w),
    ]
}

fn to_byte(value: f32) -> u8 {
    // NaN maps to 0
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encodes the fragment coordinate in the red and green channels
    struct CoordShader;

    impl Shader for CoordShader {
        fn render_pixel(&self, frag: &Vector2<f32>, _resolution: &Vector2<f32>, _time: f32) -> Color {
            Color::new(frag.x, frag.y, 0.0, 1.0)
        }
    }

    #[test]
    fn test_render_flips_y_and_samples_centres() {
        let frame = Frame::render(&CoordShader, 4, 2, &Vector2::new(8.0, 4.0), 0.0).unwrap();
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 2);
        // Top-left cell covers x in [0, 2], y in [2, 4]
        assert_eq!(*frame.get(0, 0).unwrap(), Color::new(1.0, 3.0, 0.0, 1.0));
        // Bottom-right cell covers x in [6, 8], y in [0, 2]
        assert_eq!(*frame.get(3, 1).unwrap(), Color::new(7.0, 1.0, 0.0, 1.0));
        assert!(frame.get(4, 0).is_none());
    }

    #[test]
    fn test_render_rejects_empty_grid() {
        assert!(Frame::render(&CoordShader, 0, 3, &Vector2::new(1.0, 1.0), 0.0).is_err());
    }

    #[test]
    fn test_rgba8_clamps_channels() {
        let frame = Frame {
            width: 2,
            height: 1,
            pixels: vec![Color::new(-1.0, 0.5, 2.0, 1.0), Color::new(f32::NAN, 1.0, 0.0, 0.0)],
        };
        assert_eq!(frame.to_rgba8(), vec![0, 128, 255, 255, 0, 255, 0, 0]);
    }

    #[test]
    fn test_luminance_weights() {
        assert!((luminance(&Color::new(1.0, 1.0, 1.0, 1.0)) - 1.0).abs() < 1e-6);
        assert!(luminance(&Color::new(0.0, 1.0, 0.0, 1.0)) > luminance(&Color::new(1.0, 0.0, 0.0, 1.0)));
    }
}

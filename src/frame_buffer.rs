use heapless::Vec;

use crate::color::{BLACK, Color};

/// Fixed-capacity pixel storage
pub type Pixels<const N: usize> = Vec<Color, N>;

/// The single rendering target of a lamp
///
/// The pixel count is fixed at construction and never exceeds the
/// compile-time capacity `N`.
#[derive(Debug, Clone)]
pub struct FrameBuffer<const N: usize> {
    pixels: Pixels<N>,
}

impl<const N: usize> FrameBuffer<N> {
    /// Create a black buffer with `pixel_count` pixels (capped at `N`)
    pub fn new(pixel_count: usize) -> Self {
        Self::filled(pixel_count, BLACK)
    }

    /// Create a buffer with every pixel set to `color`
    pub fn filled(pixel_count: usize, color: Color) -> Self {
        let mut pixels = Pixels::new();
        let _ = pixels.resize(pixel_count.min(N), color);
        Self { pixels }
    }

    /// Create a buffer from existing pixel colors (extra pixels are dropped)
    pub fn from_pixels(colors: &[Color]) -> Self {
        let count = colors.len().min(N);
        let mut pixels = Pixels::new();
        let _ = pixels.extend_from_slice(&colors[..count]);
        Self { pixels }
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.pixels
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Color] {
        &mut self.pixels
    }
}

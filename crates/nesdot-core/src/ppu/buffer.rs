//! Output surface for rendered frames.

/// Visible columns per line.
pub const SCREEN_WIDTH: usize = 256;
/// Visible lines per frame.
pub const SCREEN_HEIGHT: usize = 240;

/// One frame of 9-bit color indices, row-major.
///
/// Bits 0-5 hold the palette color (after grayscale and any color map), bits
/// 6-8 the `$2001` emphasis bits. Turning indices into RGB is left to the
/// frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Box<[u16]>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT].into_boxed_slice(),
        }
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> u16 {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    pub fn row(&self, y: usize) -> &[u16] {
        &self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    pub fn fill(&mut self, value: u16) {
        self.pixels.fill(value);
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: u16) {
        debug_assert!(x < SCREEN_WIDTH && y < SCREEN_HEIGHT, "pixel ({x}, {y}) off screen");
        self.pixels[y * SCREEN_WIDTH + x] = value;
    }
}

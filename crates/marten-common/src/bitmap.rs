//! Bitmap data shared between the layout engine and the renderer.

use crate::color::Rgba;

/// A decoded RGBA pixel buffer.
///
/// This is the value stored in the resource shelf: glyph runs, rasterized
/// borders, and canvas output all land here before the renderer uploads
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from raw RGBA pixel data (`width * height * 4` bytes).
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a bitmap filled with a single color.
    #[must_use]
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Self::new(width, height, pixels)
    }

    /// Create a fully transparent bitmap, the degradation value when a
    /// collaborator fails.
    #[must_use]
    pub fn blank(width: u32, height: u32) -> Self {
        Self::solid(width, height, Rgba::TRANSPARENT)
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as `(width, height)` in `f32`, for layout.
    #[must_use]
    pub fn dimensions_f32(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

//! Collaborator seams: text shaping and border rasterization.
//!
//! Layout never touches font files or pixel routines itself. It measures and
//! renders text through [`FontBackend`] and draws border frames through
//! [`BorderRasterizer`]; both are injected at engine construction. A failing
//! collaborator degrades to a blank bitmap upstream, it never aborts a pass.

use marten_common::{color, units, BackendError, Bitmap, Rgba};

use crate::cascade::{Effective, Property};
use crate::state::Border;

/// Advance width per glyph as a fraction of font size, for the approximate
/// metrics.
const ADVANCE_RATIO: f32 = 0.6;
/// Default line height as a fraction of font size.
const LINE_RATIO: f32 = 1.2;

/// A piece of text with every attribute that affects its rendered bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font_family: String,
    /// Font size in pixels (the element's em basis).
    pub font_size: f32,
    pub font_weight: String,
    pub font_style: String,
    /// Resolved line height in pixels; `0` asks the backend for its default.
    pub line_height: f32,
    pub letter_spacing: f32,
    pub word_spacing: f32,
    pub color: Rgba,
    /// `text-decoration` keyword (`underline`, `overline`, ...).
    pub decoration: String,
}

impl TextRun {
    /// Build a run from an element's effective styles and resolved em basis.
    #[must_use]
    pub fn from_styles(text: &str, styles: &Effective, em: f32, base: f32) -> Self {
        Self {
            text: text.to_string(),
            font_family: styles
                .prop(Property::FontFamily)
                .unwrap_or("sans-serif")
                .to_string(),
            font_size: em,
            font_weight: styles
                .prop(Property::FontWeight)
                .unwrap_or("normal")
                .to_string(),
            font_style: styles
                .prop(Property::FontStyle)
                .unwrap_or("normal")
                .to_string(),
            line_height: styles
                .prop(Property::LineHeight)
                .and_then(|v| units::resolve(v, em, base))
                .unwrap_or(0.0),
            letter_spacing: styles
                .prop(Property::LetterSpacing)
                .and_then(|v| units::resolve(v, em, base))
                .unwrap_or(0.0),
            word_spacing: styles
                .prop(Property::WordSpacing)
                .and_then(|v| units::resolve(v, em, base))
                .unwrap_or(0.0),
            color: styles
                .prop(Property::Color)
                .and_then(color::parse)
                .unwrap_or(Rgba::BLACK),
            decoration: styles
                .prop(Property::TextDecoration)
                .unwrap_or("")
                .to_string(),
        }
    }

    /// Content-derived shelf key: two runs with identical text and identical
    /// render attributes share one bitmap regardless of which elements carry
    /// them.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "text-{}-{}-{}-{}-{}-{}-{}-{:02x}{:02x}{:02x}{:02x}-{}",
            self.font_family,
            self.font_size,
            self.font_weight,
            self.font_style,
            self.letter_spacing,
            self.word_spacing,
            self.decoration,
            self.color.r,
            self.color.g,
            self.color.b,
            self.color.a,
            self.text,
        )
    }
}

/// Text shaping seam.
pub trait FontBackend {
    /// Advance width of the run in pixels.
    fn measure(&mut self, run: &TextRun) -> f32;

    /// Line height of the run in pixels.
    fn line_height(&self, run: &TextRun) -> f32;

    /// Rasterize the run. Returns the bitmap and the exact advance width.
    fn render(&mut self, run: &TextRun) -> Result<(Bitmap, f32), BackendError>;
}

/// Fixed-ratio metrics backend: every glyph advances 0.6 em and a line is
/// 1.2 em tall. Never fails, which makes it the test backend and the
/// fallback when no real font stack is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFont;

impl FontBackend for ApproximateFont {
    fn measure(&mut self, run: &TextRun) -> f32 {
        let glyphs = run.text.chars().count() as f32;
        glyphs * run.font_size * ADVANCE_RATIO + run.letter_spacing * (glyphs - 1.0).max(0.0)
    }

    fn line_height(&self, run: &TextRun) -> f32 {
        if run.line_height > 0.0 {
            run.line_height
        } else {
            run.font_size * LINE_RATIO
        }
    }

    fn render(&mut self, run: &TextRun) -> Result<(Bitmap, f32), BackendError> {
        let width = self.measure(run);
        let height = self.line_height(run);
        let bitmap = Bitmap::solid(
            width.ceil().max(1.0) as u32,
            height.ceil().max(1.0) as u32,
            run.color,
        );
        Ok((bitmap, width))
    }
}

/// A border frame to rasterize, sized to the element's final box.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderSpec {
    pub width: f32,
    pub height: f32,
    pub border: Border,
}

/// Border drawing seam.
pub trait BorderRasterizer {
    /// Rasterize the frame into an RGBA bitmap of the spec's dimensions.
    fn draw(&mut self, spec: &BorderSpec) -> Result<Bitmap, BackendError>;
}

/// Default rasterizer: solid rectangular strokes, no radius shaping.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidRasterizer;

impl BorderRasterizer for SolidRasterizer {
    fn draw(&mut self, spec: &BorderSpec) -> Result<Bitmap, BackendError> {
        let w = spec.width.ceil().max(1.0) as u32;
        let h = spec.height.ceil().max(1.0) as u32;
        let mut pixels = vec![0u8; (w * h * 4) as usize];

        let mut fill = |x0: u32, y0: u32, x1: u32, y1: u32, c: Rgba| {
            for y in y0..y1.min(h) {
                for x in x0..x1.min(w) {
                    let i = ((y * w + x) * 4) as usize;
                    pixels[i] = c.r;
                    pixels[i + 1] = c.g;
                    pixels[i + 2] = c.b;
                    pixels[i + 3] = c.a;
                }
            }
        };

        let b = &spec.border;
        let top = b.top.width.ceil() as u32;
        let bottom = b.bottom.width.ceil() as u32;
        let left = b.left.width.ceil() as u32;
        let right = b.right.width.ceil() as u32;
        fill(0, 0, w, top, b.top.color);
        fill(0, h.saturating_sub(bottom), w, h, b.bottom.color);
        fill(0, 0, left, h, b.left.color);
        fill(w.saturating_sub(right), 0, w, h, b.right.color);

        Ok(Bitmap::new(w, h, pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> TextRun {
        TextRun {
            text: text.to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 16.0,
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            line_height: 0.0,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            color: Rgba::BLACK,
            decoration: String::new(),
        }
    }

    #[test]
    fn test_approximate_metrics() {
        let mut font = ApproximateFont;
        let r = run("abcd");
        assert!((font.measure(&r) - 4.0 * 16.0 * 0.6).abs() < 1e-4);
        assert!((font.line_height(&r) - 19.2).abs() < 1e-4);
    }

    #[test]
    fn test_cache_key_is_content_derived() {
        let a = run("hello");
        let b = run("hello");
        let c = run("world");
        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), c.cache_key());
    }

    #[test]
    fn test_solid_rasterizer_frame() {
        let mut raster = SolidRasterizer;
        let mut border = Border::default();
        border.top.width = 2.0;
        border.top.color = Rgba::new(255, 0, 0, 255);
        let bmp = raster
            .draw(&BorderSpec {
                width: 4.0,
                height: 4.0,
                border,
            })
            .unwrap();
        assert_eq!(bmp.width(), 4);
        assert_eq!(&bmp.pixels()[..4], &[255, 0, 0, 255]);
        // Below the stroke stays transparent.
        let last = bmp.pixels().len() - 4;
        assert_eq!(&bmp.pixels()[last..], &[0, 0, 0, 0]);
    }
}

//! Color values.
//!
//! [§ 4 Represented Colors](https://www.w3.org/TR/css-color-4/)
//!
//! The full named-color table and exotic color spaces live with the external
//! parsers; this module carries only the forms the engine itself resolves
//! for border and background render state.

use serde::Serialize;

use crate::warning::warn_once;

/// An sRGB color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rgba {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
    /// Alpha component (255 = opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Create a color from components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Parse a CSS color value.
///
/// Supports `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()`, and the named
/// colors common in generated styles. Returns `None` (absence) otherwise.
pub fn parse(value: &str) -> Option<Rgba> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    if let Some(body) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
        .and_then(|v| v.strip_suffix(')'))
    {
        return parse_rgb_function(body);
    }

    match value.to_ascii_lowercase().as_str() {
        "black" => Some(Rgba::BLACK),
        "white" => Some(Rgba::WHITE),
        "red" => Some(Rgba::new(255, 0, 0, 255)),
        "green" => Some(Rgba::new(0, 128, 0, 255)),
        "blue" => Some(Rgba::new(0, 0, 255, 255)),
        "yellow" => Some(Rgba::new(255, 255, 0, 255)),
        "gray" | "grey" => Some(Rgba::new(128, 128, 128, 255)),
        "transparent" => Some(Rgba::TRANSPARENT),
        _ => {
            warn_once("color", &format!("unsupported color '{value}'"));
            None
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let nibble = |c: u8| -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    };
    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => {
            let r = nibble(bytes[0])?;
            let g = nibble(bytes[1])?;
            let b = nibble(bytes[2])?;
            Some(Rgba::new(r * 17, g * 17, b * 17, 255))
        }
        6 | 8 => {
            let mut out = [0u8; 4];
            out[3] = 255;
            for (i, pair) in bytes.chunks(2).enumerate() {
                out[i] = nibble(pair[0])? * 16 + nibble(pair[1])?;
            }
            Some(Rgba::new(out[0], out[1], out[2], out[3]))
        }
        _ => None,
    }
}

fn parse_rgb_function(body: &str) -> Option<Rgba> {
    let mut parts = body.split(',').map(str::trim);
    let r = parts.next()?.parse::<f32>().ok()?;
    let g = parts.next()?.parse::<f32>().ok()?;
    let b = parts.next()?.parse::<f32>().ok()?;
    let a = match parts.next() {
        Some(v) => (v.parse::<f32>().ok()? * 255.0).round(),
        None => 255.0,
    };
    Some(Rgba::new(
        r.clamp(0.0, 255.0) as u8,
        g.clamp(0.0, 255.0) as u8,
        b.clamp(0.0, 255.0) as u8,
        a.clamp(0.0, 255.0) as u8,
    ))
}

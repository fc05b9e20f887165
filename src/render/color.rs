//! Colour parsing and HSL conversion

use crate::dna::selection::RandomSelector;
use crate::io::error::{Result, invalid_parameter};
use image::Rgba;
use palette::{Hsl, IntoColor, Srgb};

/// Parse `#rrggbb` or `#rrggbbaa`
///
/// # Errors
///
/// Returns `InvalidParameter` for any other form
pub fn parse_hex_color(text: &str) -> Result<Rgba<u8>> {
    let invalid = || invalid_parameter("background.default", &text, &"expected #rrggbb or #rrggbbaa");

    let hex = text.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or_else(invalid)
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { u8::MAX };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// Convert HSL with percentage saturation and lightness into a pixel
pub fn hsl_color(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Rgba<u8> {
    let hsl = Hsl::new(
        hue.rem_euclid(360.0) as f32,
        (saturation / 100.0).clamp(0.0, 1.0) as f32,
        (lightness / 100.0).clamp(0.0, 1.0) as f32,
    );
    let rgb: Srgb = hsl.into_color();
    Rgba([
        unit_to_byte(rgb.red),
        unit_to_byte(rgb.green),
        unit_to_byte(rgb.blue),
        unit_to_byte(alpha as f32),
    ])
}

/// Fully saturated colour of random hue at the given lightness percentage
pub fn random_hue_color(rng: &mut RandomSelector, lightness: f64) -> Rgba<u8> {
    let hue = (rng.unit() * 360.0).floor();
    hsl_color(hue, 100.0, lightness, 1.0)
}

fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

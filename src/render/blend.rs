//! Composite operations for drawing a layer over the canvas
//!
//! Colour maths follows the W3C compositing and blending model: the blend
//! function mixes source and backdrop colour, and the result is composited
//! source-over with the source alpha scaled by the layer opacity.

use image::Rgba;
use serde::{Deserialize, Serialize};

/// Composite operation of a layer draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Plain alpha compositing
    #[default]
    SourceOver,
    /// Product of source and backdrop
    Multiply,
    /// Inverse product of inverses
    Screen,
    /// Multiply or screen depending on the backdrop
    Overlay,
    /// Minimum of source and backdrop
    Darken,
    /// Maximum of source and backdrop
    Lighten,
    /// Brighten the backdrop towards the source
    ColorDodge,
    /// Darken the backdrop towards the source
    ColorBurn,
    /// Multiply or screen depending on the source
    HardLight,
    /// Softer variant of hard light
    SoftLight,
    /// Absolute difference
    Difference,
    /// Lower-contrast difference
    Exclusion,
    /// Source hue with backdrop saturation and luminosity
    Hue,
    /// Source saturation with backdrop hue and luminosity
    Saturation,
    /// Source hue and saturation with backdrop luminosity
    Color,
    /// Source luminosity with backdrop hue and saturation
    Luminosity,
}

type Rgb = [f64; 3];

impl BlendMode {
    /// Mix a source colour into a backdrop colour, both unpremultiplied
    pub fn blend(self, backdrop: Rgb, source: Rgb) -> Rgb {
        match self {
            Self::Hue => set_lum(set_sat(source, sat(backdrop)), lum(backdrop)),
            Self::Saturation => set_lum(set_sat(backdrop, sat(source)), lum(backdrop)),
            Self::Color => set_lum(source, lum(backdrop)),
            Self::Luminosity => set_lum(backdrop, lum(source)),
            _ => {
                let [br, bg, bb] = backdrop;
                let [sr, sg, sb] = source;
                [
                    self.blend_channel(br, sr),
                    self.blend_channel(bg, sg),
                    self.blend_channel(bb, sb),
                ]
            }
        }
    }

    fn blend_channel(self, cb: f64, cs: f64) -> f64 {
        match self {
            Self::Multiply => cb * cs,
            Self::Screen => screen(cb, cs),
            Self::Overlay => hard_light(cs, cb),
            Self::Darken => cb.min(cs),
            Self::Lighten => cb.max(cs),
            Self::ColorDodge => {
                if cb <= 0.0 {
                    0.0
                } else if cs >= 1.0 {
                    1.0
                } else {
                    (cb / (1.0 - cs)).min(1.0)
                }
            }
            Self::ColorBurn => {
                if cb >= 1.0 {
                    1.0
                } else if cs <= 0.0 {
                    0.0
                } else {
                    1.0 - ((1.0 - cb) / cs).min(1.0)
                }
            }
            Self::HardLight => hard_light(cb, cs),
            Self::SoftLight => {
                if cs <= 0.5 {
                    (2.0f64.mul_add(-cs, 1.0) * cb).mul_add(-(1.0 - cb), cb)
                } else {
                    let d = if cb <= 0.25 {
                        16.0f64.mul_add(cb, -12.0).mul_add(cb, 4.0) * cb
                    } else {
                        cb.sqrt()
                    };
                    2.0f64.mul_add(cs, -1.0).mul_add(d - cb, cb)
                }
            }
            Self::Difference => (cb - cs).abs(),
            Self::Exclusion => (2.0 * cb).mul_add(-cs, cb + cs),
            _ => cs,
        }
    }
}

fn screen(cb: f64, cs: f64) -> f64 {
    cb.mul_add(-cs, cb + cs)
}

fn hard_light(cb: f64, cs: f64) -> f64 {
    if cs <= 0.5 {
        cb * 2.0 * cs
    } else {
        screen(cb, 2.0f64.mul_add(cs, -1.0))
    }
}

fn lum([r, g, b]: Rgb) -> f64 {
    0.11f64.mul_add(b, 0.3f64.mul_add(r, 0.59 * g))
}

fn clip_color(c: Rgb) -> Rgb {
    let l = lum(c);
    let n = c.iter().copied().fold(f64::INFINITY, f64::min);
    let x = c.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    c.map(|v| {
        let mut v = v;
        if n < 0.0 && l - n > f64::EPSILON {
            v = l + (v - l) * l / (l - n);
        }
        if x > 1.0 && x - l > f64::EPSILON {
            v = l + (v - l) * (1.0 - l) / (x - l);
        }
        v
    })
}

fn set_lum(c: Rgb, l: f64) -> Rgb {
    let d = l - lum(c);
    clip_color(c.map(|v| v + d))
}

fn sat(c: Rgb) -> f64 {
    let n = c.iter().copied().fold(f64::INFINITY, f64::min);
    let x = c.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    x - n
}

fn set_sat(c: Rgb, s: f64) -> Rgb {
    let n = c.iter().copied().fold(f64::INFINITY, f64::min);
    let x = c.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if x - n <= f64::EPSILON {
        return [0.0; 3];
    }
    c.map(|v| (v - n) * s / (x - n))
}

fn to_unit(channel: u8) -> f64 {
    f64::from(channel) / 255.0
}

fn to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Composite one source pixel over one backdrop pixel
///
/// `opacity` scales the source alpha. A fully opaque source-over draw copies
/// the source colour exactly.
pub fn composite_pixel(backdrop: Rgba<u8>, source: Rgba<u8>, opacity: f64, mode: BlendMode) -> Rgba<u8> {
    let [sr, sg, sb, sa] = source.0;
    let [br, bg, bb, ba] = backdrop.0;

    let alpha_s = to_unit(sa) * opacity.clamp(0.0, 1.0);
    if alpha_s <= 0.0 {
        return backdrop;
    }
    let alpha_b = to_unit(ba);

    let cs = [to_unit(sr), to_unit(sg), to_unit(sb)];
    let cb = [to_unit(br), to_unit(bg), to_unit(bb)];

    let mixed = if mode == BlendMode::SourceOver || alpha_b <= 0.0 {
        cs
    } else {
        let blended = mode.blend(cb, cs);
        [0, 1, 2].map(|i| {
            let s = cs.get(i).copied().unwrap_or(0.0);
            let m = blended.get(i).copied().unwrap_or(0.0);
            (1.0 - alpha_b).mul_add(s, alpha_b * m)
        })
    };

    let alpha_o = alpha_b.mul_add(1.0 - alpha_s, alpha_s);
    let color = [0, 1, 2].map(|i| {
        let m = mixed.get(i).copied().unwrap_or(0.0);
        let b = cb.get(i).copied().unwrap_or(0.0);
        let premultiplied = (alpha_b * b).mul_add(1.0 - alpha_s, alpha_s * m);
        premultiplied / alpha_o
    });

    let [r, g, b] = color.map(to_byte);
    Rgba([r, g, b, to_byte(alpha_o)])
}

//! Portrait processing: normalize an arbitrary photo into the circular,
//! graded, rim-lit layer the compositor places.

use anyhow::Context;
use image::imageops::{self, FilterType};
use palette::{Hsl, IntoColor, Srgb};

use crate::blend;
use crate::brand::ACCENT;
use crate::error::ThumbResult;

const WARM_SATURATION_SCALE: f32 = 1.12;
const COOL_SATURATION_SCALE: f32 = 1.05;
/// Hues below/above these degrees count as warm (reds through yellows,
/// magenta-reds).
const WARM_HUE_MAX: f32 = 70.0;
const WARM_HUE_WRAP: f32 = 320.0;
const LIGHTNESS_LIFT: f32 = 0.03;
const SHARPEN_SIGMA: f32 = 1.4;
const SHARPEN_THRESHOLD: i32 = 4;
const CONTRAST_BOOST: f32 = 6.0;
/// Rim light begins at this fraction of the radius and strengthens
/// quadratically toward the edge.
const RIM_START: f32 = 0.62;
const RIM_MAX: f32 = 0.55;
const GLOW_MAX: f32 = 0.35;

/// Circular portrait in premultiplied RGBA, `size` pixels square.
#[derive(Clone, Debug)]
pub struct PortraitLayer {
    pub size: u32,
    pub premul: Vec<u8>,
}

/// Full treatment for one photo: decode, center-fill crop, grade,
/// sharpen, rim light, circular mask. Errors here are the caller's to
/// absorb; this function only reports them.
pub fn process(photo: &[u8], size: u32) -> ThumbResult<PortraitLayer> {
    let decoded = image::load_from_memory(photo).context("decode portrait photo")?;
    let square = decoded.resize_to_fill(size, size, FilterType::Lanczos3);
    let mut rgba = square.to_rgba8();

    grade(&mut rgba);
    let sharpened = imageops::unsharpen(&rgba, SHARPEN_SIGMA, SHARPEN_THRESHOLD);
    let contrasted = imageops::contrast(&sharpened, CONTRAST_BOOST);

    let mut data = contrasted.into_raw();
    apply_rim_and_mask(&mut data, size);
    blend::premultiply_in_place(&mut data);

    Ok(PortraitLayer { size, premul: data })
}

/// Brightness and saturation lift in HSL space, weighted toward the
/// warm band where skin tones sit. Neutral grays keep their hue
/// (saturation scaling leaves zero at zero).
fn grade(rgba: &mut image::RgbaImage) {
    for px in rgba.pixels_mut() {
        let rgb = Srgb::new(
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
        );
        let mut hsl: Hsl = rgb.into_color();
        let hue = hsl.hue.into_positive_degrees();
        let scale = if hue < WARM_HUE_MAX || hue > WARM_HUE_WRAP {
            WARM_SATURATION_SCALE
        } else {
            COOL_SATURATION_SCALE
        };
        hsl.saturation = (hsl.saturation * scale).min(1.0);
        hsl.lightness = (hsl.lightness + LIGHTNESS_LIFT).min(1.0);
        let out: Srgb = hsl.into_color();
        px[0] = (out.red * 255.0).round().clamp(0.0, 255.0) as u8;
        px[1] = (out.green * 255.0).round().clamp(0.0, 255.0) as u8;
        px[2] = (out.blue * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Accent rim light plus the anti-aliased circular cutout, on straight
/// (not yet premultiplied) RGBA.
fn apply_rim_and_mask(data: &mut [u8], size: u32) {
    let radius = size as f32 / 2.0;
    let center = radius - 0.5;

    for y in 0..size {
        for x in 0..size {
            let i = ((y * size + x) * 4) as usize;
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let dist = (dx * dx + dy * dy).sqrt();

            let t = ((dist / radius - RIM_START) / (1.0 - RIM_START)).clamp(0.0, 1.0);
            let strength = t * t * RIM_MAX;
            if strength > 0.0 {
                for c in 0..3 {
                    let base = f32::from(data[i + c]);
                    let lit = base + (f32::from(ACCENT[c]) - base) * strength;
                    data[i + c] = lit.round().clamp(0.0, 255.0) as u8;
                }
            }

            let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
            data[i + 3] = (f32::from(data[i + 3]) * coverage).round() as u8;
        }
    }
}

/// Soft accent disc blitted beneath the portrait. Premultiplied, fading
/// quadratically from the center.
pub fn glow_halo(diameter: u32) -> Vec<u8> {
    let mut data = vec![0u8; (diameter * diameter * 4) as usize];
    let radius = diameter as f32 / 2.0;
    let center = radius - 0.5;

    for y in 0..diameter {
        for x in 0..diameter {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist >= radius {
                continue;
            }
            let fade = 1.0 - dist / radius;
            let alpha = (fade * fade * GLOW_MAX * 255.0).round() as u8;
            let i = ((y * diameter + x) * 4) as usize;
            for c in 0..3 {
                data[i + c] = ((u16::from(ACCENT[c]) * u16::from(alpha) + 127) / 255) as u8;
            }
            data[i + 3] = alpha;
        }
    }
    data
}

//! Premultiplied-alpha pixel blending for layer stacking.

use crate::error::{ThumbError, ThumbResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over in premultiplied space, with an extra layer opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Blends a same-size overlay onto `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> ThumbResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ThumbError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Blends `src` (its own size) onto `dst` with its top-left corner at
/// `(x, y)`. Regions outside the destination are clipped; a fully
/// off-canvas source is a no-op.
pub fn blit_over(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    x: i32,
    y: i32,
) -> ThumbResult<()> {
    if dst.len() != (dst_w as usize) * (dst_h as usize) * 4 {
        return Err(ThumbError::render("blit_over destination size mismatch"));
    }
    if src.len() != (src_w as usize) * (src_h as usize) * 4 {
        return Err(ThumbError::render("blit_over source size mismatch"));
    }

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + src_w as i32).min(dst_w as i32);
    let y1 = (y + src_h as i32).min(dst_h as i32);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        for dx in x0..x1 {
            let sx = (dx - x) as usize;
            let di = ((dy as usize) * (dst_w as usize) + (dx as usize)) * 4;
            let si = (sy * (src_w as usize) + sx) * 4;
            let out = over(
                [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]],
                [src[si], src[si + 1], src[si + 2], src[si + 3]],
                1.0,
            );
            dst[di..di + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Straight RGBA to premultiplied, in place.
pub fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in px.iter_mut().take(3) {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

/// Premultiplied RGBA back to straight, in place. Fully transparent
/// pixels keep zeroed channels.
pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in px.iter_mut().take(3) {
            let v = (u32::from(*c) * 255 + a / 2) / a;
            *c = v.min(255) as u8;
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

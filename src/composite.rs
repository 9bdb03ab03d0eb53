use crate::error::{HolofoilError, HolofoilResult};

/// Premultiplied RGBA8 pixel (r, g, b already multiplied by a).
pub type PremulRgba8 = [u8; 4];

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Blend {
    Normal,
    /// Additive blending, used by glow, shine and holographic strips.
    Add,
}

pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> PremulRgba8 {
    [premul(r, a), premul(g, a), premul(b, a), a]
}

fn premul(c: u8, a: u8) -> u8 {
    mul_div255(u16::from(c), u16::from(a))
}

/// Source-over for premultiplied pixels, with an extra opacity factor applied
/// to the source.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f64) -> PremulRgba8 {
    let op = quantize_opacity(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Additive blend: channels saturate toward white, alpha saturates toward
/// opaque. Matches the "add" blend the glow/shine layers ask for.
pub fn add(dst: PremulRgba8, src: PremulRgba8, opacity: f64) -> PremulRgba8 {
    let op = quantize_opacity(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let mut out = [0u8; 4];
    for i in 0..4 {
        let sc = mul_div255(u16::from(src[i]), op);
        out[i] = dst[i].saturating_add(sc);
    }
    out
}

pub fn blend(dst: PremulRgba8, src: PremulRgba8, opacity: f64, mode: Blend) -> PremulRgba8 {
    match mode {
        Blend::Normal => over(dst, src, opacity),
        Blend::Add => add(dst, src, opacity),
    }
}

/// Separable gaussian blur over a premultiplied RGBA8 buffer. The soft shadow
/// edge goes through here.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
) -> HolofoilResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| HolofoilError::render("blur buffer length overflow"))?;
    if src.len() != expected_len {
        return Err(HolofoilError::render(
            "blur src must be a width*height*4 rgba8 buffer",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel(radius);
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];
    blur_pass(src, &mut tmp, width, height, &kernel, PassAxis::Horizontal);
    blur_pass(&tmp, &mut out, width, height, &kernel, PassAxis::Vertical);
    Ok(out)
}

#[derive(Clone, Copy)]
enum PassAxis {
    Horizontal,
    Vertical,
}

fn gaussian_kernel(radius: u32) -> Vec<f64> {
    let sigma = (radius as f64) / 2.0;
    let denom = 2.0 * sigma * sigma;
    let r = radius as i64;
    let mut weights: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

fn blur_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[f64], axis: PassAxis) {
    let radius = (k.len() / 2) as i64;
    let w = width as i64;
    let h = height as i64;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as i64 - radius;
                let (sx, sy) = match axis {
                    PassAxis::Horizontal => ((x + d).clamp(0, w - 1), y),
                    PassAxis::Vertical => (x, (y + d).clamp(0, h - 1)),
                };
                let idx = ((sy * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += kw * f64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

fn quantize_opacity(opacity: f64) -> u16 {
    ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

//! Scanline rasterization of card layers into a premultiplied RGBA8 buffer.
//!
//! Placeholder visuals are sampled analytically (flat silhouettes, radial
//! glow and shine gradients); bitmap sprites are sampled bilinearly. Overlay
//! layers additionally run every pixel through the owning mask's silhouette.

use crate::{
    composite::{self, Blend, PremulRgba8},
    config::CardShape,
    model::{CHAMFER, CORNER_RADIUS, Layer, Mask, Particle, Visual},
};

use crate::core::{Affine, Point, Vec2};

/// Radial glow alpha ramp: bright core, long soft tail.
const GLOW_STOPS: [(f64, f64); 4] = [(0.0, 0.8), (0.4, 0.4), (0.8, 0.1), (1.0, 0.0)];
/// Shine band alpha ramp across its width: transparent, bright plateau,
/// transparent.
const SHINE_STOPS: [(f64, f64); 4] = [(0.0, 0.0), (0.4, 0.6), (0.6, 0.6), (1.0, 0.0)];

pub fn fill(buf: &mut [u8], color: PremulRgba8) {
    for px in buf.chunks_exact_mut(4) {
        px.copy_from_slice(&color);
    }
}

/// Point-in-silhouette test in card design space.
pub fn silhouette_contains(shape: CardShape, half_w: f64, half_h: f64, p: Point) -> bool {
    let (ax, ay) = (p.x.abs(), p.y.abs());
    if ax > half_w || ay > half_h {
        return false;
    }
    match shape {
        CardShape::RoundedRect => {
            let r = CORNER_RADIUS.min(half_w).min(half_h);
            let (cx, cy) = (half_w - r, half_h - r);
            if ax <= cx || ay <= cy {
                return true;
            }
            let (dx, dy) = (ax - cx, ay - cy);
            dx * dx + dy * dy <= r * r
        }
        CardShape::CutCorner => {
            let c = CHAMFER.min(half_w).min(half_h);
            (half_w - ax) + (half_h - ay) >= c
        }
    }
}

/// Draws one layer. `parent` maps design space to canvas space; `mask` (if
/// present) is the overlay mask with its own canvas-space affine.
pub fn draw_layer(
    buf: &mut [u8],
    width: u32,
    height: u32,
    parent: Affine,
    layer: &Layer,
    mask: Option<(&Mask, Affine)>,
) {
    if layer.opacity <= 0.0 {
        return;
    }

    let world = parent * layer.transform.to_affine();
    let Some(inverse) = invert(world) else {
        return;
    };
    let mask_inv = match mask {
        Some((m, mask_world)) => {
            let Some(inv) = invert(mask_world) else {
                return;
            };
            Some((m, inv))
        }
        None => None,
    };

    let (bx0, by0, bx1, by1) = match canvas_bbox(world, local_half_extent(&layer.visual), width, height)
    {
        Some(b) => b,
        None => return,
    };

    for py in by0..by1 {
        for px in bx0..bx1 {
            let canvas_pt = Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);

            if let Some((m, inv)) = &mask_inv {
                let mp = *inv * canvas_pt;
                if !silhouette_contains(m.shape, m.half_w, m.half_h, mp) {
                    continue;
                }
            }

            let local = inverse * canvas_pt;
            let Some(src) = sample_visual(&layer.visual, local) else {
                continue;
            };

            let idx = ((py * width + px) as usize) * 4;
            let dst = [buf[idx], buf[idx + 1], buf[idx + 2], buf[idx + 3]];
            let out = composite::blend(dst, src, layer.opacity, layer.blend);
            buf[idx..idx + 4].copy_from_slice(&out);
        }
    }
}

/// Particles are drawn as soft dots straight in canvas space; the blur that
/// haloed them in the original is folded into the radial falloff.
pub fn draw_particle(
    buf: &mut [u8],
    width: u32,
    height: u32,
    parent: Affine,
    card_scale: f64,
    p: &Particle,
) {
    if p.opacity <= 0.0 {
        return;
    }
    let center = parent * Point::new(p.pos.x, p.pos.y);
    let radius = (p.radius * p.render_scale * card_scale).max(0.5);
    // One extra pixel of soft halo.
    let reach = radius + 1.5;

    let x0 = ((center.x - reach).floor().max(0.0)) as u32;
    let y0 = ((center.y - reach).floor().max(0.0)) as u32;
    let x1 = ((center.x + reach).ceil().min(f64::from(width))) as u32;
    let y1 = ((center.y + reach).ceil().min(f64::from(height))) as u32;

    for py in y0..y1 {
        for px in x0..x1 {
            let dx = f64::from(px) + 0.5 - center.x;
            let dy = f64::from(py) + 0.5 - center.y;
            let d = (dx * dx + dy * dy).sqrt();
            if d >= reach {
                continue;
            }
            let falloff = (1.0 - d / reach).clamp(0.0, 1.0);
            let alpha = (f64::from(p.color[3]) / 255.0) * falloff * falloff;
            let src = composite::from_straight_rgba(
                p.color[0],
                p.color[1],
                p.color[2],
                (alpha * 255.0).round() as u8,
            );
            let idx = ((py * width + px) as usize) * 4;
            let dst = [buf[idx], buf[idx + 1], buf[idx + 2], buf[idx + 3]];
            let out = composite::blend(dst, src, p.opacity, Blend::Add);
            buf[idx..idx + 4].copy_from_slice(&out);
        }
    }
}

fn sample_visual(visual: &Visual, local: Point) -> Option<PremulRgba8> {
    match visual {
        Visual::Silhouette {
            shape,
            half_w,
            half_h,
            color,
        } => silhouette_contains(*shape, *half_w, *half_h, local)
            .then(|| composite::from_straight_rgba(color[0], color[1], color[2], color[3])),
        Visual::RadialGlow { radius, color } => {
            let t = local.to_vec2().hypot() / radius;
            if t > 1.0 {
                return None;
            }
            let alpha = ramp(&GLOW_STOPS, t) * f64::from(color[3]) / 255.0;
            Some(composite::from_straight_rgba(
                color[0],
                color[1],
                color[2],
                (alpha * 255.0).round() as u8,
            ))
        }
        Visual::ShineStrip { half_w, half_h } => {
            if local.x.abs() > *half_w || local.y.abs() > *half_h {
                return None;
            }
            let t = (local.x + half_w) / (2.0 * half_w);
            let alpha = ramp(&SHINE_STOPS, t);
            Some(composite::from_straight_rgba(
                255,
                255,
                255,
                (alpha * 255.0).round() as u8,
            ))
        }
        Visual::HoloStrip {
            half_w,
            half_h,
            color,
        } => {
            if local.x.abs() > *half_w || local.y.abs() > *half_h {
                return None;
            }
            Some(composite::from_straight_rgba(
                color[0], color[1], color[2], color[3],
            ))
        }
        Visual::Sprite { image } => {
            let u = local.x + f64::from(image.width) / 2.0;
            let v = local.y + f64::from(image.height) / 2.0;
            sample_bilinear(image, u, v)
        }
    }
}

fn sample_bilinear(image: &crate::assets::PreparedImage, u: f64, v: f64) -> Option<PremulRgba8> {
    if u < 0.0 || v < 0.0 || u >= f64::from(image.width) || v >= f64::from(image.height) {
        return None;
    }
    let fx = (u - 0.5).max(0.0);
    let fy = (v - 0.5).max(0.0);
    let x0 = fx.floor() as u32;
    let y0 = fy.floor() as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);
    let tx = fx - f64::from(x0);
    let ty = fy - f64::from(y0);

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x1, y0);
    let p01 = image.pixel(x0, y1);
    let p11 = image.pixel(x1, y1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - tx) + f64::from(p10[c]) * tx;
        let bot = f64::from(p01[c]) * (1.0 - tx) + f64::from(p11[c]) * tx;
        out[c] = (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8;
    }
    Some(out)
}

/// Linear interpolation over sorted (position, value) stops.
fn ramp(stops: &[(f64, f64)], t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let mut prev = stops[0];
    for &stop in stops {
        if t <= stop.0 {
            let span = stop.0 - prev.0;
            if span <= 0.0 {
                return stop.1;
            }
            let f = (t - prev.0) / span;
            return prev.1 + (stop.1 - prev.1) * f;
        }
        prev = stop;
    }
    prev.1
}

fn local_half_extent(visual: &Visual) -> Vec2 {
    match visual {
        Visual::Silhouette { half_w, half_h, .. } => Vec2::new(*half_w, *half_h),
        Visual::RadialGlow { radius, .. } => Vec2::new(*radius, *radius),
        Visual::ShineStrip { half_w, half_h } | Visual::HoloStrip { half_w, half_h, .. } => {
            Vec2::new(*half_w, *half_h)
        }
        Visual::Sprite { image } => Vec2::new(
            f64::from(image.width) / 2.0,
            f64::from(image.height) / 2.0,
        ),
    }
}

fn canvas_bbox(
    world: Affine,
    half: Vec2,
    width: u32,
    height: u32,
) -> Option<(u32, u32, u32, u32)> {
    let corners = [
        Point::new(-half.x, -half.y),
        Point::new(half.x, -half.y),
        Point::new(-half.x, half.y),
        Point::new(half.x, half.y),
    ];
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for c in corners {
        let p = world * c;
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    let x0 = min.x.floor().max(0.0) as u32;
    let y0 = min.y.floor().max(0.0) as u32;
    let x1 = (max.x.ceil().min(f64::from(width))).max(0.0) as u32;
    let y1 = (max.y.ceil().min(f64::from(height))).max(0.0) as u32;
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0, y0, x1, y1))
}

fn invert(a: Affine) -> Option<Affine> {
    if a.determinant().abs() < 1e-12 {
        return None;
    }
    Some(a.inverse())
}

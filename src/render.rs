use crate::{
    composite,
    core::Affine,
    error::HolofoilResult,
    model::{Card, Scene},
    raster,
};

/// Stage clear color behind every layout.
const CLEAR_RGBA: [u8; 4] = [74, 74, 74, 255];
/// Gaussian radius for the soft shadow edge, in design px.
const SHADOW_BLUR: f64 = 4.0;

#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Rasterizes the whole scene in paint order: per card, shadow, corner
/// glows, particles, background, base, character, holographic overlay, shine
/// overlay.
#[tracing::instrument(skip(scene))]
pub fn render_frame(scene: &Scene) -> HolofoilResult<FrameRGBA> {
    let canvas = scene.canvas();
    let (width, height) = (canvas.width, canvas.height);
    let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
    raster::fill(
        &mut data,
        composite::from_straight_rgba(CLEAR_RGBA[0], CLEAR_RGBA[1], CLEAR_RGBA[2], CLEAR_RGBA[3]),
    );

    for card in &scene.cards {
        draw_card(&mut data, width, height, card)?;
    }

    Ok(FrameRGBA {
        width,
        height,
        data,
        premultiplied: true,
    })
}

fn draw_card(buf: &mut [u8], width: u32, height: u32, card: &Card) -> HolofoilResult<()> {
    let parent = card.container_affine();

    draw_soft_shadow(buf, width, height, parent, card)?;

    for glow in [card.glow_left.as_ref(), card.glow_right.as_ref()]
        .into_iter()
        .flatten()
    {
        raster::draw_layer(buf, width, height, parent, glow, None);
    }

    for p in &card.particles {
        raster::draw_particle(buf, width, height, parent, card.card_scale, p);
    }

    if let Some(background) = &card.background {
        raster::draw_layer(buf, width, height, parent, background, None);
    }
    raster::draw_layer(buf, width, height, parent, &card.base, None);
    if let Some(character) = &card.character {
        raster::draw_layer(buf, width, height, parent, character, None);
    }

    if let Some(holo) = &card.holo {
        draw_overlay(buf, width, height, parent, holo);
    }
    draw_overlay(buf, width, height, parent, &card.shine);

    Ok(())
}

fn draw_overlay(
    buf: &mut [u8],
    width: u32,
    height: u32,
    parent: Affine,
    group: &crate::model::OverlayGroup,
) {
    let group_affine = parent * Affine::scale(group.container_scale);
    let mask_world = group_affine * group.mask.to_affine();
    for layer in &group.layers {
        raster::draw_layer(
            buf,
            width,
            height,
            group_affine,
            layer,
            Some((&group.mask, mask_world)),
        );
    }
}

/// The shadow silhouette goes through a scratch surface and a gaussian pass
/// before compositing, which is what gives the card its soft drop edge.
fn draw_soft_shadow(
    buf: &mut [u8],
    width: u32,
    height: u32,
    parent: Affine,
    card: &Card,
) -> HolofoilResult<()> {
    let mut scratch = vec![0u8; buf.len()];
    raster::draw_layer(&mut scratch, width, height, parent, &card.shadow, None);

    let radius = (SHADOW_BLUR * card.card_scale).round().max(1.0) as u32;
    let blurred = composite::blur_rgba8_premul(&scratch, width, height, radius)?;

    for (dst, src) in buf.chunks_exact_mut(4).zip(blurred.chunks_exact(4)) {
        let out = composite::over(
            [dst[0], dst[1], dst[2], dst[3]],
            [src[0], src[1], src[2], src[3]],
            1.0,
        );
        dst.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Layout, SceneConfig},
        core::Point,
        scene::build_scene,
    };

    #[test]
    fn frame_matches_layout_canvas() {
        let mut scene = build_scene(&SceneConfig::sample(Layout::Single)).unwrap();
        scene.pointer_move(Point::new(200.0, 300.0), 0.0);
        let frame = render_frame(&scene).unwrap();
        assert_eq!(frame.width, 400);
        assert_eq!(frame.height, 600);
        assert_eq!(frame.data.len(), 400 * 600 * 4);
        assert!(frame.premultiplied);
    }

    #[test]
    fn frame_is_not_just_clear_color() {
        let mut scene = build_scene(&SceneConfig::sample(Layout::Single)).unwrap();
        scene.pointer_move(Point::new(240.0, 260.0), 1.0);
        let frame = render_frame(&scene).unwrap();
        let clear = composite::from_straight_rgba(74, 74, 74, 255);
        let differing = frame
            .data
            .chunks_exact(4)
            .filter(|px| *px != clear.as_slice())
            .count();
        assert!(differing > 10_000);
    }
}

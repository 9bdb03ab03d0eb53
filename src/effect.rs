//! Pointer-reactive effect engine.
//!
//! One call recomputes every layer of a card from a normalized pointer
//! offset, the current time and the interaction state. The computation is
//! closed-form: no iteration, no retained animation state, nothing allocated
//! beyond transient scalars. Non-hovered cards are fed `PointerOffset::ZERO`
//! and therefore relax to their neutral pose on the next event.

use crate::{
    core::{Point, PointerOffset, Vec2},
    model::{Card, Scene},
    oscillate::Oscillator,
};

/// Rotation proxies: full-deflection pointer tilts the card by these amounts,
/// expressed as skew rather than a 3D rotation.
pub const MAX_ROT_Y: f64 = 0.15;
pub const MAX_ROT_X: f64 = 0.2;

/// Per-layer fractions of the rotation proxy.
pub const BASE_SKEW_FRACTION: f64 = 0.3;
pub const CHARACTER_SKEW_FRACTION: f64 = 0.35;
pub const BACKGROUND_SKEW_FRACTION: f64 = 0.2;

/// Character art drifts slightly with the pointer, in design px per unit
/// offset.
pub const CHARACTER_DRIFT: f64 = 1.5;

pub const GLOW_BASE_OPACITY: f64 = 0.6;
pub const GLOW_INTENSITY_GAIN: f64 = 0.3;
pub const GLOW_SCALE_GAIN: f64 = 0.1;

pub const SHADOW_BASE_OPACITY: f64 = 0.4;
pub const SHADOW_INTENSITY_GAIN: f64 = 0.1;

pub const SHINE_OPACITY_GAIN: f64 = 0.4;
/// Vertical travel of the shine band across the card, in design px.
pub const SHINE_TRAVEL: f64 = 120.0;

pub const PARTICLE_SWAY_AMP: f64 = 4.0;
pub const PARTICLE_BOB_AMP: f64 = 3.0;
pub const PARTICLE_TWINKLE_AMP: f64 = 0.2;
pub const PARTICLE_INTENSITY_GAIN: f64 = 0.3;
pub const PARTICLE_POINTER_DRIFT_X: f64 = 3.0;
pub const PARTICLE_POINTER_DRIFT_Y: f64 = 2.0;

pub const HOLO_BASE_OPACITY: f64 = 0.18;
pub const HOLO_SHIMMER_AMP: f64 = 0.12;
pub const HOLO_SHIMMER_FREQ: f64 = 1.7;
pub const HOLO_INTENSITY_GAIN: f64 = 0.35;
pub const HOLO_DRIFT_AMP: f64 = 6.0;
pub const HOLO_DRIFT_FREQ: f64 = 0.6;
pub const HOLO_POINTER_DRIFT: f64 = 12.0;
pub const HOLO_TILT_GAIN_X: f64 = 0.1;
pub const HOLO_TILT_GAIN_Y: f64 = 0.05;
/// Phase stagger between adjacent strips.
pub const HOLO_STRIP_STAGGER: f64 = 1.3;

/// Bonuses applied while a card is the single selected card.
pub const SELECTED_GLOW_BONUS: f64 = 0.15;
pub const SELECTED_SHADOW_BONUS: f64 = 0.1;
pub const SELECTED_PARTICLE_BONUS: f64 = 0.2;
pub const SELECTED_OVERLAY_SCALE: f64 = 1.07;
pub const SELECTED_PARTICLE_SCALE: f64 = 2.0;

#[derive(Clone, Copy, Debug)]
pub struct EffectInput {
    pub offset: PointerOffset,
    pub time_secs: f64,
    pub holo_enabled: bool,
}

/// Recomputes every layer of `card` in place for this frame.
pub fn apply_pointer_effect(card: &mut Card, input: EffectInput) {
    let offset = input.offset.clamped();
    let (x, y) = (offset.x, offset.y);
    let t = input.time_secs;

    let rot_y = x * MAX_ROT_Y;
    let rot_x = -y * MAX_ROT_X;
    let intensity = offset.intensity();
    let pulse = (x + y).abs() * card.pulse_gain;

    let selected = card.selected;
    let overlay_scale = if selected { SELECTED_OVERLAY_SCALE } else { 1.0 };

    // Base card art.
    let base_scale = card.base.rest_scale + pulse;
    card.base.transform.translate = card.base.rest_translate;
    card.base.transform.rotation_rad = card.base.rest_rotation;
    card.base.transform.skew = Vec2::new(rot_y * BASE_SKEW_FRACTION, rot_x * BASE_SKEW_FRACTION);
    card.base.transform.scale = Vec2::new(base_scale, base_scale);
    card.base.opacity = card.base.rest_opacity.clamp(0.0, 1.0);
    let base_skew = card.base.transform.skew;

    // Character art rides a little ahead of the base.
    if let Some(character) = card.character.as_mut() {
        let scale = character.rest_scale + pulse;
        character.transform.translate =
            character.rest_translate + Vec2::new(x * CHARACTER_DRIFT, y * CHARACTER_DRIFT);
        character.transform.rotation_rad = character.rest_rotation;
        character.transform.skew = Vec2::new(
            rot_y * CHARACTER_SKEW_FRACTION,
            rot_x * CHARACTER_SKEW_FRACTION,
        );
        character.transform.scale = Vec2::new(scale, scale);
        character.opacity = character.rest_opacity.clamp(0.0, 1.0);
    }

    // Atmosphere lags behind the base.
    if let Some(background) = card.background.as_mut() {
        background.transform.translate = background.rest_translate;
        background.transform.rotation_rad = background.rest_rotation;
        background.transform.skew = Vec2::new(
            rot_y * BACKGROUND_SKEW_FRACTION,
            rot_x * BACKGROUND_SKEW_FRACTION,
        );
        background.transform.scale = Vec2::new(background.rest_scale, background.rest_scale);
        background.opacity = background.rest_opacity.clamp(0.0, 1.0);
    }

    // Corner glows.
    let glow_opacity = GLOW_BASE_OPACITY
        + intensity * GLOW_INTENSITY_GAIN
        + if selected { SELECTED_GLOW_BONUS } else { 0.0 };
    let glow_scale = 1.0 + intensity * GLOW_SCALE_GAIN;
    for glow in [card.glow_left.as_mut(), card.glow_right.as_mut()]
        .into_iter()
        .flatten()
    {
        let scale = glow.rest_scale * glow_scale;
        glow.transform.translate = glow.rest_translate;
        glow.transform.rotation_rad = glow.rest_rotation;
        glow.transform.skew = Vec2::ZERO;
        glow.transform.scale = Vec2::new(scale, scale);
        glow.opacity = glow_opacity.clamp(0.0, 1.0);
    }

    // Shadow deepens as the card tilts.
    let shadow_opacity = SHADOW_BASE_OPACITY
        + intensity * SHADOW_INTENSITY_GAIN
        + if selected { SELECTED_SHADOW_BONUS } else { 0.0 };
    card.shadow.transform.translate = card.shadow.rest_translate;
    card.shadow.transform.rotation_rad = card.shadow.rest_rotation;
    card.shadow.transform.skew = Vec2::ZERO;
    card.shadow.transform.scale = Vec2::new(card.shadow.rest_scale, card.shadow.rest_scale);
    card.shadow.opacity = shadow_opacity.clamp(0.0, 1.0);

    // Shine overlay: a white band sweeping vertically with the pointer.
    card.shine.container_scale = overlay_scale;
    for band in &mut card.shine.layers {
        band.transform.translate = band.rest_translate + Vec2::new(0.0, y * SHINE_TRAVEL);
        band.transform.rotation_rad = band.rest_rotation;
        band.transform.skew = Vec2::ZERO;
        band.transform.scale = Vec2::new(band.rest_scale, band.rest_scale);
        band.opacity = (intensity * SHINE_OPACITY_GAIN).clamp(0.0, 1.0);
    }
    sync_mask(&mut card.shine.mask, base_scale, base_skew, overlay_scale);

    // Holographic strips: ambient shimmer plus pointer-driven drift/tilt,
    // fully hidden when the scene-wide toggle is off.
    if let Some(holo) = card.holo.as_mut() {
        holo.container_scale = overlay_scale;
        for (i, strip) in holo.layers.iter_mut().enumerate() {
            let phase = i as f64 * HOLO_STRIP_STAGGER;
            let drift =
                Oscillator::sine(HOLO_DRIFT_AMP, HOLO_DRIFT_FREQ, phase, 0.0).sample(t);
            strip.transform.translate =
                strip.rest_translate + Vec2::new(drift + x * HOLO_POINTER_DRIFT, 0.0);
            strip.transform.rotation_rad =
                strip.rest_rotation + x * HOLO_TILT_GAIN_X + y * HOLO_TILT_GAIN_Y;
            strip.transform.skew = Vec2::ZERO;
            strip.transform.scale = Vec2::new(strip.rest_scale, strip.rest_scale);

            strip.opacity = if input.holo_enabled {
                let shimmer =
                    Oscillator::sine(HOLO_SHIMMER_AMP, HOLO_SHIMMER_FREQ, phase, HOLO_BASE_OPACITY)
                        .sample(t);
                (shimmer + intensity * HOLO_INTENSITY_GAIN).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
        sync_mask(&mut holo.mask, base_scale, base_skew, overlay_scale);
    }

    // Particles: idle float plus pointer drift and an intensity boost.
    let particle_bonus = if selected { SELECTED_PARTICLE_BONUS } else { 0.0 };
    for (i, p) in card.particles.iter_mut().enumerate() {
        let sway = Oscillator::sine(PARTICLE_SWAY_AMP, p.float_speed, p.float_phase, 0.0).sample(t);
        let bob =
            Oscillator::cosine(PARTICLE_BOB_AMP, p.float_speed * 0.7, p.float_phase, 0.0).sample(t);
        p.pos = p.origin
            + Vec2::new(
                sway + x * PARTICLE_POINTER_DRIFT_X,
                bob + y * PARTICLE_POINTER_DRIFT_Y,
            );

        let twinkle =
            Oscillator::sine(PARTICLE_TWINKLE_AMP, 2.0, i as f64, p.base_opacity).sample(t);
        p.opacity =
            (twinkle + intensity * PARTICLE_INTENSITY_GAIN + particle_bonus).clamp(0.0, 1.0);
        p.render_scale = if selected { SELECTED_PARTICLE_SCALE } else { 1.0 };
    }
}

/// Keeps an overlay mask glued to the card art: the mask inherits the base
/// layer's scale/skew, divided by the overlay container's own scale.
fn sync_mask(mask: &mut crate::model::Mask, base_scale: f64, base_skew: Vec2, container: f64) {
    let s = base_scale / container;
    mask.scale = Vec2::new(s, s);
    mask.skew = base_skew;
}

/// One frame of scene-wide recompute: the hovered card (if any) gets the
/// normalized pointer offset, every other card gets (0,0).
pub fn apply_scene(scene: &mut Scene, pointer: Point, time_secs: f64) {
    let selected = scene.state.selected;
    let holo_enabled = scene.state.holo_enabled;
    for (i, card) in scene.cards.iter_mut().enumerate() {
        let offset = if card.contains(pointer) {
            card.normalized_offset(pointer)
        } else {
            PointerOffset::ZERO
        };
        card.selected = selected == Some(i);
        apply_pointer_effect(
            card,
            EffectInput {
                offset,
                time_secs,
                holo_enabled,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Layout, scene::build_scene};

    fn single_card() -> Card {
        let cfg = crate::config::SceneConfig::sample(Layout::Single);
        build_scene(&cfg).unwrap().cards.remove(0)
    }

    #[test]
    fn zero_offset_is_neutral_pose() {
        let mut card = single_card();
        // Disturb, then reset.
        apply_pointer_effect(
            &mut card,
            EffectInput {
                offset: PointerOffset::new(0.8, -0.6),
                time_secs: 1.5,
                holo_enabled: true,
            },
        );
        apply_pointer_effect(
            &mut card,
            EffectInput {
                offset: PointerOffset::ZERO,
                time_secs: 1.5,
                holo_enabled: true,
            },
        );
        assert_eq!(card.base.transform.skew, Vec2::ZERO);
        assert_eq!(
            card.base.transform.scale,
            Vec2::new(card.base.rest_scale, card.base.rest_scale)
        );
        let character = card.character.as_ref().unwrap();
        assert_eq!(character.transform.translate, character.rest_translate);
        assert_eq!(character.transform.skew, Vec2::ZERO);
    }

    #[test]
    fn skew_fractions_differ_per_layer() {
        let mut card = single_card();
        apply_pointer_effect(
            &mut card,
            EffectInput {
                offset: PointerOffset::new(1.0, 0.0),
                time_secs: 0.0,
                holo_enabled: false,
            },
        );
        let base = card.base.transform.skew.x;
        let character = card.character.as_ref().unwrap().transform.skew.x;
        assert!((base - MAX_ROT_Y * BASE_SKEW_FRACTION).abs() < 1e-12);
        assert!((character - MAX_ROT_Y * CHARACTER_SKEW_FRACTION).abs() < 1e-12);
    }

    #[test]
    fn holo_gate_wins_over_intensity() {
        let mut card = single_card();
        apply_pointer_effect(
            &mut card,
            EffectInput {
                offset: PointerOffset::new(1.0, 1.0),
                time_secs: 2.2,
                holo_enabled: false,
            },
        );
        for strip in &card.holo.as_ref().unwrap().layers {
            assert_eq!(strip.opacity, 0.0);
        }
    }

    #[test]
    fn out_of_range_offset_is_clamped_before_use() {
        let mut card = single_card();
        apply_pointer_effect(
            &mut card,
            EffectInput {
                offset: PointerOffset::new(5.0, 5.0),
                time_secs: 0.0,
                holo_enabled: false,
            },
        );
        assert!(card.base.transform.skew.x <= MAX_ROT_Y * BASE_SKEW_FRACTION + 1e-12);
    }
}

use crate::{
    composite::Blend,
    config::{CardConfig, CardShape, SceneConfig},
    core::{Point, Vec2},
    effect,
    error::HolofoilResult,
    model::{
        CARD_HALF_H, CARD_HALF_W, Card, Layer, MAX_PARTICLES, Mask, OverlayGroup, Particle, Scene,
        SceneState, Visual,
    },
};

/// Clicks landing within this window of the previous accepted click are
/// dropped; duplicate event delivery, not user intent.
pub const CLICK_DEBOUNCE_MS: u64 = 200;

/// Foil strip palette, top to bottom.
const STRIP_COLORS: [[u8; 4]; 5] = [
    [255, 70, 70, 130],
    [255, 200, 60, 130],
    [80, 220, 120, 130],
    [80, 160, 255, 130],
    [190, 110, 255, 130],
];

/// Builds the full layer tree for a validated scene description. Every card
/// comes up with placeholder vector shapes; bitmap art is swapped in later
/// without disturbing paint order.
#[tracing::instrument(skip(config))]
pub fn build_scene(config: &SceneConfig) -> HolofoilResult<Scene> {
    config.validate()?;

    let layout = config.layout;
    let cards = config
        .cards
        .iter()
        .map(|card_cfg| build_card(config.seed, layout, card_cfg))
        .collect();

    Ok(Scene {
        layout,
        seed: config.seed,
        cards,
        state: SceneState {
            selected: None,
            holo_enabled: config.holo_enabled,
            // Off-canvas until the first event arrives.
            last_pointer: Point::new(-1.0, -1.0),
            last_click_ms: None,
        },
    })
}

fn build_card(seed: u64, layout: crate::config::Layout, cfg: &CardConfig) -> Card {
    let name = format!("{}-r{}c{}", cfg.theme.name, cfg.row, cfg.col);
    let card_seed = stable_hash64(seed, &name);

    let silhouette = |color: [u8; 4]| Visual::Silhouette {
        shape: cfg.shape,
        half_w: CARD_HALF_W,
        half_h: CARD_HALF_H,
        color,
    };

    let mut shadow = Layer::resting(silhouette([0, 0, 0, 102]), Blend::Normal)
        .at(Vec2::new(-20.0, 20.0))
        .faded(0.6);
    shadow.settle();

    let mut glow_left = Layer::resting(
        Visual::RadialGlow {
            radius: 40.0,
            color: cfg.theme.glow,
        },
        Blend::Add,
    )
    .at(Vec2::new(-85.0, -110.0));
    glow_left.settle();

    let mut glow_right = glow_left.clone();
    glow_right.rest_translate = Vec2::new(85.0, -110.0);
    glow_right.settle();

    let particles = build_particles(card_seed, cfg.theme.particle);

    let background = cfg.background.then(|| {
        let mut layer = Layer::resting(silhouette(cfg.theme.background), Blend::Normal)
            .scaled(1.12)
            .faded(0.9);
        layer.settle();
        layer
    });

    let mut base = Layer::resting(silhouette(cfg.theme.base), Blend::Normal);
    base.settle();

    let mut character = Layer::resting(
        Visual::Silhouette {
            shape: CardShape::RoundedRect,
            half_w: 80.0,
            half_h: 60.0,
            color: cfg.theme.character,
        },
        Blend::Normal,
    )
    .at(Vec2::new(0.0, -40.0));
    character.settle();

    let mask = Mask {
        shape: cfg.shape,
        half_w: CARD_HALF_W,
        half_h: CARD_HALF_H,
        scale: Vec2::new(1.0, 1.0),
        skew: Vec2::ZERO,
    };

    let holo = cfg.holo.then(|| OverlayGroup {
        container_scale: 1.0,
        layers: STRIP_COLORS
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let mut strip = Layer::resting(
                    Visual::HoloStrip {
                        half_w: 130.0,
                        half_h: 11.0,
                        color,
                    },
                    Blend::Add,
                )
                .at(Vec2::new(0.0, -90.0 + i as f64 * 45.0))
                .rotated(-0.35 + i as f64 * 0.15)
                .faded(0.0);
                strip.settle();
                strip
            })
            .collect(),
        mask: mask.clone(),
    });

    let mut shine_band = Layer::resting(
        Visual::ShineStrip {
            half_w: 120.0,
            half_h: 8.0,
        },
        Blend::Add,
    )
    .rotated(-0.3)
    .faded(0.0);
    shine_band.settle();

    let shine = OverlayGroup {
        container_scale: 1.0,
        layers: vec![shine_band],
        mask,
    };

    Card {
        name,
        center: layout.slot_center(cfg.row, cfg.col),
        shape: cfg.shape,
        card_scale: layout.card_scale(),
        pulse_gain: layout.pulse_gain(),
        selected: false,
        shadow,
        glow_left: Some(glow_left),
        glow_right: Some(glow_right),
        particles,
        background,
        base,
        character: Some(character),
        holo,
        shine,
    }
}

/// Up to 30 particles, half clustered near each top corner, jittered from a
/// seeded stream so a scene is reproducible run to run.
fn build_particles(card_seed: u64, color: [u8; 4]) -> Vec<Particle> {
    (0..MAX_PARTICLES)
        .map(|i| {
            let salt = |k: usize| (i * 8 + k) as u64;
            let anchor_x = if i < MAX_PARTICLES / 2 { -100.0 } else { 100.0 };
            let origin = Vec2::new(
                anchor_x + (unit(card_seed, salt(0)) - 0.5) * 50.0,
                -120.0 + (unit(card_seed, salt(1)) - 0.5) * 50.0,
            );
            let base_opacity = 0.5 + unit(card_seed, salt(2)) * 0.5;
            Particle {
                origin,
                radius: 1.0 + unit(card_seed, salt(3)) * 2.0,
                color,
                float_speed: 0.2 + unit(card_seed, salt(4)) * 0.5,
                float_phase: unit(card_seed, salt(5)) * std::f64::consts::TAU,
                base_opacity,
                pos: origin,
                opacity: base_opacity,
                render_scale: 1.0,
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Click fell inside the debounce window and was dropped.
    Ignored,
    /// Click landed outside every card.
    Missed,
    Selected(usize),
    Deselected(usize),
}

impl Scene {
    /// Index of the card under the pointer, if any. Each card is tested
    /// against its own bounds.
    pub fn hit_test(&self, p: Point) -> Option<usize> {
        self.cards.iter().position(|c| c.contains(p))
    }

    /// Pointer-move event: remembers the position and recomputes every
    /// card's visuals for this frame.
    pub fn pointer_move(&mut self, p: Point, time_secs: f64) {
        self.state.last_pointer = p;
        effect::apply_scene(self, p, time_secs);
    }

    /// Click event. Selecting a card implicitly deselects any other; clicking
    /// the selected card clears the selection.
    pub fn click(&mut self, p: Point, now_ms: u64, time_secs: f64) -> ClickOutcome {
        if let Some(last) = self.state.last_click_ms
            && now_ms.saturating_sub(last) < CLICK_DEBOUNCE_MS
        {
            return ClickOutcome::Ignored;
        }

        let Some(hit) = self.hit_test(p) else {
            return ClickOutcome::Missed;
        };
        self.state.last_click_ms = Some(now_ms);

        let outcome = if self.state.selected == Some(hit) {
            self.state.selected = None;
            ClickOutcome::Deselected(hit)
        } else {
            self.state.selected = Some(hit);
            ClickOutcome::Selected(hit)
        };

        let pointer = self.state.last_pointer;
        effect::apply_scene(self, pointer, time_secs);
        outcome
    }

    /// Scene-wide holographic toggle; forces one immediate recompute at the
    /// remembered pointer position.
    pub fn set_holo_enabled(&mut self, on: bool, time_secs: f64) {
        self.state.holo_enabled = on;
        let pointer = self.state.last_pointer;
        effect::apply_scene(self, pointer, time_secs);
    }

    pub fn holo_enabled(&self) -> bool {
        self.state.holo_enabled
    }

    pub fn holo_label(&self) -> &'static str {
        if self.state.holo_enabled {
            "Holo: On"
        } else {
            "Holo: Off"
        }
    }
}

fn stable_hash64(seed: u64, s: &str) -> u64 {
    // FNV-1a 64, seeded.
    let mut h = 0xcbf2_9ce4_8422_2325u64 ^ seed;
    for &b in s.as_bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0000_0100_0000_01B3);
    }
    h
}

fn mix64(mut z: u64) -> u64 {
    // SplitMix64 mixing function.
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic value in [0, 1) for (seed, salt).
fn unit(seed: u64, salt: u64) -> f64 {
    let bits = mix64(seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    (bits >> 11) as f64 / (1u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;

    #[test]
    fn build_is_deterministic_for_fixed_seed() {
        let cfg = SceneConfig::sample(Layout::Single);
        let a = build_scene(&cfg).unwrap();
        let b = build_scene(&cfg).unwrap();
        for (pa, pb) in a.cards[0].particles.iter().zip(&b.cards[0].particles) {
            assert_eq!(pa.origin, pb.origin);
            assert_eq!(pa.float_speed, pb.float_speed);
        }
    }

    #[test]
    fn particle_batch_respects_cap_and_clusters() {
        let cfg = SceneConfig::sample(Layout::Single);
        let scene = build_scene(&cfg).unwrap();
        let particles = &scene.cards[0].particles;
        assert!(particles.len() <= MAX_PARTICLES);
        assert!(particles[..MAX_PARTICLES / 2].iter().all(|p| p.origin.x < 0.0));
        assert!(particles[MAX_PARTICLES / 2..].iter().all(|p| p.origin.x > 0.0));
        for p in particles {
            assert!(p.base_opacity >= 0.5 && p.base_opacity <= 1.0);
            assert!(p.float_speed >= 0.2 && p.float_speed <= 0.7);
        }
    }

    #[test]
    fn grid_scene_places_four_cards_in_distinct_cells() {
        let cfg = SceneConfig::sample(Layout::Grid2x2);
        let scene = build_scene(&cfg).unwrap();
        assert_eq!(scene.cards.len(), 4);
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(scene.cards[i].center, scene.cards[j].center);
            }
        }
    }

    #[test]
    fn hit_test_uses_each_cards_own_bounds() {
        let cfg = SceneConfig::sample(Layout::Grid2x2);
        let scene = build_scene(&cfg).unwrap();
        for (i, card) in scene.cards.iter().enumerate() {
            assert_eq!(scene.hit_test(card.center), Some(i));
        }
        assert_eq!(scene.hit_test(Point::new(300.0, 450.0)), None);
    }

    #[test]
    fn click_toggle_and_switch() {
        let cfg = SceneConfig::sample(Layout::Grid2x2);
        let mut scene = build_scene(&cfg).unwrap();
        let c0 = scene.cards[0].center;
        let c1 = scene.cards[1].center;

        assert_eq!(scene.click(c0, 0, 0.0), ClickOutcome::Selected(0));
        assert_eq!(scene.state.selected, Some(0));

        // Within the debounce window: dropped.
        assert_eq!(scene.click(c0, 150, 0.0), ClickOutcome::Ignored);
        assert_eq!(scene.state.selected, Some(0));

        // Switching implicitly deselects.
        assert_eq!(scene.click(c1, 400, 0.0), ClickOutcome::Selected(1));
        assert_eq!(scene.state.selected, Some(1));

        // Clicking the selected card clears.
        assert_eq!(scene.click(c1, 800, 0.0), ClickOutcome::Deselected(1));
        assert_eq!(scene.state.selected, None);
    }

    #[test]
    fn click_outside_every_card_is_a_miss() {
        let cfg = SceneConfig::sample(Layout::Single);
        let mut scene = build_scene(&cfg).unwrap();
        assert_eq!(scene.click(Point::new(5.0, 5.0), 0, 0.0), ClickOutcome::Missed);
        assert_eq!(scene.state.selected, None);
    }

    #[test]
    fn holo_label_tracks_flag() {
        let cfg = SceneConfig::sample(Layout::Single);
        let mut scene = build_scene(&cfg).unwrap();
        assert_eq!(scene.holo_label(), "Holo: Off");
        scene.set_holo_enabled(true, 0.0);
        assert_eq!(scene.holo_label(), "Holo: On");
    }
}

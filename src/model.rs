use crate::{
    assets::{CardArt, PreparedImage},
    composite::Blend,
    config::{CardShape, Layout, Rgba},
    core::{Affine, LayerTransform, Point, PointerOffset, Rect, Vec2},
};

/// Card design space half-extents. Every layer position is authored in this
/// 200x280 space; the layout scale maps it onto the canvas.
pub const CARD_HALF_W: f64 = 100.0;
pub const CARD_HALF_H: f64 = 140.0;
/// Corner radius of the rounded-rectangle silhouette.
pub const CORNER_RADIUS: f64 = 10.0;
/// Corner cut of the cut-corner silhouette.
pub const CHAMFER: f64 = 18.0;
/// Particles per card, upper bound.
pub const MAX_PARTICLES: usize = 30;

/// What a layer draws. Placeholder variants are vector shapes; `Sprite` is
/// swapped in once bitmap art decodes.
#[derive(Clone, Debug)]
pub enum Visual {
    Silhouette {
        shape: CardShape,
        half_w: f64,
        half_h: f64,
        color: Rgba,
    },
    /// Radial gradient sprite, brightest at the center.
    RadialGlow { radius: f64, color: Rgba },
    /// Horizontal white gradient band, transparent at both ends.
    ShineStrip { half_w: f64, half_h: f64 },
    /// Flat translucent band of one foil color.
    HoloStrip {
        half_w: f64,
        half_h: f64,
        color: Rgba,
    },
    Sprite { image: PreparedImage },
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub visual: Visual,
    pub blend: Blend,
    /// Neutral pose: where the layer sits when the pointer input is (0,0).
    pub rest_translate: Vec2,
    pub rest_scale: f64,
    pub rest_rotation: f64,
    pub rest_opacity: f64,
    /// Current pose, recomputed in full on every pointer event.
    pub transform: LayerTransform,
    pub opacity: f64,
}

impl Layer {
    pub fn resting(visual: Visual, blend: Blend) -> Self {
        Self {
            visual,
            blend,
            rest_translate: Vec2::ZERO,
            rest_scale: 1.0,
            rest_rotation: 0.0,
            rest_opacity: 1.0,
            transform: LayerTransform::default(),
            opacity: 1.0,
        }
    }

    pub fn at(mut self, translate: Vec2) -> Self {
        self.rest_translate = translate;
        self
    }

    pub fn scaled(mut self, scale: f64) -> Self {
        self.rest_scale = scale;
        self
    }

    pub fn rotated(mut self, rotation_rad: f64) -> Self {
        self.rest_rotation = rotation_rad;
        self
    }

    pub fn faded(mut self, opacity: f64) -> Self {
        self.rest_opacity = opacity;
        self
    }

    /// Snaps the current pose back to the rest pose.
    pub fn settle(&mut self) {
        self.transform = LayerTransform {
            translate: self.rest_translate,
            rotation_rad: self.rest_rotation,
            scale: Vec2::new(self.rest_scale, self.rest_scale),
            skew: Vec2::ZERO,
        };
        self.opacity = self.rest_opacity;
    }
}

/// Silhouette clip for an overlay sub-scene. Scale/skew must track the base
/// layer divided by the owning overlay's container scale, or the clipped
/// region drifts off the card art.
#[derive(Clone, Debug)]
pub struct Mask {
    pub shape: CardShape,
    pub half_w: f64,
    pub half_h: f64,
    pub scale: Vec2,
    pub skew: Vec2,
}

impl Mask {
    pub fn to_affine(&self) -> Affine {
        Affine::skew(self.skew.x, self.skew.y)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

/// A masked sub-scene: the shine band, or the holographic strip set.
#[derive(Clone, Debug)]
pub struct OverlayGroup {
    pub container_scale: f64,
    pub layers: Vec<Layer>,
    pub mask: Mask,
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub origin: Vec2,
    pub radius: f64,
    pub color: Rgba,
    pub float_speed: f64,
    pub float_phase: f64,
    pub base_opacity: f64,
    /// Animated state.
    pub pos: Vec2,
    pub opacity: f64,
    pub render_scale: f64,
}

#[derive(Clone, Debug)]
pub struct Card {
    pub name: String,
    pub center: Point,
    pub shape: CardShape,
    /// Uniform scale from design space to canvas space.
    pub card_scale: f64,
    /// Gain of the "lift toward viewer" scale pulse.
    pub pulse_gain: f64,
    pub selected: bool,

    // Layers, in paint order.
    pub shadow: Layer,
    pub glow_left: Option<Layer>,
    pub glow_right: Option<Layer>,
    pub particles: Vec<Particle>,
    pub background: Option<Layer>,
    pub base: Layer,
    pub character: Option<Layer>,
    pub holo: Option<OverlayGroup>,
    pub shine: OverlayGroup,
}

impl Card {
    /// Static hit-test bounds in canvas space. Effects wobble the visuals but
    /// never the bounds, so hover state cannot flicker at the edges.
    pub fn bounds(&self) -> Rect {
        let hw = CARD_HALF_W * self.card_scale;
        let hh = CARD_HALF_H * self.card_scale;
        Rect::new(
            self.center.x - hw,
            self.center.y - hh,
            self.center.x + hw,
            self.center.y + hh,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    /// Canvas-space pointer position normalized to this card's bounds.
    pub fn normalized_offset(&self, p: Point) -> PointerOffset {
        let hw = CARD_HALF_W * self.card_scale;
        let hh = CARD_HALF_H * self.card_scale;
        PointerOffset::new((p.x - self.center.x) / hw, (p.y - self.center.y) / hh).clamped()
    }

    /// Design space to canvas space.
    pub fn container_affine(&self) -> Affine {
        Affine::translate(self.center.to_vec2()) * Affine::scale(self.card_scale)
    }

    /// Swaps placeholder visuals for decoded bitmaps, keeping paint order and
    /// re-binding the overlay masks to the new base silhouette. Layers whose
    /// art is absent keep their placeholders.
    pub fn attach_art(&mut self, art: &CardArt) {
        let base_scale = (2.0 * CARD_HALF_W) / f64::from(art.base.width.max(1));
        self.base.visual = Visual::Sprite {
            image: art.base.clone(),
        };
        self.base.rest_scale = base_scale;

        if let (Some(layer), Some(img)) = (self.character.as_mut(), art.character.as_ref()) {
            let scale = (2.0 * CARD_HALF_W * 0.8) / f64::from(img.width.max(1));
            layer.visual = Visual::Sprite { image: img.clone() };
            layer.rest_scale = scale;
        }
        if let (Some(layer), Some(img)) = (self.background.as_mut(), art.background.as_ref()) {
            let scale = (2.0 * CARD_HALF_W) / f64::from(img.width.max(1));
            layer.visual = Visual::Sprite { image: img.clone() };
            layer.rest_scale = scale;
        }

        // Clearing and re-adding children detaches masks in retained scene
        // graphs; mirror that by re-binding each overlay mask to the base
        // silhouette that now clips it.
        let half_h = f64::from(art.base.height.max(1)) * base_scale / 2.0;
        for group in self.overlays_mut() {
            group.mask.half_w = CARD_HALF_W;
            group.mask.half_h = half_h;
        }
    }

    pub fn overlays_mut(&mut self) -> impl Iterator<Item = &mut OverlayGroup> {
        self.holo.as_mut().into_iter().chain(std::iter::once(&mut self.shine))
    }
}

/// Explicit interaction state. Everything the effect computation needs beyond
/// the card itself lives here, so the per-frame math stays pure.
#[derive(Clone, Copy, Debug)]
pub struct SceneState {
    pub selected: Option<usize>,
    pub holo_enabled: bool,
    pub last_pointer: Point,
    pub last_click_ms: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub layout: Layout,
    pub seed: u64,
    pub cards: Vec<Card>,
    pub state: SceneState,
}

impl Scene {
    pub fn canvas(&self) -> crate::core::Canvas {
        self.layout.canvas()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::Blend;

    fn bare_card() -> Card {
        let silhouette = Visual::Silhouette {
            shape: CardShape::RoundedRect,
            half_w: CARD_HALF_W,
            half_h: CARD_HALF_H,
            color: [90, 90, 90, 255],
        };
        let mask = Mask {
            shape: CardShape::RoundedRect,
            half_w: CARD_HALF_W,
            half_h: CARD_HALF_H,
            scale: Vec2::new(1.0, 1.0),
            skew: Vec2::ZERO,
        };
        Card {
            name: "c0".to_string(),
            center: Point::new(200.0, 300.0),
            shape: CardShape::RoundedRect,
            card_scale: 1.0,
            pulse_gain: 0.02,
            selected: false,
            shadow: Layer::resting(silhouette.clone(), Blend::Normal),
            glow_left: None,
            glow_right: None,
            particles: Vec::new(),
            background: None,
            base: Layer::resting(silhouette, Blend::Normal),
            character: None,
            holo: None,
            shine: OverlayGroup {
                container_scale: 1.0,
                layers: vec![Layer::resting(
                    Visual::ShineStrip {
                        half_w: 120.0,
                        half_h: 8.0,
                    },
                    Blend::Add,
                )],
                mask,
            },
        }
    }

    #[test]
    fn bounds_center_and_extent() {
        let card = bare_card();
        let b = card.bounds();
        assert_eq!(b.width(), 200.0);
        assert_eq!(b.height(), 280.0);
        assert!(card.contains(Point::new(200.0, 300.0)));
        assert!(!card.contains(Point::new(301.0, 300.0)));
    }

    #[test]
    fn normalized_offset_is_clamped_to_unit_box() {
        let card = bare_card();
        let at_center = card.normalized_offset(Point::new(200.0, 300.0));
        assert_eq!(at_center, PointerOffset::ZERO);

        let corner = card.normalized_offset(Point::new(300.0, 160.0));
        assert_eq!(corner.x, 1.0);
        assert_eq!(corner.y, -1.0);

        let outside = card.normalized_offset(Point::new(900.0, 900.0));
        assert_eq!(outside.x, 1.0);
        assert_eq!(outside.y, 1.0);
    }

    #[test]
    fn settle_restores_rest_pose() {
        let mut card = bare_card();
        card.base.transform.skew = Vec2::new(0.2, 0.1);
        card.base.opacity = 0.3;
        card.base.settle();
        assert_eq!(card.base.transform.skew, Vec2::ZERO);
        assert_eq!(card.base.opacity, 1.0);
        assert_eq!(card.base.transform.scale, Vec2::new(1.0, 1.0));
    }
}

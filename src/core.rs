use crate::error::{HolofoilError, HolofoilResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> HolofoilResult<Self> {
        if width == 0 || height == 0 {
            return Err(HolofoilError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }
}

/// Pointer position normalized to a card's bounding box, each axis in [-1, 1].
/// (0, 0) is the card center; non-hovered cards always receive `ZERO`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerOffset {
    pub x: f64,
    pub y: f64,
}

impl PointerOffset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(-1.0, 1.0),
            y: self.y.clamp(-1.0, 1.0),
        }
    }

    /// Radial magnitude of the offset; drives most opacity/scale reactions.
    pub fn intensity(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Per-layer 2D transform. 3D tilt is approximated by skew, so skew sits
/// alongside the usual translate/rotate/scale.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerTransform {
    pub translate: Vec2,
    pub rotation_rad: f64,
    pub scale: Vec2,
    pub skew: Vec2,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotation_rad: 0.0,
            scale: Vec2::new(1.0, 1.0),
            skew: Vec2::ZERO,
        }
    }
}

impl LayerTransform {
    pub fn to_affine(self) -> Affine {
        let t_translate = Affine::translate(self.translate);
        let t_rotate = Affine::rotate(self.rotation_rad);
        let t_skew = Affine::skew(self.skew.x, self.skew.y);
        let t_scale = Affine::scale_non_uniform(self.scale.x, self.scale.y);

        // Canonical order: T(translate) * R(rot) * K(skew) * S(scale)
        t_translate * t_rotate * t_skew * t_scale
    }
}

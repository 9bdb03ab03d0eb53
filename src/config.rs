use crate::{
    core::{Canvas, Point},
    error::{HolofoilError, HolofoilResult},
};

/// Canvas layout presets. The two sizes are fixed: hosts embed either one
/// card or a 2x2 grid, nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Single,
    Grid2x2,
}

impl Layout {
    pub fn canvas(self) -> Canvas {
        match self {
            Self::Single => Canvas {
                width: 400,
                height: 600,
            },
            Self::Grid2x2 => Canvas {
                width: 600,
                height: 900,
            },
        }
    }

    pub fn slots(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Grid2x2 => 4,
        }
    }

    pub fn rows(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Grid2x2 => 2,
        }
    }

    pub fn cols(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Grid2x2 => 2,
        }
    }

    /// Uniform scale applied to a card's 200x280 design space.
    pub fn card_scale(self) -> f64 {
        match self {
            Self::Single => 1.0,
            Self::Grid2x2 => 0.5,
        }
    }

    /// Scale-pulse gain: full-size art breathes twice as hard as the
    /// quarter-scale grid cards.
    pub fn pulse_gain(self) -> f64 {
        match self {
            Self::Single => 0.02,
            Self::Grid2x2 => 0.01,
        }
    }

    pub fn slot_center(self, row: u8, col: u8) -> Point {
        match self {
            Self::Single => Point::new(200.0, 300.0),
            Self::Grid2x2 => Point::new(
                150.0 + f64::from(col) * 300.0,
                225.0 + f64::from(row) * 450.0,
            ),
        }
    }
}

/// Card silhouette variant. The silhouette doubles as the overlay mask shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardShape {
    RoundedRect,
    CutCorner,
}

/// Straight (non-premultiplied) RGBA color, as written in scene JSON.
pub type Rgba = [u8; 4];

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Theme {
    pub name: String,
    pub base: Rgba,
    pub character: Rgba,
    pub background: Rgba,
    pub glow: Rgba,
    pub particle: Rgba,
}

impl Theme {
    pub fn ember() -> Self {
        Self {
            name: "ember".to_string(),
            base: [90, 90, 90, 255],
            character: [123, 107, 165, 255],
            background: [46, 26, 38, 255],
            glow: [255, 107, 107, 255],
            particle: [255, 107, 107, 230],
        }
    }

    pub fn tide() -> Self {
        Self {
            name: "tide".to_string(),
            base: [74, 86, 102, 255],
            character: [94, 140, 186, 255],
            background: [20, 32, 48, 255],
            glow: [92, 200, 255, 255],
            particle: [92, 200, 255, 230],
        }
    }

    pub fn moss() -> Self {
        Self {
            name: "moss".to_string(),
            base: [78, 94, 74, 255],
            character: [128, 164, 110, 255],
            background: [24, 38, 24, 255],
            glow: [140, 235, 130, 255],
            particle: [140, 235, 130, 230],
        }
    }

    pub fn iris() -> Self {
        Self {
            name: "iris".to_string(),
            base: [88, 78, 104, 255],
            character: [158, 128, 196, 255],
            background: [34, 24, 48, 255],
            glow: [196, 140, 255, 255],
            particle: [196, 140, 255, 230],
        }
    }
}

/// File paths for a card's bitmap art, resolved against an assets root at
/// load time. Absent entries keep their placeholder layers.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ArtPaths {
    pub base: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

/// One card, fully parameterized. The four near-identical construction
/// variants of the original effect collapse into this single description.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CardConfig {
    pub row: u8,
    pub col: u8,
    pub shape: CardShape,
    pub theme: Theme,
    /// Adds an atmosphere layer behind the base art.
    #[serde(default)]
    pub background: bool,
    /// Gives the card a holographic strip overlay (visibility is still gated
    /// by the scene-wide toggle).
    #[serde(default)]
    pub holo: bool,
    #[serde(default)]
    pub art: Option<ArtPaths>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SceneConfig {
    pub layout: Layout,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub holo_enabled: bool,
    pub cards: Vec<CardConfig>,
}

impl SceneConfig {
    pub fn validate(&self) -> HolofoilResult<()> {
        let slots = self.layout.slots();
        if self.cards.len() != slots {
            return Err(HolofoilError::validation(format!(
                "layout expects exactly {slots} card(s), got {}",
                self.cards.len()
            )));
        }

        let mut seen = Vec::with_capacity(slots);
        for (i, card) in self.cards.iter().enumerate() {
            if card.row >= self.layout.rows() || card.col >= self.layout.cols() {
                return Err(HolofoilError::validation(format!(
                    "card {i} cell ({}, {}) is outside the layout grid",
                    card.row, card.col
                )));
            }
            let cell = (card.row, card.col);
            if seen.contains(&cell) {
                return Err(HolofoilError::validation(format!(
                    "card {i} duplicates grid cell ({}, {})",
                    card.row, card.col
                )));
            }
            seen.push(cell);

            if card.theme.name.trim().is_empty() {
                return Err(HolofoilError::validation(format!(
                    "card {i} theme name must be non-empty"
                )));
            }
            if let Some(art) = &card.art
                && art.base.trim().is_empty()
            {
                return Err(HolofoilError::validation(format!(
                    "card {i} art base path must be non-empty"
                )));
            }
        }
        Ok(())
    }

    /// Built-in demo scene for the given layout; what the CLI and smoke
    /// tests run against.
    pub fn sample(layout: Layout) -> Self {
        let cards = match layout {
            Layout::Single => vec![CardConfig {
                row: 0,
                col: 0,
                shape: CardShape::RoundedRect,
                theme: Theme::ember(),
                background: false,
                holo: true,
                art: None,
            }],
            Layout::Grid2x2 => {
                let themes = [Theme::ember(), Theme::tide(), Theme::moss(), Theme::iris()];
                themes
                    .into_iter()
                    .enumerate()
                    .map(|(i, theme)| CardConfig {
                        row: (i / 2) as u8,
                        col: (i % 2) as u8,
                        shape: if i % 2 == 0 {
                            CardShape::RoundedRect
                        } else {
                            CardShape::CutCorner
                        },
                        theme,
                        background: i >= 2,
                        holo: true,
                        art: None,
                    })
                    .collect()
            }
        };

        Self {
            layout,
            seed: 7,
            holo_enabled: false,
            cards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_configs_validate() {
        SceneConfig::sample(Layout::Single).validate().unwrap();
        SceneConfig::sample(Layout::Grid2x2).validate().unwrap();
    }

    #[test]
    fn validate_rejects_wrong_card_count() {
        let mut cfg = SceneConfig::sample(Layout::Grid2x2);
        cfg.cards.pop();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_cell() {
        let mut cfg = SceneConfig::sample(Layout::Grid2x2);
        cfg.cards[1].row = cfg.cards[0].row;
        cfg.cards[1].col = cfg.cards[0].col;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_grid_cell() {
        let mut cfg = SceneConfig::sample(Layout::Single);
        cfg.cards[0].col = 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn json_roundtrip() {
        let cfg = SceneConfig::sample(Layout::Grid2x2);
        let s = serde_json::to_string_pretty(&cfg).unwrap();
        let de: SceneConfig = serde_json::from_str(&s).unwrap();
        de.validate().unwrap();
        assert_eq!(de.cards.len(), 4);
        assert_eq!(de.layout, Layout::Grid2x2);
    }

    #[test]
    fn grid_slot_centers_are_distinct() {
        let l = Layout::Grid2x2;
        let mut pts = Vec::new();
        for r in 0..2 {
            for c in 0..2 {
                pts.push(l.slot_center(r, c));
            }
        }
        for i in 0..pts.len() {
            for j in (i + 1)..pts.len() {
                assert_ne!(pts[i], pts[j]);
            }
        }
    }
}

use std::path::Path;

use crate::{
    assets,
    config::{ArtPaths, SceneConfig},
    core::Point,
    error::{HolofoilError, HolofoilResult},
    model::Scene,
    render::{FrameRGBA, render_frame},
    scene::{ClickOutcome, build_scene},
};

/// Owns one mounted scene: the host creates a session once, feeds it pointer
/// and click events, and renders frames from it until unmount.
///
/// Everything runs on the caller's thread. The only deferred work is bitmap
/// replacement, which is fire-and-forget relative to the already-visible
/// placeholder scene: it runs at most once and becomes a no-op after
/// unmount, so a load finishing late cannot touch a torn-down scene.
pub struct ViewSession {
    scene: Scene,
    art: Vec<Option<ArtPaths>>,
    mounted: bool,
    art_loaded: bool,
}

impl ViewSession {
    /// Builds the placeholder scene synchronously. On failure nothing is
    /// mounted and the caller may retry with a fixed config.
    #[tracing::instrument(skip(config))]
    pub fn mount(config: &SceneConfig) -> HolofoilResult<Self> {
        let scene = match build_scene(config) {
            Ok(scene) => scene,
            Err(err) => {
                tracing::error!(error = %err, "mount failed, nothing to tear down");
                return Err(err);
            }
        };
        Ok(Self {
            scene,
            art: config.cards.iter().map(|c| c.art.clone()).collect(),
            mounted: true,
            art_loaded: false,
        })
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Swaps placeholder layers for decoded bitmaps, card by card. A card
    /// whose art fails to decode logs a notice and keeps its placeholders;
    /// there is no retry. Calling again, or after unmount, does nothing.
    #[tracing::instrument(skip(self, root))]
    pub fn load_art(&mut self, root: &Path) {
        if !self.mounted || self.art_loaded {
            return;
        }
        self.art_loaded = true;

        for (i, paths) in self.art.iter().enumerate() {
            let Some(paths) = paths else {
                continue;
            };
            match assets::load_card_art(root, paths) {
                Ok(card_art) => self.scene.cards[i].attach_art(&card_art),
                Err(err) => tracing::warn!(
                    card = %self.scene.cards[i].name,
                    error = %err,
                    "art load failed, keeping placeholder layers"
                ),
            }
        }
    }

    pub fn pointer_move(&mut self, p: Point, time_secs: f64) {
        if self.mounted {
            self.scene.pointer_move(p, time_secs);
        }
    }

    pub fn click(&mut self, p: Point, now_ms: u64, time_secs: f64) -> ClickOutcome {
        if !self.mounted {
            return ClickOutcome::Ignored;
        }
        self.scene.click(p, now_ms, time_secs)
    }

    pub fn set_holo_enabled(&mut self, on: bool, time_secs: f64) {
        if self.mounted {
            self.scene.set_holo_enabled(on, time_secs);
        }
    }

    pub fn holo_enabled(&self) -> bool {
        self.scene.holo_enabled()
    }

    pub fn holo_label(&self) -> &'static str {
        self.scene.holo_label()
    }

    pub fn render_frame(&self) -> HolofoilResult<FrameRGBA> {
        if !self.mounted {
            return Err(HolofoilError::scene("session is unmounted"));
        }
        render_frame(&self.scene)
    }

    /// Tears the session down. Subsequent events are dropped and rendering
    /// returns an error; a late `load_art` call is a no-op.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Layout, SceneConfig};

    #[test]
    fn mount_failure_leaves_nothing_mounted() {
        let mut cfg = SceneConfig::sample(Layout::Grid2x2);
        cfg.cards.pop();
        assert!(ViewSession::mount(&cfg).is_err());

        // A corrected config mounts fine afterwards.
        let cfg = SceneConfig::sample(Layout::Grid2x2);
        let session = ViewSession::mount(&cfg).unwrap();
        assert!(session.is_mounted());
    }

    #[test]
    fn unmount_drops_events_and_rendering() {
        let cfg = SceneConfig::sample(Layout::Single);
        let mut session = ViewSession::mount(&cfg).unwrap();
        session.unmount();

        assert!(!session.is_mounted());
        assert!(session.render_frame().is_err());
        assert_eq!(
            session.click(Point::new(200.0, 300.0), 0, 0.0),
            ClickOutcome::Ignored
        );
    }

    #[test]
    fn late_art_load_after_unmount_is_noop() {
        let mut cfg = SceneConfig::sample(Layout::Single);
        cfg.cards[0].art = Some(ArtPaths {
            base: "card_base.png".to_string(),
            character: None,
            background: None,
        });
        let mut session = ViewSession::mount(&cfg).unwrap();
        session.unmount();
        session.load_art(Path::new("target/nowhere"));
        assert!(!session.art_loaded);
    }
}

#![forbid(unsafe_code)]

//! Pointer-reactive trading-card renderer.
//!
//! A [`ViewSession`] mounts a layered card scene (1 card or a 2x2 grid),
//! reacts to pointer-move and click events with closed-form tilt/glow/shine
//! math, and rasterizes premultiplied RGBA frames on the CPU.

pub mod assets;
pub mod composite;
pub mod config;
pub mod core;
pub mod effect;
pub mod error;
pub mod model;
pub mod oscillate;
pub mod raster;
pub mod render;
pub mod scene;
pub mod session;

pub use crate::config::{ArtPaths, CardConfig, CardShape, Layout, SceneConfig, Theme};
pub use crate::core::{Canvas, LayerTransform, Point, PointerOffset, Vec2};
pub use crate::error::{HolofoilError, HolofoilResult};
pub use crate::model::{Card, Scene, SceneState};
pub use crate::render::{FrameRGBA, render_frame};
pub use crate::scene::{CLICK_DEBOUNCE_MS, ClickOutcome, build_scene};
pub use crate::session::ViewSession;

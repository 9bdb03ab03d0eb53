use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    composite,
    config::ArtPaths,
    error::{HolofoilError, HolofoilResult},
};

/// Decoded bitmap, ready for compositing.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) as usize) * 4;
        let px = &self.rgba8_premul[idx..idx + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Bitmap art for one card. Absent entries keep their placeholder layers.
#[derive(Clone, Debug)]
pub struct CardArt {
    pub base: PreparedImage,
    pub character: Option<PreparedImage>,
    pub background: Option<PreparedImage>,
}

/// Decodes any format `image` understands and premultiplies alpha up front,
/// so the compositor never sees straight-alpha sprite pixels.
pub fn decode_image(bytes: &[u8]) -> HolofoilResult<PreparedImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|err| HolofoilError::asset(format!("decode card art: {err}")))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();

    let mut rgba8_premul = decoded.into_raw();
    for px in rgba8_premul.chunks_exact_mut(4) {
        let p = composite::from_straight_rgba(px[0], px[1], px[2], px[3]);
        px.copy_from_slice(&p);
    }

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub fn load_image(path: &Path) -> HolofoilResult<PreparedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Loads every bitmap named by `paths`, resolved against `root`. Any failure
/// fails the whole card; the caller decides what to keep (in practice: the
/// placeholders).
pub fn load_card_art(root: &Path, paths: &ArtPaths) -> HolofoilResult<CardArt> {
    let base = load_image(&root.join(&paths.base))?;
    let character = match &paths.character {
        Some(p) => Some(load_image(&root.join(p))?),
        None => None,
    };
    let background = match &paths.background {
        Some(p) => Some(load_image(&root.join(p))?),
        None => None,
    };
    Ok(CardArt {
        base,
        character,
        background,
    })
}

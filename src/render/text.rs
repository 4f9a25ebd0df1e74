//! Text annotation rendering with system fonts

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

use crate::domain::TextAnnotation;

const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts",
    "/usr/share/fonts/truetype",
    "/usr/share/fonts/TTF",
    "/usr/local/share/fonts",
    "/System/Library/Fonts/Supplemental",
    "/System/Library/Fonts",
    "/Library/Fonts",
    "C:\\Windows\\Fonts",
];

const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Loaded fonts keyed by family name; misses are remembered too
#[derive(Default)]
pub struct FontCache {
    fonts: HashMap<String, Option<FontArc>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Font for `family`, falling back to a common sans face
    pub fn get(&mut self, family: &str) -> Option<&FontArc> {
        self.fonts
            .entry(family.to_string())
            .or_insert_with(|| {
                let font = load_family(family).or_else(load_fallback);
                if font.is_none() {
                    log::warn!("No usable font found for family {family:?}, text will not render");
                }
                font
            })
            .as_ref()
    }
}

fn family_candidates(family: &str) -> Vec<PathBuf> {
    let mut names = Vec::new();
    for base in [family.to_string(), family.to_lowercase(), family.replace(' ', "")] {
        names.push(format!("{base}.ttf"));
        names.push(format!("{base}-Regular.ttf"));
        names.push(format!("{base} Regular.ttf"));
    }
    FONT_DIRS
        .iter()
        .flat_map(|dir| names.iter().map(move |name| Path::new(dir).join(name)))
        .collect()
}

fn load_font_file(path: &Path) -> Option<FontArc> {
    let bytes = std::fs::read(path).ok()?;
    match FontArc::try_from_vec(bytes) {
        Ok(font) => {
            log::debug!("Loaded font {}", path.display());
            Some(font)
        }
        Err(err) => {
            log::debug!("Skipping unreadable font {}: {err}", path.display());
            None
        }
    }
}

fn load_family(family: &str) -> Option<FontArc> {
    family_candidates(family)
        .iter()
        .find_map(|path| load_font_file(path))
}

fn load_fallback() -> Option<FontArc> {
    FALLBACK_FONTS
        .iter()
        .find_map(|path| load_font_file(Path::new(path)))
}

/// Draw a text annotation with its baseline at `position.y`
pub fn draw_text(img: &mut RgbaImage, text: &TextAnnotation, fonts: &mut FontCache) {
    if text.text.is_empty() {
        return;
    }
    let Some(font) = fonts.get(&text.font_family) else {
        return;
    };

    let scale = PxScale::from(text.font_size);
    let ascent = font.as_scaled(scale).ascent();
    draw_text_mut(
        img,
        Rgba(text.color.to_rgba_u8()),
        text.position.x.round() as i32,
        (text.position.y - ascent).round() as i32,
        scale,
        font,
        &text.text,
    );
}

use std::sync::OnceLock;

use ab_glyph::{FontArc, FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::foundation::error::{ThumbsmithError, ThumbsmithResult};

/// A font resolved at a fixed pixel size, ready to measure and draw glyph runs.
///
/// The stroke/outline effect is layered on top of `draw` by the renderer, so a
/// different outline technique can be substituted without touching this trait.
pub trait RenderableFont {
    /// Pixel size this font was loaded at.
    fn size_px(&self) -> u32;

    /// Inked extent of `text` in pixels.
    fn measure(&self, text: &str) -> (u32, u32);

    /// Height of a reference run with an ascender and a descender.
    fn line_height(&self) -> u32 {
        self.measure("Ay").1
    }

    /// Draw a single glyph run with its top-left corner at `(x, y)`.
    /// Out-of-bounds pixels are clipped.
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str);
}

/// Per-size font loading capability supplied by the host environment.
///
/// Implementations may fail at individual sizes; the layout search treats such
/// sizes as infeasible and keeps probing.
pub trait FontLoader: Send + Sync {
    fn load(&self, size_px: u32) -> ThumbsmithResult<Box<dyn RenderableFont>>;
}

/// An `ab_glyph` face paired with the pixel scale it was requested at.
pub struct SizedFont {
    font: FontArc,
    scale: PxScale,
    size_px: u32,
}

impl SizedFont {
    pub fn new(font: FontArc, size_px: u32) -> Self {
        Self {
            font,
            scale: PxScale::from(size_px as f32),
            size_px,
        }
    }
}

impl RenderableFont for SizedFont {
    fn size_px(&self) -> u32 {
        self.size_px
    }

    fn measure(&self, text: &str) -> (u32, u32) {
        text_size(self.scale, &self.font, text)
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }
}

/// Title font discovery over the system catalog.
///
/// Resolution order: each configured family name at bold weight, then the
/// generic sans-serif family. The first face whose data parses wins and is
/// cached for the loader's lifetime, so concurrent requests share one face.
pub struct SystemFontLoader {
    db: fontdb::Database,
    families: Vec<String>,
    resolved: OnceLock<Option<FontArc>>,
}

impl SystemFontLoader {
    pub fn new(families: Vec<String>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "system font catalog loaded");
        Self {
            db,
            families,
            resolved: OnceLock::new(),
        }
    }

    fn resolve(&self) -> Option<FontArc> {
        self.resolved
            .get_or_init(|| {
                let mut candidates: Vec<fontdb::Family<'_>> = self
                    .families
                    .iter()
                    .map(|name| fontdb::Family::Name(name.as_str()))
                    .collect();
                candidates.push(fontdb::Family::SansSerif);

                for family in &candidates {
                    let query = fontdb::Query {
                        families: std::slice::from_ref(family),
                        weight: fontdb::Weight::BOLD,
                        ..fontdb::Query::default()
                    };
                    let Some(id) = self.db.query(&query) else {
                        continue;
                    };
                    let loaded = self
                        .db
                        .with_face_data(id, |data, index| {
                            FontVec::try_from_vec_and_index(data.to_vec(), index)
                                .ok()
                                .map(FontArc::from)
                        })
                        .flatten();
                    if loaded.is_some() {
                        tracing::debug!(family = ?family, "title font resolved");
                        return loaded;
                    }
                }
                None
            })
            .clone()
    }
}

impl FontLoader for SystemFontLoader {
    fn load(&self, size_px: u32) -> ThumbsmithResult<Box<dyn RenderableFont>> {
        let font = self.resolve().ok_or_else(|| {
            ThumbsmithError::font_unavailable("no usable title font on this system")
        })?;
        Ok(Box::new(SizedFont::new(font, size_px)))
    }
}

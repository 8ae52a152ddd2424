use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::DynamicImage;

use crate::{
    canvas::{decode_background, normalize_to_canvas},
    config::ComposerConfig,
    encode::encode_size_bounded,
    foundation::color::parse_hex_rgb,
    foundation::error::{ThumbsmithError, ThumbsmithResult},
    logo::{overlay_logo, process_logo},
    text::font::{FontLoader, SystemFontLoader},
    text::layout::{FitOptions, fit},
    text::render::{draw_accent_bar, draw_stroked_line},
};

/// Shortest accepted title, in characters after trimming.
pub const TITLE_MIN_CHARS: usize = 5;
/// Longest accepted title, in characters after trimming.
pub const TITLE_MAX_CHARS: usize = 120;

/// One composition request.
#[derive(Clone, Debug, Default)]
pub struct ThumbnailJob {
    /// Title text drawn over the background.
    pub title: String,
    /// Accent bar color as `#RRGGBB`.
    pub accent_color: String,
    /// Optional logo bytes (PNG or JPEG).
    pub logo: Option<Vec<u8>>,
    /// Filename stem; a timestamp is used when absent.
    pub request_id: Option<String>,
}

impl ThumbnailJob {
    pub fn new(title: impl Into<String>, accent_color: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            accent_color: accent_color.into(),
            logo: None,
            request_id: None,
        }
    }

    /// Host-side input validation. `compose` itself accepts any title so
    /// hosts decide where the length policy is enforced.
    pub fn validate(&self) -> ThumbsmithResult<()> {
        let chars = self.title.trim().chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&chars) {
            return Err(ThumbsmithError::validation(format!(
                "title must be {TITLE_MIN_CHARS}..={TITLE_MAX_CHARS} characters, got {chars}"
            )));
        }
        parse_hex_rgb(&self.accent_color)?;
        Ok(())
    }
}

/// Finished thumbnail: encoded bytes plus the filename a host should store
/// them under.
#[derive(Clone, Debug)]
pub struct ComposedThumbnail {
    pub jpeg: Vec<u8>,
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

impl ComposedThumbnail {
    pub fn size_bytes(&self) -> usize {
        self.jpeg.len()
    }
}

/// The composition pipeline: normalize the background, fit and draw the
/// title, add the accent bar and optional logo, then encode within the byte
/// budget.
///
/// A composer holds only read-only state and may be shared across threads;
/// every request owns its canvas.
pub struct ThumbnailComposer {
    config: ComposerConfig,
    fonts: Box<dyn FontLoader>,
}

impl ThumbnailComposer {
    pub fn new(config: ComposerConfig, fonts: Box<dyn FontLoader>) -> ThumbsmithResult<Self> {
        config.validate()?;
        Ok(Self { config, fonts })
    }

    /// Composer over the system font catalog, resolved with the families in
    /// `config`.
    pub fn with_system_fonts(config: ComposerConfig) -> ThumbsmithResult<Self> {
        let families = config.font_families.clone();
        Self::new(config, Box::new(SystemFontLoader::new(families)))
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Compose a thumbnail over an already decoded background.
    ///
    /// Background normalization and title layout failures abort the request;
    /// logo problems degrade to a thumbnail without a logo, and the byte
    /// budget is best-effort.
    #[tracing::instrument(
        skip(self, background, job),
        fields(title_chars = job.title.chars().count(), has_logo = job.logo.is_some())
    )]
    pub fn compose(
        &self,
        background: &DynamicImage,
        job: &ThumbnailJob,
    ) -> ThumbsmithResult<ComposedThumbnail> {
        let cfg = &self.config;
        let accent = parse_hex_rgb(&job.accent_color)?;
        let fill = parse_hex_rgb(&cfg.title_fill)?;
        let stroke = parse_hex_rgb(&cfg.title_stroke)?;

        let mut canvas = normalize_to_canvas(background, cfg.canvas_width, cfg.canvas_height);

        let layout = fit(
            job.title.trim(),
            cfg.text_area_width(),
            cfg.text_area_height(),
            self.fonts.as_ref(),
            FitOptions {
                min_px: cfg.font_min_px,
                max_px: cfg.font_max_px,
                line_spacing: cfg.line_spacing,
            },
        )?;

        // Center the line block vertically inside the text area.
        let area_h = cfg.text_area_height() as i32;
        let text_top = cfg.text_margin_top as i32 + (area_h - layout.block_height() as i32) / 2;

        draw_accent_bar(
            &mut canvas,
            cfg.text_margin_left as i32,
            text_top - cfg.accent_bar_offset as i32,
            cfg.accent_bar_width,
            cfg.accent_bar_height,
            accent,
        );

        let mut y = text_top;
        for line in &layout.lines {
            draw_stroked_line(
                &mut canvas,
                layout.font.as_ref(),
                cfg.text_margin_left as i32,
                y,
                line,
                fill,
                stroke,
                cfg.title_stroke_width,
            );
            y += layout.line_height as i32;
        }

        if let Some(bytes) = &job.logo
            && let Some(logo) = process_logo(bytes, cfg)
        {
            overlay_logo(&mut canvas, &logo, cfg.logo_margin);
        }

        let jpeg = encode_size_bounded(&canvas, cfg)?;
        let filename = output_filename(job.request_id.as_deref());

        tracing::info!(
            filename = %filename,
            bytes = jpeg.len(),
            size_px = layout.size_px,
            lines = layout.lines.len(),
            "thumbnail composed"
        );

        Ok(ComposedThumbnail {
            jpeg,
            filename,
            width: cfg.canvas_width,
            height: cfg.canvas_height,
        })
    }

    /// Decode the background first; undecodable backgrounds abort the
    /// request.
    pub fn compose_from_bytes(
        &self,
        background_bytes: &[u8],
        job: &ThumbnailJob,
    ) -> ThumbsmithResult<ComposedThumbnail> {
        let background = decode_background(background_bytes)?;
        self.compose(&background, job)
    }

    /// Compose and persist under `out_dir`; returns the written path.
    pub fn compose_to_dir(
        &self,
        background: &DynamicImage,
        job: &ThumbnailJob,
        out_dir: &Path,
    ) -> ThumbsmithResult<PathBuf> {
        let thumb = self.compose(background, job)?;

        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("create output dir '{}'", out_dir.display()))?;
        let path = out_dir.join(&thumb.filename);
        std::fs::write(&path, &thumb.jpeg)
            .with_context(|| format!("write thumbnail '{}'", path.display()))?;

        tracing::info!(path = %path.display(), bytes = thumb.jpeg.len(), "thumbnail saved");
        Ok(path)
    }
}

/// `{stem}_thumbnail.jpg`, stem = caller request id or a local timestamp.
///
/// Uniqueness is the caller's concern: two same-second requests without a
/// request id get the same name and the later write wins.
pub fn output_filename(request_id: Option<&str>) -> String {
    let stem = match request_id {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => chrono::Local::now().format("%Y-%m-%d_%H%M%S").to_string(),
    };
    format!("{stem}_thumbnail.jpg")
}

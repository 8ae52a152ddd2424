use crate::foundation::error::{ThumbsmithError, ThumbsmithResult};

/// Read-only composition settings, constructed once at startup and shared by
/// reference with every pipeline stage.
///
/// Colors are `#RRGGBB` strings; fractions are relative to the canvas edge
/// they bound. `validate` must pass before the config is used.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Output canvas width in pixels.
    pub canvas_width: u32,
    /// Output canvas height in pixels.
    pub canvas_height: u32,

    /// Fraction of the canvas width reserved for title text.
    pub text_area_width_frac: f64,
    /// Left margin of the text area in pixels.
    pub text_margin_left: u32,
    /// Top and bottom margin of the text area in pixels.
    pub text_margin_top: u32,

    /// Title fill color.
    pub title_fill: String,
    /// Title outline color.
    pub title_stroke: String,
    /// Title outline width in pixels.
    pub title_stroke_width: u32,

    /// Smallest font size probed by the fitting search.
    pub font_min_px: u32,
    /// Largest font size probed by the fitting search.
    pub font_max_px: u32,
    /// Vertical advance multiplier between lines.
    pub line_spacing: f64,
    /// Title font family candidates, tried in order at bold weight.
    pub font_families: Vec<String>,

    /// Accent bar width in pixels.
    pub accent_bar_width: u32,
    /// Accent bar height in pixels.
    pub accent_bar_height: u32,
    /// Gap between the accent bar and the first text line, in pixels.
    pub accent_bar_offset: u32,

    /// Largest logo width as a fraction of canvas width (landscape logos).
    pub logo_max_width_frac: f64,
    /// Largest logo height as a fraction of canvas height (portrait/square logos).
    pub logo_max_height_frac: f64,
    /// Logo inset from the bottom-right canvas corner, in pixels.
    pub logo_margin: u32,

    /// First JPEG quality tried by the encoder.
    pub jpeg_quality_start: u8,
    /// Lowest JPEG quality the encoder may reach.
    pub jpeg_quality_floor: u8,
    /// Quality decrement per encoding attempt.
    pub jpeg_quality_step: u8,
    /// Output byte budget; best-effort once the quality floor is reached.
    pub max_output_bytes: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1280,
            canvas_height: 720,
            text_area_width_frac: 0.45,
            text_margin_left: 40,
            text_margin_top: 60,
            title_fill: "#FFFFFF".to_string(),
            title_stroke: "#000000".to_string(),
            title_stroke_width: 6,
            font_min_px: 20,
            font_max_px: 120,
            line_spacing: 1.2,
            font_families: vec![
                "Arial".to_string(),
                "Helvetica".to_string(),
                "Impact".to_string(),
                "Liberation Sans".to_string(),
                "DejaVu Sans".to_string(),
            ],
            accent_bar_width: 200,
            accent_bar_height: 8,
            accent_bar_offset: 25,
            logo_max_width_frac: 0.18,
            logo_max_height_frac: 0.15,
            logo_margin: 30,
            jpeg_quality_start: 92,
            jpeg_quality_floor: 76,
            jpeg_quality_step: 5,
            max_output_bytes: 2 * 1024 * 1024,
        }
    }
}

impl ComposerConfig {
    pub fn validate(&self) -> ThumbsmithResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ThumbsmithError::validation("canvas dimensions must be > 0"));
        }
        for (name, frac) in [
            ("text_area_width_frac", self.text_area_width_frac),
            ("logo_max_width_frac", self.logo_max_width_frac),
            ("logo_max_height_frac", self.logo_max_height_frac),
        ] {
            if !(frac > 0.0 && frac <= 1.0) {
                return Err(ThumbsmithError::validation(format!(
                    "{name} must be in (0, 1]"
                )));
            }
        }
        if self.canvas_height <= self.text_margin_top * 2 {
            return Err(ThumbsmithError::validation(
                "text margins leave no vertical space for the title",
            ));
        }
        if self.font_min_px == 0 || self.font_min_px > self.font_max_px {
            return Err(ThumbsmithError::validation(
                "font size range must satisfy 0 < min <= max",
            ));
        }
        if self.line_spacing <= 0.0 {
            return Err(ThumbsmithError::validation("line_spacing must be > 0"));
        }
        if self.accent_bar_width == 0 || self.accent_bar_height == 0 {
            return Err(ThumbsmithError::validation(
                "accent bar dimensions must be > 0",
            ));
        }
        for (name, q) in [
            ("jpeg_quality_start", self.jpeg_quality_start),
            ("jpeg_quality_floor", self.jpeg_quality_floor),
        ] {
            if !(1..=100).contains(&q) {
                return Err(ThumbsmithError::validation(format!(
                    "{name} must be in 1..=100"
                )));
            }
        }
        if self.jpeg_quality_floor > self.jpeg_quality_start {
            return Err(ThumbsmithError::validation(
                "jpeg_quality_floor must not exceed jpeg_quality_start",
            ));
        }
        if self.jpeg_quality_step == 0 {
            return Err(ThumbsmithError::validation("jpeg_quality_step must be > 0"));
        }
        if self.max_output_bytes == 0 {
            return Err(ThumbsmithError::validation("max_output_bytes must be > 0"));
        }
        Ok(())
    }

    /// Pixel width of the title text area.
    pub fn text_area_width(&self) -> u32 {
        (f64::from(self.canvas_width) * self.text_area_width_frac) as u32
    }

    /// Pixel height of the title text area.
    pub fn text_area_height(&self) -> u32 {
        self.canvas_height.saturating_sub(self.text_margin_top * 2)
    }

    /// Pixel cap for landscape logo widths.
    pub fn logo_max_width(&self) -> u32 {
        (f64::from(self.canvas_width) * self.logo_max_width_frac) as u32
    }

    /// Pixel cap for portrait and square logo heights.
    pub fn logo_max_height(&self) -> u32 {
        (f64::from(self.canvas_height) * self.logo_max_height_frac) as u32
    }
}

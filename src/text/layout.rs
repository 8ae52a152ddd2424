use crate::foundation::error::ThumbsmithResult;
use crate::text::font::{FontLoader, RenderableFont};

/// Bounds of the font-size search plus the line advance multiplier.
#[derive(Clone, Copy, Debug)]
pub struct FitOptions {
    pub min_px: u32,
    pub max_px: u32,
    pub line_spacing: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_px: 20,
            max_px: 120,
            line_spacing: 1.2,
        }
    }
}

/// Result of the title fitting search.
pub struct TextLayout {
    /// Chosen font size.
    pub size_px: u32,
    /// Wrapped lines, in draw order.
    pub lines: Vec<String>,
    /// Vertical advance between line tops when drawing.
    pub line_height: u32,
    /// The font the lines were measured with.
    pub font: Box<dyn RenderableFont>,
}

impl std::fmt::Debug for TextLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayout")
            .field("size_px", &self.size_px)
            .field("lines", &self.lines)
            .field("line_height", &self.line_height)
            .field("font", &format_args!("<dyn RenderableFont>"))
            .finish()
    }
}

impl TextLayout {
    /// Stacked pixel height of all lines at the drawing advance.
    pub fn block_height(&self) -> u32 {
        self.lines.len() as u32 * self.line_height
    }
}

/// Greedy word wrap: append whitespace-delimited words while the measured
/// line still fits `max_width`. A single word wider than the area is placed
/// alone on its own line rather than split.
pub fn wrap_words(text: &str, font: &dyn RenderableFont, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let test = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if font.measure(&test).0 <= max_width {
            current = test;
        } else if current.is_empty() {
            lines.push(word.to_string());
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Find the largest font size in `[opts.min_px, opts.max_px]` whose wrapped
/// lines stack within `max_height`, by binary search.
///
/// Feasibility at a probe size is `line count x measured line height x
/// line_spacing <= max_height`; growing the size never shrinks either factor
/// for natural titles, which is what makes the binary search valid. A font
/// that fails to load at a probe size makes that size infeasible. When even
/// the minimum size overflows, the minimum-size layout is returned anyway and
/// the overflow is logged; the only hard failure is a text area no font can
/// ever be loaded for.
pub fn fit(
    text: &str,
    max_width: u32,
    max_height: u32,
    loader: &dyn FontLoader,
    opts: FitOptions,
) -> ThumbsmithResult<TextLayout> {
    let mut lo = opts.min_px;
    let mut hi = opts.max_px;
    let mut best: Option<(u32, Vec<String>, Box<dyn RenderableFont>)> = None;

    while lo <= hi {
        let size = (lo + hi) / 2;
        let font = match loader.load(size) {
            Ok(font) => font,
            Err(err) => {
                tracing::debug!(size, %err, "font load failed at probe size");
                hi = size.saturating_sub(1);
                if size == 0 {
                    break;
                }
                continue;
            }
        };

        let lines = wrap_words(text, font.as_ref(), max_width);
        let block_height =
            lines.len() as f64 * f64::from(font.line_height()) * opts.line_spacing;

        if block_height <= f64::from(max_height) {
            best = Some((size, lines, font));
            lo = size + 1;
        } else {
            if size == 0 {
                break;
            }
            hi = size - 1;
        }
    }

    let (size_px, lines, font) = match best {
        Some(found) => found,
        None => {
            let font = loader.load(opts.min_px)?;
            let lines = wrap_words(text, font.as_ref(), max_width);
            tracing::warn!(
                size = opts.min_px,
                lines = lines.len(),
                "title overflows the text area at the minimum font size"
            );
            (opts.min_px, lines, font)
        }
    };

    let line_height = (f64::from(size_px) * opts.line_spacing).round() as u32;
    tracing::debug!(size_px, lines = lines.len(), line_height, "title fitted");

    Ok(TextLayout {
        size_px,
        lines,
        line_height,
        font,
    })
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;
    use crate::foundation::error::ThumbsmithError;

    /// Deterministic font: every char advances size/2 px, line height = size.
    struct FixedAdvanceFont {
        size_px: u32,
    }

    impl RenderableFont for FixedAdvanceFont {
        fn size_px(&self) -> u32 {
            self.size_px
        }

        fn measure(&self, text: &str) -> (u32, u32) {
            let chars = text.chars().count() as u32;
            (chars * self.size_px / 2, self.size_px)
        }

        fn draw(&self, _canvas: &mut RgbImage, _x: i32, _y: i32, _color: Rgb<u8>, _text: &str) {}
    }

    struct FixedAdvanceLoader;

    impl FontLoader for FixedAdvanceLoader {
        fn load(&self, size_px: u32) -> ThumbsmithResult<Box<dyn RenderableFont>> {
            Ok(Box::new(FixedAdvanceFont { size_px }))
        }
    }

    /// Fails above a size threshold, succeeds below it.
    struct CappedLoader {
        max_loadable: u32,
    }

    impl FontLoader for CappedLoader {
        fn load(&self, size_px: u32) -> ThumbsmithResult<Box<dyn RenderableFont>> {
            if size_px > self.max_loadable {
                return Err(ThumbsmithError::font_unavailable(format!(
                    "no face at {size_px}px"
                )));
            }
            Ok(Box::new(FixedAdvanceFont { size_px }))
        }
    }

    struct NeverLoader;

    impl FontLoader for NeverLoader {
        fn load(&self, _size_px: u32) -> ThumbsmithResult<Box<dyn RenderableFont>> {
            Err(ThumbsmithError::font_unavailable("no faces at all"))
        }
    }

    fn fit_size(text: &str, w: u32, h: u32) -> u32 {
        fit(text, w, h, &FixedAdvanceLoader, FitOptions::default())
            .unwrap()
            .size_px
    }

    #[test]
    fn single_short_word_maxes_out_on_height() {
        // One 10-char word: width 5*size <= 600 for any probed size, so the
        // height bound size * 1.2 <= 120 decides: max feasible size is 100.
        let layout = fit(
            "aaaaaaaaaa",
            600,
            120,
            &FixedAdvanceLoader,
            FitOptions::default(),
        )
        .unwrap();
        assert_eq!(layout.size_px, 100);
        assert_eq!(layout.lines, vec!["aaaaaaaaaa".to_string()]);
        assert_eq!(layout.line_height, 120);
    }

    #[test]
    fn taller_area_never_shrinks_the_chosen_size() {
        let text = "one two three four five six seven eight";
        let mut last = 0;
        for h in [60, 120, 240, 480, 600] {
            let size = fit_size(text, 576, h);
            assert!(size >= last, "h={h}: {size} < {last}");
            last = size;
        }
    }

    #[test]
    fn longer_text_never_grows_the_chosen_size() {
        let mut text = String::from("word");
        let mut last = u32::MAX;
        for _ in 0..6 {
            text.push_str(" word word word word");
            let size = fit_size(&text, 576, 600);
            assert!(size <= last, "'{}': {size} > {last}", text.len());
            last = size;
        }
    }

    #[test]
    fn chosen_layout_satisfies_the_height_invariant() {
        let text = "building a release pipeline from scratch in one afternoon";
        let layout = fit(text, 576, 600, &FixedAdvanceLoader, FitOptions::default()).unwrap();
        let measured = layout.lines.len() as f64 * f64::from(layout.size_px) * 1.2;
        assert!(measured <= 600.0);

        // Maximality: one size up must overflow the height or a line.
        let bigger = FixedAdvanceFont {
            size_px: layout.size_px + 1,
        };
        let lines = wrap_words(text, &bigger, 576);
        let height = lines.len() as f64 * f64::from(layout.size_px + 1) * 1.2;
        assert!(height > 600.0 || layout.size_px == 120);
    }

    #[test]
    fn words_are_never_split_and_order_is_kept() {
        let text = "alpha beta gamma delta epsilon zeta";
        let layout = fit(text, 200, 600, &FixedAdvanceLoader, FitOptions::default()).unwrap();
        let rejoined = layout.lines.join(" ");
        assert_eq!(rejoined, text);
        for line in &layout.lines {
            assert!(!line.is_empty());
        }
    }

    #[test]
    fn overwide_single_word_gets_its_own_line() {
        let word = "a".repeat(100);
        let text = format!("tiny {word} tiny");
        let font = FixedAdvanceFont { size_px: 20 };
        let lines = wrap_words(&text, &font, 576);
        assert!(lines.contains(&word));
        // 100 chars at 10 px/char is wider than the area, on a line alone.
        assert!(font.measure(&word).0 > 576);
    }

    #[test]
    fn probe_failures_cap_the_chosen_size() {
        let loader = CappedLoader { max_loadable: 50 };
        let layout = fit("aaaaaaaaaa", 600, 600, &loader, FitOptions::default()).unwrap();
        assert!(layout.size_px <= 50);
        // The unconstrained search would have gone far higher.
        assert!(fit_size("aaaaaaaaaa", 600, 600) > 50);
    }

    #[test]
    fn unloadable_everywhere_is_a_font_error() {
        let err = fit("hello there", 576, 600, &NeverLoader, FitOptions::default()).unwrap_err();
        assert!(err.to_string().contains("font error:"));
    }

    #[test]
    fn impossible_height_falls_back_to_minimum_size_layout() {
        let text = "word ".repeat(400);
        let layout = fit(&text, 576, 10, &FixedAdvanceLoader, FitOptions::default()).unwrap();
        assert_eq!(layout.size_px, 20);
        assert!(!layout.lines.is_empty());
        let stacked = layout.lines.len() as f64 * 20.0 * 1.2;
        assert!(stacked > 10.0);
    }
}

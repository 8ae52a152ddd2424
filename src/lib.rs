//! Thumbsmith composes branded video thumbnails: a background image is
//! normalized onto a fixed canvas, a title is fitted and drawn with an
//! outline, an accent bar and an optional logo are layered on top, and the
//! result is re-encoded as a size-bounded JPEG.
//!
//! # Pipeline overview
//!
//! 1. **Normalize**: scale-to-fill and center-crop the background to the
//!    exact canvas size ([`normalize_to_canvas`])
//! 2. **Fit**: binary-search the largest font size whose wrapped title fits
//!    the reserved text area ([`fit`])
//! 3. **Draw**: stroked title lines plus the accent bar
//!    ([`draw_stroked_line`], [`draw_accent_bar`])
//! 4. **Overlay**: best-effort logo in the bottom-right corner
//!    ([`process_logo`], [`overlay_logo`])
//! 5. **Encode**: walk JPEG quality down until the byte budget is met
//!    ([`encode_size_bounded`])
//!
//! [`ThumbnailComposer`] sequences the stages for one request. It is
//! stateless past its read-only configuration and font loader, so one
//! composer instance can serve concurrent requests; fonts are injected via
//! the [`FontLoader`] capability so hosts and tests control resolution.
#![forbid(unsafe_code)]

mod canvas;
mod compose;
mod config;
mod encode;
mod foundation;
mod logo;
mod text;

pub use canvas::{decode_background, normalize_to_canvas};
pub use compose::{
    ComposedThumbnail, TITLE_MAX_CHARS, TITLE_MIN_CHARS, ThumbnailComposer, ThumbnailJob,
    output_filename,
};
pub use config::ComposerConfig;
pub use encode::encode_size_bounded;
pub use foundation::color::parse_hex_rgb;
pub use foundation::error::{ThumbsmithError, ThumbsmithResult};
pub use logo::{overlay_logo, process_logo};
pub use text::font::{FontLoader, RenderableFont, SizedFont, SystemFontLoader};
pub use text::layout::{FitOptions, TextLayout, fit, wrap_words};
pub use text::render::{draw_accent_bar, draw_stroked_line};

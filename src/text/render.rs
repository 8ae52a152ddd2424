use image::{Rgb, RgbImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

use crate::text::font::RenderableFont;

/// Draw one line of title text with a uniform outline.
///
/// The glyph run is repeated in the stroke color at every integer offset
/// within `stroke_width` of the true position, then drawn once more in the
/// fill color on top: (2w+1)^2 - 1 outline runs plus one fill run per line.
pub fn draw_stroked_line(
    canvas: &mut RgbImage,
    font: &dyn RenderableFont,
    x: i32,
    y: i32,
    line: &str,
    fill: Rgb<u8>,
    stroke: Rgb<u8>,
    stroke_width: u32,
) {
    let w = stroke_width as i32;
    for dx in -w..=w {
        for dy in -w..=w {
            if dx == 0 && dy == 0 {
                continue;
            }
            font.draw(canvas, x + dx, y + dy, stroke, line);
        }
    }
    font.draw(canvas, x, y, fill, line);
}

/// Fill the accent bar rectangle. `y` may be negative near the canvas top;
/// the rectangle is clipped to the canvas.
pub fn draw_accent_bar(
    canvas: &mut RgbImage,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: Rgb<u8>,
) {
    draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(width, height), color);
}

use image::Rgb;

use crate::foundation::error::{ThumbsmithError, ThumbsmithResult};

/// Parse a `#RRGGBB` hex color, case-insensitive.
pub fn parse_hex_rgb(s: &str) -> ThumbsmithResult<Rgb<u8>> {
    let hex = s
        .strip_prefix('#')
        .ok_or_else(|| ThumbsmithError::validation(format!("color '{s}' must start with '#'")))?;

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ThumbsmithError::validation(format!(
            "color '{s}' must be #RRGGBB"
        )));
    }

    let byte = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| ThumbsmithError::validation(format!("color '{s}' must be #RRGGBB")))
    };

    Ok(Rgb([byte(0)?, byte(2)?, byte(4)?]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upper_and_lower_case() {
        assert_eq!(parse_hex_rgb("#FFD000").unwrap(), Rgb([255, 208, 0]));
        assert_eq!(parse_hex_rgb("#ffd000").unwrap(), Rgb([255, 208, 0]));
        assert_eq!(parse_hex_rgb("#000000").unwrap(), Rgb([0, 0, 0]));
    }

    #[test]
    fn rejects_missing_hash() {
        assert!(parse_hex_rgb("FFD000").is_err());
    }

    #[test]
    fn rejects_wrong_length_and_non_hex() {
        assert!(parse_hex_rgb("#FFD00").is_err());
        assert!(parse_hex_rgb("#FFD0000").is_err());
        assert!(parse_hex_rgb("#GGGGGG").is_err());
        assert!(parse_hex_rgb("#").is_err());
    }

    #[test]
    fn rejects_non_ascii_input() {
        assert!(parse_hex_rgb("#ffd00ö").is_err());
    }
}

//! Hex color strings to and from 8-bit sRGB.

use palette::Srgb;

use crate::error::{CoverageError, Result};

fn parse_error(input: &str, reason: impl Into<String>) -> CoverageError {
    CoverageError::ParseColor {
        input: input.to_string(),
        reason: reason.into(),
    }
}

/// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb` (any case) into an RGB triplet.
///
/// The short form doubles each digit, so `#f0a` is `#ff00aa`.
pub fn parse_hex(input: &str) -> Result<Srgb<u8>> {
    let hex = input.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(parse_error(input, "expected hexadecimal digits"));
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|e| parse_error(input, e.to_string()));

    match hex.len() {
        6 => Ok(Srgb::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Ok(Srgb::new(short(0)?, short(1)?, short(2)?))
        }
        _ => Err(parse_error(input, "hex color must be 3 or 6 characters")),
    }
}

/// Lowercase `#rrggbb`.
pub fn to_hex(rgb: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_form_with_and_without_hash() {
        assert_eq!(parse_hex("#ff69b4").unwrap(), Srgb::new(255, 105, 180));
        assert_eq!(parse_hex("005DBA").unwrap(), Srgb::new(0, 93, 186));
        assert_eq!(parse_hex("  #008b8b ").unwrap(), Srgb::new(0, 139, 139));
    }

    #[test]
    fn parses_short_form() {
        assert_eq!(parse_hex("#fff").unwrap(), Srgb::new(255, 255, 255));
        assert_eq!(parse_hex("f0a").unwrap(), Srgb::new(255, 0, 170));
    }

    #[test]
    fn rejects_bad_input() {
        for bad in ["", "#", "#ff69b", "#ff69b4a", "#gg0000", "+12345", "#ff 69b"] {
            assert!(
                matches!(parse_hex(bad), Err(CoverageError::ParseColor { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn hex_output_is_lowercase() {
        assert_eq!(to_hex(Srgb::new(0, 93, 186)), "#005dba");
    }
}

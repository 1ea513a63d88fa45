//! Leaf decoders for option arguments: colors, dimensions and booleans.

use imgrelay_core::{ParseError, ParseResult};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const WHITE: RgbColor = RgbColor {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Parse `rgb` or `rrggbb`. The short form duplicates each nibble (`a` -> `aa`).
pub fn color_from_hex(hexcolor: &str) -> ParseResult<RgbColor> {
    if !HEX_COLOR.is_match(hexcolor) {
        return Err(ParseError::invalid_argument(format!(
            "Invalid hex color: {}",
            hexcolor
        )));
    }

    let channel = |digits: &str| u8::from_str_radix(digits, 16).unwrap_or_default();

    let color = if hexcolor.len() == 3 {
        RgbColor::new(
            channel(&hexcolor[0..1]) * 17,
            channel(&hexcolor[1..2]) * 17,
            channel(&hexcolor[2..3]) * 17,
        )
    } else {
        RgbColor::new(
            channel(&hexcolor[0..2]),
            channel(&hexcolor[2..4]),
            channel(&hexcolor[4..6]),
        )
    };

    Ok(color)
}

/// Non-negative integer dimension; `name` appears in the error.
pub fn parse_dimension(name: &str, arg: &str) -> ParseResult<u32> {
    arg.parse::<u32>()
        .map_err(|_| ParseError::invalid_argument(format!("Invalid {}: {}", name, arg)))
}

/// Lenient boolean: unrecognised values are treated as `false` with a warning.
pub fn parse_bool_option(s: &str) -> bool {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => true,
        "0" | "f" | "F" | "false" | "FALSE" | "False" => false,
        other => {
            tracing::warn!(value = %other, "Not a valid boolean value, treated as false");
            false
        }
    }
}

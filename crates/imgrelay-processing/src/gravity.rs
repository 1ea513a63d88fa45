//! Gravity parsing
//!
//! Gravity is written as `type[:x[:y]]`. Compass types take optional non-negative
//! offsets, `fp` (focus point) takes exactly two coordinates in `[0, 1]`, and `sm`
//! (smart) takes none.

use imgrelay_core::{ParseError, ParseResult};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GravityType {
    #[default]
    Unknown,
    Center,
    North,
    East,
    South,
    West,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
    Smart,
    FocusPoint,
}

impl GravityType {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "ce" => Some(GravityType::Center),
            "no" => Some(GravityType::North),
            "ea" => Some(GravityType::East),
            "so" => Some(GravityType::South),
            "we" => Some(GravityType::West),
            "nowe" => Some(GravityType::NorthWest),
            "noea" => Some(GravityType::NorthEast),
            "sowe" => Some(GravityType::SouthWest),
            "soea" => Some(GravityType::SouthEast),
            "sm" => Some(GravityType::Smart),
            "fp" => Some(GravityType::FocusPoint),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GravityType::Unknown => "",
            GravityType::Center => "ce",
            GravityType::North => "no",
            GravityType::East => "ea",
            GravityType::South => "so",
            GravityType::West => "we",
            GravityType::NorthWest => "nowe",
            GravityType::NorthEast => "noea",
            GravityType::SouthWest => "sowe",
            GravityType::SouthEast => "soea",
            GravityType::Smart => "sm",
            GravityType::FocusPoint => "fp",
        }
    }
}

impl fmt::Display for GravityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for GravityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GravityType::Unknown => serializer.serialize_none(),
            other => serializer.serialize_str(other.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GravityOptions {
    #[serde(rename = "type")]
    pub gravity_type: GravityType,
    pub x: f64,
    pub y: f64,
}

impl GravityOptions {
    pub fn new(gravity_type: GravityType) -> Self {
        Self {
            gravity_type,
            x: 0.0,
            y: 0.0,
        }
    }
}

/// Center accepts any offset; focus points need `[0, 1]`; everything else needs `>= 0`.
pub fn is_gravity_offset_valid(gravity: GravityType, offset: f64) -> bool {
    if gravity == GravityType::Center {
        return true;
    }

    offset >= 0.0 && (gravity != GravityType::FocusPoint || offset <= 1.0)
}

/// Parse `args` into `target`. Fields are written as they validate, so a failure
/// may leave `target` partially updated; callers abort the whole parse on error.
pub fn parse_gravity(target: &mut GravityOptions, args: &[String]) -> ParseResult<()> {
    let n_args = args.len();

    if n_args == 0 || n_args > 3 {
        return Err(ParseError::invalid_arguments("gravity", args));
    }

    target.gravity_type = GravityType::from_name(&args[0])
        .ok_or_else(|| ParseError::invalid_argument(format!("Invalid gravity: {}", args[0])))?;

    match target.gravity_type {
        GravityType::Smart if n_args > 1 => {
            return Err(ParseError::invalid_arguments("gravity", args));
        }
        GravityType::FocusPoint if n_args != 3 => {
            return Err(ParseError::invalid_arguments("gravity", args));
        }
        _ => {}
    }

    if n_args > 1 {
        target.x = parse_offset(target.gravity_type, &args[1])
            .ok_or_else(|| ParseError::invalid_argument(format!("Invalid gravity X: {}", args[1])))?;
    }

    if n_args > 2 {
        target.y = parse_offset(target.gravity_type, &args[2])
            .ok_or_else(|| ParseError::invalid_argument(format!("Invalid gravity Y: {}", args[2])))?;
    }

    Ok(())
}

fn parse_offset(gravity: GravityType, arg: &str) -> Option<f64> {
    arg.parse::<f64>()
        .ok()
        .filter(|offset| is_gravity_offset_valid(gravity, *offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_offset_validity() {
        for x in [-100.0, -0.5, 0.0, 0.5, 1.0, 250.0] {
            assert!(is_gravity_offset_valid(GravityType::Center, x));
        }

        assert!(is_gravity_offset_valid(GravityType::FocusPoint, 0.0));
        assert!(is_gravity_offset_valid(GravityType::FocusPoint, 0.5));
        assert!(is_gravity_offset_valid(GravityType::FocusPoint, 1.0));
        assert!(!is_gravity_offset_valid(GravityType::FocusPoint, 1.01));
        assert!(!is_gravity_offset_valid(GravityType::FocusPoint, -0.1));

        assert!(is_gravity_offset_valid(GravityType::North, 0.0));
        assert!(is_gravity_offset_valid(GravityType::SouthEast, 42.0));
        assert!(!is_gravity_offset_valid(GravityType::West, -1.0));
    }

    #[test]
    fn test_parse_compass_gravity() {
        let mut g = GravityOptions::new(GravityType::Center);
        parse_gravity(&mut g, &args(&["no"])).unwrap();
        assert_eq!(g.gravity_type, GravityType::North);

        parse_gravity(&mut g, &args(&["soea", "10", "20"])).unwrap();
        assert_eq!(g.gravity_type, GravityType::SouthEast);
        assert_eq!(g.x, 10.0);
        assert_eq!(g.y, 20.0);

        parse_gravity(&mut g, &args(&["ce", "-5"])).unwrap();
        assert_eq!(g.gravity_type, GravityType::Center);
        assert_eq!(g.x, -5.0);
    }

    #[test]
    fn test_parse_focus_point() {
        let mut g = GravityOptions::default();
        parse_gravity(&mut g, &args(&["fp", "0.25", "0.75"])).unwrap();
        assert_eq!(g.gravity_type, GravityType::FocusPoint);
        assert_eq!(g.x, 0.25);
        assert_eq!(g.y, 0.75);

        assert!(parse_gravity(&mut g, &args(&["fp", "0.5"])).is_err());
        assert!(parse_gravity(&mut g, &args(&["fp"])).is_err());
        assert!(parse_gravity(&mut g, &args(&["fp", "1.5", "0.5"])).is_err());
        assert!(parse_gravity(&mut g, &args(&["fp", "0.5", "-0.5"])).is_err());
    }

    #[test]
    fn test_parse_smart_forbids_offsets() {
        let mut g = GravityOptions::default();
        parse_gravity(&mut g, &args(&["sm"])).unwrap();
        assert_eq!(g.gravity_type, GravityType::Smart);
        assert!(parse_gravity(&mut g, &args(&["sm", "1"])).is_err());
    }

    #[test]
    fn test_parse_gravity_errors() {
        let mut g = GravityOptions::default();

        let err = parse_gravity(&mut g, &args(&["up"])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid gravity: up");

        let err = parse_gravity(&mut g, &args(&["no", "x"])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid gravity X: x");

        let err = parse_gravity(&mut g, &args(&["no", "1", "-2"])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid gravity Y: -2");

        assert!(parse_gravity(&mut g, &args(&["no", "1", "2", "3"])).is_err());
        assert!(parse_gravity(&mut g, &[]).is_err());
    }

    #[test]
    fn test_serialize_gravity() {
        let g = GravityOptions::new(GravityType::NorthWest);
        let json = serde_json::to_value(g).unwrap();
        assert_eq!(json["type"], "nowe");
        assert!(serde_json::to_value(GravityType::Unknown).unwrap().is_null());
    }
}

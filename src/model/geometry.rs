use serde::{Deserialize, Serialize};
use std::fmt;

/// Canvas coordinates, origin top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parses a `"X,Y"` attribute value. See [`parse_pair`].
    #[must_use]
    pub fn from_attr(value: Option<&str>) -> Self {
        let (x, y) = parse_pair(value);
        Self { x, y }
    }
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Parses a `"W,H"` attribute value. See [`parse_pair`].
    #[must_use]
    pub fn from_attr(value: Option<&str>) -> Self {
        let (width, height) = parse_pair(value);
        Self { width, height }
    }
}

/// Formats as the `pos` attribute value.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Formats as the `size` attribute value.
impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.width, self.height)
    }
}

/// Splits a two-component attribute value on `,`.
///
/// - Missing value, or a split into anything other than exactly two parts,
///   yields `(0, 0)`.
/// - Each part is trimmed and parsed independently; a part that is not a
///   number becomes `0`.
#[must_use]
pub fn parse_pair(value: Option<&str>) -> (f64, f64) {
    let Some(value) = value else {
        return (0.0, 0.0);
    };

    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 2 {
        log::debug!("ignoring '{value}': expected two comma-separated parts");
        return (0.0, 0.0);
    }

    (parse_or_zero(parts[0]), parse_or_zero(parts[1]))
}

/// Parses a number the way a property text field does: `None` on failure.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

fn parse_or_zero(part: &str) -> f64 {
    parse_number(part).unwrap_or_else(|| {
        log::debug!("'{part}' is not a number, using 0");
        0.0
    })
}

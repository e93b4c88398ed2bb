//! # Numeric Field Parsing
//!
//! Every geometry field on a take-off row is free text typed by a person.
//! This module is the single boundary where that text becomes a number.
//!
//! - Blank or unparseable text is `0.0`, never an error.
//! - A decimal comma is accepted when no point is present ("2,5" is 2.5).
//! - Quantities (lengths, areas, counts) cannot be negative; a negative entry
//!   is treated like an invalid one and becomes `0.0`.
//! - Polygon coordinates may be negative, and an invalid coordinate is
//!   reported as `None` so the caller can withhold the area.

/// Parse free text into a number, treating blank/invalid input as `0.0`.
///
/// # Example
///
/// ```rust
/// use takeoff_core::parsing::parse_number;
///
/// assert_eq!(parse_number("12.5"), 12.5);
/// assert_eq!(parse_number(" 2,5 "), 2.5);
/// assert_eq!(parse_number(""), 0.0);
/// assert_eq!(parse_number("abc"), 0.0);
/// ```
pub fn parse_number(text: &str) -> f64 {
    parse_finite(text).unwrap_or(0.0)
}

/// Parse a physical quantity. Negative values are coerced to `0.0`.
pub fn parse_quantity(text: &str) -> f64 {
    let value = parse_number(text);
    if value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse a polygon coordinate, `None` when the text is not a number.
pub fn parse_coordinate(text: &str) -> Option<f64> {
    parse_finite(text)
}

fn parse_finite(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized;
    let candidate = if !trimmed.contains('.') && trimmed.contains(',') {
        normalized = trimmed.replacen(',', ".", 1);
        normalized.as_str()
    } else {
        trimmed
    };

    candidate.parse::<f64>().ok().filter(|v| v.is_finite())
}

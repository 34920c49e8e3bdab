//! # Input Coercion
//!
//! Raw form values arrive as text or loosely-typed numbers. Every formula in
//! this crate assumes non-negative, finite feet, so anything else is coerced
//! to `0.0` here before it reaches the calculator or the placement engine.
//!
//! ```rust
//! use plot_core::input::{coerce_non_negative, parse_non_negative};
//!
//! assert_eq!(coerce_non_negative(-4.0), 0.0);
//! assert_eq!(parse_non_negative(" 12.5 "), 12.5);
//! assert_eq!(parse_non_negative("abc"), 0.0);
//! ```

/// Clamp a value to `>= 0`, mapping NaN and infinities to `0.0`.
pub fn coerce_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse a text field as non-negative feet. Unparsable text becomes `0.0`.
pub fn parse_non_negative(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .map(coerce_non_negative)
        .unwrap_or(0.0)
}

/// Parse a checkbox-style value.
pub fn parse_flag(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "checked"
    )
}

/// Parse a whole-number count (e.g. floors). Fractions are truncated.
pub fn parse_count(text: &str) -> u32 {
    let value = parse_non_negative(text);
    if value >= u32::MAX as f64 {
        u32::MAX
    } else {
        value as u32
    }
}

/// Normalize an angle in degrees into `[0, 360)`. Non-finite input becomes `0.0`.
pub fn normalize_degrees(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let normalized = value.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

//! Coercion of host-supplied numbers.
//!
//! Numeric input from the host (slider values, text fields, pointer
//! positions) is never rejected: anything that is not a finite number is
//! treated as zero.

/// Replace NaN and infinities with 0.
pub fn coerce_f64(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Coerce, floor, and saturate into `i32`.
pub fn coerce_i32(value: f64) -> i32 {
    // `as` saturates for finite values out of range
    coerce_f64(value).floor() as i32
}

/// Parse a text field as a number; unparseable text becomes 0.
pub fn parse_number(text: &str) -> f64 {
    text.trim().parse::<f64>().map(coerce_f64).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_and_inf_become_zero() {
        assert_eq!(coerce_f64(f64::NAN), 0.0);
        assert_eq!(coerce_f64(f64::INFINITY), 0.0);
        assert_eq!(coerce_f64(-2.5), -2.5);
    }

    #[test]
    fn test_coerce_i32_floors_and_saturates() {
        assert_eq!(coerce_i32(3.9), 3);
        assert_eq!(coerce_i32(-0.5), -1);
        assert_eq!(coerce_i32(f64::NAN), 0);
        assert_eq!(coerce_i32(1e20), i32::MAX);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 24 "), 24.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number("NaN"), 0.0);
        assert_eq!(parse_number(""), 0.0);
    }
}

//! Numeric helpers shared by the codec.

/// Rounds `value` to `digits` significant decimal digits.
///
/// Used when re-encoding inherited timing points, whose wire value is
/// `-100 / slider_velocity` kept to 13 significant digits.
#[must_use]
pub fn round_to_significant_digits(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits as i32 - 1 - magnitude);
    (value * factor).round() / factor
}

/// Formats a number the way the reference format stores it: the shortest
/// representation that round-trips, with a locale-invariant `.` decimal point.
///
/// Relies on [`f64`]'s `Display`, which omits the fractional part for
/// integral values (`600.0` becomes `600`).
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // avoid `-0`
        return "0".into();
    }
    value.to_string()
}

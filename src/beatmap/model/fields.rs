//! Helpers for `Key: Value` scalar section lines.

use std::str::FromStr;

use crate::beatmap::SectionErrorAt;
use crate::beatmap::lex::Line;

/// Splits a line on its first `:`, trimming both sides. Lines without a
/// colon are not key-value lines and are skipped by callers.
pub(crate) fn split_key_value(text: &str) -> Option<(&str, &str)> {
    let (key, value) = text.split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// Parses a typed field value, mapping failure to `InvalidFieldValue`.
pub(crate) fn parse_field<T: FromStr>(
    key: &str,
    value: &str,
    line: &Line<'_>,
) -> Result<T, SectionErrorAt> {
    value
        .parse()
        .map_err(|_| SectionErrorAt::invalid_field(key, value, line))
}

/// Parses a wire boolean. `0` is false, any other integer is true.
pub(crate) fn parse_bool(key: &str, value: &str, line: &Line<'_>) -> Result<bool, SectionErrorAt> {
    let wire: i64 = parse_field(key, value, line)?;
    Ok(wire != 0)
}

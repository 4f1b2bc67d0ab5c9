//! Text form of the numbers in ASCII STL files.
//!
//! Numbers are written `%E` style: one leading digit, six fraction digits,
//! an upper-case `E`, an explicit exponent sign and at least two exponent
//! digits. Reading accepts that form as well as plain decimals.

use std::num::ParseFloatError;

/// Formats `value` like C's `%E`, e.g. `1.000000E+00` or `-2.500000E-03`.
/// Non-finite values come out as `NAN`, `INF` and `-INF`.
pub(crate) fn format_scientific(value: f32) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    // `{:E}` prints the exponent bare (`1.000000E0`), so fix it up.
    let s = format!("{:.6E}", value);
    match s.split_once('E') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}E{sign}{digits:0>2}")
        }
        None => s,
    }
}

/// Parses decimal or scientific notation straight to `f32`, so the value is
/// rounded once. The `NAN`/`INF` spellings produced by `format_scientific`
/// are accepted in any case.
pub(crate) fn parse_scientific(token: &str) -> Result<f32, ParseFloatError> {
    token.parse::<f32>()
}

//! Decimal input parsing and unit value display
//!
//! Users type prices like "3,50" (comma as the decimal separator). Parsing
//! never fails loudly: anything that is not a finite number is simply "no
//! value".

use crate::units::UnitMeasure;

/// Shown in place of a unit value that cannot be computed
pub const NO_VALUE_PLACEHOLDER: &str = "-";

/// Currency prefix used when displaying unit values
pub const CURRENCY_SYMBOL: &str = "R$";

/// Parse user-entered decimal text, accepting ',' as the decimal separator
///
/// Only the first comma is treated as the separator. Leading whitespace is
/// ignored and the longest numeric prefix is read, so "2L" is 2 and "1,5,0"
/// is 1.5. Returns `None` when there is no numeric prefix or the value is
/// not finite.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let normalized = text.trim_start().replacen(',', ".", 1);
    let prefix = numeric_prefix(&normalized);
    if prefix.is_empty() {
        return None;
    }

    prefix.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Longest prefix of the form `[+-]digits[.digits][(e|E)[+-]digits]`
///
/// The mantissa needs at least one digit on either side of the dot. An
/// exponent marker without digits is not part of the prefix.
fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };
    let sign_from = |i: usize| match bytes.get(i) {
        Some(b'+') | Some(b'-') => i + 1,
        _ => i,
    };

    let start = sign_from(0);
    let mut end = digits_from(start);
    let mut mantissa_digits = end - start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return "";
    }
    // "5." keeps its dot; str::parse accepts it

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let exp_start = sign_from(end + 1);
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    &text[..end]
}

/// Unit value of a presentation: price divided by quantity
///
/// `None` when either input is invalid or the quantity is exactly zero. The
/// ratio is not rounded; rounding only happens in [`format_unit_value`].
pub fn compute_unit_value(price: &str, quantity: &str) -> Option<f64> {
    let price = parse_decimal(price)?;
    let quantity = parse_decimal(quantity)?;

    if quantity == 0.0 {
        return None;
    }

    Some(price / quantity)
}

/// Format a number with two decimals and a comma separator ("5,00")
pub fn format_decimal(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

/// Display text for a unit value, e.g. "R$ 5,00/ml", or "-" when missing
pub fn format_unit_value(value: Option<f64>, unit: UnitMeasure) -> String {
    match value {
        Some(v) => format!("{} {}/{}", CURRENCY_SYMBOL, format_decimal(v), unit),
        None => NO_VALUE_PLACEHOLDER.to_string(),
    }
}

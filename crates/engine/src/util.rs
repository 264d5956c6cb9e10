//! Internal helpers for numeric sanitizing and text folding.
//!
//! These utilities are **not** part of the public API. They centralize the
//! "always produce a number" policy so every calculation treats degenerate
//! input the same way.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Normalize a percentage or amount: NaN, infinities and negatives become 0.
///
/// Values above 100 are passed through untouched; percentages are not
/// clamped.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// `value` as a fraction (`50` -> `0.5`), sanitized first.
pub(crate) fn fraction(percent: f64) -> f64 {
    non_negative(percent) / 100.0
}

/// `percent`% of `amount`, with the percentage sanitized.
pub(crate) fn percent_of(amount: f64, percent: f64) -> f64 {
    amount * non_negative(percent) / 100.0
}

/// Divide, returning 0 when the denominator is zero or the result is not
/// finite.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() { value } else { 0.0 }
}

/// Fold text for searching: decompose, drop combining marks and lowercase.
pub(crate) fn fold_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }
    out
}

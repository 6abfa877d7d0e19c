//! CIP (Classification of Instructional Programs) code handling.
//!
//! IPEDS extracts carry CIP codes in several shapes: floats that lost their
//! leading zero (`3.0104`), canonical strings (`03.0104`), and the NCES
//! taxonomy's spreadsheet-safe wrapper (`="03.0104"`). Everything here maps
//! those onto the canonical `NN.NNNN` / `NN` forms.
//!
//! # Example
//!
//! ```rust
//! use ipeds_research::cip::{dewrap, is_cip6, normalize_cipcode};
//!
//! assert_eq!(normalize_cipcode(Some("3.0104")).as_deref(), Some("03.0104"));
//! assert_eq!(dewrap("=\"01.0101\""), "01.0101");
//! assert!(is_cip6("01.0101"));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// Two digits, a dot, four digits.
static CIP6_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}\.\d{4}$").expect("valid CIP6 pattern"));

/// Leading `=` / `="` or trailing `"`.
static WRAPPER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^="?|"$"#).expect("valid wrapper pattern"));

/// Normalize a raw CIP code cell to `NN.NNNN` or `NN`.
///
/// Returns `None` for missing, blank, or `"nan"` input. Numeric input is
/// first rendered with four decimals, so `3.0104` and `"3.0104"` agree.
/// Never fails on malformed text: anything non-numeric is split as-is.
pub fn normalize_cipcode(raw: Option<&str>) -> Option<String> {
    let s = raw?.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return None;
    }

    match s.parse::<f64>() {
        Ok(value) => Some(split_code(&format_fixed4(value))),
        Err(_) => Some(split_code(s)),
    }
}

/// Normalize a numeric CIP code. `NaN` is treated as missing.
pub fn normalize_numeric_cipcode(value: f64) -> Option<String> {
    if value.is_nan() {
        return None;
    }
    Some(split_code(&format_fixed4(value)))
}

/// Strip the `="..."` wrapper NCES puts around codes, repeatedly, then trim.
///
/// Idempotent: `dewrap(&dewrap(x)) == dewrap(x)`.
pub fn dewrap(raw: &str) -> String {
    let mut current = raw.trim().to_string();
    loop {
        let next = WRAPPER_PATTERN.replace_all(&current, "").trim().to_string();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// [`dewrap`] over an optional cell; an empty result counts as missing.
pub fn dewrap_cell(raw: Option<&str>) -> Option<String> {
    let value = dewrap(raw?);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// True iff `code` is a full six-digit CIP code (`NN.NNNN`).
pub fn is_cip6(code: &str) -> bool {
    CIP6_PATTERN.is_match(code)
}

/// Two-digit family of a code: the part before the first dot, zero-filled.
pub fn cip2_of(code: &str) -> String {
    let left = code.split('.').next().unwrap_or("");
    zfill(left, 2)
}

fn split_code(s: &str) -> String {
    match s.split_once('.') {
        Some((left, right)) => {
            let right: String = right.chars().chain("0000".chars()).take(4).collect();
            format!("{}.{}", zfill(left, 2), right)
        }
        None => zfill(s, 2),
    }
}

/// Fixed four-decimal rendering; non-finite values use lowercase names.
fn format_fixed4(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let name = if value > 0.0 { "inf" } else { "-inf" };
        name.to_string()
    } else {
        format!("{:.4}", value)
    }
}

/// Left-pad with zeros to `width` characters, keeping a leading sign first.
fn zfill(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let zeros = "0".repeat(width - len);
    match s.chars().next() {
        Some(sign @ ('+' | '-')) => format!("{}{}{}", sign, zeros, &s[1..]),
        _ => format!("{}{}", zeros, s),
    }
}

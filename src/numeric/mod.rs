//! Locale-aware number normalization
//!
//! Parses numbers as they appear in English and German financial documents:
//! - `1,234.56` / `1.234,56` / `1'234.56` / `1 234,56`
//! - currency symbols and ISO codes anywhere in the string (`$ 1,000`, `12,50 EUR`)
//! - bracketed negatives `(500)`, leading/trailing minus (`-5`, `123,45-`)
//! - magnitude suffixes `K`, `M`, `B`, `Mio.`, `Mrd.`, `Tsd.`
//!
//! A string without a usable number yields `ExtractionIssue::NotNumeric`,
//! never a panic. Callers treat that as "no value".

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExtractionIssue;

static RE_CURRENCY_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(USD|EUR|GBP|CHF|JPY|CAD|AUD|SEK|NOK|DKK|HKD|SGD|CNY|NZD|PLN|CZK|HUF|ZAR)")
        .unwrap()
});

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '₽', '₣'];

/// Magnitude suffixes (lowercase, without trailing dot) and their multipliers.
const MAGNITUDE_SUFFIXES: &[(&str, f64)] = &[
    ("k", 1e3),
    ("tsd", 1e3),
    ("m", 1e6),
    ("mm", 1e6),
    ("mn", 1e6),
    ("mio", 1e6),
    ("b", 1e9),
    ("bn", 1e9),
    ("mrd", 1e9),
    ("tn", 1e12),
];

/// Parse a locale-variant numeric string into a number.
pub fn normalize(input: &str) -> Result<f64, ExtractionIssue> {
    let not_numeric = || ExtractionIssue::NotNumeric(input.to_string());

    // 1. Currency symbols/codes, whitespace and a trailing percent sign
    let without_codes = RE_CURRENCY_CODE.replace_all(input, "");
    let mut s: String = without_codes
        .chars()
        .filter(|c| !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    if s.ends_with('%') {
        s.pop();
    }
    s = s.replace('\u{2212}', "-");

    // 2. Sign: "(123)", "-123", "+123", "123-"
    let mut negative = false;
    if s.len() >= 2 && s.starts_with('(') && s.ends_with(')') {
        negative = true;
        s = s[1..s.len() - 1].to_string();
    }
    if let Some(rest) = s.strip_prefix('-') {
        negative = !negative;
        s = rest.to_string();
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest.to_string();
    } else if s.len() > 1 && s.ends_with('-') {
        negative = !negative;
        s.pop();
    }

    // 3. Magnitude suffix
    let (body, multiplier) = split_magnitude(&s).ok_or_else(not_numeric)?;

    // 4. Thousands separators
    let canonical = canonical_decimal(body).ok_or_else(not_numeric)?;

    // 5. Parse
    let value: f64 = canonical.parse().map_err(|_| not_numeric())?;
    let value = value * multiplier;
    Ok(if negative { -value } else { value })
}

/// `normalize` with the failure mapped to `None`.
pub fn normalize_opt(input: &str) -> Option<f64> {
    normalize(input).ok()
}

pub fn is_numeric(input: &str) -> bool {
    normalize(input).is_ok()
}

/// Split a trailing magnitude suffix off. Returns `None` for unknown letters.
fn split_magnitude(s: &str) -> Option<(&str, f64)> {
    let trimmed = s.strip_suffix('.').unwrap_or(s);
    let alpha_start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphabetic())
        .last()
        .map(|(i, _)| i);

    match alpha_start {
        None => Some((s, 1.0)),
        Some(i) => {
            let suffix = trimmed[i..].to_lowercase();
            MAGNITUDE_SUFFIXES
                .iter()
                .find(|(name, _)| *name == suffix)
                .map(|(_, m)| (&trimmed[..i], *m))
        }
    }
}

/// Remove thousands separators and turn the decimal mark into `.`.
///
/// - both `.` and `,` present: the later one is the decimal mark
/// - only `,`: several commas or exactly three trailing digits (with a
///   non-zero integer part) mean thousands, otherwise decimal comma
/// - only `.`: several dots mean thousands, otherwise decimal point
fn canonical_decimal(s: &str) -> Option<String> {
    let s = s.replace('\'', "");
    if s.is_empty() || !s.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    if !s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let dots = s.matches('.').count();
    let commas = s.matches(',').count();

    let canonical = match (dots > 0, commas > 0) {
        (true, true) => {
            if s.rfind(',') > s.rfind('.') {
                // German: 1.234,56
                s.replace('.', "").replace(',', ".")
            } else {
                // English: 1,234.56
                s.replace(',', "")
            }
        }
        (false, true) => {
            let last = s.rfind(',').unwrap_or(0);
            let after = s.len() - last - 1;
            let integer_part = &s[..last];
            if commas > 1 || (after == 3 && !integer_part.trim_start_matches('0').is_empty()) {
                s.replace(',', "")
            } else {
                s.replace(',', ".")
            }
        }
        (true, false) if dots > 1 => s.replace('.', ""),
        _ => s,
    };

    if canonical.starts_with('.') {
        Some(format!("0{}", canonical))
    } else {
        Some(canonical)
    }
}

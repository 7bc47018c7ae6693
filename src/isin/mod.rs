//! ISIN validation (ISO 6166)
//!
//! Shape: 2 letters (country/issuer prefix), 9 alphanumerics, 1 check digit.
//! The check digit is a Luhn checksum over the digit expansion of the first
//! 11 characters, where letters expand to two digits (A=10 ... Z=35).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::IsinInfo;

static RE_ISIN_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}[A-Z0-9]{9}[0-9]$").unwrap());

/// ISIN-shaped tokens inside running text.
static RE_ISIN_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2}[A-Z0-9]{9}[0-9]\b").unwrap());

/// Prefixes that are not ISO 3166 countries plus the most frequent issuer countries.
const PREFIX_NAMES: &[(&str, &str)] = &[
    ("AT", "Austria"),
    ("AU", "Australia"),
    ("BE", "Belgium"),
    ("CA", "Canada"),
    ("CH", "Switzerland"),
    ("CN", "China"),
    ("DE", "Germany"),
    ("DK", "Denmark"),
    ("ES", "Spain"),
    ("EU", "European Union"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("HK", "Hong Kong"),
    ("IE", "Ireland"),
    ("IT", "Italy"),
    ("JP", "Japan"),
    ("KY", "Cayman Islands"),
    ("LU", "Luxembourg"),
    ("NL", "Netherlands"),
    ("NO", "Norway"),
    ("SE", "Sweden"),
    ("US", "United States"),
    ("XS", "International (Euroclear/Clearstream)"),
];

/// Does the code have the ISIN shape (no checksum test)?
pub fn has_isin_shape(code: &str) -> bool {
    RE_ISIN_SHAPE.is_match(code)
}

/// Check digit for the first 11 characters of an ISIN.
///
/// Returns `None` when a character is neither an ASCII digit nor an
/// uppercase letter.
pub fn compute_check_digit(body: &str) -> Option<u32> {
    let mut digits = String::with_capacity(22);
    for c in body.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if c.is_ascii_uppercase() {
            // A=10, B=11, ..., Z=35
            let val = c as u32 - 'A' as u32 + 10;
            digits.push_str(&val.to_string());
        } else {
            return None;
        }
    }

    // Luhn from the rightmost digit: even positions (0-indexed) are doubled
    let sum: u32 = digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(pos, d)| {
            if pos % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    Some((10 - (sum % 10)) % 10)
}

/// Validate shape and checksum.
pub fn validate(code: &str) -> bool {
    if !has_isin_shape(code) {
        return false;
    }
    let (body, check) = code.split_at(11);
    match (compute_check_digit(body), check.chars().next().and_then(|c| c.to_digit(10))) {
        (Some(expected), Some(actual)) => expected == actual,
        _ => false,
    }
}

/// Reporting view: the prefix is extracted even when the checksum fails.
pub fn describe(code: &str) -> IsinInfo {
    let country_code: String = code.chars().take(2).collect::<String>().to_uppercase();
    let country = PREFIX_NAMES
        .iter()
        .find(|(prefix, _)| *prefix == country_code)
        .map(|(_, name)| name.to_string());

    IsinInfo {
        code: code.to_string(),
        country_code,
        country,
        is_valid: validate(code),
    }
}

/// All ISIN-shaped tokens with their byte offsets, valid or not.
pub fn find_candidates(text: &str) -> Vec<(usize, &str)> {
    RE_ISIN_CANDIDATE
        .find_iter(text)
        .map(|m| (m.start(), m.as_str()))
        .collect()
}

/// Valid ISINs in order of first appearance, without duplicates.
pub fn extract_valid(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for (_, candidate) in find_candidates(text) {
        if found.iter().any(|f| f == candidate) {
            continue;
        }
        if validate(candidate) {
            found.push(candidate.to_string());
        } else {
            log::debug!("Rejected ISIN-shaped token {} (checksum mismatch)", candidate);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_isins() {
        assert!(validate("US0378331005")); // Apple
        assert!(!validate("US0378331006"));
        assert!(validate("DE0005140008")); // Deutsche Bank
        assert!(validate("IE00B4L5Y983")); // iShares Core MSCI World
        assert!(validate("US5949181045")); // Microsoft
        assert!(validate("GB0002634946")); // BAE Systems
        assert!(validate("AU0000XVGZA3"));
    }

    #[test]
    fn test_shape_rejections() {
        assert!(!validate("US037833100")); // too short
        assert!(!validate("US03783310055")); // too long
        assert!(!validate("1S0378331005")); // digit in prefix
        assert!(!validate("US037833100A")); // letter as check digit
        assert!(!validate("us0378331005")); // lowercase
        assert!(!validate(""));
    }

    #[test]
    fn test_validate_is_deterministic() {
        for code in ["US0378331005", "US0378331006", "DE0005140008"] {
            assert_eq!(validate(code), validate(code));
        }
    }

    #[test]
    fn test_compute_check_digit() {
        assert_eq!(compute_check_digit("US037833100"), Some(5));
        assert_eq!(compute_check_digit("DE000514000"), Some(8));
        assert_eq!(compute_check_digit("us037833100"), None);
    }

    #[test]
    fn test_describe() {
        let info = describe("US0378331006");
        assert_eq!(info.country_code, "US");
        assert_eq!(info.country.as_deref(), Some("United States"));
        assert!(!info.is_valid);

        let info = describe("XS1234567890");
        assert_eq!(info.country_code, "XS");

        let info = describe("DE0005140008");
        assert!(info.is_valid);
    }

    #[test]
    fn test_extract_valid_dedup_and_order() {
        let text = "DE0005140008 and US0378331005, again DE0005140008; bad US0378331006";
        assert_eq!(
            extract_valid(text),
            vec!["DE0005140008".to_string(), "US0378331005".to_string()]
        );
    }

    #[test]
    fn test_no_candidates() {
        assert!(extract_valid("No identifiers in this sentence at all.").is_empty());
        assert!(find_candidates("ABC123").is_empty());
    }
}

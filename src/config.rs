//! Extraction configuration
//!
//! Every empirically chosen threshold and window size lives here as a named
//! value. Changing any of them changes observable extraction output, so the
//! defaults must stay as they are unless a caller opts in explicitly.

use serde::{Deserialize, Serialize};

/// Minimum number of contiguous table-like lines (header + 2 data rows).
pub const MIN_TABLE_LINES: usize = 3;

/// Number of leading lines sampled by the adaptive delimiter fallback.
pub const ADAPTIVE_SAMPLE_LINES: usize = 5;

/// Share of sampled lines that must agree on the modal column count.
pub const ADAPTIVE_CONSISTENCY_THRESHOLD: f64 = 0.70;

/// Context radius (characters) around an ISIN occurrence.
pub const ISIN_CONTEXT_CHARS: usize = 100;

/// Context radius (characters) around summary field matches.
pub const SUMMARY_CONTEXT_CHARS: usize = 50;

/// Context radius (characters) around dates and currency amounts.
pub const DATE_CONTEXT_CHARS: usize = 30;
pub const CURRENCY_CONTEXT_CHARS: usize = 30;

/// Context radius (characters) around percentages.
pub const PERCENTAGE_CONTEXT_CHARS: usize = 20;

/// Maximum length of a financial section after its header.
pub const SECTION_MAX_CHARS: usize = 2000;

/// Maximum gap between a quantity/price term and its number.
pub const TERM_MAX_DISTANCE: usize = 20;

/// Tunables shared by every component of one extractor instance.
///
/// Immutable after construction. Deserializes with per-field defaults, so a
/// caller may override a single value: `{"adaptive_sample_lines": 10}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub min_table_lines: usize,
    pub adaptive_sample_lines: usize,
    pub adaptive_consistency_threshold: f64,
    pub isin_context_chars: usize,
    pub summary_context_chars: usize,
    pub date_context_chars: usize,
    pub currency_context_chars: usize,
    pub percentage_context_chars: usize,
    pub section_max_chars: usize,
    pub term_max_distance: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_table_lines: MIN_TABLE_LINES,
            adaptive_sample_lines: ADAPTIVE_SAMPLE_LINES,
            adaptive_consistency_threshold: ADAPTIVE_CONSISTENCY_THRESHOLD,
            isin_context_chars: ISIN_CONTEXT_CHARS,
            summary_context_chars: SUMMARY_CONTEXT_CHARS,
            date_context_chars: DATE_CONTEXT_CHARS,
            currency_context_chars: CURRENCY_CONTEXT_CHARS,
            percentage_context_chars: PERCENTAGE_CONTEXT_CHARS,
            section_max_chars: SECTION_MAX_CHARS,
            term_max_distance: TERM_MAX_DISTANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.min_table_lines, 3);
        assert_eq!(config.adaptive_sample_lines, 5);
        assert!((config.adaptive_consistency_threshold - 0.70).abs() < f64::EPSILON);
        assert_eq!(config.isin_context_chars, 100);
        assert_eq!(config.percentage_context_chars, 20);
        assert_eq!(config.date_context_chars, 30);
        assert_eq!(config.section_max_chars, 2000);
    }

    #[test]
    fn test_partial_override_from_json() {
        let config: ExtractionConfig =
            serde_json::from_str(r#"{"adaptive_sample_lines": 10}"#).unwrap();
        assert_eq!(config.adaptive_sample_lines, 10);
        assert_eq!(config.min_table_lines, 3);
        assert_eq!(config.isin_context_chars, 100);
    }
}

//! Financial sections: asset allocation, currency allocation, performance.
//!
//! A section starts after its header phrase and ends at the next header or
//! end marker, or after a fixed number of characters. Each percentage in the
//! section is attributed to the words before it on the same line.

use std::collections::BTreeMap;

use crate::error::ExtractionIssue;
use crate::models::AllocationEntry;
use crate::numeric;
use crate::patterns::{terms, word_positions, PatternLibrary, TermSet};
use crate::text;

const FALLBACK_WORDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    AssetAllocation,
    CurrencyAllocation,
    Performance,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [
        Self::AssetAllocation,
        Self::CurrencyAllocation,
        Self::Performance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::AssetAllocation => "asset_allocation",
            Self::CurrencyAllocation => "currency_allocation",
            Self::Performance => "performance",
        }
    }

    fn headers(self) -> &'static TermSet {
        match self {
            Self::AssetAllocation => &terms::ASSET_ALLOCATION_HEADERS,
            Self::CurrencyAllocation => &terms::CURRENCY_ALLOCATION_HEADERS,
            Self::Performance => &terms::PERFORMANCE_HEADERS,
        }
    }
}

/// Section body following the header, original casing where possible.
pub fn locate(document: &str, kind: SectionKind, max_chars: usize) -> Result<String, ExtractionIssue> {
    let lower = document.to_lowercase();
    let (header_pos, header) = kind
        .headers()
        .first_occurrence(&lower)
        .ok_or(ExtractionIssue::SectionNotFound(kind.name()))?;

    let start = header_pos + header.len();
    let limit = text::chars_after(&lower, start, max_chars);
    let rest = &lower[start..limit];

    let end = SectionKind::ALL
        .iter()
        .filter(|other| **other != kind)
        .filter_map(|other| other.headers().first_occurrence(rest))
        .chain(terms::SECTION_END_MARKERS.first_occurrence(rest))
        .map(|(pos, _)| start + pos)
        .min()
        .unwrap_or(limit);

    // Offsets come from the lowercase text; they only carry over when
    // lowercasing kept every byte length.
    let original = if lower.len() == document.len() {
        document.get(start..end)
    } else {
        None
    };
    Ok(original.unwrap_or(&lower[start..end]).to_string())
}

/// One percentage with the text that labels it.
#[derive(Debug)]
struct Segment<'s> {
    /// From the line start (or the previous percentage) to this percentage.
    lead: &'s str,
    /// From this percentage to the next digit or the end of the line.
    trail: &'s str,
    value: &'s str,
    numeric: Option<f64>,
}

fn segments<'s>(patterns: &PatternLibrary, section: &'s str) -> Vec<Segment<'s>> {
    let mut found = Vec::new();
    let mut previous_end = 0;

    for caps in patterns.percentage.captures_iter(section) {
        let (Some(whole), Some(value)) = (caps.get(0), caps.name("value")) else {
            continue;
        };
        let line_start = section[..whole.start()].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let lead_start = line_start.max(previous_end);

        let after = &section[whole.end()..];
        let trail_len = after
            .find(|c: char| c == '\n' || c.is_ascii_digit())
            .unwrap_or(after.len());

        found.push(Segment {
            lead: &section[lead_start..whole.start()],
            trail: &after[..trail_len],
            value: whole.as_str(),
            numeric: numeric::normalize_opt(value.as_str()),
        });
        previous_end = whole.end();
    }
    found
}

fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fallback_label(lead: &str) -> Option<String> {
    let words = text::last_words(lead, FALLBACK_WORDS);
    (!words.is_empty()).then(|| words.join(" "))
}

pub fn asset_allocation(
    patterns: &PatternLibrary,
    document: &str,
    max_chars: usize,
) -> Result<Vec<AllocationEntry>, ExtractionIssue> {
    let section = locate(document, SectionKind::AssetAllocation, max_chars)?;
    let entries = allocation_entries(patterns, &section, |segment| {
        terms::ASSET_CLASSES
            .longest_match(&segment.lead.to_lowercase())
            .map(capitalize)
            .or_else(|| fallback_label(segment.lead))
            .or_else(|| {
                terms::ASSET_CLASSES
                    .longest_match(&segment.trail.to_lowercase())
                    .map(capitalize)
            })
    });
    non_empty(entries, SectionKind::AssetAllocation)
}

pub fn currency_allocation(
    patterns: &PatternLibrary,
    document: &str,
    max_chars: usize,
) -> Result<Vec<AllocationEntry>, ExtractionIssue> {
    let section = locate(document, SectionKind::CurrencyAllocation, max_chars)?;
    let currency_in = |fragment: &str| -> Option<String> {
        patterns
            .currency_token
            .find_iter(fragment)
            .last()
            .map(|m| patterns.currency_code(m.as_str()))
            .or_else(|| {
                terms::CURRENCY_NAMES
                    .longest_match(&fragment.to_lowercase())
                    .map(capitalize)
            })
    };
    let entries = allocation_entries(patterns, &section, |segment| {
        currency_in(segment.lead)
            .or_else(|| fallback_label(segment.lead))
            .or_else(|| currency_in(segment.trail))
    });
    non_empty(entries, SectionKind::CurrencyAllocation)
}

/// Period key to percentage string, e.g. `ytd → "+4.5%"`.
pub fn performance(
    patterns: &PatternLibrary,
    document: &str,
    max_chars: usize,
) -> Result<BTreeMap<String, String>, ExtractionIssue> {
    let section = locate(document, SectionKind::Performance, max_chars)?;
    let mut periods = BTreeMap::new();

    for segment in segments(patterns, &section) {
        let Some(key) = period_key(patterns, segment.lead) else {
            continue;
        };
        periods
            .entry(key)
            .or_insert_with(|| segment.value.trim().to_string());
    }

    if periods.is_empty() {
        return Err(ExtractionIssue::NoMatch(SectionKind::Performance.name()));
    }
    Ok(periods)
}

fn period_key(patterns: &PatternLibrary, lead: &str) -> Option<String> {
    let lower = lead.to_lowercase();
    let known = terms::PERFORMANCE_PERIODS
        .iter()
        .filter(|(phrase, _)| word_positions(&lower, phrase).next().is_some())
        .max_by_key(|(phrase, _)| phrase.len())
        .map(|(_, key)| key.to_string());
    if known.is_some() {
        return known;
    }

    if let Some(year) = patterns.year.find_iter(lead).last() {
        return Some(year.as_str().to_string());
    }

    let words = text::last_words(lead, FALLBACK_WORDS);
    (!words.is_empty()).then(|| words.join("_").to_lowercase())
}

fn allocation_entries<F>(patterns: &PatternLibrary, section: &str, label: F) -> Vec<AllocationEntry>
where
    F: Fn(&Segment<'_>) -> Option<String>,
{
    segments(patterns, section)
        .iter()
        .filter_map(|segment| {
            let percentage = segment.numeric?;
            let category = label(segment)?;
            Some(AllocationEntry {
                category,
                percentage,
            })
        })
        .collect()
}

fn non_empty(
    entries: Vec<AllocationEntry>,
    kind: SectionKind,
) -> Result<Vec<AllocationEntry>, ExtractionIssue> {
    if entries.is_empty() {
        Err(ExtractionIssue::NoMatch(kind.name()))
    } else {
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "Portfolio Report
Asset Allocation
Equities 60.0%
Bonds 30.0%
Real Estate Investment Trusts 5%
Cash 5.0%
Currency Allocation
USD 70%
EUR 30%
Performance
YTD +4.5%
1 Year 8.2%
Since inception 35.1%
Important information
Past results of 10% are no guarantee.";

    fn lib() -> &'static PatternLibrary {
        PatternLibrary::shared()
    }

    #[test]
    fn test_asset_allocation() {
        let entries = asset_allocation(lib(), REPORT, 2000).unwrap();
        let labels: Vec<&str> = entries.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(labels, vec!["Equities", "Bonds", "Real estate", "Cash"]);
        assert!((entries[0].percentage - 60.0).abs() < 1e-9);
        assert!((entries[2].percentage - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_currency_allocation() {
        let entries = currency_allocation(lib(), REPORT, 2000).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, "USD");
        assert!((entries[1].percentage - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_performance_keys() {
        let periods = performance(lib(), REPORT, 2000).unwrap();
        assert_eq!(periods.len(), 3);
        assert_eq!(periods["ytd"], "+4.5%");
        assert_eq!(periods["1y"], "8.2%");
        assert_eq!(periods["since_inception"], "35.1%");
    }

    #[test]
    fn test_section_cut_at_character_limit() {
        let section = locate(REPORT, SectionKind::AssetAllocation, 20).unwrap();
        assert_eq!(section.chars().count(), 20);
        assert!(section.contains("Equities"));
    }

    #[test]
    fn test_missing_section() {
        assert_eq!(
            asset_allocation(lib(), "No allocation data here.", 2000).unwrap_err(),
            ExtractionIssue::SectionNotFound("asset_allocation")
        );
    }

    #[test]
    fn test_german_allocation_and_fallback_label() {
        let text = "Vermögensaufteilung\nAktien 55,5 %\nAnleihen 40 %\nInfrastruktur Debt Fonds Plus 4,5 %\nHinweise\n";
        let entries = asset_allocation(lib(), text, 2000).unwrap();
        assert_eq!(entries[0].category, "Aktien");
        assert!((entries[0].percentage - 55.5).abs() < 1e-9);
        assert_eq!(entries[1].category, "Anleihen");
        assert_eq!(entries[2].category, "Fonds");

        let text = "Asset allocation\nInfrastructure Debt Vehicle 12%\n";
        let entries = asset_allocation(lib(), text, 2000).unwrap();
        assert_eq!(entries[0].category, "Infrastructure Debt Vehicle");
    }

    #[test]
    fn test_performance_year_and_fallback_keys() {
        let text = "Wertentwicklung\n2023: 12,1 %\nlfd. Jahr 3,4 %\nBenchmark Index -2 %\n";
        let periods = performance(lib(), text, 2000).unwrap();
        assert_eq!(periods["2023"], "12,1 %");
        assert_eq!(periods["ytd"], "3,4 %");
        assert_eq!(periods["benchmark_index"], "-2 %");
    }
}

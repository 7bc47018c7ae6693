//! Security records from ISIN occurrences
//!
//! For one valid ISIN: every occurrence with a context window, a name taken
//! from the text around the first occurrence that yields one, and the
//! quantities, prices and currencies mentioned near the code.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ExtractionConfig;
use crate::error::ExtractionIssue;
use crate::isin;
use crate::models::{Occurrence, PageText, PriceMatch, QuantityMatch, SecurityRecord};
use crate::patterns::{terms, PatternLibrary, TermSet};
use crate::text;

/// Capitalized phrase at the end of the text before the ISIN, optionally
/// followed by a line break and an `ISIN` label. Words may start with one
/// lowercase letter (`iShares`).
static RE_NAME_BEFORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?P<name>(?:\p{Lu}|\p{Ll}\p{Lu})[\p{L}\p{N}&.'\-]*(?:[ \t]+(?:(?:\p{Lu}|\p{Ll}\p{Lu})[\p{L}\p{N}&.'\-]*|&)){0,7})[ \t]*(?:\r?\n[ \t]*)?(?:\(?ISIN[ \t]*:?[ \t]*)?$",
    )
    .unwrap()
});

/// Capitalized phrase at the start of the text after the ISIN.
static RE_NAME_AFTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[ \t]*[:|)\-–]?[ \t]*(?P<name>(?:\p{Lu}|\p{Ll}\p{Lu})[\p{L}\p{N}&.'\-]*(?:[ \t]+(?:(?:\p{Lu}|\p{Ll}\p{Lu})[\p{L}\p{N}&.'\-]*|&)){0,7})",
    )
    .unwrap()
});

/// Words that label a column or field rather than name a security.
const NON_NAMES: &[&str] = &[
    "isin", "wkn", "name", "security", "securities", "total", "price", "quantity", "wertpapier",
    "bezeichnung", "summe", "kurs", "stück",
];

const MAX_PRECEDING_WORDS: usize = 4;

/// Ordered name resolution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStrategy {
    /// `Apple Inc US0378331005`, `Apple Inc ISIN: US0378331005`
    PrecedingPhrase,
    /// `US0378331005 Apple Inc`
    FollowingPhrase,
    /// Last capitalized words before the code, punctuation ignored.
    PrecedingWords,
}

impl NameStrategy {
    pub const ORDER: [NameStrategy; 3] = [
        Self::PrecedingPhrase,
        Self::FollowingPhrase,
        Self::PrecedingWords,
    ];

    /// Try this strategy on the text around one occurrence.
    pub fn resolve(self, before: &str, after: &str) -> Option<String> {
        let raw = match self {
            Self::PrecedingPhrase => RE_NAME_BEFORE
                .captures(before)
                .and_then(|c| c.name("name"))
                .map(|m| m.as_str().to_string()),
            Self::FollowingPhrase => RE_NAME_AFTER
                .captures(after)
                .and_then(|c| c.name("name"))
                .map(|m| m.as_str().to_string()),
            Self::PrecedingWords => preceding_capitalized_words(before),
        }?;
        clean_name(&raw)
    }
}

fn preceding_capitalized_words(before: &str) -> Option<String> {
    let words: Vec<&str> = before
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '|' | '(' | ')')))
        .filter(|w| !w.is_empty())
        .collect();

    let mut picked: Vec<&str> = words
        .iter()
        .rev()
        .skip_while(|w| w.eq_ignore_ascii_case("isin"))
        .take_while(|w| w.chars().next().map(char::is_uppercase).unwrap_or(false))
        .take(MAX_PRECEDING_WORDS)
        .copied()
        .collect();
    if picked.is_empty() {
        return None;
    }
    picked.reverse();
    Some(picked.join(" "))
}

/// Trim labels and punctuation; reject field labels and codes.
fn clean_name(raw: &str) -> Option<String> {
    let mut words: Vec<&str> = Vec::new();
    for word in raw.split_whitespace() {
        // a second code ends the name
        if isin::has_isin_shape(word.trim_matches(|c: char| !c.is_alphanumeric())) {
            break;
        }
        words.push(word);
    }
    while let Some(last) = words.last() {
        let bare = last.trim_matches(|c: char| !c.is_alphanumeric());
        if bare.is_empty() || bare.eq_ignore_ascii_case("isin") || bare.eq_ignore_ascii_case("wkn") {
            words.pop();
        } else {
            break;
        }
    }

    let name = words
        .join(" ")
        .trim_matches(|c: char| matches!(c, '-' | '–' | ':' | '|' | '(' | ',' | ' '))
        .to_string();
    if name.chars().count() < 2 {
        return None;
    }
    let lower = name.to_lowercase();
    if NON_NAMES.contains(&lower.as_str())
        || terms::CURRENCY_CODES.iter().any(|c| c.eq_ignore_ascii_case(&name))
    {
        return None;
    }
    Some(name)
}

/// Text around one occurrence: the window split at the code.
struct Neighbourhood<'t> {
    before: &'t str,
    after: &'t str,
}

/// Extracts [`SecurityRecord`]s for individual ISINs.
pub struct SecurityExtractor<'p> {
    patterns: &'p PatternLibrary,
    context_chars: usize,
    quantity: Regex,
    price: Regex,
}

impl<'p> SecurityExtractor<'p> {
    pub fn new(patterns: &'p PatternLibrary, config: &ExtractionConfig) -> Self {
        Self {
            patterns,
            context_chars: config.isin_context_chars,
            quantity: proximity_regex(&terms::QUANTITY_TERMS, config.term_max_distance),
            price: proximity_regex(&terms::PRICE_TERMS, config.term_max_distance),
        }
    }

    /// Build the record for `code`, searching each page, or `full_text`
    /// when no page contains the code.
    pub fn extract(
        &self,
        code: &str,
        pages: &BTreeMap<usize, PageText>,
        full_text: &str,
    ) -> Result<SecurityRecord, ExtractionIssue> {
        if !isin::validate(code) {
            return Err(ExtractionIssue::InvalidIsin(code.to_string()));
        }

        let mut record = SecurityRecord::new(code);
        let mut neighbourhoods: Vec<Neighbourhood<'_>> = Vec::new();

        for (&page_index, page) in pages {
            self.collect_occurrences(
                code,
                Some(page_index),
                &page.text,
                &mut record,
                &mut neighbourhoods,
            );
        }
        // No pages, or pages that do not carry the code found in the full text
        if record.occurrences.is_empty() {
            self.collect_occurrences(code, None, full_text, &mut record, &mut neighbourhoods);
        }

        if record.occurrences.is_empty() {
            return Err(ExtractionIssue::NoOccurrences(code.to_string()));
        }

        if let Some(name) = resolve_name(&neighbourhoods) {
            record.name = name;
        }

        let contexts: Vec<String> = record.occurrences.iter().map(|o| o.context.clone()).collect();
        for context in &contexts {
            self.collect_terms(context, &mut record);
        }
        self.collect_currencies(&mut record);

        log::debug!(
            "Security {} ({}): {} occurrence(s), {} quantity, {} price match(es)",
            record.isin,
            record.name,
            record.occurrences.len(),
            record.quantities.len(),
            record.prices.len()
        );
        Ok(record)
    }

    fn collect_occurrences<'t>(
        &self,
        code: &str,
        page_index: Option<usize>,
        text: &'t str,
        record: &mut SecurityRecord,
        neighbourhoods: &mut Vec<Neighbourhood<'t>>,
    ) {
        for (position, _) in text.match_indices(code) {
            let end = position + code.len();
            let from = text::chars_before(text, position, self.context_chars);
            let to = text::chars_after(text, end, self.context_chars);

            record.occurrences.push(Occurrence {
                page_index,
                position,
                context: text[from..to].trim().to_string(),
            });
            neighbourhoods.push(Neighbourhood {
                before: &text[from..position],
                after: &text[end..to],
            });
        }
    }

    /// Quantity and price terms in one occurrence's context.
    fn collect_terms(&self, context: &str, record: &mut SecurityRecord) {
        let lower = context.to_lowercase();

        for caps in self.quantity.captures_iter(&lower) {
            let (Some(term), Some(value)) = (caps.name("term"), caps.name("value")) else {
                continue;
            };
            let found = QuantityMatch {
                value: value.as_str().to_string(),
                term: term.as_str().to_string(),
                context: caps[0].trim().to_string(),
            };
            if !record.quantities.contains(&found) {
                record.quantities.push(found);
            }
        }

        for caps in self.price.captures_iter(&lower) {
            let (Some(term), Some(value)) = (caps.name("term"), caps.name("value")) else {
                continue;
            };
            let currency = caps.name("currency").map(|c| display_currency(c.as_str()));
            let found = PriceMatch {
                value: value.as_str().to_string(),
                currency,
                term: term.as_str().to_string(),
                context: caps[0].trim().to_string(),
            };
            if !record.prices.contains(&found) {
                record.prices.push(found);
            }
        }
    }

    /// Price currencies, else any currency token near the code.
    fn collect_currencies(&self, record: &mut SecurityRecord) {
        record
            .currencies
            .extend(record.prices.iter().filter_map(|p| p.currency.clone()));
        if !record.currencies.is_empty() {
            return;
        }

        let found: Vec<String> = record
            .occurrences
            .iter()
            .flat_map(|o| {
                self.patterns
                    .currency_token
                    .find_iter(&o.context)
                    .map(|m| m.as_str().to_string())
                    .collect::<Vec<_>>()
            })
            .collect();
        record.currencies.extend(found);
    }
}

/// First occurrence with a name wins; strategies are tried in order per occurrence.
fn resolve_name(neighbourhoods: &[Neighbourhood<'_>]) -> Option<String> {
    neighbourhoods.iter().find_map(|n| {
        NameStrategy::ORDER
            .iter()
            .find_map(|strategy| strategy.resolve(n.before, n.after))
    })
}

/// Symbols stay as written, codes are uppercased.
fn display_currency(token: &str) -> String {
    token.to_uppercase()
}

/// `term ... [currency] number` within `distance` characters, on lowercase text.
/// The number must start a word, so the digits of a code such as an ISIN
/// never count.
fn proximity_regex(term_set: &TermSet, distance: usize) -> Regex {
    let mut words: Vec<&str> = term_set.iter().collect();
    words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    let codes = terms::CURRENCY_CODES
        .iter()
        .map(|c| c.to_lowercase())
        .collect::<Vec<_>>()
        .join("|");

    let pattern = format!(
        r"\b(?P<term>{terms})\b[^0-9$€£¥₣\n]{{0,{distance}}}?(?:(?P<currency>[$€£¥₣]|\b(?:{codes})\b)[\s):]*)?\b(?P<value>\d+(?:[.,']\d+)*)",
        terms = alternation,
        distance = distance,
        codes = codes
    );
    Regex::new(&pattern).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(config: &ExtractionConfig) -> SecurityExtractor<'static> {
        SecurityExtractor::new(PatternLibrary::shared(), config)
    }

    #[test]
    fn test_apple_inline_record() {
        let config = ExtractionConfig::default();
        let text = "Apple Inc US0378331005 price: $145.86 quantity: 100";
        let record = extractor(&config)
            .extract("US0378331005", &BTreeMap::new(), text)
            .unwrap();

        assert_eq!(record.name, "Apple Inc");
        assert_eq!(record.occurrences.len(), 1);
        assert_eq!(record.occurrences[0].page_index, None);
        assert_eq!(record.occurrences[0].position, 10);

        assert_eq!(record.quantities.len(), 1);
        assert_eq!(record.quantities[0].value, "100");
        assert_eq!(record.quantities[0].term, "quantity");

        assert_eq!(record.prices.len(), 1);
        assert_eq!(record.prices[0].value, "145.86");
        assert_eq!(record.prices[0].currency.as_deref(), Some("$"));
        assert!(record.currencies.contains("$"));
    }

    #[test]
    fn test_name_strategies_in_order() {
        assert_eq!(
            NameStrategy::PrecedingPhrase.resolve("Depot\nDeutsche Bank AG ISIN: ", " 10 Stück"),
            Some("Deutsche Bank AG".to_string())
        );
        assert_eq!(
            NameStrategy::PrecedingPhrase.resolve("Holding: ", " - iShares Core MSCI World"),
            None
        );
        assert_eq!(
            NameStrategy::FollowingPhrase.resolve("Holding: ", " - iShares Core MSCI World"),
            Some("iShares Core MSCI World".to_string())
        );
        assert_eq!(
            NameStrategy::FollowingPhrase.resolve("1) ", " | Siemens AG | 50"),
            Some("Siemens AG".to_string())
        );
        assert_eq!(
            NameStrategy::PrecedingWords.resolve("we hold Apple Inc., ", ""),
            Some("Apple Inc.".to_string())
        );
    }

    #[test]
    fn test_labels_are_not_names() {
        assert_eq!(NameStrategy::PrecedingPhrase.resolve("ISIN ", ""), None);
        assert_eq!(NameStrategy::FollowingPhrase.resolve("", " EUR 100"), None);
        assert_eq!(
            NameStrategy::FollowingPhrase.resolve("", " DE0005140008 Deutsche Bank"),
            None
        );
    }

    #[test]
    fn test_unknown_name_when_nothing_capitalized() {
        let config = ExtractionConfig::default();
        let text = "position 7: us listing us0378331005 ... US0378331005 (no further data)";
        let record = extractor(&config)
            .extract("US0378331005", &BTreeMap::new(), text)
            .unwrap();
        assert_eq!(record.name, "Unknown");
        assert!(!record.has_name());
    }

    #[test]
    fn test_pages_searched_individually() {
        let config = ExtractionConfig::default();
        let mut pages = BTreeMap::new();
        pages.insert(0, PageText { text: "Cover page".to_string() });
        pages.insert(
            1,
            PageText {
                text: "Siemens AG DE0007236101 Stück 50 Kurs EUR 120,50".to_string(),
            },
        );
        pages.insert(2, PageText { text: "Summary DE0007236101".to_string() });

        let record = extractor(&config)
            .extract("DE0007236101", &pages, "")
            .unwrap();
        assert_eq!(record.occurrences.len(), 2);
        assert_eq!(record.occurrences[0].page_index, Some(1));
        assert_eq!(record.occurrences[1].page_index, Some(2));
        assert_eq!(record.name, "Siemens AG");
        assert_eq!(record.quantities[0].term, "stück");
        assert_eq!(record.quantities[0].value, "50");
        assert_eq!(record.prices[0].term, "kurs");
        assert_eq!(record.prices[0].currency.as_deref(), Some("EUR"));
        assert_eq!(record.prices[0].value, "120,50");
    }

    #[test]
    fn test_currency_fallback_from_context() {
        let config = ExtractionConfig::default();
        let text = "iShares Core MSCI World IE00B4L5Y983 denominated in USD";
        let record = extractor(&config)
            .extract("IE00B4L5Y983", &BTreeMap::new(), text)
            .unwrap();
        assert_eq!(record.name, "iShares Core MSCI World");
        assert!(record.prices.is_empty());
        assert_eq!(record.currencies.iter().collect::<Vec<_>>(), vec!["USD"]);
    }

    #[test]
    fn test_errors() {
        let config = ExtractionConfig::default();
        let extractor = extractor(&config);
        assert_eq!(
            extractor
                .extract("US0378331006", &BTreeMap::new(), "US0378331006")
                .unwrap_err(),
            ExtractionIssue::InvalidIsin("US0378331006".to_string())
        );
        assert_eq!(
            extractor
                .extract("US0378331005", &BTreeMap::new(), "nothing here")
                .unwrap_err(),
            ExtractionIssue::NoOccurrences("US0378331005".to_string())
        );
    }

    #[test]
    fn test_repeated_matches_are_recorded_once() {
        let config = ExtractionConfig::default();
        let text = "Apple Inc US0378331005 US0378331005 shares 10";
        let record = extractor(&config)
            .extract("US0378331005", &BTreeMap::new(), text)
            .unwrap();
        assert_eq!(record.occurrences.len(), 2);
        assert_eq!(record.quantities.len(), 1);
    }

    #[test]
    fn test_isin_digits_are_not_quantities_or_prices() {
        let config = ExtractionConfig::default();
        let extractor = extractor(&config);

        let record = extractor
            .extract("US0378331005", &BTreeMap::new(), "Holding: Apple Inc US0378331005")
            .unwrap();
        assert!(record.quantities.is_empty());
        assert!(record.prices.is_empty());

        let record = extractor
            .extract(
                "DE0005140008",
                &BTreeMap::new(),
                "Market value of Deutsche Bank DE0005140008",
            )
            .unwrap();
        assert!(record.quantities.is_empty());
        assert!(record.prices.is_empty());

        let record = extractor
            .extract("DE0005140008", &BTreeMap::new(), "Deutsche Bank DE0005140008 Bestand 25")
            .unwrap();
        assert_eq!(record.quantities[0].value, "25");
    }

    #[test]
    fn test_full_text_searched_when_pages_lack_code() {
        let config = ExtractionConfig::default();
        let mut pages = BTreeMap::new();
        pages.insert(0, PageText { text: "Cover page".to_string() });

        let record = extractor(&config)
            .extract("DE0007236101", &pages, "Siemens AG DE0007236101 Stück 50")
            .unwrap();
        assert_eq!(record.occurrences.len(), 1);
        assert_eq!(record.occurrences[0].page_index, None);
        assert_eq!(record.name, "Siemens AG");
    }
}

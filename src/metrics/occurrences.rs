//! Percentages, dates and currency amounts anywhere in the document.

use std::ops::Range;

use regex::Regex;

use crate::models::{CurrencyOccurrence, DateOccurrence, PercentageOccurrence};
use crate::numeric;
use crate::patterns::{parse_date, PatternLibrary};
use crate::text;

pub fn percentages(
    patterns: &PatternLibrary,
    document: &str,
    radius: usize,
) -> Vec<PercentageOccurrence> {
    patterns
        .percentage
        .captures_iter(document)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let value = caps.name("value")?;
            Some(PercentageOccurrence {
                value: whole.as_str().to_string(),
                numeric: numeric::normalize_opt(value.as_str()),
                position: whole.start(),
                context: text::context_window(document, whole.start(), whole.end(), radius),
            })
        })
        .collect()
}

pub fn dates(patterns: &PatternLibrary, document: &str, radius: usize) -> Vec<DateOccurrence> {
    let spans = collect_spans(&patterns.dates, document, "date");
    non_overlapping(spans)
        .into_iter()
        .map(|(span, _)| {
            let value = &document[span.clone()];
            DateOccurrence {
                value: value.to_string(),
                iso_date: parse_date(value).map(|d| d.format("%Y-%m-%d").to_string()),
                position: span.start,
                context: text::context_window(document, span.start, span.end, radius),
            }
        })
        .collect()
}

pub fn currency_amounts(
    patterns: &PatternLibrary,
    document: &str,
    radius: usize,
) -> Vec<CurrencyOccurrence> {
    let mut spans: Vec<(Range<usize>, (String, String))> = Vec::new();
    for re in [&patterns.currency_prefixed, &patterns.currency_suffixed] {
        for caps in re.captures_iter(document) {
            if let (Some(whole), Some(value), Some(currency)) =
                (caps.get(0), caps.name("value"), caps.name("currency"))
            {
                spans.push((
                    whole.range(),
                    (value.as_str().to_string(), currency.as_str().to_string()),
                ));
            }
        }
    }

    non_overlapping(spans)
        .into_iter()
        .map(|(span, (value, currency))| CurrencyOccurrence {
            value: document[span.clone()].trim().to_string(),
            currency: patterns.currency_code(&currency),
            amount: numeric::normalize_opt(&value),
            position: span.start,
            context: text::context_window(document, span.start, span.end, radius),
        })
        .collect()
}

fn collect_spans(
    regexes: &[Regex],
    document: &str,
    group: &str,
) -> Vec<(Range<usize>, ())> {
    regexes
        .iter()
        .flat_map(|re| {
            re.captures_iter(document)
                .filter_map(|caps| caps.name(group).map(|m| (m.range(), ())))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Earliest start wins, the longer span at equal starts; overlapping later
/// spans are dropped.
fn non_overlapping<T>(mut spans: Vec<(Range<usize>, T)>) -> Vec<(Range<usize>, T)> {
    spans.sort_by(|a, b| a.0.start.cmp(&b.0.start).then(b.0.end.cmp(&a.0.end)));

    let mut kept: Vec<(Range<usize>, T)> = Vec::new();
    for (span, payload) in spans {
        if kept.last().map_or(true, |(last, _)| span.start >= last.end) {
            kept.push((span, payload));
        }
    }
    kept
}

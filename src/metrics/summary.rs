//! Document summary fields: total value, account number, client name,
//! valuation date.

use regex::Regex;

use crate::error::ExtractionIssue;
use crate::models::SummaryField;
use crate::patterns::PatternLibrary;
use crate::text;

/// Words that end a client name captured from a run of capitalized words.
const NAME_STOP_WORDS: &[&str] = &[
    "account", "accounts", "konto", "depot", "portfolio", "date", "datum", "no", "nr", "iban",
    "valuation", "stichtag",
];

pub fn total_portfolio_value(
    patterns: &PatternLibrary,
    document: &str,
    radius: usize,
) -> Result<SummaryField, ExtractionIssue> {
    find_field(
        patterns,
        &patterns.summary.total_value,
        document,
        radius,
        "total_portfolio_value",
    )
}

pub fn account_number(
    patterns: &PatternLibrary,
    document: &str,
    radius: usize,
) -> Result<SummaryField, ExtractionIssue> {
    let mut field = find_field(
        patterns,
        &patterns.summary.account_number,
        document,
        radius,
        "account_number",
    )?;
    field.value = text::collapse_whitespace(&field.value);
    Ok(field)
}

pub fn client_name(
    patterns: &PatternLibrary,
    document: &str,
    radius: usize,
) -> Result<SummaryField, ExtractionIssue> {
    let mut field = find_field(
        patterns,
        &patterns.summary.client_name,
        document,
        radius,
        "client_name",
    )?;

    let kept: Vec<&str> = field
        .value
        .split_whitespace()
        .take_while(|w| {
            let bare = w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            !NAME_STOP_WORDS.contains(&bare.as_str())
        })
        .collect();
    if kept.is_empty() {
        return Err(ExtractionIssue::NoMatch("client_name"));
    }
    field.value = kept.join(" ");
    Ok(field)
}

pub fn valuation_date(
    patterns: &PatternLibrary,
    document: &str,
    radius: usize,
) -> Result<SummaryField, ExtractionIssue> {
    find_field(
        patterns,
        &patterns.summary.valuation_date,
        document,
        radius,
        "valuation_date",
    )
}

/// First pattern in `list` that matches anywhere; `field` names the miss.
fn find_field(
    patterns: &PatternLibrary,
    list: &[Regex],
    document: &str,
    radius: usize,
    field: &'static str,
) -> Result<SummaryField, ExtractionIssue> {
    let (found, span) = patterns
        .first_match(list, document)
        .ok_or(ExtractionIssue::NoMatch(field))?;

    Ok(SummaryField {
        value: found.primary_value,
        currency: found.secondary_value,
        context: text::context_window(document, span.start, span.end, radius),
    })
}

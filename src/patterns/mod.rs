//! Bilingual pattern catalogs
//!
//! Every regex the extractors share is compiled here, once, and handed out
//! through [`PatternLibrary::shared`]. Term lists live in [`terms`].

pub mod terms;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::{MatchResult, TableCategory};

static LIBRARY: Lazy<PatternLibrary> = Lazy::new(PatternLibrary::new);

const AMOUNT: &str = r"\d+(?:[.,']\d+)*";
const CURRENCY_SYMBOL_CLASS: &str = "[$€£¥₣]";
const MONTH_ALT: &str = "January|February|March|April|May|June|July|August|September|October|November|December|Januar|Februar|Jänner|März|Maerz|Mai|Juni|Juli|Oktober|Dezember|Sept|Jan|Feb|Mar|Mär|Apr|Jun|Jul|Aug|Sep|Oct|Okt|Nov|Dec|Dez";
const DATE_ALT: &str = r"\d{4}-\d{2}-\d{2}|\d{1,2}\.\d{1,2}\.\d{4}|\d{1,2}/\d{1,2}/\d{4}|\d{1,2}\.?\s+\p{L}+\.?\s+\d{4}|\p{L}+\.?\s+\d{1,2},?\s+\d{4}";
const NAME: &str = r"(?:(?:Mr|Mrs|Ms|Dr|Herr|Frau)\.?\s+)?\p{Lu}[\p{L}'.\-]*(?:[ \t]+\p{Lu}[\p{L}'.\-]*){0,4}";

/// A bilingual list of lowercase terms.
#[derive(Debug, Clone, Copy)]
pub struct TermSet {
    pub english: &'static [&'static str],
    pub german: &'static [&'static str],
}

impl TermSet {
    pub fn iter(&self) -> impl Iterator<Item = &'static str> {
        self.english.iter().chain(self.german.iter()).copied()
    }

    /// Total word-bounded occurrences of all terms in `haystack` (lowercase).
    pub fn count_in(&self, haystack: &str) -> usize {
        self.iter()
            .map(|term| word_positions(haystack, term).count())
            .sum()
    }

    /// Longest term occurring in `haystack` (lowercase).
    pub fn longest_match(&self, haystack: &str) -> Option<&'static str> {
        self.iter()
            .filter(|term| word_positions(haystack, term).next().is_some())
            .max_by_key(|term| term.chars().count())
    }

    /// Earliest occurrence `(byte offset, term)`; longer terms win at the same offset.
    pub fn first_occurrence(&self, haystack: &str) -> Option<(usize, &'static str)> {
        self.iter()
            .filter_map(|term| word_positions(haystack, term).next().map(|pos| (pos, term)))
            .min_by(|a, b| a.0.cmp(&b.0).then(b.1.len().cmp(&a.1.len())))
    }

    pub fn contains(&self, haystack: &str) -> bool {
        self.iter()
            .any(|term| word_positions(haystack, term).next().is_some())
    }
}

/// Byte offsets where `term` occurs in `haystack` not glued to other letters or digits.
pub fn word_positions<'a>(haystack: &'a str, term: &'a str) -> impl Iterator<Item = usize> + 'a {
    haystack.match_indices(term).filter_map(move |(pos, _)| {
        let before = haystack[..pos].chars().next_back();
        let after = haystack[pos + term.len()..].chars().next();
        let glued = |c: Option<char>| c.map(char::is_alphanumeric).unwrap_or(false);
        let starts_word = term.chars().next().map(char::is_alphanumeric).unwrap_or(false);
        let ends_word = term.chars().next_back().map(char::is_alphanumeric).unwrap_or(false);
        if (starts_word && glued(before)) || (ends_word && glued(after)) {
            None
        } else {
            Some(pos)
        }
    })
}

/// Ordered pattern lists for the document summary. The first pattern that
/// matches anywhere in the text wins.
#[derive(Debug)]
pub struct SummaryPatterns {
    pub total_value: Vec<Regex>,
    pub account_number: Vec<Regex>,
    pub client_name: Vec<Regex>,
    pub valuation_date: Vec<Regex>,
}

/// Compiled, immutable pattern catalog.
#[derive(Debug)]
pub struct PatternLibrary {
    /// A run of two or more whitespace characters (column gap).
    pub multi_space: Regex,
    pub percentage: Regex,
    /// Date shapes, each with a `date` group. Matches may overlap across patterns.
    pub dates: Vec<Regex>,
    /// Amount preceded by a currency symbol or code.
    pub currency_prefixed: Regex,
    /// Amount followed by a currency symbol or code.
    pub currency_suffixed: Regex,
    /// A bare currency symbol or ISO code.
    pub currency_token: Regex,
    /// Header cells that name a reporting period.
    pub period_header: Regex,
    pub year: Regex,
    pub summary: SummaryPatterns,
}

impl PatternLibrary {
    /// The process-wide library, compiled on first use.
    pub fn shared() -> &'static PatternLibrary {
        &LIBRARY
    }

    fn new() -> Self {
        let codes = terms::CURRENCY_CODES.join("|");
        let currency = format!(r"{}|\b(?:{})\b", CURRENCY_SYMBOL_CLASS, codes);

        // Tail shared by the total value patterns: optional currency before
        // and after the amount.
        let value_tail = format!(
            r"[^\n\d$€£¥₣]{{0,25}}?(?:(?P<currency>{cur})[\s):]*)?(?P<value>{amt})(?:[ \t]*(?P<currency_after>{cur}))?",
            cur = currency,
            amt = AMOUNT
        );

        let summary = SummaryPatterns {
            total_value: compile_all(&[
                format!(
                    r"(?i:total\s+(?:portfolio\s+)?value|portfolio\s+value|total\s+market\s+value|net\s+asset\s+value){}",
                    value_tail
                ),
                format!(
                    r"(?i:gesamtwert|depotwert|gesamtvermögen|depotvolumen|vermögen\s+gesamt|kurswert\s+gesamt){}",
                    value_tail
                ),
                format!(r"\b(?i:total|summe|gesamt)\b{}", value_tail),
            ]),
            account_number: compile_all(&[
                r"(?i:account|depot|portfolio|konto)[\s\-]*(?i:number|no\.?|nr\.?|nummer|#)\s*[:.]?\s*(?P<value>[A-Z0-9\-/]*\d[A-Z0-9\-/]*)".to_string(),
                r"(?i:iban)\s*[:.]?\s*(?P<value>[A-Z]{2}\d{2}(?:\s?[A-Z0-9]{4}){2,7}(?:\s?[A-Z0-9]{1,3})?)".to_string(),
            ]),
            client_name: compile_all(&[
                format!(
                    r"(?i:client|customer|account\s+holder|investor|portfolio\s+owner)(?i:\s+name)?\s*:\s*(?P<value>{})",
                    NAME
                ),
                format!(
                    r"(?i:kundenname|kunde|kundin|depotinhaber|kontoinhaber|inhaber|anleger)\s*:\s*(?P<value>{})",
                    NAME
                ),
                r"\b(?:Mr|Mrs|Ms|Herr|Frau)\.?\s+(?P<value>\p{Lu}[\p{L}'\-]*(?:[ \t]+\p{Lu}[\p{L}'\-]*){0,3})".to_string(),
            ]),
            valuation_date: compile_all(&[
                format!(
                    r"(?i:valuation\s+date|as\s+of|as\s+at|reporting\s+date|statement\s+date)\s*:?\s*(?P<value>{})",
                    DATE_ALT
                ),
                format!(
                    r"\b(?i:bewertungsstichtag|bewertungsdatum|stichtag|stand|per)\s*:?\s*(?P<value>{})",
                    DATE_ALT
                ),
                format!(r"\b(?i:date|datum)\s*:?\s*(?P<value>{})", DATE_ALT),
            ]),
        };

        Self {
            multi_space: compile(r"\s{2,}"),
            percentage: compile(r"(?P<value>[+\-\x{2212}]?\d+(?:[.,']\d+)*)\s?%"),
            dates: compile_all(&[
                r"\b(?P<date>\d{4}-\d{2}-\d{2})\b".to_string(),
                r"\b(?P<date>\d{1,2}\.\d{1,2}\.\d{4})\b".to_string(),
                r"\b(?P<date>\d{1,2}/\d{1,2}/\d{4})\b".to_string(),
                format!(r"(?i)\b(?P<date>\d{{1,2}}\.?\s+(?:{})\.?\s+\d{{4}})\b", MONTH_ALT),
                format!(
                    r"(?i)\b(?P<date>(?:{})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}})\b",
                    MONTH_ALT
                ),
                format!(r"(?i)\b(?P<date>(?:{})\s+\d{{4}})\b", MONTH_ALT),
            ]),
            currency_prefixed: compile(&format!(
                r"(?P<currency>{})\s?(?P<value>[+\-]?{}(?i:\s?(?:mrd|mio|bn|mn|tsd)\.?)?)",
                currency, AMOUNT
            )),
            currency_suffixed: compile(&format!(
                r"(?P<value>{}(?i:\s?(?:mrd|mio|bn|mn|tsd)\.?)?)\s?(?P<currency>{})",
                AMOUNT, currency
            )),
            currency_token: compile(&currency),
            period_header: compile(&format!(
                r"(?i)\b(?:(?:fy|gj|fiscal\s+year|geschäftsjahr)\s*'?\d{{2,4}}|(?:19|20)\d{{2}}(?:/\d{{2,4}})?|q[1-4](?:\s*'?\d{{2,4}})?|[1-4]q|[1-4]\.\s*quartal|quarter\s*[1-4]|h[12]|[12]\.\s*halbjahr|half[\s-]year|{})\b",
                MONTH_ALT
            )),
            year: compile(r"\b(?:19|20)\d{2}\b"),
            summary,
        }
    }

    /// Keyword list used to score tables of `category`.
    pub fn category_terms(&self, category: TableCategory) -> Option<&'static TermSet> {
        match category {
            TableCategory::IncomeStatement => Some(&terms::INCOME_STATEMENT),
            TableCategory::BalanceSheet => Some(&terms::BALANCE_SHEET),
            TableCategory::CashFlow => Some(&terms::CASH_FLOW),
            TableCategory::Ratios => Some(&terms::RATIOS),
            TableCategory::InvestmentPortfolio => Some(&terms::INVESTMENT_PORTFOLIO),
            TableCategory::Unknown => None,
        }
    }

    /// Line item keyword lists for `category` (empty for categories without fixed items).
    pub fn line_items(&self, category: TableCategory) -> &'static [(&'static str, TermSet)] {
        match category {
            TableCategory::IncomeStatement => terms::INCOME_LINE_ITEMS,
            TableCategory::BalanceSheet => terms::BALANCE_LINE_ITEMS,
            TableCategory::CashFlow => terms::CASH_FLOW_LINE_ITEMS,
            _ => &[],
        }
    }

    pub fn is_period_header(&self, header: &str) -> bool {
        self.period_header.is_match(header.trim())
    }

    /// Canonical code for a currency symbol or code as found in text.
    pub fn currency_code(&self, token: &str) -> String {
        terms::CURRENCY_SYMBOLS
            .iter()
            .find(|(symbol, _)| *symbol == token)
            .map(|(_, code)| code.to_string())
            .unwrap_or_else(|| token.to_uppercase())
    }

    /// Apply `patterns` in order; the first that matches anywhere wins.
    pub fn first_match<'t>(
        &self,
        patterns: &[Regex],
        text: &'t str,
    ) -> Option<(MatchResult, std::ops::Range<usize>)> {
        patterns.iter().find_map(|re| {
            let caps = re.captures(text)?;
            let result = match_result(&caps)?;
            let range = caps.get(0)?.range();
            Some((result, range))
        })
    }
}

/// Named groups `value` (primary) and `currency`/`currency_after` (secondary).
pub fn match_result(caps: &Captures<'_>) -> Option<MatchResult> {
    let primary = caps.name("value")?.as_str().trim();
    if primary.is_empty() {
        return None;
    }
    let secondary = caps
        .name("currency")
        .or_else(|| caps.name("currency_after"))
        .map(|m| m.as_str().trim().to_string());
    Some(MatchResult {
        primary_value: primary.to_string(),
        secondary_value: secondary,
    })
}

/// Resolve a date string in any of the recognized shapes to a calendar day.
///
/// `dd/mm/yyyy` versus `mm/dd/yyyy` is resolved US-first; the other order
/// is tried when the first is impossible.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    let mut day = None;
    let mut month = None;
    let mut year = None;
    for token in raw
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let lower = token.to_lowercase();
        let digits = lower.trim_end_matches(|c: char| c.is_alphabetic());
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            let n: i32 = digits.parse().ok()?;
            if digits.len() == 4 {
                year = Some(n);
            } else if day.is_none() {
                day = Some(n as u32);
            }
        } else if let Some((_, m)) = terms::MONTHS.iter().find(|(name, _)| *name == lower) {
            month = Some(*m);
        }
    }
    NaiveDate::from_ymd_opt(year?, month?, day?)
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

fn compile_all(patterns: &[String]) -> Vec<Regex> {
    patterns.iter().map(|p| compile(p)).collect()
}

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FinancialMetricCollection, SecurityRecord, Table};
use crate::error::ExtractionError;

/// Text of one page as delivered by the OCR/text-extraction collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub text: String,
}

/// Candidate table lines produced by an external table detector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLineGroup {
    #[serde(default)]
    pub page_index: Option<usize>,
    pub lines: Vec<String>,
}

/// Input contract of the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentInput {
    /// Concatenation of all page texts. Derived from `pages` when absent.
    pub full_text: Option<String>,
    /// Zero-based page index to page text.
    pub pages: BTreeMap<usize, PageText>,
    pub candidate_tables: Vec<CandidateLineGroup>,
}

impl DocumentInput {
    /// Single-text document without page information.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            full_text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Document from page texts in order. The full text is their newline join.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages: BTreeMap<usize, PageText> = pages
            .into_iter()
            .enumerate()
            .map(|(i, text)| (i, PageText { text: text.into() }))
            .collect();
        Self {
            full_text: None,
            pages,
            candidate_tables: Vec::new(),
        }
    }

    pub fn with_candidate_tables(mut self, groups: Vec<CandidateLineGroup>) -> Self {
        self.candidate_tables = groups;
        self
    }

    /// The document text to analyze.
    ///
    /// Errors only when neither full text nor pages were supplied; an empty
    /// string is a valid (empty) document.
    pub fn document_text(&self) -> Result<Cow<'_, str>, ExtractionError> {
        if let Some(text) = &self.full_text {
            return Ok(Cow::Borrowed(text.as_str()));
        }
        if self.pages.is_empty() {
            return Err(ExtractionError::MissingDocumentText);
        }
        let joined = self
            .pages
            .values()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Cow::Owned(joined))
    }
}

/// Value captured by a pattern: primary group plus an optional secondary one
/// (e.g. amount + currency).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub primary_value: String,
    pub secondary_value: Option<String>,
}

/// A summary field with the text surrounding the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryField {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub context: String,
}

/// Top-level document facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_portfolio_value: Option<SummaryField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<SummaryField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<SummaryField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_date: Option<SummaryField>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.total_portfolio_value.is_none()
            && self.account_number.is_none()
            && self.client_name.is_none()
            && self.valuation_date.is_none()
    }
}

/// Percentage found anywhere in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageOccurrence {
    pub value: String,
    pub numeric: Option<f64>,
    pub position: usize,
    pub context: String,
}

/// Date found anywhere in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOccurrence {
    pub value: String,
    /// `YYYY-MM-DD` when the date could be resolved to a calendar day.
    pub iso_date: Option<String>,
    pub position: usize,
    pub context: String,
}

/// Currency amount found anywhere in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyOccurrence {
    pub value: String,
    pub currency: String,
    pub amount: Option<f64>,
    pub position: usize,
    pub context: String,
}

/// Full structured result for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentExtractionResult {
    pub isins: Vec<String>,
    pub securities: Vec<SecurityRecord>,
    pub currencies: Vec<CurrencyOccurrence>,
    pub percentages: Vec<PercentageOccurrence>,
    pub dates: Vec<DateOccurrence>,
    pub tables: Vec<Table>,
    pub summary: Summary,
    pub metrics: FinancialMetricCollection,
    pub extraction_timestamp: String,
}

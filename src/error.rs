//! Error types
//!
//! Two layers:
//! - `ExtractionError` is returned at the API boundary and only for input
//!   that has the wrong shape (e.g. no document text at all).
//! - `ExtractionIssue` is the per-step outcome of a sub-extraction that found
//!   nothing usable. The orchestrator downgrades every issue to an empty value.

use thiserror::Error;

/// Hard failure at the API boundary. "Found nothing" is never an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("document text is missing: neither full text nor pages were supplied")]
    MissingDocumentText,

    #[error("invalid document input: {0}")]
    InvalidInput(String),
}

/// Recoverable outcome of a single extraction step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionIssue {
    #[error("not numeric: {0:?}")]
    NotNumeric(String),

    #[error("invalid ISIN: {0}")]
    InvalidIsin(String),

    #[error("no consistent column structure in block starting at line {start_line}")]
    NoTableStructure { start_line: usize },

    #[error("no match for {0}")]
    NoMatch(&'static str),

    #[error("section not found: {0}")]
    SectionNotFound(&'static str),

    #[error("ISIN {0} does not occur in the document")]
    NoOccurrences(String),
}

impl ExtractionIssue {
    /// Short label used when the orchestrator logs a downgraded issue.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotNumeric(_) => "not_numeric",
            Self::InvalidIsin(_) => "invalid_isin",
            Self::NoTableStructure { .. } => "no_table_structure",
            Self::NoMatch(_) => "no_match",
            Self::SectionNotFound(_) => "section_not_found",
            Self::NoOccurrences(_) => "no_occurrences",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ExtractionError::MissingDocumentText.to_string(),
            "document text is missing: neither full text nor pages were supplied"
        );
        assert_eq!(
            ExtractionIssue::NotNumeric("abc".to_string()).to_string(),
            "not numeric: \"abc\""
        );
        assert_eq!(
            ExtractionIssue::NoTableStructure { start_line: 4 }.to_string(),
            "no consistent column structure in block starting at line 4"
        );
    }

    #[test]
    fn test_issue_kind() {
        assert_eq!(ExtractionIssue::NoMatch("client_name").kind(), "no_match");
        assert_eq!(
            ExtractionIssue::SectionNotFound("performance").kind(),
            "section_not_found"
        );
    }
}

//! Structured financial data extraction from statement and report text.
//!
//! Input is page text that has already been OCR'd or extracted from a PDF,
//! optionally with candidate table line groups from an external detector.
//! Output is a [`DocumentExtractionResult`]: validated ISINs with their
//! securities, recovered and classified tables, summary fields, percentages,
//! dates, currency amounts and allocation/performance sections.
//!
//! ```no_run
//! use portfolio_extract::{extract_document, DocumentInput};
//!
//! let input = DocumentInput::from_text("Apple Inc US0378331005 price: $145.86 quantity: 100");
//! let result = extract_document(&input).unwrap();
//! assert_eq!(result.isins, vec!["US0378331005"]);
//! ```

pub mod config;
pub mod error;
pub mod isin;
pub mod metrics;
pub mod models;
pub mod numeric;
pub mod patterns;
pub mod securities;
pub mod tables;
pub mod text;

pub use config::ExtractionConfig;
pub use error::{ExtractionError, ExtractionIssue};
pub use metrics::DocumentMetricsExtractor;
pub use models::{DocumentExtractionResult, DocumentInput, Table, TableCategory};
pub use patterns::PatternLibrary;

/// Extract a document with the default configuration.
pub fn extract_document(input: &DocumentInput) -> Result<DocumentExtractionResult, ExtractionError> {
    DocumentMetricsExtractor::shared().extract(input)
}

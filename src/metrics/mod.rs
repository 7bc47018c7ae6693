//! Document-level extraction
//!
//! [`DocumentMetricsExtractor`] runs every extractor over one document and
//! assembles a [`DocumentExtractionResult`]. Each step that finds nothing
//! usable returns an [`ExtractionIssue`]; the issue is logged and the step's
//! output left empty, so extraction always completes.

pub mod occurrences;
pub mod sections;
pub mod summary;

use chrono::Utc;
use once_cell::sync::Lazy;

use crate::config::ExtractionConfig;
use crate::error::{ExtractionError, ExtractionIssue};
use crate::isin;
use crate::models::{
    CandidateTableBlock, DocumentExtractionResult, DocumentInput, FinancialMetricCollection,
    Summary, Table,
};
use crate::patterns::PatternLibrary;
use crate::securities::SecurityExtractor;
use crate::tables::{self, TableRecovery};

static DEFAULT_EXTRACTOR: Lazy<DocumentMetricsExtractor<'static>> =
    Lazy::new(DocumentMetricsExtractor::new);

/// Turns one document into a [`DocumentExtractionResult`].
///
/// Holds no per-document state: one instance can serve any number of
/// documents, from any number of threads.
pub struct DocumentMetricsExtractor<'p> {
    patterns: &'p PatternLibrary,
    config: ExtractionConfig,
    securities: SecurityExtractor<'p>,
}

impl DocumentMetricsExtractor<'static> {
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    /// Extractor over the shared pattern library.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self::with_patterns(PatternLibrary::shared(), config)
    }

    /// Process-wide extractor with default configuration.
    pub fn shared() -> &'static DocumentMetricsExtractor<'static> {
        &DEFAULT_EXTRACTOR
    }
}

impl Default for DocumentMetricsExtractor<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> DocumentMetricsExtractor<'p> {
    pub fn with_patterns(patterns: &'p PatternLibrary, config: ExtractionConfig) -> Self {
        let securities = SecurityExtractor::new(patterns, &config);
        Self {
            patterns,
            config,
            securities,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract everything from `input`.
    ///
    /// Fails only when the input carries no text at all.
    pub fn extract(&self, input: &DocumentInput) -> Result<DocumentExtractionResult, ExtractionError> {
        let text = input.document_text()?;
        let text: &str = &text;
        let config = &self.config;

        // ====================================================================
        // Securities
        // ====================================================================

        let isins = isin::extract_valid(text);
        let securities: Vec<_> = isins
            .iter()
            .filter_map(|code| {
                downgrade("security", self.securities.extract(code, &input.pages, text))
            })
            .collect();

        // ====================================================================
        // Tables
        // ====================================================================

        let mut tables = self.recover_tables(input, text);
        let mut metrics = FinancialMetricCollection::default();
        for (index, table) in tables.iter_mut().enumerate() {
            table.category = tables::classify(self.patterns, table);
            metrics.push_analysis(tables::analyze(self.patterns, table, index));
        }

        // ====================================================================
        // Summary, occurrences and sections
        // ====================================================================

        let radius = config.summary_context_chars;
        let summary = Summary {
            total_portfolio_value: downgrade(
                "summary",
                summary::total_portfolio_value(self.patterns, text, radius),
            ),
            account_number: downgrade(
                "summary",
                summary::account_number(self.patterns, text, radius),
            ),
            client_name: downgrade("summary", summary::client_name(self.patterns, text, radius)),
            valuation_date: downgrade(
                "summary",
                summary::valuation_date(self.patterns, text, radius),
            ),
        };

        let percentages =
            occurrences::percentages(self.patterns, text, config.percentage_context_chars);
        let dates = occurrences::dates(self.patterns, text, config.date_context_chars);
        let currencies =
            occurrences::currency_amounts(self.patterns, text, config.currency_context_chars);

        let max_chars = config.section_max_chars;
        metrics.asset_allocation = downgrade(
            "section",
            sections::asset_allocation(self.patterns, text, max_chars),
        );
        metrics.currency_allocation = downgrade(
            "section",
            sections::currency_allocation(self.patterns, text, max_chars),
        );
        metrics.performance = downgrade(
            "section",
            sections::performance(self.patterns, text, max_chars),
        );

        log::info!(
            "Extracted {} ISIN(s), {} table(s), {} percentage(s), {} date(s), {} amount(s)",
            isins.len(),
            tables.len(),
            percentages.len(),
            dates.len(),
            currencies.len()
        );

        Ok(DocumentExtractionResult {
            isins,
            securities,
            currencies,
            percentages,
            dates,
            tables,
            summary,
            metrics,
            extraction_timestamp: Utc::now().to_rfc3339(),
        })
    }

    /// Tables found in the text plus those parsed from candidate line groups,
    /// without duplicates.
    fn recover_tables(&self, input: &DocumentInput, text: &str) -> Vec<Table> {
        let recovery = TableRecovery::new(self.patterns, &self.config);

        let mut found: Vec<Table> = if input.pages.is_empty() {
            recovery.recover(text, None)
        } else {
            input
                .pages
                .iter()
                .flat_map(|(&index, page)| recovery.recover(&page.text, Some(index)))
                .collect()
        };

        for group in &input.candidate_tables {
            let lines: Vec<&str> = group
                .lines
                .iter()
                .map(String::as_str)
                .filter(|l| !l.trim().is_empty())
                .collect();
            if lines.len() < self.config.min_table_lines {
                log::debug!("Skipping candidate group with {} line(s)", lines.len());
                continue;
            }
            let block = CandidateTableBlock::from_texts(group.page_index, &lines);
            if let Some(table) = downgrade("candidate_table", recovery.parse_block(&block)) {
                if !found.iter().any(|t| t.same_content(&table)) {
                    found.push(table);
                }
            }
        }

        found
    }
}

/// Keep the value of a successful step; log and drop the issue otherwise.
fn downgrade<T>(step: &str, result: Result<T, ExtractionIssue>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(issue) => {
            log::debug!("{} step skipped ({}): {}", step, issue.kind(), issue);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateLineGroup, ParsingMethod, TableCategory};

    fn extract(text: &str) -> DocumentExtractionResult {
        DocumentMetricsExtractor::shared()
            .extract(&DocumentInput::from_text(text))
            .unwrap()
    }

    #[test]
    fn test_apple_document() {
        let result = extract("Apple Inc US0378331005 price: $145.86 quantity: 100");

        assert_eq!(result.isins, vec!["US0378331005".to_string()]);
        assert_eq!(result.securities.len(), 1);
        let security = &result.securities[0];
        assert_eq!(security.name, "Apple Inc");
        assert_eq!(security.quantities[0].value, "100");
        assert_eq!(security.prices[0].value, "145.86");
        assert!(security.currencies.contains("$"));

        assert_eq!(result.currencies.len(), 1);
        assert_eq!(result.currencies[0].currency, "USD");
        assert_eq!(result.currencies[0].amount, Some(145.86));
        assert!(!result.extraction_timestamp.is_empty());
    }

    #[test]
    fn test_space_aligned_table() {
        let result = extract("Name  Qty  Price\nBond A  100  99.5\nBond B  50  101.2");

        assert_eq!(result.tables.len(), 1);
        let table = &result.tables[0];
        assert_eq!(table.parsing_method, ParsingMethod::Space);
        assert_eq!(table.headers, vec!["Name", "Qty", "Price"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["Bond B", "50", "101.2"]);
    }

    #[test]
    fn test_two_line_block_yields_no_table() {
        let result = extract("Name  Qty  Price\nBond A  100  99.5");
        assert!(result.tables.is_empty());
    }

    #[test]
    fn test_text_without_isins() {
        let result = extract("Quarterly letter to shareholders, no identifiers inside.");
        assert!(result.isins.is_empty());
        assert!(result.securities.is_empty());
        assert!(result.summary.is_empty());
    }

    #[test]
    fn test_invalid_checksum_is_not_reported() {
        let result = extract("Holding US0378331006 price 10");
        assert!(result.isins.is_empty());
        assert!(result.securities.is_empty());
    }

    #[test]
    fn test_every_isin_has_a_security_when_pages_differ() {
        let mut input = DocumentInput::from_pages(vec!["Cover page"]);
        input.full_text = Some("Apple Inc US0378331005 shares 10".to_string());
        let result = DocumentMetricsExtractor::shared().extract(&input).unwrap();

        assert_eq!(result.isins, vec!["US0378331005".to_string()]);
        assert_eq!(result.securities.len(), 1);
        assert_eq!(result.securities[0].occurrences[0].page_index, None);
        assert_eq!(result.securities[0].quantities[0].value, "10");
    }

    #[test]
    fn test_missing_text_is_an_error() {
        let err = DocumentMetricsExtractor::shared()
            .extract(&DocumentInput::default())
            .unwrap_err();
        assert_eq!(err, ExtractionError::MissingDocumentText);
    }

    #[test]
    fn test_income_statement_analysis() {
        let result = extract("Item  2022  2023\nRevenue  1000  1200\nNet income  100  150");

        assert_eq!(result.tables[0].category, TableCategory::IncomeStatement);
        assert_eq!(result.metrics.income_statement.len(), 1);
        let analysis = &result.metrics.income_statement[0];
        assert_eq!(analysis.table_index, 0);
        assert_eq!(
            analysis.line_items["revenue"].values,
            vec![Some(1000.0), Some(1200.0)]
        );
        let margin = analysis.derived["net_margin"][0].unwrap();
        assert!((margin - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_candidate_groups_and_duplicates() {
        let text = "Name  Qty  Price\nBond A  100  99.5\nBond B  50  101.2";
        let input = DocumentInput::from_text(text).with_candidate_tables(vec![
            CandidateLineGroup {
                page_index: None,
                lines: text.lines().map(String::from).collect(),
            },
            CandidateLineGroup {
                page_index: Some(0),
                lines: vec!["a;b".into(), "".into(), "1;2".into(), "3;4".into()],
            },
            CandidateLineGroup {
                page_index: Some(0),
                lines: vec!["x;y".into(), "1;2".into()],
            },
        ]);
        let result = DocumentMetricsExtractor::shared().extract(&input).unwrap();

        assert_eq!(result.tables.len(), 2);
        assert_eq!(result.tables[1].parsing_method, ParsingMethod::Semicolon);
        assert_eq!(result.tables[1].headers, vec!["a", "b"]);
    }

    #[test]
    fn test_pages_and_sections() {
        let input = DocumentInput::from_pages(vec![
            "Depotauszug\nDepotinhaber: Max Mustermann\nStand: 30.06.2024",
            "Asset Allocation\nEquities 70%\nBonds 30%\n\nSiemens AG DE0007236101 Stück 10",
        ]);
        let result = DocumentMetricsExtractor::shared().extract(&input).unwrap();

        assert_eq!(
            result.summary.client_name.as_ref().map(|f| f.value.as_str()),
            Some("Max Mustermann")
        );
        assert_eq!(result.dates[0].iso_date.as_deref(), Some("2024-06-30"));

        let allocation = result.metrics.asset_allocation.as_ref().unwrap();
        assert_eq!(allocation.len(), 2);
        assert_eq!(allocation[0].category, "Equities");

        assert_eq!(result.isins, vec!["DE0007236101".to_string()]);
        assert_eq!(result.securities[0].occurrences[0].page_index, Some(1));
    }

    #[test]
    fn test_custom_config() {
        let config = ExtractionConfig {
            min_table_lines: 2,
            ..ExtractionConfig::default()
        };
        let extractor = DocumentMetricsExtractor::with_config(config);
        assert_eq!(extractor.config().min_table_lines, 2);

        let result = extractor
            .extract(&DocumentInput::from_text("Name  Qty  Price\nBond A  100  99.5"))
            .unwrap();
        assert_eq!(result.tables.len(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DocumentMetricsExtractor<'static>>();

        let extractor = DocumentMetricsExtractor::new();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        extractor
                            .extract(&DocumentInput::from_text("Apple Inc US0378331005"))
                            .unwrap()
                            .isins
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), vec!["US0378331005".to_string()]);
            }
        });
    }

    #[test]
    fn test_result_serializes() {
        let result = extract("Apple Inc US0378331005 price: $145.86 quantity: 100");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isins"][0], "US0378331005");
        assert_eq!(json["securities"][0]["name"], "Apple Inc");
        assert!(json["extraction_timestamp"].is_string());
    }
}

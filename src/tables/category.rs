//! Keyword scoring of tables into financial categories.

use crate::models::{Table, TableCategory};
use crate::patterns::PatternLibrary;

/// Keyword hits per scored category, in declaration order.
pub fn scores(patterns: &PatternLibrary, table: &Table) -> Vec<(TableCategory, usize)> {
    let text = table.text_lowercase();
    TableCategory::SCORED
        .iter()
        .map(|&category| {
            let hits = patterns
                .category_terms(category)
                .map(|terms| terms.count_in(&text))
                .unwrap_or(0);
            (category, hits)
        })
        .collect()
}

/// Highest non-zero score wins; ties go to the category declared first.
pub fn classify(patterns: &PatternLibrary, table: &Table) -> TableCategory {
    let mut best = (TableCategory::Unknown, 0);
    for (category, hits) in scores(patterns, table) {
        if hits > best.1 {
            best = (category, hits);
        }
    }
    best.0
}

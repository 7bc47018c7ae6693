//! Is a line of text plausibly a table row?
//!
//! Deliberately permissive: the minimum block length in
//! block recovery filters isolated false positives.

use crate::patterns::PatternLibrary;

pub fn is_table_row(line: &str) -> bool {
    is_table_row_with(PatternLibrary::shared(), line)
}

/// Leading indentation counts as a column gap: headers often leave the
/// label column empty.
pub fn is_table_row_with(patterns: &PatternLibrary, line: &str) -> bool {
    if line.trim().is_empty() {
        return false;
    }
    let line = line.trim_end();

    // Column gaps of two or more spaces, at least twice
    if patterns.multi_space.find_iter(line).count() >= 2 {
        return true;
    }

    if line.contains('\t') {
        return true;
    }

    if line.matches('|').count() >= 2 || line.matches(';').count() >= 2 {
        return true;
    }

    let commas = line.matches(',').count();
    let words = line.split_whitespace().count();
    // at least one comma per five words
    commas >= 2 && commas * 5 >= words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_aligned_rows() {
        assert!(is_table_row("Name  Qty  Price"));
        assert!(is_table_row("Revenue      1,000     900"));
        assert!(!is_table_row("Revenue      1,000"));
        assert!(is_table_row("            2023      2022"));
    }

    #[test]
    fn test_delimited_rows() {
        assert!(is_table_row("a\tb"));
        assert!(is_table_row("| Name | Qty |"));
        assert!(is_table_row("Name;Qty;Price"));
        assert!(is_table_row("Name,Qty,Price"));
        assert!(!is_table_row("Name;Qty"));
    }

    #[test]
    fn test_prose_is_not_a_row() {
        assert!(!is_table_row(""));
        assert!(!is_table_row("   "));
        assert!(!is_table_row("This is an ordinary sentence, nothing more."));
        // 2 commas, 17 words
        assert!(!is_table_row(
            "We bought shares, sold bonds, and the market was calm during the whole quarter of the year"
        ));
    }

    #[test]
    fn test_comma_ratio_is_not_truncated() {
        // 2 commas, 14 words: 2 < 2.8
        assert!(!is_table_row(
            "We bought shares, sold bonds, and the market was calm during the whole quarter"
        ));
        // 2 commas, 10 words: exactly one comma per five words
        assert!(is_table_row(
            "Apple, Microsoft, Siemens are the three largest positions we hold"
        ));
    }
}

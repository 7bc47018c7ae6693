use serde::{Deserialize, Serialize};

/// Column-splitting strategy that produced a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsingMethod {
    Space,
    Tab,
    Pipe,
    Semicolon,
    Comma,
    Adaptive,
}

impl ParsingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Tab => "tab",
            Self::Pipe => "pipe",
            Self::Semicolon => "semicolon",
            Self::Comma => "comma",
            Self::Adaptive => "adaptive",
        }
    }
}

/// Financial category of a recovered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableCategory {
    IncomeStatement,
    BalanceSheet,
    CashFlow,
    Ratios,
    InvestmentPortfolio,
    #[default]
    Unknown,
}

impl TableCategory {
    /// Scored categories in declaration order. Ties resolve to the earlier entry.
    pub const SCORED: [TableCategory; 5] = [
        Self::IncomeStatement,
        Self::BalanceSheet,
        Self::CashFlow,
        Self::Ratios,
        Self::InvestmentPortfolio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "income_statement",
            Self::BalanceSheet => "balance_sheet",
            Self::CashFlow => "cash_flow",
            Self::Ratios => "ratios",
            Self::InvestmentPortfolio => "investment_portfolio",
            Self::Unknown => "unknown",
        }
    }
}

/// One line of page/document text with its zero-based line index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub index: usize,
    pub text: String,
}

impl RawLine {
    /// Split text on newlines (CRLF tolerated).
    pub fn split_text(text: &str) -> Vec<RawLine> {
        text.lines()
            .enumerate()
            .map(|(index, line)| RawLine {
                index,
                text: line.trim_end_matches('\r').to_string(),
            })
            .collect()
    }
}

/// Contiguous run of table-like lines awaiting structure recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTableBlock {
    pub page_index: Option<usize>,
    pub lines: Vec<RawLine>,
}

impl CandidateTableBlock {
    pub fn new(page_index: Option<usize>, lines: Vec<RawLine>) -> Self {
        Self { page_index, lines }
    }

    /// Build a block from externally detected line-groups (no source indices).
    pub fn from_texts<S: AsRef<str>>(page_index: Option<usize>, lines: &[S]) -> Self {
        Self {
            page_index,
            lines: lines
                .iter()
                .enumerate()
                .map(|(index, l)| RawLine {
                    index,
                    text: l.as_ref().to_string(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn start_line(&self) -> usize {
        self.lines.first().map(|l| l.index).unwrap_or(0)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

/// Recovered table. Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub parsing_method: ParsingMethod,
    #[serde(default)]
    pub category: TableCategory,
}

impl Table {
    /// Finalize a table: short rows are padded with empty cells, long rows truncated.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, parsing_method: ParsingMethod) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            headers,
            rows,
            parsing_method,
            category: TableCategory::Unknown,
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Row label: first cell, or `row_<index>` when the first cell is empty.
    pub fn row_label(&self, row_index: usize) -> String {
        match self.rows.get(row_index).and_then(|r| r.first()) {
            Some(cell) if !cell.trim().is_empty() => cell.trim().to_string(),
            _ => format!("row_{}", row_index),
        }
    }

    /// All header and cell text joined and lowercased.
    pub fn text_lowercase(&self) -> String {
        let mut parts: Vec<&str> = self.headers.iter().map(String::as_str).collect();
        for row in &self.rows {
            parts.extend(row.iter().map(String::as_str));
        }
        parts.join(" ").to_lowercase()
    }

    /// Same headers and cells, regardless of how they were split.
    pub fn same_content(&self, other: &Table) -> bool {
        self.headers == other.headers && self.rows == other.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_table_pads_and_truncates_rows() {
        let table = Table::new(
            cells(&["Name", "Qty", "Price"]),
            vec![cells(&["Bond A"]), cells(&["Bond B", "50", "101.2", "extra"])],
            ParsingMethod::Adaptive,
        );
        assert!(table.rows.iter().all(|r| r.len() == 3));
        assert_eq!(table.rows[0], cells(&["Bond A", "", ""]));
        assert_eq!(table.rows[1], cells(&["Bond B", "50", "101.2"]));
    }

    #[test]
    fn test_row_label_fallback() {
        let table = Table::new(
            cells(&["", "2023"]),
            vec![cells(&["Revenue", "100"]), cells(&["", "5"])],
            ParsingMethod::Space,
        );
        assert_eq!(table.row_label(0), "Revenue");
        assert_eq!(table.row_label(1), "row_1");
    }

    #[test]
    fn test_split_text_keeps_indices() {
        let lines = RawLine::split_text("a\r\n\nb");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "a");
        assert_eq!(lines[1].text, "");
        assert_eq!(lines[2].index, 2);
    }

    #[test]
    fn test_serialized_shape() {
        let table = Table::new(cells(&["A", "B"]), vec![cells(&["1", "2"])], ParsingMethod::Pipe);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["parsing_method"], "pipe");
        assert_eq!(json["category"], "unknown");
        assert_eq!(json["headers"][1], "B");
    }
}

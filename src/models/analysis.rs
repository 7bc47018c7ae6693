use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TableCategory;

/// A table column interpreted as a reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodColumn {
    pub index: usize,
    pub label: String,
}

/// A designated line item (revenue, total assets, ...) and its values per period.
/// `None` marks a period cell that is not numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub row_index: usize,
    pub values: Vec<Option<f64>>,
}

/// Period-over-period growth in percent for one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowGrowth {
    pub label: String,
    pub rates: Vec<Option<f64>>,
}

/// One position of an investment portfolio table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub name: Option<String>,
    pub isin: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub market_value: Option<f64>,
    pub weight: Option<f64>,
}

/// Structured analysis of one recovered table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableAnalysis {
    pub table_index: usize,
    pub category: TableCategory,
    pub periods: Vec<PeriodColumn>,
    pub line_items: BTreeMap<String, LineItem>,
    /// Margins, ratios and computed items, aligned with `periods`.
    pub derived: BTreeMap<String, Vec<Option<f64>>>,
    pub growth: Vec<RowGrowth>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holdings: Vec<Holding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_market_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_weight: Option<f64>,
}

impl TableAnalysis {
    pub fn new(table_index: usize, category: TableCategory, periods: Vec<PeriodColumn>) -> Self {
        Self {
            table_index,
            category,
            periods,
            line_items: BTreeMap::new(),
            derived: BTreeMap::new(),
            growth: Vec::new(),
            holdings: Vec::new(),
            total_market_value: None,
            total_weight: None,
        }
    }
}

/// Category name and share from an allocation section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub category: String,
    pub percentage: f64,
}

/// Category-keyed structured metrics of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetricCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_allocation: Option<Vec<AllocationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_allocation: Option<Vec<AllocationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub income_statement: Vec<TableAnalysis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub balance_sheet: Vec<TableAnalysis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cash_flow: Vec<TableAnalysis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ratios: Vec<TableAnalysis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub investment_portfolio: Vec<TableAnalysis>,
}

impl FinancialMetricCollection {
    /// File a table analysis under its category. Unknown tables are not kept.
    pub fn push_analysis(&mut self, analysis: TableAnalysis) {
        match analysis.category {
            TableCategory::IncomeStatement => self.income_statement.push(analysis),
            TableCategory::BalanceSheet => self.balance_sheet.push(analysis),
            TableCategory::CashFlow => self.cash_flow.push(analysis),
            TableCategory::Ratios => self.ratios.push(analysis),
            TableCategory::InvestmentPortfolio => self.investment_portfolio.push(analysis),
            TableCategory::Unknown => {}
        }
    }
}

//! Per-category analysis of classified tables
//!
//! - income statement: revenue, costs, profits; margins against revenue
//! - balance sheet: assets, liabilities, equity; leverage and liquidity ratios
//! - cash flow: operating/investing/financing flows; free cash flow
//! - ratios: every labelled row as a series
//! - investment portfolio: holdings with quantity, price, value and weight
//!
//! Every numeric row of a table with two or more period columns also gets a
//! growth series.

use std::collections::BTreeMap;

use crate::isin;
use crate::models::{
    Holding, LineItem, PeriodColumn, RowGrowth, Table, TableAnalysis, TableCategory,
};
use crate::numeric;
use crate::patterns::{terms, PatternLibrary, TermSet};

/// Rows with these labels are sums, not holdings.
const TOTAL_ROW_TERMS: TermSet = TermSet {
    english: &["total", "sum", "subtotal"],
    german: &["summe", "gesamt", "zwischensumme"],
};

pub fn analyze(patterns: &PatternLibrary, table: &Table, table_index: usize) -> TableAnalysis {
    let periods = detect_periods(patterns, table);
    let mut analysis = TableAnalysis::new(table_index, table.category, periods);

    match table.category {
        TableCategory::IncomeStatement => {
            analysis.line_items = locate_line_items(patterns, table, &analysis.periods);
            analysis.derived = income_margins(&analysis.line_items);
        }
        TableCategory::BalanceSheet => {
            analysis.line_items = locate_line_items(patterns, table, &analysis.periods);
            analysis.derived = balance_ratios(&analysis.line_items);
        }
        TableCategory::CashFlow => {
            analysis.line_items = locate_line_items(patterns, table, &analysis.periods);
            analysis.derived = free_cash_flow(&analysis.line_items);
        }
        TableCategory::Ratios => {
            analysis.line_items = labelled_series(table, &analysis.periods);
        }
        TableCategory::InvestmentPortfolio => {
            analysis.holdings = holdings(table);
            analysis.total_market_value = sum_present(analysis.holdings.iter().map(|h| h.market_value));
            analysis.total_weight = sum_present(analysis.holdings.iter().map(|h| h.weight));
            return analysis;
        }
        TableCategory::Unknown => {}
    }

    analysis.growth = growth(patterns, table, &analysis.periods);
    analysis
}

// ============================================================================
// Periods
// ============================================================================

/// Period columns by header; mostly-numeric columns when no header names a period.
pub fn detect_periods(patterns: &PatternLibrary, table: &Table) -> Vec<PeriodColumn> {
    let by_header: Vec<PeriodColumn> = table
        .headers
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, h)| patterns.is_period_header(h))
        .map(|(index, h)| PeriodColumn {
            index,
            label: h.trim().to_string(),
        })
        .collect();
    if !by_header.is_empty() {
        return by_header;
    }

    (1..table.column_count())
        .filter(|&index| is_mostly_numeric(table, index))
        .map(|index| PeriodColumn {
            index,
            label: match table.headers[index].trim() {
                "" => format!("column_{}", index),
                h => h.to_string(),
            },
        })
        .collect()
}

fn is_mostly_numeric(table: &Table, column: usize) -> bool {
    let cells: Vec<&str> = table
        .rows
        .iter()
        .filter_map(|r| r.get(column))
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    let numeric = cells.iter().filter(|c| numeric::is_numeric(c)).count();
    numeric > 0 && numeric * 2 > cells.len()
}

fn row_values(table: &Table, row_index: usize, periods: &[PeriodColumn]) -> Vec<Option<f64>> {
    periods
        .iter()
        .map(|p| {
            table
                .rows
                .get(row_index)
                .and_then(|r| r.get(p.index))
                .and_then(|cell| numeric::normalize_opt(cell))
        })
        .collect()
}

// ============================================================================
// Line items
// ============================================================================

/// First row per line item. A row belongs to the item whose longest term it
/// contains, so "Cost of sales" is not mistaken for "Sales".
fn locate_line_items(
    patterns: &PatternLibrary,
    table: &Table,
    periods: &[PeriodColumn],
) -> BTreeMap<String, LineItem> {
    let items = patterns.line_items(table.category);
    let mut found: BTreeMap<String, LineItem> = BTreeMap::new();

    for row_index in 0..table.row_count() {
        let label = table.row_label(row_index);
        let lower = label.to_lowercase();

        let mut best: Option<(&str, usize)> = None;
        for (key, item_terms) in items {
            if let Some(term) = item_terms.longest_match(&lower) {
                let len = term.chars().count();
                if best.map_or(true, |(_, l)| len > l) {
                    best = Some((*key, len));
                }
            }
        }

        if let Some((key, _)) = best {
            found.entry(key.to_string()).or_insert_with(|| LineItem {
                label: label.clone(),
                row_index,
                values: row_values(table, row_index, periods),
            });
        }
    }

    found
}

fn labelled_series(table: &Table, periods: &[PeriodColumn]) -> BTreeMap<String, LineItem> {
    let mut series = BTreeMap::new();
    for row_index in 0..table.row_count() {
        let values = row_values(table, row_index, periods);
        if values.iter().all(Option::is_none) {
            continue;
        }
        let label = table.row_label(row_index);
        series.entry(label.clone()).or_insert(LineItem {
            label,
            row_index,
            values,
        });
    }
    series
}

// ============================================================================
// Derived metrics
// ============================================================================

/// `numerator / denominator * scale` per period; `None` where either side is
/// missing or the denominator is zero.
fn per_period(
    numerator: &LineItem,
    denominator: &LineItem,
    scale: f64,
) -> Vec<Option<f64>> {
    numerator
        .values
        .iter()
        .zip(denominator.values.iter())
        .map(|(n, d)| match (n, d) {
            (Some(n), Some(d)) if *d != 0.0 => Some(n / d * scale),
            _ => None,
        })
        .collect()
}

fn income_margins(items: &BTreeMap<String, LineItem>) -> BTreeMap<String, Vec<Option<f64>>> {
    let mut derived = BTreeMap::new();
    let Some(revenue) = items.get("revenue") else {
        return derived;
    };

    for (item, margin) in [
        ("gross_profit", "gross_margin"),
        ("operating_income", "operating_margin"),
        ("net_income", "net_margin"),
    ] {
        if let Some(value) = items.get(item) {
            derived.insert(margin.to_string(), per_period(value, revenue, 100.0));
        }
    }
    derived
}

fn balance_ratios(items: &BTreeMap<String, LineItem>) -> BTreeMap<String, Vec<Option<f64>>> {
    let mut derived = BTreeMap::new();
    let debt = items.get("total_debt").or_else(|| items.get("total_liabilities"));

    if let Some(assets) = items.get("total_assets") {
        if let Some(debt) = debt {
            derived.insert("debt_to_assets".to_string(), per_period(debt, assets, 1.0));
        }
        if let Some(cash) = items.get("cash") {
            derived.insert("cash_to_assets".to_string(), per_period(cash, assets, 1.0));
        }
    }
    if let (Some(debt), Some(equity)) = (debt, items.get("equity")) {
        derived.insert("debt_to_equity".to_string(), per_period(debt, equity, 1.0));
    }
    if let (Some(current_assets), Some(current_liabilities)) =
        (items.get("current_assets"), items.get("current_liabilities"))
    {
        derived.insert(
            "current_ratio".to_string(),
            per_period(current_assets, current_liabilities, 1.0),
        );
    }
    derived
}

fn free_cash_flow(items: &BTreeMap<String, LineItem>) -> BTreeMap<String, Vec<Option<f64>>> {
    let mut derived = BTreeMap::new();
    if items.contains_key("free_cash_flow") {
        return derived;
    }
    if let (Some(operating), Some(capex)) = (
        items.get("operating_cash_flow"),
        items.get("capital_expenditure"),
    ) {
        // capex is reported as an outflow (negative)
        let fcf = operating
            .values
            .iter()
            .zip(capex.values.iter())
            .map(|(o, c)| Some((*o)? + (*c)?))
            .collect();
        derived.insert("free_cash_flow".to_string(), fcf);
    }
    derived
}

/// Period positions from earliest to latest. Year-labelled columns in
/// descending order (newest first) are reversed.
fn chronological(patterns: &PatternLibrary, periods: &[PeriodColumn]) -> Vec<usize> {
    let years: Vec<Option<i32>> = periods
        .iter()
        .map(|p| {
            patterns
                .year
                .find(&p.label)
                .and_then(|m| m.as_str().parse().ok())
        })
        .collect();

    let descending = years.len() >= 2
        && years.iter().all(Option::is_some)
        && years.windows(2).all(|w| w[0] > w[1]);

    if descending {
        (0..periods.len()).rev().collect()
    } else {
        (0..periods.len()).collect()
    }
}

/// Growth per numeric row, aligned with `periods`: each period against its
/// chronological predecessor, `None` for the earliest period or a zero base.
fn growth(patterns: &PatternLibrary, table: &Table, periods: &[PeriodColumn]) -> Vec<RowGrowth> {
    if periods.len() < 2 {
        return Vec::new();
    }
    let order = chronological(patterns, periods);

    (0..table.row_count())
        .filter_map(|row_index| {
            let values = row_values(table, row_index, periods);
            if values.iter().all(Option::is_none) {
                return None;
            }

            let mut rates = vec![None; periods.len()];
            for pair in order.windows(2) {
                let (prev, curr) = (pair[0], pair[1]);
                rates[curr] = match (values[prev], values[curr]) {
                    (Some(p), Some(c)) if p != 0.0 => Some((c - p) / p.abs() * 100.0),
                    _ => None,
                };
            }

            Some(RowGrowth {
                label: table.row_label(row_index),
                rates,
            })
        })
        .collect()
}

// ============================================================================
// Holdings
// ============================================================================

#[derive(Debug, Default)]
struct HoldingColumns {
    name: Option<usize>,
    isin: Option<usize>,
    quantity: Option<usize>,
    price: Option<usize>,
    value: Option<usize>,
    weight: Option<usize>,
}

fn holding_columns(table: &Table) -> HoldingColumns {
    let headers: Vec<String> = table.headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let mut taken: Vec<usize> = Vec::new();
    let mut pick = |role: &TermSet| -> Option<usize> {
        let index = headers
            .iter()
            .enumerate()
            .find(|(i, h)| !taken.contains(i) && role.contains(h))
            .map(|(i, _)| i)?;
        taken.push(index);
        Some(index)
    };

    // Most specific roles first: "Market value" must not end up as the name
    let isin = pick(&terms::COLUMN_ISIN);
    let value = pick(&terms::COLUMN_VALUE);
    let quantity = pick(&terms::COLUMN_QUANTITY);
    let price = pick(&terms::COLUMN_PRICE);
    let weight = pick(&terms::COLUMN_WEIGHT);
    let name = pick(&terms::COLUMN_NAME).or_else(|| (!taken.contains(&0)).then_some(0));

    HoldingColumns {
        name,
        isin,
        quantity,
        price,
        value,
        weight,
    }
}

fn holdings(table: &Table) -> Vec<Holding> {
    let columns = holding_columns(table);
    let cell = |row: &[String], col: Option<usize>| -> Option<String> {
        let text = row.get(col?)?.trim();
        (!text.is_empty()).then(|| text.to_string())
    };
    let number = |row: &[String], col: Option<usize>| cell(row, col).and_then(|c| numeric::normalize_opt(&c));

    table
        .rows
        .iter()
        .filter_map(|row| {
            let name = cell(row, columns.name);
            if let Some(n) = &name {
                if TOTAL_ROW_TERMS.contains(&n.to_lowercase()) {
                    return None;
                }
            }

            let isin = cell(row, columns.isin)
                .filter(|c| isin::validate(c))
                .or_else(|| isin::extract_valid(&row.join(" ")).into_iter().next());

            let holding = Holding {
                name,
                isin,
                quantity: number(row, columns.quantity),
                price: number(row, columns.price),
                market_value: number(row, columns.value),
                weight: number(row, columns.weight),
            };

            let has_data = holding.isin.is_some()
                || holding.quantity.is_some()
                || holding.market_value.is_some()
                || holding.weight.is_some();
            has_data.then_some(holding)
        })
        .collect()
}

fn sum_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    values.fold(None, |acc, v| match (acc, v) {
        (acc, None) => acc,
        (None, Some(v)) => Some(v),
        (Some(a), Some(v)) => Some(a + v),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParsingMethod;

    fn table(category: TableCategory, headers: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            ParsingMethod::Space,
        );
        t.category = category;
        t
    }

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.map(|a| (a - b).abs() < 1e-6).unwrap_or(false)
    }

    #[test]
    fn test_income_statement_items_and_margins() {
        let t = table(
            TableCategory::IncomeStatement,
            &["", "2023", "2022"],
            &[
                &["Revenue", "1,000", "900"],
                &["Cost of sales", "(600)", "(500)"],
                &["Gross profit", "400", "400"],
                &["Net income", "200", "0"],
            ],
        );
        let analysis = analyze(PatternLibrary::shared(), &t, 3);

        assert_eq!(analysis.table_index, 3);
        assert_eq!(analysis.periods.len(), 2);
        assert_eq!(analysis.periods[0].label, "2023");

        let revenue = &analysis.line_items["revenue"];
        assert_eq!(revenue.row_index, 0);
        assert_eq!(revenue.values, vec![Some(1000.0), Some(900.0)]);
        assert_eq!(analysis.line_items["cost_of_revenue"].label, "Cost of sales");
        assert_eq!(
            analysis.line_items["cost_of_revenue"].values,
            vec![Some(-600.0), Some(-500.0)]
        );

        let gross = &analysis.derived["gross_margin"];
        assert!(approx(gross[0], 40.0));
        assert!(approx(gross[1], 400.0 / 9.0));
        assert!(approx(analysis.derived["net_margin"][0], 20.0));
    }

    #[test]
    fn test_growth_newest_first_and_zero_base() {
        let t = table(
            TableCategory::IncomeStatement,
            &["", "2023", "2022"],
            &[&["Revenue", "1,100", "1,000"], &["Net income", "50", "0"]],
        );
        let analysis = analyze(PatternLibrary::shared(), &t, 0);

        let revenue = analysis.growth.iter().find(|g| g.label == "Revenue").unwrap();
        assert!(approx(revenue.rates[0], 10.0));
        assert_eq!(revenue.rates[1], None);

        let net = analysis.growth.iter().find(|g| g.label == "Net income").unwrap();
        assert_eq!(net.rates, vec![None, None]);
    }

    #[test]
    fn test_growth_left_to_right_without_years() {
        let t = table(
            TableCategory::Ratios,
            &["Kennzahl", "Q1", "Q2", "Q3"],
            &[&["Marge", "10", "12", "-6"]],
        );
        let analysis = analyze(PatternLibrary::shared(), &t, 0);
        let rates = &analysis.growth[0].rates;
        assert_eq!(rates[0], None);
        assert!(approx(rates[1], 20.0));
        assert!(approx(rates[2], -150.0));
        assert_eq!(analysis.line_items["Marge"].values.len(), 3);
    }

    #[test]
    fn test_balance_sheet_ratios() {
        let t = table(
            TableCategory::BalanceSheet,
            &["Position", "31.12.2023"],
            &[
                &["Bilanzsumme", "1.000,00"],
                &["Liquide Mittel", "100"],
                &["Umlaufvermögen", "400"],
                &["Kurzfristige Verbindlichkeiten", "200"],
                &["Finanzverbindlichkeiten", "300"],
                &["Eigenkapital", "600"],
            ],
        );
        let analysis = analyze(PatternLibrary::shared(), &t, 0);

        assert!(approx(analysis.derived["debt_to_assets"][0], 0.3));
        assert!(approx(analysis.derived["cash_to_assets"][0], 0.1));
        assert!(approx(analysis.derived["debt_to_equity"][0], 0.5));
        assert!(approx(analysis.derived["current_ratio"][0], 2.0));
    }

    #[test]
    fn test_free_cash_flow_derived() {
        let t = table(
            TableCategory::CashFlow,
            &["", "FY2023"],
            &[
                &["Net cash from operating activities", "500"],
                &["Capital expenditure", "(200)"],
            ],
        );
        let analysis = analyze(PatternLibrary::shared(), &t, 0);
        assert_eq!(analysis.derived["free_cash_flow"], vec![Some(300.0)]);

        let with_fcf = table(
            TableCategory::CashFlow,
            &["", "FY2023"],
            &[
                &["Operating cash flow", "500"],
                &["Capex", "(200)"],
                &["Free cash flow", "310"],
            ],
        );
        let analysis = analyze(PatternLibrary::shared(), &with_fcf, 0);
        assert!(analysis.derived.is_empty());
        assert_eq!(analysis.line_items["free_cash_flow"].values, vec![Some(310.0)]);
    }

    #[test]
    fn test_numeric_column_fallback() {
        let t = table(
            TableCategory::IncomeStatement,
            &["Item", "Current", "Notes"],
            &[&["Revenue", "120", "audited"], &["Net income", "12", "n/a"]],
        );
        let periods = detect_periods(PatternLibrary::shared(), &t);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].index, 1);
        assert_eq!(periods[0].label, "Current");
    }

    #[test]
    fn test_portfolio_holdings() {
        let t = table(
            TableCategory::InvestmentPortfolio,
            &["Name", "ISIN", "Quantity", "Price", "Market value", "Weight"],
            &[
                &["Apple Inc", "US0378331005", "100", "145.86", "14,586.00", "60%"],
                &["Deutsche Bank", "DE0005140008", "1000", "9,72", "9.720,00", "40%"],
                &["Total", "", "", "", "24,306.00", "100%"],
            ],
        );
        let analysis = analyze(PatternLibrary::shared(), &t, 1);

        assert_eq!(analysis.holdings.len(), 2);
        let apple = &analysis.holdings[0];
        assert_eq!(apple.name.as_deref(), Some("Apple Inc"));
        assert_eq!(apple.isin.as_deref(), Some("US0378331005"));
        assert_eq!(apple.quantity, Some(100.0));
        assert!(approx(apple.price, 145.86));
        assert_eq!(analysis.holdings[1].quantity, Some(1000.0));
        assert!(approx(analysis.holdings[1].market_value, 9720.0));
        assert!(approx(analysis.total_market_value, 24_306.0));
        assert!(approx(analysis.total_weight, 100.0));
        assert!(analysis.growth.is_empty());
    }

    #[test]
    fn test_unknown_table_has_no_items() {
        let t = table(TableCategory::Unknown, &["A", "B"], &[&["x", "1"]]);
        let analysis = analyze(PatternLibrary::shared(), &t, 0);
        assert!(analysis.line_items.is_empty());
        assert!(analysis.derived.is_empty());
    }
}

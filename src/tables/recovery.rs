//! Table structure recovery
//!
//! Groups contiguous table-like lines into candidate blocks and turns each
//! block into a [`Table`] with the first split strategy that yields a
//! consistent column structure:
//!
//! 1. runs of two or more whitespace characters
//! 2. tabs
//! 3. pipes, semicolons, commas (in that order)
//! 4. adaptive: the delimiter whose modal column count covers enough of the
//!    first sampled lines
//!
//! Blocks no strategy can split are dropped.

use crate::config::ExtractionConfig;
use crate::error::ExtractionIssue;
use crate::models::{CandidateTableBlock, ParsingMethod, RawLine, Table};
use crate::patterns::PatternLibrary;

use super::row_classifier::is_table_row_with;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Space,
    Tab,
    Pipe,
    Semicolon,
    Comma,
}

impl Delimiter {
    const STRICT_ORDER: [Delimiter; 5] = [
        Self::Space,
        Self::Tab,
        Self::Pipe,
        Self::Semicolon,
        Self::Comma,
    ];

    /// Candidate order of the adaptive strategy; earlier wins ties.
    const ADAPTIVE_ORDER: [Delimiter; 5] = [
        Self::Space,
        Self::Comma,
        Self::Semicolon,
        Self::Tab,
        Self::Pipe,
    ];

    fn method(self) -> ParsingMethod {
        match self {
            Self::Space => ParsingMethod::Space,
            Self::Tab => ParsingMethod::Tab,
            Self::Pipe => ParsingMethod::Pipe,
            Self::Semicolon => ParsingMethod::Semicolon,
            Self::Comma => ParsingMethod::Comma,
        }
    }

    fn split(self, patterns: &PatternLibrary, line: &str) -> Vec<String> {
        match self {
            Self::Space => patterns
                .multi_space
                .split(line.trim_end())
                .map(|cell| cell.trim().to_string())
                .collect(),
            Self::Tab => line
                .trim_end()
                .split('\t')
                .map(|cell| cell.trim().to_string())
                .collect(),
            Self::Pipe => strip_pipe_borders(line.trim())
                .split('|')
                .map(|cell| cell.trim().to_string())
                .collect(),
            Self::Semicolon => split_quoted(line.trim(), ';'),
            Self::Comma => split_quoted(line.trim(), ','),
        }
    }

    /// Split with empty fields dropped (adaptive counting).
    fn split_fields(self, patterns: &PatternLibrary, line: &str) -> Vec<String> {
        self.split(patterns, line)
            .into_iter()
            .filter(|cell| !cell.is_empty())
            .collect()
    }
}

/// Turns text and candidate line groups into tables.
pub struct TableRecovery<'p> {
    patterns: &'p PatternLibrary,
    config: &'p ExtractionConfig,
}

impl<'p> TableRecovery<'p> {
    pub fn new(patterns: &'p PatternLibrary, config: &'p ExtractionConfig) -> Self {
        Self { patterns, config }
    }

    /// Contiguous runs of table-like lines with at least `min_table_lines` lines.
    pub fn find_blocks(&self, text: &str, page_index: Option<usize>) -> Vec<CandidateTableBlock> {
        let mut blocks = Vec::new();
        let mut current: Vec<RawLine> = Vec::new();

        for line in RawLine::split_text(text) {
            if is_table_row_with(self.patterns, &line.text) {
                current.push(line);
            } else {
                self.close_block(&mut current, page_index, &mut blocks);
            }
        }
        self.close_block(&mut current, page_index, &mut blocks);

        blocks
    }

    fn close_block(
        &self,
        current: &mut Vec<RawLine>,
        page_index: Option<usize>,
        blocks: &mut Vec<CandidateTableBlock>,
    ) {
        if current.is_empty() {
            return;
        }
        let lines = std::mem::take(current);
        if lines.len() >= self.config.min_table_lines {
            blocks.push(CandidateTableBlock::new(page_index, lines));
        } else {
            log::trace!(
                "Skipping {}-line block at line {}",
                lines.len(),
                lines[0].index
            );
        }
    }

    /// Parse one block into a table.
    pub fn parse_block(&self, block: &CandidateTableBlock) -> Result<Table, ExtractionIssue> {
        let no_structure = ExtractionIssue::NoTableStructure {
            start_line: block.start_line(),
        };
        let lines: Vec<&str> = block
            .texts()
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .collect();
        if lines.len() < 2 {
            return Err(no_structure);
        }

        for delimiter in Delimiter::STRICT_ORDER {
            if let Some(table) = self.split_consistent(delimiter, &lines) {
                return Ok(table);
            }
        }

        self.split_adaptive(&lines).ok_or(no_structure)
    }

    /// Tables from the page text, blocks without structure dropped.
    pub fn recover(&self, text: &str, page_index: Option<usize>) -> Vec<Table> {
        self.find_blocks(text, page_index)
            .iter()
            .filter_map(|block| match self.parse_block(block) {
                Ok(table) => Some(table),
                Err(issue) => {
                    log::debug!("Dropping candidate table: {}", issue);
                    None
                }
            })
            .collect()
    }

    /// Every line splits into the header's column count (at least two).
    fn split_consistent(&self, delimiter: Delimiter, lines: &[&str]) -> Option<Table> {
        // Bordered pipe tables also split on their padding
        if delimiter == Delimiter::Space && lines.iter().all(|l| l.trim_start().starts_with('|')) {
            return None;
        }

        let mut rows: Vec<Vec<String>> = lines
            .iter()
            .filter(|l| !(delimiter == Delimiter::Pipe && is_rule_row(l)))
            .map(|l| delimiter.split(self.patterns, l))
            .collect();

        let width = rows.first()?.len();
        if width < 2 || rows.len() < 2 || rows.iter().any(|r| r.len() != width) {
            return None;
        }

        drop_empty_leading_column(&mut rows);
        let mut rows = rows.into_iter();
        let headers = rows.next()?;
        Some(Table::new(headers, rows.collect(), delimiter.method()))
    }

    fn split_adaptive(&self, lines: &[&str]) -> Option<Table> {
        let sample_size = self.config.adaptive_sample_lines.max(1).min(lines.len());
        let sample = &lines[..sample_size];

        let mut best: Option<(Delimiter, f64)> = None;
        for delimiter in Delimiter::ADAPTIVE_ORDER {
            let counts: Vec<usize> = sample
                .iter()
                .map(|l| delimiter.split_fields(self.patterns, l).len())
                .collect();
            let Some((mode, frequency)) = modal_count(&counts) else {
                continue;
            };
            if mode < 2 {
                continue;
            }
            let consistency = frequency as f64 / sample_size as f64;
            if consistency < self.config.adaptive_consistency_threshold {
                continue;
            }
            if best.map_or(true, |(_, c)| consistency > c) {
                best = Some((delimiter, consistency));
            }
        }

        let (delimiter, consistency) = best?;
        let headers = delimiter.split_fields(self.patterns, lines[0]);
        if headers.len() < 2 {
            return None;
        }
        log::debug!(
            "Adaptive split on {:?} ({:.0}% consistent, {} columns)",
            delimiter,
            consistency * 100.0,
            headers.len()
        );

        let rows = lines[1..]
            .iter()
            .filter(|l| !(delimiter == Delimiter::Pipe && is_rule_row(l)))
            .map(|l| delimiter.split_fields(self.patterns, l))
            .collect();
        Some(Table::new(headers, rows, ParsingMethod::Adaptive))
    }
}

/// Most frequent value and its frequency; the first seen wins ties.
fn modal_count(counts: &[usize]) -> Option<(usize, usize)> {
    let mut frequencies: Vec<(usize, usize)> = Vec::new();
    for &count in counts {
        match frequencies.iter_mut().find(|(c, _)| *c == count) {
            Some((_, freq)) => *freq += 1,
            None => frequencies.push((count, 1)),
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for (count, freq) in frequencies {
        if best.map_or(true, |(_, f)| freq > f) {
            best = Some((count, freq));
        }
    }
    best
}

fn strip_pipe_borders(line: &str) -> &str {
    let line = line.strip_prefix('|').unwrap_or(line);
    line.strip_suffix('|').unwrap_or(line)
}

/// Markdown separator rows such as `|---|:--:|`.
fn is_rule_row(line: &str) -> bool {
    let line = line.trim();
    line.contains('-') && line.chars().all(|c| matches!(c, '|' | '-' | ':' | '+' | ' '))
}

/// Split on `delimiter` outside double quotes.
fn split_quoted(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Indented blocks split with an empty first cell on every line.
fn drop_empty_leading_column(rows: &mut [Vec<String>]) {
    let removable = rows
        .iter()
        .all(|r| r.len() > 2 && r.first().map(|c| c.is_empty()).unwrap_or(false));
    if removable {
        for row in rows.iter_mut() {
            row.remove(0);
        }
    }
}

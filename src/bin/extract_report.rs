//! Diagnostic extractor binary.
//!
//! Reads a UTF-8 text file (form feeds separate pages), runs the document
//! extractor and prints the JSON result on stdout.
//!
//! Usage: extract_report <path_to_text> [config.json]
//! Logging is controlled by `RUST_LOG` (default `info`), on stderr.

use std::env;
use std::fs;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use portfolio_extract::{DocumentInput, DocumentMetricsExtractor, ExtractionConfig};

/// Page break marker in text dumps of multi-page documents.
const PAGE_BREAK: char = '\x0c';

fn run(args: &[String]) -> Result<String> {
    let (path, config_path) = match args {
        [_, path] => (path, None),
        [_, path, config] => (path, Some(config)),
        _ => bail!("Usage: extract_report <path_to_text> [config.json]"),
    };

    let config = match config_path {
        Some(config_path) => {
            let raw = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config {}", config_path))?;
            serde_json::from_str::<ExtractionConfig>(&raw)
                .with_context(|| format!("Invalid config {}", config_path))?
        }
        None => ExtractionConfig::default(),
    };

    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let input = if text.contains(PAGE_BREAK) {
        DocumentInput::from_pages(text.split(PAGE_BREAK))
    } else {
        DocumentInput::from_text(text)
    };
    log::info!("Read {} page(s) from {}", input.pages.len().max(1), path);

    let result = DocumentMetricsExtractor::with_config(config)
        .extract(&input)
        .context("Extraction failed")?;
    serde_json::to_string_pretty(&result).context("Failed to serialize result")
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    match run(&args) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

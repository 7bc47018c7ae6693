use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Name used when no strategy resolves a security name.
pub const UNKNOWN_SECURITY_NAME: &str = "Unknown";

/// Quantity found near an ISIN occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityMatch {
    pub value: String,
    pub term: String,
    pub context: String,
}

/// Price found near an ISIN occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceMatch {
    pub value: String,
    pub currency: Option<String>,
    pub term: String,
    pub context: String,
}

/// One place an ISIN occurs. `page_index` is `None` when only the full
/// document text was available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub page_index: Option<usize>,
    pub position: usize,
    pub context: String,
}

/// Everything learned about one unique ISIN in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityRecord {
    pub isin: String,
    pub name: String,
    pub currencies: BTreeSet<String>,
    pub quantities: Vec<QuantityMatch>,
    pub prices: Vec<PriceMatch>,
    pub occurrences: Vec<Occurrence>,
}

impl SecurityRecord {
    pub fn new(isin: &str) -> Self {
        Self {
            isin: isin.to_string(),
            name: UNKNOWN_SECURITY_NAME.to_string(),
            currencies: BTreeSet::new(),
            quantities: Vec::new(),
            prices: Vec::new(),
            occurrences: Vec::new(),
        }
    }

    pub fn has_name(&self) -> bool {
        self.name != UNKNOWN_SECURITY_NAME
    }
}

/// Reporting view of an ISIN-shaped code, valid or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsinInfo {
    pub code: String,
    pub country_code: String,
    pub country: Option<String>,
    pub is_valid: bool,
}

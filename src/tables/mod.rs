//! Tables in plain text: row detection, structure recovery, category
//! classification and per-category analysis.

pub mod analyzer;
pub mod category;
pub mod recovery;
pub mod row_classifier;

pub use analyzer::analyze;
pub use category::{classify, scores};
pub use recovery::TableRecovery;
pub use row_classifier::is_table_row;

//! Data model shared by every extraction component.
//!
//! All result types serialize with serde into the JSON shape consumed by the
//! presentation/export collaborator.

mod analysis;
mod document;
mod security;
mod table;

pub use analysis::*;
pub use document::*;
pub use security::*;
pub use table::*;

//! Library interface for the unlinked report
//!
//! Lists installed formulae that are not linked into the prefix and explains
//! why each one is unlinked. Nothing here modifies the filesystem.

pub mod api;
pub mod cache;
pub mod cellar;
pub mod classify;
pub mod colors;
pub mod commands;
pub mod conflict;
pub mod error;
pub mod formulary;
pub mod keg;
pub mod tap;

// Re-export commonly used items
pub use cellar::Layout;
pub use classify::{Classifier, ReportOptions, UnlinkReason, UnlinkedFormula, find_unlinked};
pub use error::{Result, UnlinkedError};
pub use formulary::{FormulaSource, Formulary, MetadataError};

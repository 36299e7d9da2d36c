//! Command implementations for the unlinked CLI
//!
//! - **unlinked**: render the unlinked-formula report

pub mod unlinked;

pub use unlinked::{UnlinkedArgs, unlinked};

//! Storage layer for draw histories.
//!
//! Histories live in delimited text files; this module writes them
//! all-or-nothing and reads them back in lenient or strict mode.

pub mod csv;

// Re-export key types
pub use csv::{HistoryCsvWriter, LoadedHistory, Strictness, parse_history, read_history};

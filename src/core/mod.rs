//! Core types and sampling for ssq-history.
//!
//! `schema` holds the `DrawRecord` row type and the fixed dataset constants;
//! `draw` turns a seeded generator into a sequence of records.

pub mod draw;
pub mod schema;

// Re-export key types for convenience
pub use draw::{DrawSequence, draw_record, seeded_rng};
pub use schema::{BASE_OFFSET, DrawRecord, HEADERS, PRIMARY_COUNT, PRIMARY_MAX, SECONDARY_MAX};

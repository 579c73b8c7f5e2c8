//! Field extraction for spoken inspection notes.
//!
//! Turns free-text transcriptions ("Riser 1. Static pressure is 55 psi...")
//! into per-riser readings using deterministic pattern matching. This is
//! also the fallback whenever no language model is configured or the model
//! answer cannot be used.

pub mod extract;
pub mod patterns;

pub use extract::{extract, extract_at};

//! NFPA 25 compliance evaluation.
//!
//! Applies fixed regulatory thresholds to extracted riser readings and
//! produces pass / fail / warning checks with citations, ready to be
//! rendered into a report table without further lookups.

pub mod references;
pub mod rules;

pub use rules::{STATIC_PRESSURE_RANGE_PSI, evaluate};

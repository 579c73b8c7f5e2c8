//! End-to-end integration tests for the field inspection workspace.
//!
//! All tests live in `tests/`; this crate has no runtime code.

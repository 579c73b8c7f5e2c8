//! Transcript parsing tiers.
//!
//! Converts a spoken inspection transcript into riser readings. Two tiers:
//! - **Model**: a local Ollama chat model asked for strict JSON.
//! - **Patterns**: deterministic keyword extraction, always available.
//!
//! Both tiers emit the same `RiserReading` shape so everything downstream
//! is backend-agnostic.

pub mod json;
pub mod ollama;
pub mod patterns;
pub mod tiered;

use async_trait::async_trait;
use fi_protocol::{ParseTier, RiserReading};

/// Result of parsing, with the tier that produced it (for logging/audit).
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub readings: Vec<RiserReading>,
    pub tier: ParseTier,
}

/// Trait for parsers that turn a transcript into riser readings.
#[async_trait]
pub trait ReadingParser: Send + Sync {
    /// Parse a transcript. Returns None if this tier cannot produce a
    /// usable answer (unreachable backend, malformed output).
    async fn parse(&self, transcript: &str) -> Option<ParseResult>;

    /// Name of this tier (for logging).
    fn tier_name(&self) -> &str;
}

pub use ollama::{OllamaConfig, OllamaParser};
pub use patterns::PatternParser;
pub use tiered::TieredParser;

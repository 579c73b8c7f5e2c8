//! Pattern tier: wraps the deterministic field extractor.

use async_trait::async_trait;
use fi_protocol::ParseTier;

use super::{ParseResult, ReadingParser};

/// Always-available parser backed by `fi_extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternParser;

impl PatternParser {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous form used wherever a guaranteed answer is needed.
    pub fn parse_now(&self, transcript: &str) -> ParseResult {
        ParseResult {
            readings: fi_extract::extract(transcript),
            tier: ParseTier::Patterns,
        }
    }
}

#[async_trait]
impl ReadingParser for PatternParser {
    async fn parse(&self, transcript: &str) -> Option<ParseResult> {
        Some(self.parse_now(transcript))
    }

    fn tier_name(&self) -> &str {
        "patterns"
    }
}

//! Tiered parser: model first with pattern fallback.
//!
//! Tries the model tier first. If it returns `None`, falls back to the
//! pattern tier. The tier that produced the readings is recorded in
//! `ParseResult.tier`.

use async_trait::async_trait;

use super::{ParseResult, ReadingParser};

/// Composite parser that tries the model, then patterns.
pub struct TieredParser {
    model: Box<dyn ReadingParser>,
    fallback: Box<dyn ReadingParser>,
}

impl TieredParser {
    pub fn new(model: Box<dyn ReadingParser>, fallback: Box<dyn ReadingParser>) -> Self {
        Self { model, fallback }
    }
}

#[async_trait]
impl ReadingParser for TieredParser {
    async fn parse(&self, transcript: &str) -> Option<ParseResult> {
        if let Some(result) = self.model.parse(transcript).await {
            return Some(result);
        }

        tracing::debug!(
            model = self.model.tier_name(),
            fallback = self.fallback.tier_name(),
            "model tier missed, falling back"
        );
        self.fallback.parse(transcript).await
    }

    fn tier_name(&self) -> &str {
        "tiered"
    }
}

//! Scheduling error type.

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("no available time slots found for the requested dates")]
    NoAvailableSlot,

    #[error("job not found: {0}")]
    NotFound(Uuid),

    #[error("technician {technician} not available at {start} ({conflicts} conflicting jobs)")]
    Conflict {
        technician: String,
        start: DateTime<Utc>,
        conflicts: usize,
    },

    #[error("invalid duration: {0} hours")]
    InvalidDuration(f64),

    /// Backend failure reported by a `JobRepository` implementation.
    /// The in-memory store never raises it.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Convenience alias.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

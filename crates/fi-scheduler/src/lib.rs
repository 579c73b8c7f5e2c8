//! Field job scheduling.
//!
//! Turns a spoken job request into a `Job` on the first free technician,
//! detects overlaps for manual reschedules and answers calendar queries.
//! All writes are serialized so slot search and insert happen atomically.

pub mod config;
pub mod error;
pub mod request;
pub mod scheduler;
pub mod store;

pub use config::SchedulerConfig;
pub use error::{ScheduleError, ScheduleResult};
pub use request::{ClientInfo, ScheduleRequest, parse_description};
pub use scheduler::{MAX_DURATION_HOURS, Scheduler};
pub use store::{InMemoryJobStore, JobRepository};

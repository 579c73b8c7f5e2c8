//! Inspection conversation agent: library crate.
//!
//! Turns one transcribed voice segment into readings, compliance checks,
//! missing-field prompts and an overall verdict. Re-exports all modules so
//! the binary (`main.rs`) and `fi-e2e-tests` can reach the agent, the
//! parser tiers and the configuration types.

pub mod agent;
pub mod config;
pub mod inference;
pub mod interrupt;

pub use agent::{ConversationAgent, MissingField};
pub use config::AgentConfig;
pub use interrupt::{pending_fields, should_interrupt};
pub use inference::{ParseResult, ReadingParser};

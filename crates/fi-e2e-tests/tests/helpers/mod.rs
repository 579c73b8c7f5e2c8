//! Shared test harness for E2E integration tests.
//!
//! Wires the agent, scheduler and client directory over in-memory
//! repositories and a frozen clock, so every crate boundary runs real code.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use fi_agent::ConversationAgent;
use fi_agent::inference::OllamaConfig;
use fi_clients::{ClientDirectory, ClientDraft, InMemoryClientStore};
use fi_protocol::{
    FixedClock, Industry, Job, JobPriority, JobStatus, PostalAddress, ServiceFrequency, SystemType,
};
use fi_scheduler::{InMemoryJobStore, JobRepository, Scheduler, SchedulerConfig};

/// Monday 2026-03-02 09:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

/// Tomorrow at `hour`:00 UTC.
pub fn tomorrow_at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 3, hour, 0, 0).unwrap()
}

pub struct TestHarness {
    /// Pattern-only agent (no network).
    pub agent: ConversationAgent,
    pub scheduler: Arc<Scheduler>,
    /// Backing store, for seeding jobs directly.
    pub jobs: Arc<InMemoryJobStore>,
    pub clients: ClientDirectory,
}

impl TestHarness {
    /// Default four-technician roster, one day lead.
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_roster(technicians: &[&str]) -> Self {
        Self::with_config(SchedulerConfig {
            technicians: technicians.iter().map(|s| s.to_string()).collect(),
            ..SchedulerConfig::default()
        })
    }

    fn with_config(config: SchedulerConfig) -> Self {
        let clock = Arc::new(FixedClock(now()));
        let jobs = Arc::new(InMemoryJobStore::new());
        let scheduler = Arc::new(Scheduler::new(config, jobs.clone(), clock.clone()));
        let clients = ClientDirectory::new(Arc::new(InMemoryClientStore::new()), clock);

        Self {
            agent: ConversationAgent::pattern_only(),
            scheduler,
            jobs,
            clients,
        }
    }

    /// Insert a scheduled job for `technician` bypassing slot search.
    pub async fn seed_job(&self, technician: &str, start: DateTime<Utc>, hours: f64) -> Job {
        let job = Job {
            id: Uuid::now_v7(),
            title: "Sprinkler System Inspection".into(),
            location: "123 Main St".into(),
            scheduled_date: start,
            status: JobStatus::Scheduled,
            technician: technician.into(),
            notes: None,
            priority: JobPriority::Medium,
            estimated_duration: hours,
            client_name: None,
            client_phone: None,
            system_type: SystemType::Sprinkler,
            created_at: now(),
            updated_at: now(),
        };
        self.jobs.upsert(job.clone()).await.unwrap();
        job
    }
}

/// Agent whose model tier points at `host` (typically a wiremock server).
pub fn model_agent(host: String) -> ConversationAgent {
    ConversationAgent::from_config(&OllamaConfig {
        host,
        enabled: true,
        timeout_secs: 2,
        ..OllamaConfig::default()
    })
}

/// Ollama chat reply wrapping `content`.
pub fn ollama_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "model": "llama3.1:8b",
        "message": { "role": "assistant", "content": content },
        "done": true
    })
}

pub fn client_draft(name: &str, phone: &str) -> ClientDraft {
    ClientDraft {
        name: name.into(),
        business_name: None,
        address: PostalAddress {
            street: "123 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: "62701".into(),
        },
        phone: phone.into(),
        email: None,
        contact_person: "Jane Doe".into(),
        contact_title: Some("Facilities Manager".into()),
        industry: Industry::Commercial,
        system_types: vec![SystemType::Sprinkler],
        service_frequency: ServiceFrequency::Annual,
        last_inspection_date: None,
        next_inspection_date: Some(now() + Duration::days(3)),
        is_active: true,
        notes: None,
        emergency_contact: None,
        billing_address: None,
    }
}

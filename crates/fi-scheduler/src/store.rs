//! Job storage.
//!
//! The scheduler only talks to `JobRepository`. `InMemoryJobStore` keeps
//! jobs in a `RwLock<HashMap>` for tests and single-process use.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use fi_protocol::Job;

use crate::error::ScheduleResult;

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> ScheduleResult<Option<Job>>;

    /// All jobs, ordered by start time.
    async fn list(&self) -> ScheduleResult<Vec<Job>>;

    /// Insert or replace by id.
    async fn upsert(&self, job: Job) -> ScheduleResult<()>;

    /// Returns whether a job was removed.
    async fn delete(&self, id: Uuid) -> ScheduleResult<bool>;
}

#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobStore {
    async fn get(&self, id: Uuid) -> ScheduleResult<Option<Job>> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn list(&self) -> ScheduleResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by(|a, b| a.scheduled_date.cmp(&b.scheduled_date).then(a.id.cmp(&b.id)));
        Ok(jobs)
    }

    async fn upsert(&self, job: Job) -> ScheduleResult<()> {
        self.jobs.write().await.insert(job.id, job);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ScheduleResult<bool> {
        Ok(self.jobs.write().await.remove(&id).is_some())
    }
}

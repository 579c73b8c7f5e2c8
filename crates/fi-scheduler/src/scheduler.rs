//! First-fit job scheduler over a flat technician roster.
//!
//! Every write takes `write_lock`, so a slot search and the insert that
//! claims it can never interleave with another write.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use fi_protocol::{
    Clock, Conflict, ConflictType, Interval, Job, JobStatus, Resolution, Slot, TechnicianDay,
    shift_days,
};

use crate::config::SchedulerConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::request::{ScheduleRequest, parse_description};
use crate::store::JobRepository;

/// Longest bookable job, in hours (one year).
pub const MAX_DURATION_HOURS: f64 = 24.0 * 365.0;

pub struct Scheduler {
    jobs: Arc<dyn JobRepository>,
    clock: Arc<dyn Clock>,
    roster: Vec<String>,
    lead_days: i64,
    write_lock: Mutex<()>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig, jobs: Arc<dyn JobRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            jobs,
            clock,
            roster: config.technicians,
            lead_days: config.lead_days,
            write_lock: Mutex::new(()),
        }
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    /// Parse a spoken request and book it on the first free technician.
    pub async fn create_from_description(&self, text: &str) -> ScheduleResult<Job> {
        let request = parse_description(text, self.clock.now(), self.lead_days);
        self.schedule(request).await
    }

    /// Book a structured request. Fails with `NoAvailableSlot` when no
    /// technician is free at any preferred date.
    pub async fn schedule(&self, request: ScheduleRequest) -> ScheduleResult<Job> {
        validate_duration(request.estimated_duration)?;

        let _guard = self.write_lock.lock().await;
        let existing = self.jobs.list().await?;
        let Some(slot) = first_fit(
            &self.roster,
            &existing,
            &request.preferred_dates,
            request.estimated_duration,
        ) else {
            tracing::warn!(
                dates = request.preferred_dates.len(),
                hours = request.estimated_duration,
                "no available slot"
            );
            return Err(ScheduleError::NoAvailableSlot);
        };

        let now = self.clock.now();
        let job = Job {
            id: Uuid::now_v7(),
            title: request.title(),
            location: request.location,
            scheduled_date: slot.date,
            status: JobStatus::Scheduled,
            technician: slot.technician,
            notes: request.notes,
            priority: request.priority,
            estimated_duration: request.estimated_duration,
            client_name: Some(request.client.name),
            client_phone: request.client.phone,
            system_type: request.system_type,
            created_at: now,
            updated_at: now,
        };
        self.jobs.upsert(job.clone()).await?;

        tracing::info!(
            job_id = %job.id,
            technician = %job.technician,
            start = %job.scheduled_date,
            hours = job.estimated_duration,
            "job scheduled"
        );
        Ok(job)
    }

    /// First (date, technician) pair free for `duration_hours`, trying
    /// dates in order and technicians in roster order.
    pub async fn assign_slot(
        &self,
        preferred: &[DateTime<Utc>],
        duration_hours: f64,
    ) -> ScheduleResult<Option<Slot>> {
        validate_duration(duration_hours)?;
        let existing = self.jobs.list().await?;
        Ok(first_fit(&self.roster, &existing, preferred, duration_hours))
    }

    /// Every active job of the candidate's technician that overlaps it.
    pub async fn check_conflicts(&self, candidate: &Job) -> ScheduleResult<Vec<Conflict>> {
        let existing = self.jobs.list().await?;
        Ok(conflicts_with(&existing, candidate))
    }

    /// Set a job's status. Reviving a cancelled job reclaims its slot, so
    /// it fails with `Conflict` if the slot has since been taken.
    pub async fn update_status(&self, id: Uuid, status: JobStatus) -> ScheduleResult<Job> {
        let _guard = self.write_lock.lock().await;
        let mut job = self.get(id).await?;
        let was_cancelled = !job.is_active();
        job.status = status;

        if was_cancelled && job.is_active() {
            let existing = self.jobs.list().await?;
            let conflicts = conflicts_with(&existing, &job);
            if !conflicts.is_empty() {
                tracing::warn!(
                    job_id = %id,
                    technician = %job.technician,
                    conflicts = conflicts.len(),
                    "reactivation rejected"
                );
                return Err(ScheduleError::Conflict {
                    technician: job.technician,
                    start: job.scheduled_date,
                    conflicts: conflicts.len(),
                });
            }
        }

        job.updated_at = self.clock.now();
        self.jobs.upsert(job.clone()).await?;

        tracing::info!(job_id = %id, status = ?status, "job status updated");
        Ok(job)
    }

    /// Move a job to `new_date` on the same technician. On conflict the
    /// stored job is left untouched.
    pub async fn reschedule(&self, id: Uuid, new_date: DateTime<Utc>) -> ScheduleResult<Job> {
        let _guard = self.write_lock.lock().await;
        let mut job = self.get(id).await?;
        job.scheduled_date = new_date;

        let existing = self.jobs.list().await?;
        let conflicts = conflicts_with(&existing, &job);
        if !conflicts.is_empty() {
            tracing::warn!(
                job_id = %id,
                technician = %job.technician,
                conflicts = conflicts.len(),
                "reschedule rejected"
            );
            return Err(ScheduleError::Conflict {
                technician: job.technician,
                start: new_date,
                conflicts: conflicts.len(),
            });
        }

        job.updated_at = self.clock.now();
        self.jobs.upsert(job.clone()).await?;
        tracing::info!(job_id = %id, start = %new_date, "job rescheduled");
        Ok(job)
    }

    pub async fn delete(&self, id: Uuid) -> ScheduleResult<()> {
        let _guard = self.write_lock.lock().await;
        if !self.jobs.delete(id).await? {
            return Err(ScheduleError::NotFound(id));
        }
        tracing::info!(job_id = %id, "job deleted");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> ScheduleResult<Job> {
        self.jobs.get(id).await?.ok_or(ScheduleError::NotFound(id))
    }

    /// Active jobs for one technician, by start time.
    pub async fn jobs_for_technician(&self, technician: &str) -> ScheduleResult<Vec<Job>> {
        let jobs = self.jobs.list().await?;
        Ok(jobs
            .into_iter()
            .filter(|j| j.technician == technician && j.is_active())
            .collect())
    }

    /// Jobs of any status starting on `date` (UTC), by start time.
    pub async fn jobs_for_date(&self, date: NaiveDate) -> ScheduleResult<Vec<Job>> {
        let jobs = self.jobs.list().await?;
        Ok(jobs
            .into_iter()
            .filter(|j| j.scheduled_date.date_naive() == date)
            .collect())
    }

    /// One entry per roster technician, in roster order.
    pub async fn daily_schedule(&self, date: NaiveDate) -> ScheduleResult<Vec<TechnicianDay>> {
        let jobs = self.jobs_for_date(date).await?;
        Ok(self
            .roster
            .iter()
            .map(|technician| TechnicianDay {
                technician: technician.clone(),
                jobs: jobs
                    .iter()
                    .filter(|j| &j.technician == technician)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    /// Active jobs starting within `[now, now + days]`, soonest first.
    /// The window end saturates at the last representable instant.
    pub async fn upcoming(&self, days: i64) -> ScheduleResult<Vec<Job>> {
        let now = self.clock.now();
        let until = shift_days(now, days);
        let jobs = self.jobs.list().await?;
        Ok(jobs
            .into_iter()
            .filter(|j| j.is_active() && j.scheduled_date >= now && j.scheduled_date <= until)
            .collect())
    }
}

fn validate_duration(hours: f64) -> ScheduleResult<()> {
    if hours > 0.0 && hours <= MAX_DURATION_HOURS {
        Ok(())
    } else {
        Err(ScheduleError::InvalidDuration(hours))
    }
}

fn is_free(existing: &[Job], technician: &str, window: &Interval) -> bool {
    !existing
        .iter()
        .any(|j| j.technician == technician && j.is_active() && j.interval().overlaps(window))
}

fn first_fit(
    roster: &[String],
    existing: &[Job],
    preferred: &[DateTime<Utc>],
    hours: f64,
) -> Option<Slot> {
    for &date in preferred {
        let window = Interval::from_hours(date, hours);
        for technician in roster {
            if is_free(existing, technician, &window) {
                return Some(Slot {
                    date,
                    technician: technician.clone(),
                });
            }
        }
    }
    None
}

fn conflicts_with(existing: &[Job], candidate: &Job) -> Vec<Conflict> {
    let window = candidate.interval();
    existing
        .iter()
        .filter(|j| {
            j.id != candidate.id
                && j.technician == candidate.technician
                && j.is_active()
                && j.interval().overlaps(&window)
        })
        .map(|j| Conflict {
            conflicting_job: j.clone(),
            conflict_type: ConflictType::Overlap,
            resolution: Resolution::Reschedule,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use fi_protocol::{FixedClock, JobPriority, SystemType};

    use crate::store::InMemoryJobStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn tomorrow(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 3, hour, 0, 0).unwrap()
    }

    fn job(technician: &str, start: DateTime<Utc>, hours: f64) -> Job {
        Job {
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
        }
    }

    fn scheduler(roster: &[&str]) -> (Scheduler, Arc<InMemoryJobStore>) {
        let store = Arc::new(InMemoryJobStore::new());
        let config = SchedulerConfig {
            technicians: roster.iter().map(|s| s.to_string()).collect(),
            lead_days: 1,
        };
        let scheduler = Scheduler::new(config, store.clone(), Arc::new(FixedClock(now())));
        (scheduler, store)
    }

    #[tokio::test]
    async fn first_fit_in_roster_order() {
        let (s, store) = scheduler(&["John Smith", "Mike Johnson"]);
        store.upsert(job("John Smith", tomorrow(9), 2.0)).await.unwrap();

        let slot = s.assign_slot(&[tomorrow(9)], 2.0).await.unwrap().unwrap();
        assert_eq!(slot.technician, "Mike Johnson");
        assert_eq!(slot.date, tomorrow(9));

        // back-to-back with John's job does not overlap
        let slot = s.assign_slot(&[tomorrow(11)], 1.0).await.unwrap().unwrap();
        assert_eq!(slot.technician, "John Smith");
    }

    #[tokio::test]
    async fn later_preferred_date_used_when_first_is_full() {
        let (s, store) = scheduler(&["John Smith"]);
        store.upsert(job("John Smith", tomorrow(9), 2.0)).await.unwrap();

        let slot = s
            .assign_slot(&[tomorrow(10), tomorrow(13)], 2.0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(slot.date, tomorrow(13));
    }

    #[tokio::test]
    async fn no_slot_when_roster_fully_booked() {
        let (s, store) = scheduler(&["John Smith", "Mike Johnson", "Sarah Davis", "Tom Wilson"]);
        for tech in s.roster().to_vec() {
            store.upsert(job(&tech, tomorrow(9), 2.0)).await.unwrap();
        }

        assert!(s.assign_slot(&[tomorrow(9)], 2.0).await.unwrap().is_none());
        let err = s
            .create_from_description("Inspection at 9 Elm St building")
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::NoAvailableSlot));
        assert_eq!(store.list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn cancelled_jobs_free_the_slot() {
        let (s, store) = scheduler(&["John Smith"]);
        let mut cancelled = job("John Smith", tomorrow(9), 2.0);
        cancelled.status = JobStatus::Cancelled;
        store.upsert(cancelled).await.unwrap();

        assert!(s.assign_slot(&[tomorrow(9)], 2.0).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn invalid_durations_rejected() {
        let (s, _) = scheduler(&["John Smith"]);
        for hours in [0.0, -2.0, f64::NAN, f64::INFINITY, 1e12, MAX_DURATION_HOURS + 1.0] {
            let err = s.assign_slot(&[tomorrow(9)], hours).await.unwrap_err();
            assert!(matches!(err, ScheduleError::InvalidDuration(_)));
        }
        assert!(s.assign_slot(&[tomorrow(9)], MAX_DURATION_HOURS).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn oversized_request_is_rejected_not_booked() {
        let (s, store) = scheduler(&["John Smith"]);
        let mut request = parse_description("Inspection at 9 Elm St building", now(), 1);
        request.estimated_duration = 1e12;

        let err = s.schedule(request).await.unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDuration(h) if h == 1e12));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn booking_at_the_end_of_time_does_not_overflow() {
        let (s, store) = scheduler(&["John Smith"]);
        let last = DateTime::<Utc>::MAX_UTC - Duration::hours(1);
        store.upsert(job("John Smith", last, 2.0)).await.unwrap();

        assert!(s.assign_slot(&[last], 2.0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_from_description_books_tomorrow() {
        let (s, store) = scheduler(&["John Smith", "Mike Johnson"]);
        let job = s
            .create_from_description("Annual inspection at 123 Main St office for ABC Corporation")
            .await
            .unwrap();

        assert_eq!(job.technician, "John Smith");
        assert_eq!(job.scheduled_date, tomorrow(9));
        assert_eq!(job.title, "Sprinkler System Inspection");
        assert_eq!(job.client_name.as_deref(), Some("ABC Corporation"));
        assert_eq!(job.status, JobStatus::Scheduled);
        assert_eq!(store.get(job.id).await.unwrap(), Some(job));
    }

    #[tokio::test]
    async fn conflicts_report_every_overlap() {
        let (s, store) = scheduler(&["John Smith"]);
        let a = job("John Smith", tomorrow(9), 2.0);
        let b = job("John Smith", tomorrow(10), 2.0);
        let other_tech = job("Mike Johnson", tomorrow(9), 4.0);
        for j in [&a, &b, &other_tech] {
            store.upsert(j.clone()).await.unwrap();
        }

        let candidate = job("John Smith", tomorrow(8), 3.0);
        let conflicts = s.check_conflicts(&candidate).await.unwrap();
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.iter().all(|c| c.conflict_type == ConflictType::Overlap
            && c.resolution == Resolution::Reschedule));

        // an existing job never conflicts with itself
        assert_eq!(s.check_conflicts(&a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reschedule_conflict_leaves_job_unchanged() {
        let (s, store) = scheduler(&["John Smith"]);
        let a = job("John Smith", tomorrow(9), 2.0);
        let b = job("John Smith", tomorrow(13), 2.0);
        store.upsert(a.clone()).await.unwrap();
        store.upsert(b.clone()).await.unwrap();

        let err = s.reschedule(b.id, tomorrow(10)).await.unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict { conflicts: 1, .. }));
        assert_eq!(s.get(b.id).await.unwrap().scheduled_date, tomorrow(13));
    }

    #[tokio::test]
    async fn reschedule_within_own_window_succeeds() {
        let (s, store) = scheduler(&["John Smith"]);
        let a = job("John Smith", tomorrow(9), 2.0);
        store.upsert(a.clone()).await.unwrap();

        let moved = s.reschedule(a.id, tomorrow(10)).await.unwrap();
        assert_eq!(moved.scheduled_date, tomorrow(10));
        assert_eq!(s.get(a.id).await.unwrap().scheduled_date, tomorrow(10));
    }

    #[tokio::test]
    async fn reviving_cancelled_job_into_taken_slot_is_rejected() {
        let (s, store) = scheduler(&["John Smith"]);
        let a = job("John Smith", tomorrow(9), 2.0);
        store.upsert(a.clone()).await.unwrap();
        s.update_status(a.id, JobStatus::Cancelled).await.unwrap();

        // the freed slot goes to a new booking
        let b = s
            .create_from_description("Inspection at 9 Elm St building")
            .await
            .unwrap();
        assert_eq!(b.scheduled_date, tomorrow(9));

        for status in [JobStatus::Scheduled, JobStatus::InProgress, JobStatus::Completed] {
            let err = s.update_status(a.id, status).await.unwrap_err();
            assert!(matches!(err, ScheduleError::Conflict { conflicts: 1, .. }));
        }
        assert_eq!(s.get(a.id).await.unwrap().status, JobStatus::Cancelled);

        let active = s.jobs_for_technician("John Smith").await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, b.id);
    }

    #[tokio::test]
    async fn reviving_cancelled_job_into_free_slot_succeeds() {
        let (s, store) = scheduler(&["John Smith"]);
        let a = job("John Smith", tomorrow(9), 2.0);
        store.upsert(a.clone()).await.unwrap();
        store.upsert(job("John Smith", tomorrow(11), 1.0)).await.unwrap();
        s.update_status(a.id, JobStatus::Cancelled).await.unwrap();

        let revived = s.update_status(a.id, JobStatus::Scheduled).await.unwrap();
        assert_eq!(revived.status, JobStatus::Scheduled);
        // cancelling twice checks nothing
        s.update_status(a.id, JobStatus::Cancelled).await.unwrap();
        s.update_status(a.id, JobStatus::Cancelled).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_ids_are_errors() {
        let (s, _) = scheduler(&["John Smith"]);
        let id = Uuid::now_v7();
        assert!(matches!(s.get(id).await, Err(ScheduleError::NotFound(_))));
        assert!(matches!(
            s.update_status(id, JobStatus::Completed).await,
            Err(ScheduleError::NotFound(_))
        ));
        assert!(matches!(
            s.reschedule(id, tomorrow(9)).await,
            Err(ScheduleError::NotFound(_))
        ));
        assert!(matches!(s.delete(id).await, Err(ScheduleError::NotFound(_))));
    }

    #[tokio::test]
    async fn status_update_and_delete() {
        let (s, store) = scheduler(&["John Smith"]);
        let a = job("John Smith", tomorrow(9), 2.0);
        store.upsert(a.clone()).await.unwrap();

        let updated = s.update_status(a.id, JobStatus::InProgress).await.unwrap();
        assert_eq!(updated.status, JobStatus::InProgress);

        s.delete(a.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn calendar_queries() {
        let (s, store) = scheduler(&["John Smith", "Mike Johnson"]);
        let late = job("John Smith", tomorrow(14), 1.0);
        let early = job("John Smith", tomorrow(8), 1.0);
        let mut cancelled = job("Mike Johnson", tomorrow(10), 1.0);
        cancelled.status = JobStatus::Cancelled;
        let next_week = job("Mike Johnson", now() + Duration::days(9), 1.0);
        for j in [&late, &early, &cancelled, &next_week] {
            store.upsert(j.clone()).await.unwrap();
        }

        let day = s.daily_schedule(tomorrow(0).date_naive()).await.unwrap();
        assert_eq!(day.len(), 2);
        assert_eq!(day[0].technician, "John Smith");
        let ids: Vec<Uuid> = day[0].jobs.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![early.id, late.id]);
        assert_eq!(day[1].jobs.len(), 1);

        let john = s.jobs_for_technician("John Smith").await.unwrap();
        assert_eq!(john.len(), 2);
        assert!(s.jobs_for_technician("Mike Johnson").await.unwrap().len() == 1);

        let upcoming: Vec<Uuid> = s.upcoming(7).await.unwrap().iter().map(|j| j.id).collect();
        assert_eq!(upcoming, vec![early.id, late.id]);
    }

    #[tokio::test]
    async fn upcoming_window_saturates() {
        let (s, store) = scheduler(&["John Smith"]);
        let soon = job("John Smith", tomorrow(9), 1.0);
        let far = job("John Smith", now() + Duration::days(3650), 1.0);
        store.upsert(soon.clone()).await.unwrap();
        store.upsert(far.clone()).await.unwrap();

        for days in [i64::MAX / 1000, i64::MAX] {
            let ids: Vec<Uuid> = s.upcoming(days).await.unwrap().iter().map(|j| j.id).collect();
            assert_eq!(ids, vec![soon.id, far.id]);
        }
        assert!(s.upcoming(-1).await.unwrap().is_empty());
        assert!(s.upcoming(i64::MIN).await.unwrap().is_empty());
    }

    struct UnreachableStore;

    #[async_trait]
    impl JobRepository for UnreachableStore {
        async fn get(&self, _id: Uuid) -> ScheduleResult<Option<Job>> {
            Err(ScheduleError::Storage("connection refused".into()))
        }

        async fn list(&self) -> ScheduleResult<Vec<Job>> {
            Err(ScheduleError::Storage("connection refused".into()))
        }

        async fn upsert(&self, _job: Job) -> ScheduleResult<()> {
            Err(ScheduleError::Storage("connection refused".into()))
        }

        async fn delete(&self, _id: Uuid) -> ScheduleResult<bool> {
            Err(ScheduleError::Storage("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn storage_failures_propagate() {
        let s = Scheduler::new(
            SchedulerConfig::default(),
            Arc::new(UnreachableStore),
            Arc::new(FixedClock(now())),
        );

        let err = s
            .create_from_description("Inspection at 9 Elm St building")
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Storage(_)));
        assert_eq!(err.to_string(), "storage error: connection refused");
        assert!(matches!(s.upcoming(7).await, Err(ScheduleError::Storage(_))));
        assert!(matches!(
            s.update_status(Uuid::now_v7(), JobStatus::Completed).await,
            Err(ScheduleError::Storage(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creations_never_double_book() {
        let (s, store) = scheduler(&["John Smith"]);
        let s = Arc::new(s);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let s = s.clone();
            handles.push(tokio::spawn(async move {
                s.create_from_description("Inspection at 1 Dock Rd warehouse").await
            }));
        }

        let mut booked = 0;
        let mut rejected = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => booked += 1,
                Err(ScheduleError::NoAvailableSlot) => rejected += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(booked, 1);
        assert_eq!(rejected, 7);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}

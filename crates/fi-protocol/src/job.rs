use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A schedulable unit of field work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job ID (UUIDv7 for time-sortability).
    pub id: Uuid,
    pub title: String,
    pub location: String,
    /// Start instant of the job.
    pub scheduled_date: DateTime<Utc>,
    pub status: JobStatus,
    /// Assigned technician (roster name).
    pub technician: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub priority: JobPriority,
    /// Estimated duration in hours.
    pub estimated_duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    pub system_type: SystemType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Half-open time interval this job occupies.
    pub fn interval(&self) -> Interval {
        Interval::from_hours(self.scheduled_date, self.estimated_duration)
    }

    /// Whether the job still holds its technician's time.
    pub fn is_active(&self) -> bool {
        self.status != JobStatus::Cancelled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// Job priority, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPriority {
    Low,
    Medium,
    High,
    Emergency,
}

/// Fire-protection system a job or client concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    Sprinkler,
    FireAlarm,
    FirePump,
    EmergencyLighting,
    KitchenHood,
    Other,
}

impl SystemType {
    /// Display label used in job titles.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sprinkler => "Sprinkler System",
            Self::FireAlarm => "Fire Alarm",
            Self::FirePump => "Fire Pump",
            Self::EmergencyLighting => "Emergency Lighting",
            Self::KitchenHood => "Kitchen Hood",
            Self::Other => "Fire Safety System",
        }
    }
}

/// Kind of visit requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Inspection,
    Maintenance,
    Repair,
    Installation,
    EmergencyService,
}

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Interval starting at `start` lasting `hours` (rounded to the millisecond).
    /// An end past the representable range saturates at `MAX_UTC`.
    pub fn from_hours(start: DateTime<Utc>, hours: f64) -> Self {
        let end = TimeDelta::try_milliseconds((hours * 3_600_000.0).round() as i64)
            .and_then(|d| start.checked_add_signed(d))
            .unwrap_or(if hours < 0.0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });
        Self { start, end }
    }

    /// Two intervals conflict iff `a.start < b.end && b.start < a.end`.
    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    Overlap,
    TechnicianUnavailable,
    EquipmentConflict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Reschedule,
    Reassign,
    Accept,
}

/// An existing job that clashes with a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub conflicting_job: Job,
    pub conflict_type: ConflictType,
    pub resolution: Resolution,
}

/// A feasible (start, technician) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: DateTime<Utc>,
    pub technician: String,
}

/// One technician's jobs for a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianDay {
    pub technician: String,
    pub jobs: Vec<Job>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 3, hour, minute, 0).unwrap()
    }

    #[test]
    fn overlap_is_half_open() {
        let morning = Interval::new(at(9, 0), at(11, 0));
        let late_morning = Interval::new(at(11, 0), at(12, 0));
        assert!(!morning.overlaps(&late_morning));
        assert!(!late_morning.overlaps(&morning));
    }

    #[test]
    fn containment_overlaps() {
        let outer = Interval::new(at(8, 0), at(12, 0));
        let inner = Interval::new(at(9, 0), at(10, 0));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn partial_overlap() {
        let a = Interval::new(at(9, 0), at(11, 0));
        let b = Interval::new(at(10, 30), at(12, 0));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn fractional_hours() {
        let interval = Interval::from_hours(at(9, 0), 2.5);
        assert_eq!(interval.end, at(11, 30));
    }

    #[test]
    fn huge_durations_saturate() {
        assert_eq!(Interval::from_hours(at(9, 0), 1e12).end, DateTime::<Utc>::MAX_UTC);
        assert_eq!(Interval::from_hours(at(9, 0), f64::INFINITY).end, DateTime::<Utc>::MAX_UTC);

        let near_end = DateTime::<Utc>::MAX_UTC - TimeDelta::hours(1);
        let window = Interval::from_hours(near_end, 2.0);
        assert_eq!(window.end, DateTime::<Utc>::MAX_UTC);
        assert!(window.overlaps(&Interval::from_hours(near_end, 0.5)));
    }

    #[test]
    fn priority_ordering() {
        assert!(JobPriority::Emergency > JobPriority::High);
        assert!(JobPriority::Low < JobPriority::Medium);
    }

    #[test]
    fn system_type_serialization() {
        assert_eq!(
            serde_json::to_string(&SystemType::EmergencyLighting).unwrap(),
            r#""emergency_lighting""#
        );
    }
}

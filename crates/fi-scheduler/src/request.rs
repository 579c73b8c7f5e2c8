//! Spoken job request parsing.
//!
//! Keyword and regex extraction from a free-form description such as
//! "Urgent repair at 456 Oak Ave warehouse for XYZ Logistics Inc, call
//! 555-045-6789". Anything not recognised falls back to a placeholder.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use fi_protocol::{JobPriority, ServiceType, SystemType, shift_days};

pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const UNKNOWN_CLIENT: &str = "Unknown Client";

static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:at|in|for)\s+([^,.]+?)\s+(?:building|warehouse|office|facility)\b")
        .unwrap()
});

static CLIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:for|client|customer)\s+([^,.]+?\s+(?:corporation|inc|llc|company))\b")
        .unwrap()
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{3}[-.\s]?\d{3}[-.\s]?\d{4})\b").unwrap());

/// Who the job is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A structured request ready for slot assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub service_type: ServiceType,
    pub location: String,
    pub client: ClientInfo,
    pub system_type: SystemType,
    pub priority: JobPriority,
    /// Candidate start instants, tried in order.
    pub preferred_dates: Vec<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Hours.
    pub estimated_duration: f64,
}

impl ScheduleRequest {
    /// "EMERGENCY: Fire Pump Service", "Sprinkler System Inspection", ...
    pub fn title(&self) -> String {
        let prefix = if self.priority == JobPriority::Emergency {
            "EMERGENCY: "
        } else {
            ""
        };
        let kind = if self.service_type == ServiceType::Inspection {
            "Inspection"
        } else {
            "Service"
        };
        format!("{prefix}{} {kind}", self.system_type.label())
    }
}

/// Parse a spoken description into a request booked `lead_days` after `now`.
pub fn parse_description(text: &str, now: DateTime<Utc>, lead_days: i64) -> ScheduleRequest {
    let lower = text.to_lowercase();

    let location = capture(&LOCATION, text).unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
    let name = capture(&CLIENT, text).unwrap_or_else(|| UNKNOWN_CLIENT.to_string());
    let phone = capture(&PHONE, text);

    let priority = priority(&lower);
    let request = ScheduleRequest {
        service_type: service_type(&lower),
        location,
        client: ClientInfo {
            name,
            phone,
            email: None,
        },
        system_type: system_type(&lower),
        priority,
        preferred_dates: vec![shift_days(now, lead_days)],
        notes: Some(text.to_string()),
        estimated_duration: estimated_duration(&lower, priority),
    };

    tracing::debug!(
        location = %request.location,
        client = %request.client.name,
        priority = ?request.priority,
        system = ?request.system_type,
        hours = request.estimated_duration,
        "job request parsed"
    );
    request
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn priority(lower: &str) -> JobPriority {
    if matches_any(lower, &["emergency", "urgent"]) {
        JobPriority::Emergency
    } else if lower.contains("high priority") {
        JobPriority::High
    } else if lower.contains("low priority") {
        JobPriority::Low
    } else {
        JobPriority::Medium
    }
}

fn system_type(lower: &str) -> SystemType {
    if lower.contains("alarm") {
        SystemType::FireAlarm
    } else if lower.contains("pump") {
        SystemType::FirePump
    } else if matches_any(lower, &["emergency light", "lighting"]) {
        SystemType::EmergencyLighting
    } else if lower.contains("hood") {
        SystemType::KitchenHood
    } else {
        SystemType::Sprinkler
    }
}

fn service_type(lower: &str) -> ServiceType {
    if lower.contains("emergency service") {
        ServiceType::EmergencyService
    } else if lower.contains("install") {
        ServiceType::Installation
    } else if matches_any(lower, &["repair", "fix", "leak"]) {
        ServiceType::Repair
    } else if lower.contains("maintenance") {
        ServiceType::Maintenance
    } else {
        ServiceType::Inspection
    }
}

fn estimated_duration(lower: &str, priority: JobPriority) -> f64 {
    if priority == JobPriority::Emergency {
        3.0
    } else if lower.contains("installation") {
        4.0
    } else if lower.contains("repair") {
        2.5
    } else {
        2.0
    }
}

fn matches_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

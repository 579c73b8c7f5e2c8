use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compliance::OverallStatus;
use crate::job::{ServiceType, SystemType};

/// A customer site under service contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    pub address: PostalAddress,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub contact_person: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_title: Option<String>,
    pub industry: Industry,
    pub system_types: Vec<SystemType>,
    pub service_frequency: ServiceFrequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_inspection_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_inspection_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<PostalAddress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Commercial,
    Industrial,
    Residential,
    Institutional,
    Government,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceFrequency {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
    AsNeeded,
}

/// One completed visit at a client site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_date: DateTime<Utc>,
    pub service_type: ServiceType,
    pub technician: String,
    pub findings: String,
    pub recommendations: String,
    pub compliance_status: OverallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_service_date: Option<DateTime<Utc>>,
    /// Invoice amount in cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_cents: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

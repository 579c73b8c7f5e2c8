//! Client directory operations.
//!
//! Wraps a `ClientRepository` with id/timestamp assignment, partial
//! updates, search filters and due-date queries. Writes are serialized by
//! one mutex so read-modify-write updates do not lose changes.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use fi_protocol::{
    Client, Clock, EmergencyContact, Industry, OverallStatus, PostalAddress, ServiceFrequency,
    ServiceRecord, ServiceType, SystemType, shift_days,
};

use crate::error::{ClientError, ClientResult};
use crate::store::ClientRepository;

/// Window used by `ClientStats::upcoming_services`.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Everything needed to create a client; id and timestamps are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDraft {
    pub name: String,
    pub business_name: Option<String>,
    pub address: PostalAddress,
    pub phone: String,
    pub email: Option<String>,
    pub contact_person: String,
    pub contact_title: Option<String>,
    pub industry: Industry,
    pub system_types: Vec<SystemType>,
    pub service_frequency: ServiceFrequency,
    pub last_inspection_date: Option<DateTime<Utc>>,
    pub next_inspection_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub billing_address: Option<PostalAddress>,
}

/// Partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub business_name: Option<String>,
    pub address: Option<PostalAddress>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_person: Option<String>,
    pub contact_title: Option<String>,
    pub industry: Option<Industry>,
    pub system_types: Option<Vec<SystemType>>,
    pub service_frequency: Option<ServiceFrequency>,
    pub next_inspection_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub billing_address: Option<PostalAddress>,
}

/// A visit to record against a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub client_id: Uuid,
    pub service_date: DateTime<Utc>,
    pub service_type: ServiceType,
    pub technician: String,
    pub findings: String,
    pub recommendations: String,
    pub compliance_status: OverallStatus,
    pub next_service_date: Option<DateTime<Utc>>,
    pub cost_cents: Option<u64>,
    pub invoice_id: Option<String>,
    pub notes: Option<String>,
}

/// Search criteria; every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientFilter {
    /// Case-insensitive substring of name or business name.
    pub name: Option<String>,
    /// Case-insensitive substring of the city.
    pub city: Option<String>,
    pub industry: Option<Industry>,
    pub system_type: Option<SystemType>,
    pub is_active: Option<bool>,
    /// Only clients whose next inspection date has passed.
    pub service_overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStats {
    pub total_clients: usize,
    pub active_clients: usize,
    pub overdue_services: usize,
    pub upcoming_services: usize,
    pub clients_by_industry: BTreeMap<Industry, usize>,
}

pub struct ClientDirectory {
    store: Arc<dyn ClientRepository>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl ClientDirectory {
    pub fn new(store: Arc<dyn ClientRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn create(&self, draft: ClientDraft) -> ClientResult<Client> {
        let now = self.clock.now();
        let client = Client {
            id: Uuid::now_v7(),
            name: draft.name,
            business_name: draft.business_name,
            address: draft.address,
            phone: draft.phone,
            email: draft.email,
            contact_person: draft.contact_person,
            contact_title: draft.contact_title,
            industry: draft.industry,
            system_types: draft.system_types,
            service_frequency: draft.service_frequency,
            last_inspection_date: draft.last_inspection_date,
            next_inspection_date: draft.next_inspection_date,
            is_active: draft.is_active,
            notes: draft.notes,
            emergency_contact: draft.emergency_contact,
            billing_address: draft.billing_address,
            created_at: now,
            updated_at: now,
        };

        let _guard = self.write_lock.lock().await;
        self.store.upsert(client.clone()).await?;
        tracing::info!(client_id = %client.id, name = %client.name, "client created");
        Ok(client)
    }

    pub async fn update(&self, id: Uuid, patch: ClientPatch) -> ClientResult<Client> {
        let _guard = self.write_lock.lock().await;
        let mut client = self.get(id).await?;
        apply_patch(&mut client, patch);
        client.updated_at = self.clock.now();
        self.store.upsert(client.clone()).await?;

        tracing::debug!(client_id = %id, "client updated");
        Ok(client)
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Client> {
        self.store.get(id).await?.ok_or(ClientError::NotFound(id))
    }

    pub async fn list(&self) -> ClientResult<Vec<Client>> {
        self.store.list().await
    }

    pub async fn search(&self, filter: &ClientFilter) -> ClientResult<Vec<Client>> {
        let now = self.clock.now();
        let name = filter.name.as_ref().map(|s| s.to_lowercase());
        let city = filter.city.as_ref().map(|s| s.to_lowercase());

        let clients = self.store.list().await?;
        Ok(clients
            .into_iter()
            .filter(|c| {
                if let Some(name) = &name {
                    let in_name = c.name.to_lowercase().contains(name);
                    let in_business = c
                        .business_name
                        .as_ref()
                        .is_some_and(|b| b.to_lowercase().contains(name));
                    if !in_name && !in_business {
                        return false;
                    }
                }
                if let Some(city) = &city {
                    if !c.address.city.to_lowercase().contains(city) {
                        return false;
                    }
                }
                if filter.industry.is_some_and(|i| c.industry != i) {
                    return false;
                }
                if filter
                    .system_type
                    .is_some_and(|s| !c.system_types.contains(&s))
                {
                    return false;
                }
                if filter.is_active.is_some_and(|a| c.is_active != a) {
                    return false;
                }
                !filter.service_overdue || is_overdue(c, now)
            })
            .collect())
    }

    pub async fn service_history(&self, client_id: Uuid) -> ClientResult<Vec<ServiceRecord>> {
        self.store.history(client_id).await
    }

    /// Record a visit. An inspection also moves the client's last/next
    /// inspection dates to the visit's dates.
    pub async fn add_service_history(&self, draft: ServiceDraft) -> ClientResult<ServiceRecord> {
        let _guard = self.write_lock.lock().await;
        let mut client = self.get(draft.client_id).await?;

        let now = self.clock.now();
        let record = ServiceRecord {
            id: Uuid::now_v7(),
            client_id: draft.client_id,
            service_date: draft.service_date,
            service_type: draft.service_type,
            technician: draft.technician,
            findings: draft.findings,
            recommendations: draft.recommendations,
            compliance_status: draft.compliance_status,
            next_service_date: draft.next_service_date,
            cost_cents: draft.cost_cents,
            invoice_id: draft.invoice_id,
            notes: draft.notes,
            created_at: now,
        };
        self.store.append_history(record.clone()).await?;

        if record.service_type == ServiceType::Inspection {
            client.last_inspection_date = Some(record.service_date);
            client.next_inspection_date = record.next_service_date;
            client.updated_at = now;
            self.store.upsert(client).await?;
        }

        tracing::info!(
            client_id = %record.client_id,
            service = ?record.service_type,
            status = ?record.compliance_status,
            "service recorded"
        );
        Ok(record)
    }

    /// Active clients due for inspection within `[now, now + days]`.
    /// The window end saturates at the last representable instant.
    pub async fn needing_service(&self, days: i64) -> ClientResult<Vec<Client>> {
        let now = self.clock.now();
        let until = shift_days(now, days);
        let clients = self.store.list().await?;
        Ok(clients
            .into_iter()
            .filter(|c| is_due_between(c, now, until))
            .collect())
    }

    /// Active clients whose next inspection date has passed.
    pub async fn overdue(&self) -> ClientResult<Vec<Client>> {
        let now = self.clock.now();
        let clients = self.store.list().await?;
        Ok(clients.into_iter().filter(|c| is_overdue(c, now)).collect())
    }

    pub async fn stats(&self) -> ClientResult<ClientStats> {
        let now = self.clock.now();
        let until = shift_days(now, UPCOMING_WINDOW_DAYS);
        let clients = self.store.list().await?;

        let mut clients_by_industry = BTreeMap::new();
        for c in &clients {
            *clients_by_industry.entry(c.industry).or_insert(0) += 1;
        }

        Ok(ClientStats {
            total_clients: clients.len(),
            active_clients: clients.iter().filter(|c| c.is_active).count(),
            overdue_services: clients.iter().filter(|c| is_overdue(c, now)).count(),
            upcoming_services: clients
                .iter()
                .filter(|c| is_due_between(c, now, until))
                .count(),
            clients_by_industry,
        })
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;
        if !self.store.delete(id).await? {
            return Err(ClientError::NotFound(id));
        }
        tracing::info!(client_id = %id, "client deleted");
        Ok(())
    }

    /// Match on digits only, so "(555) 012-3456" finds "555-012-3456".
    pub async fn find_by_phone(&self, phone: &str) -> ClientResult<Option<Client>> {
        let wanted = digits(phone);
        if wanted.is_empty() {
            return Ok(None);
        }
        let clients = self.store.list().await?;
        Ok(clients.into_iter().find(|c| digits(&c.phone) == wanted))
    }

    /// Service records dated within the last `days`, newest first.
    pub async fn recent_history(&self, days: i64) -> ClientResult<Vec<ServiceRecord>> {
        let cutoff = shift_days(self.clock.now(), days.saturating_neg());
        let mut records: Vec<ServiceRecord> = self
            .store
            .all_history()
            .await?
            .into_iter()
            .filter(|r| r.service_date >= cutoff)
            .collect();
        records.sort_by(|a, b| b.service_date.cmp(&a.service_date));
        Ok(records)
    }
}

fn apply_patch(client: &mut Client, patch: ClientPatch) {
    if let Some(v) = patch.name {
        client.name = v;
    }
    if let Some(v) = patch.business_name {
        client.business_name = Some(v);
    }
    if let Some(v) = patch.address {
        client.address = v;
    }
    if let Some(v) = patch.phone {
        client.phone = v;
    }
    if let Some(v) = patch.email {
        client.email = Some(v);
    }
    if let Some(v) = patch.contact_person {
        client.contact_person = v;
    }
    if let Some(v) = patch.contact_title {
        client.contact_title = Some(v);
    }
    if let Some(v) = patch.industry {
        client.industry = v;
    }
    if let Some(v) = patch.system_types {
        client.system_types = v;
    }
    if let Some(v) = patch.service_frequency {
        client.service_frequency = v;
    }
    if let Some(v) = patch.next_inspection_date {
        client.next_inspection_date = Some(v);
    }
    if let Some(v) = patch.is_active {
        client.is_active = v;
    }
    if let Some(v) = patch.notes {
        client.notes = Some(v);
    }
    if let Some(v) = patch.emergency_contact {
        client.emergency_contact = Some(v);
    }
    if let Some(v) = patch.billing_address {
        client.billing_address = Some(v);
    }
}

fn is_overdue(client: &Client, now: DateTime<Utc>) -> bool {
    client.is_active && client.next_inspection_date.is_some_and(|d| d < now)
}

fn is_due_between(client: &Client, from: DateTime<Utc>, until: DateTime<Utc>) -> bool {
    client.is_active
        && client
            .next_inspection_date
            .is_some_and(|d| d >= from && d <= until)
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

//! Client storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use fi_protocol::{Client, ServiceRecord};

use crate::error::ClientResult;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> ClientResult<Option<Client>>;

    /// All clients, ordered by name.
    async fn list(&self) -> ClientResult<Vec<Client>>;

    async fn upsert(&self, client: Client) -> ClientResult<()>;

    /// Removes the client and its history. Returns whether it existed.
    async fn delete(&self, id: Uuid) -> ClientResult<bool>;

    /// Service records for one client, in insertion order.
    async fn history(&self, client_id: Uuid) -> ClientResult<Vec<ServiceRecord>>;

    /// Service records across all clients.
    async fn all_history(&self) -> ClientResult<Vec<ServiceRecord>>;

    async fn append_history(&self, record: ServiceRecord) -> ClientResult<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryClientStore {
    clients: RwLock<HashMap<Uuid, Client>>,
    history: RwLock<HashMap<Uuid, Vec<ServiceRecord>>>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientStore {
    async fn get(&self, id: Uuid) -> ClientResult<Option<Client>> {
        Ok(self.clients.read().await.get(&id).cloned())
    }

    async fn list(&self) -> ClientResult<Vec<Client>> {
        let mut clients: Vec<Client> = self.clients.read().await.values().cloned().collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(clients)
    }

    async fn upsert(&self, client: Client) -> ClientResult<()> {
        self.clients.write().await.insert(client.id, client);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ClientResult<bool> {
        self.history.write().await.remove(&id);
        Ok(self.clients.write().await.remove(&id).is_some())
    }

    async fn history(&self, client_id: Uuid) -> ClientResult<Vec<ServiceRecord>> {
        Ok(self
            .history
            .read()
            .await
            .get(&client_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn all_history(&self) -> ClientResult<Vec<ServiceRecord>> {
        Ok(self.history.read().await.values().flatten().cloned().collect())
    }

    async fn append_history(&self, record: ServiceRecord) -> ClientResult<()> {
        self.history
            .write()
            .await
            .entry(record.client_id)
            .or_default()
            .push(record);
        Ok(())
    }
}

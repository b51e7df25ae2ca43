//! Publish collaborators and the ephemeral object store
//!
//! The real delivery store (CDN + name database) is out of scope; the
//! core only needs "is this name taken?" and "store these bytes, get back
//! a durable URL". The ephemeral store replaces the original design's
//! per-link dynamically registered routes with a single lookup keyed by
//! identifier.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use loveweb_core::{Error, Result};

/// "Given a name, is it already taken?" plus registration on success.
#[async_trait]
pub trait NameRegistry: Send + Sync {
    async fn is_taken(&self, name: &str) -> Result<bool>;
    async fn register(&self, name: &str, url: &str) -> Result<()>;
    async fn lookup(&self, name: &str) -> Result<Option<String>>;
}

/// "Store these bytes, get back a durable URL."
#[async_trait]
pub trait ContentDelivery: Send + Sync {
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String>;
    async fn retrieve(&self, name: &str) -> Result<Option<Vec<u8>>>;
}

#[derive(Default)]
pub struct InMemoryRegistry {
    names: RwLock<HashMap<String, String>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NameRegistry for InMemoryRegistry {
    async fn is_taken(&self, name: &str) -> Result<bool> {
        Ok(self.names.read().await.contains_key(name))
    }

    async fn register(&self, name: &str, url: &str) -> Result<()> {
        let mut names = self.names.write().await;
        if names.contains_key(name) {
            return Err(Error::NameAlreadyTaken(name.to_string()));
        }
        names.insert(name.to_string(), url.to_string());
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Result<Option<String>> {
        Ok(self.names.read().await.get(name).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryDelivery {
    documents: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryDelivery {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentDelivery for InMemoryDelivery {
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String> {
        self.documents
            .write()
            .await
            .insert(name.to_string(), bytes.to_vec());
        Ok(format!("/published/{}", name))
    }

    async fn retrieve(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.documents.read().await.get(name).cloned())
    }
}

/// Expiring in-process store for temporary play links.
pub struct EphemeralStore {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, Vec<u8>)>>,
}

impl EphemeralStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Store a document, returning its lookup id. Expired entries are
    /// purged on the way in so the map cannot grow unbounded.
    pub async fn insert(&self, bytes: Vec<u8>) -> String {
        let id = Uuid::new_v4().to_string();
        let deadline = Instant::now() + self.ttl;
        let mut entries = self.entries.write().await;
        entries.retain(|_, (expires, _)| *expires > Instant::now());
        entries.insert(id.clone(), (deadline, bytes));
        id
    }

    pub async fn get(&self, id: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().await;
        match entries.get(id) {
            Some((expires, bytes)) if *expires > Instant::now() => Some(bytes.clone()),
            _ => None,
        }
    }

    pub async fn remove(&self, id: &str) {
        self.entries.write().await.remove(id);
    }
}

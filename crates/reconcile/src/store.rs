//! Secondary document-store boundary.
//!
//! The secondary store is a set of collections of JSON documents keyed by
//! an opaque id, queried in full (no server-side filtering) and joined in
//! memory. [`DocumentStore`] is the seam the engine works against;
//! [`MemoryDocumentStore`] backs tests and demos, [`FileDocumentStore`]
//! persists one JSON file per collection for a running instance.
//!
//! Listing parses each raw document through the typed DTOs; malformed
//! documents are logged and skipped, never returned.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use error::{AppError, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

use crate::dto::{AuditEntryDoc, Document, ReportDoc, UserDoc, WorkOrderDoc};

/// The `utilisateurs` collection.
pub const COLLECTION_USERS: &str = "utilisateurs";
/// The `signalements` collection.
pub const COLLECTION_REPORTS: &str = "signalements";
/// The `travaux` collection.
pub const COLLECTION_WORK_ORDERS: &str = "travaux";
/// The `historiques_travaux` collection.
pub const COLLECTION_AUDIT_ENTRIES: &str = "historiques_travaux";

/// Access to the secondary document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All well-formed user documents.
    async fn list_users(&self) -> Result<Vec<Document<UserDoc>>>;

    /// All well-formed report documents.
    async fn list_reports(&self) -> Result<Vec<Document<ReportDoc>>>;

    /// All well-formed work-order documents.
    async fn list_work_orders(&self) -> Result<Vec<Document<WorkOrderDoc>>>;

    /// Create or replace a report document.
    async fn upsert_report(&self, id: &str, doc: &ReportDoc) -> Result<()>;

    /// Create or replace a work-order document.
    async fn upsert_work_order(&self, id: &str, doc: &WorkOrderDoc) -> Result<()>;

    /// Append an audit-entry document. An id collision overwrites the
    /// previous write (last write wins); entries are never edited in place.
    async fn append_audit_entry(&self, id: &str, doc: &AuditEntryDoc) -> Result<()>;
}

/// Parse every document of a collection, skipping the malformed ones.
fn parse_documents<T: DeserializeOwned>(collection: &str, raw: &BTreeMap<String, Value>) -> Vec<Document<T>> {
    raw.iter()
        .filter_map(|(id, value)| {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(data) => {
                    Some(Document {
                        id: id.clone(),
                        data,
                    })
                },
                Err(e) => {
                    warn!(collection = %collection, doc_id = %id, error = %e, "Skipping malformed document");
                    None
                },
            }
        })
        .collect()
}

fn to_value<T: Serialize>(doc: &T) -> Result<Value> {
    serde_json::to_value(doc).map_err(|e| AppError::internal(format!("Failed to serialize document: {}", e)))
}

/// In-memory document store used by tests and demo setups.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Insert a raw document, creating the collection if needed.
    pub async fn insert(&self, collection: &str, id: &str, value: Value) {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), value);
    }

    /// Fetch a raw document by id.
    pub async fn get(&self, collection: &str, id: &str) -> Option<Value> {
        let collections = self.collections.read().await;
        collections.get(collection).and_then(|c| c.get(id)).cloned()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, BTreeMap::len)
    }

    async fn snapshot(&self, collection: &str) -> BTreeMap<String, Value> {
        let collections = self.collections.read().await;
        collections.get(collection).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_users(&self) -> Result<Vec<Document<UserDoc>>> {
        Ok(parse_documents(
            COLLECTION_USERS,
            &self.snapshot(COLLECTION_USERS).await,
        ))
    }

    async fn list_reports(&self) -> Result<Vec<Document<ReportDoc>>> {
        Ok(parse_documents(
            COLLECTION_REPORTS,
            &self.snapshot(COLLECTION_REPORTS).await,
        ))
    }

    async fn list_work_orders(&self) -> Result<Vec<Document<WorkOrderDoc>>> {
        Ok(parse_documents(
            COLLECTION_WORK_ORDERS,
            &self.snapshot(COLLECTION_WORK_ORDERS).await,
        ))
    }

    async fn upsert_report(&self, id: &str, doc: &ReportDoc) -> Result<()> {
        self.insert(COLLECTION_REPORTS, id, to_value(doc)?).await;
        Ok(())
    }

    async fn upsert_work_order(&self, id: &str, doc: &WorkOrderDoc) -> Result<()> {
        self.insert(COLLECTION_WORK_ORDERS, id, to_value(doc)?).await;
        Ok(())
    }

    async fn append_audit_entry(&self, id: &str, doc: &AuditEntryDoc) -> Result<()> {
        self.insert(COLLECTION_AUDIT_ENTRIES, id, to_value(doc)?)
            .await;
        Ok(())
    }
}

/// File-backed document store: one JSON object per collection under a
/// directory, loaded at open and written through on every mutation.
#[derive(Debug)]
pub struct FileDocumentStore {
    dir:         PathBuf,
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl FileDocumentStore {
    /// Open a store rooted at `dir`, creating the directory if needed and
    /// loading any existing collection files.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the directory or a collection file
    /// cannot be read.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::transport(format!("Failed to create {}: {}", dir.display(), e)))?;

        let mut collections = HashMap::new();
        for name in [
            COLLECTION_USERS,
            COLLECTION_REPORTS,
            COLLECTION_WORK_ORDERS,
            COLLECTION_AUDIT_ENTRIES,
        ] {
            collections.insert(name.to_string(), Self::load_collection(&dir, name).await?);
        }

        Ok(Self {
            dir,
            collections: RwLock::new(collections),
        })
    }

    async fn load_collection(dir: &Path, name: &str) -> Result<BTreeMap<String, Value>> {
        let path = dir.join(format!("{}.json", name));
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes)
                    .map_err(|e| AppError::transport(format!("Corrupt collection file {}: {}", path.display(), e)))
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => {
                Err(AppError::transport(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            },
        }
    }

    async fn write_through(&self, collection: &str, id: &str, value: Value) -> Result<()> {
        let snapshot = {
            let mut collections = self.collections.write().await;
            let entries = collections.entry(collection.to_string()).or_default();
            entries.insert(id.to_string(), value);
            entries.clone()
        };

        let path = self.dir.join(format!("{}.json", collection));
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| AppError::internal(format!("Failed to serialize collection: {}", e)))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::transport(format!("Failed to write {}: {}", path.display(), e)))
    }

    async fn snapshot(&self, collection: &str) -> BTreeMap<String, Value> {
        let collections = self.collections.read().await;
        collections.get(collection).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn list_users(&self) -> Result<Vec<Document<UserDoc>>> {
        Ok(parse_documents(
            COLLECTION_USERS,
            &self.snapshot(COLLECTION_USERS).await,
        ))
    }

    async fn list_reports(&self) -> Result<Vec<Document<ReportDoc>>> {
        Ok(parse_documents(
            COLLECTION_REPORTS,
            &self.snapshot(COLLECTION_REPORTS).await,
        ))
    }

    async fn list_work_orders(&self) -> Result<Vec<Document<WorkOrderDoc>>> {
        Ok(parse_documents(
            COLLECTION_WORK_ORDERS,
            &self.snapshot(COLLECTION_WORK_ORDERS).await,
        ))
    }

    async fn upsert_report(&self, id: &str, doc: &ReportDoc) -> Result<()> {
        self.write_through(COLLECTION_REPORTS, id, to_value(doc)?)
            .await
    }

    async fn upsert_work_order(&self, id: &str, doc: &WorkOrderDoc) -> Result<()> {
        self.write_through(COLLECTION_WORK_ORDERS, id, to_value(doc)?)
            .await
    }

    async fn append_audit_entry(&self, id: &str, doc: &AuditEntryDoc) -> Result<()> {
        self.write_through(COLLECTION_AUDIT_ENTRIES, id, to_value(doc)?)
            .await
    }
}

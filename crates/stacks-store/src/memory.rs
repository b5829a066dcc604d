//! In-memory implementations of the store traits
//!
//! These are suitable for development and testing. Production deployments
//! should use a cluster-backed store.

use crate::error::{Result, StoreError};
use crate::logs::{LogReader, LogStream};
use crate::store::{ObjectKey, ObjectStore};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use stacks_types::{DynamicObject, GroupVersionKind, LabelSelector};
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;
use uuid::Uuid;

type StoreKey = (GroupVersionKind, ObjectKey);

struct StoredObject {
    object: DynamicObject,
    sequence: u64,
}

/// In-memory object store
pub struct InMemoryObjectStore {
    objects: DashMap<StoreKey, StoredObject>,
    sequence: AtomicU64,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Keys of all stored objects in the order they were created
    pub fn creation_order(&self) -> Vec<StoreKey> {
        let mut entries: Vec<(u64, StoreKey)> = self
            .objects
            .iter()
            .map(|e| (e.value().sequence, e.key().clone()))
            .collect();
        entries.sort_by_key(|(sequence, _)| *sequence);
        entries.into_iter().map(|(_, key)| key).collect()
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, gvk: &GroupVersionKind, key: &ObjectKey) -> Result<DynamicObject> {
        self.objects
            .get(&(gvk.clone(), key.clone()))
            .map(|stored| stored.object.clone())
            .ok_or_else(|| StoreError::not_found(gvk, &key.namespace, &key.name))
    }

    async fn list(
        &self,
        gvk: &GroupVersionKind,
        namespace: Option<&str>,
        selector: &LabelSelector,
    ) -> Result<Vec<DynamicObject>> {
        let mut result: Vec<(u64, DynamicObject)> = self
            .objects
            .iter()
            .filter(|e| &e.key().0 == gvk)
            .filter(|e| namespace.map_or(true, |ns| e.key().1.namespace == ns))
            .filter(|e| selector.matches(&e.value().object.metadata.labels))
            .map(|e| (e.value().sequence, e.value().object.clone()))
            .collect();
        result.sort_by_key(|(sequence, _)| *sequence);
        Ok(result.into_iter().map(|(_, object)| object).collect())
    }

    async fn create(&self, mut object: DynamicObject) -> Result<DynamicObject> {
        if object.name().is_empty() {
            return Err(StoreError::Invalid(format!(
                "{} object has no name",
                object.kind
            )));
        }

        let gvk = object.gvk();
        let key = ObjectKey::of(&object);
        match self.objects.entry((gvk.clone(), key.clone())) {
            Entry::Occupied(_) => Err(StoreError::already_exists(&gvk, &key.namespace, &key.name)),
            Entry::Vacant(slot) => {
                object.metadata.uid = Uuid::new_v4().to_string();
                object.metadata.creation_timestamp = Some(chrono::Utc::now());
                let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
                slot.insert(StoredObject {
                    object: object.clone(),
                    sequence,
                });
                trace!(kind = %gvk.kind, key = %key, "object created");
                Ok(object)
            }
        }
    }

    async fn delete(&self, gvk: &GroupVersionKind, key: &ObjectKey) -> Result<()> {
        self.objects
            .remove(&(gvk.clone(), key.clone()))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(gvk, &key.namespace, &key.name))
    }
}

/// Log reader serving fixed log bodies per pod
pub struct InMemoryLogReader {
    logs: DashMap<ObjectKey, Vec<u8>>,
}

impl InMemoryLogReader {
    pub fn new() -> Self {
        Self {
            logs: DashMap::new(),
        }
    }

    /// Set the captured output of a pod
    pub fn insert(&self, namespace: &str, pod: &str, output: impl Into<Vec<u8>>) {
        self.logs
            .insert(ObjectKey::new(namespace, pod), output.into());
    }
}

impl Default for InMemoryLogReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogReader for InMemoryLogReader {
    async fn open(&self, namespace: &str, pod: &str) -> std::io::Result<LogStream> {
        let output = self
            .logs
            .get(&ObjectKey::new(namespace, pod))
            .map(|body| body.clone())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no logs for pod {}/{}", namespace, pod),
                )
            })?;
        Ok(Box::new(Cursor::new(output)))
    }
}

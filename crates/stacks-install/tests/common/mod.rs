//! Shared fixtures for job completion tests

#![allow(dead_code)]

use async_trait::async_trait;
use stacks_install::InstallJobCompleter;
use stacks_store::{
    InMemoryLogReader, InMemoryObjectStore, LogReader, LogStream, ObjectKey, ObjectStore,
    StoreError,
};
use stacks_types::{
    DynamicObject, GroupVersionKind, InstallKind, InstallRequest, Job, LabelSelector, Pod,
    Resource,
};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

pub const POD_NAME: &str = "redis-x7k2p";

pub const STACK_DOC: &str = r#"apiVersion: stacks.crossplane.io/v1alpha1
kind: Stack
spec:
  title: Redis
"#;

pub const CRD_DOC: &str = r#"apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: caches.redis.example.org
spec:
  group: redis.example.org
  names:
    kind: Cache
"#;

pub const CONFIG_MAP_DOC: &str = r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: redis-defaults
  namespace: team-a
  labels:
    app: redis
data:
  maxmemory: 64mb
"#;

/// Join documents into one YAML stream
pub fn stream(documents: &[&str]) -> String {
    documents.join("---\n")
}

pub fn create_test_request(kind: InstallKind) -> InstallRequest {
    let mut request = InstallRequest::new(kind, "team-a", "redis", "registry.local/redis:1.0");
    request.metadata.uid = "8c0f3a52-install".into();
    request
}

pub fn create_test_job(request: &InstallRequest) -> Job {
    let mut job = Job::default();
    job.metadata.name = request.name().to_string();
    job.metadata.namespace = request.namespace().to_string();
    job
}

pub async fn add_pod(store: &dyn ObjectStore, job: &Job, name: &str) {
    store
        .create(Pod::for_job(job, name).to_dynamic().unwrap())
        .await
        .unwrap();
}

/// Store, completer and job with one pod whose output is `output`
pub async fn setup(
    output: &str,
) -> (Arc<InMemoryObjectStore>, InstallJobCompleter, Job) {
    let store = Arc::new(InMemoryObjectStore::new());
    let logs = Arc::new(InMemoryLogReader::new());
    let job = create_test_job(&create_test_request(InstallKind::StackInstall));

    add_pod(store.as_ref(), &job, POD_NAME).await;
    logs.insert(&job.metadata.namespace, POD_NAME, output);

    let completer = InstallJobCompleter::new(store.clone(), logs);
    (store, completer, job)
}

/// Every object in the store that is not a pod
pub fn created_objects(store: &InMemoryObjectStore) -> Vec<(GroupVersionKind, ObjectKey)> {
    store
        .creation_order()
        .into_iter()
        .filter(|(gvk, _)| *gvk != Pod::gvk())
        .collect()
}

/// Store that fails creation of one named object with a storage error
pub struct FailingStore {
    pub inner: InMemoryObjectStore,
    pub fail_name: String,
}

impl FailingStore {
    pub fn new(fail_name: &str) -> Self {
        Self {
            inner: InMemoryObjectStore::new(),
            fail_name: fail_name.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn get(&self, gvk: &GroupVersionKind, key: &ObjectKey) -> stacks_store::Result<DynamicObject> {
        self.inner.get(gvk, key).await
    }

    async fn list(
        &self,
        gvk: &GroupVersionKind,
        namespace: Option<&str>,
        selector: &LabelSelector,
    ) -> stacks_store::Result<Vec<DynamicObject>> {
        self.inner.list(gvk, namespace, selector).await
    }

    async fn create(&self, object: DynamicObject) -> stacks_store::Result<DynamicObject> {
        if object.name() == self.fail_name {
            return Err(StoreError::Storage("connection reset".into()));
        }
        self.inner.create(object).await
    }

    async fn delete(&self, gvk: &GroupVersionKind, key: &ObjectKey) -> stacks_store::Result<()> {
        self.inner.delete(gvk, key).await
    }
}

/// Log reader that counts opened and closed streams
#[derive(Default)]
pub struct TrackingLogReader {
    pub output: Vec<u8>,
    /// Fail the read after the whole output has been returned
    pub fail_after_output: bool,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
}

impl TrackingLogReader {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LogReader for TrackingLogReader {
    async fn open(&self, _namespace: &str, _pod: &str) -> std::io::Result<LogStream> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TrackedStream {
            remaining: self.output.clone(),
            fail_at_end: self.fail_after_output,
            closed: self.closed.clone(),
        }))
    }
}

struct TrackedStream {
    remaining: Vec<u8>,
    fail_at_end: bool,
    closed: Arc<AtomicUsize>,
}

impl AsyncRead for TrackedStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        if self.remaining.is_empty() {
            if self.fail_at_end {
                return Poll::Ready(Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "log stream interrupted",
                )));
            }
            return Poll::Ready(Ok(()));
        }
        let n = buf.remaining().min(self.remaining.len());
        let chunk: Vec<u8> = self.remaining.drain(..n).collect();
        buf.put_slice(&chunk);
        Poll::Ready(Ok(()))
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

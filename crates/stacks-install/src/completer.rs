//! Install job completion
//!
//! When an unpack job finishes, its pod's output holds every resource the
//! stack ships. The completer reads that output once and materializes it:
//! the stack record is owned by the install request, every object carries
//! provenance labels, and schema definitions get persona cluster roles
//! provisioned ahead of them. Documents are processed strictly in stream
//! order since later documents may rely on earlier ones.

use crate::config::InstallConfig;
use crate::decoder::YamlOrJsonDecoder;
use crate::error::{InstallError, Result};
use crate::roles::{generate_namespace_cluster_roles, DEFAULT_ROLE_PREFIX};
use async_trait::async_trait;
use stacks_store::{LogReader, ObjectKey, ObjectStore, ObjectStoreExt};
use stacks_types::{
    namespace_label, DynamicObject, InstallRequest, Job, LabelSelector, ObjectReference,
    ParentLabels, Pod, JOB_NAME_LABEL,
};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, instrument, warn};

/// Handles the completion of an install job
#[async_trait]
pub trait JobCompleter: Send + Sync {
    /// Materialize the job's output and return the request with its stack
    /// record reference set
    async fn handle_job_completion(
        &self,
        request: InstallRequest,
        job: &Job,
    ) -> Result<InstallRequest>;
}

/// Completes stack install jobs against an object store
pub struct InstallJobCompleter {
    store: Arc<dyn ObjectStore>,
    log_reader: Arc<dyn LogReader>,
    role_prefix: String,
}

impl InstallJobCompleter {
    pub fn new(store: Arc<dyn ObjectStore>, log_reader: Arc<dyn LogReader>) -> Self {
        Self {
            store,
            log_reader,
            role_prefix: DEFAULT_ROLE_PREFIX.to_string(),
        }
    }

    pub fn with_config(
        store: Arc<dyn ObjectStore>,
        log_reader: Arc<dyn LogReader>,
        config: &InstallConfig,
    ) -> Self {
        Self {
            store,
            log_reader,
            role_prefix: config.role_prefix.clone(),
        }
    }

    /// Name of the job's only pod. Zero or several pods is an error.
    async fn find_pod_name_for_job(&self, job: &Job) -> Result<String> {
        let selector = LabelSelector::from_labels([(JOB_NAME_LABEL, job.metadata.name.as_str())]);
        let mut pods = self
            .store
            .list(&Pod::gvk(), Some(job.metadata.namespace.as_str()), &selector)
            .await
            .map_err(|source| InstallError::ListPods {
                job: job.metadata.name.clone(),
                source,
            })?;

        if pods.len() != 1 {
            return Err(InstallError::PodCount {
                job: job.metadata.name.clone(),
                count: pods.len(),
            });
        }

        Ok(pods.remove(0).metadata.name)
    }

    /// Read the pod's full output. The stream is dropped, and so closed,
    /// before this returns on every path.
    async fn read_pod_logs(&self, namespace: &str, pod: &str) -> Result<Vec<u8>> {
        let mut stream = self
            .log_reader
            .open(namespace, pod)
            .await
            .map_err(|source| InstallError::OpenLogs {
                pod: pod.to_string(),
                source,
            })?;

        let mut buf = Vec::new();
        stream
            .read_to_end(&mut buf)
            .await
            .map_err(|source| InstallError::CopyLogs {
                pod: pod.to_string(),
                source,
            })?;

        Ok(buf)
    }

    /// Create the persona cluster roles for a namespaced request. Stops at
    /// the first role that fails; roles that already exist are left alone.
    pub async fn create_namespace_cluster_roles(&self, request: &InstallRequest) -> Result<()> {
        for role in generate_namespace_cluster_roles(request, &self.role_prefix) {
            match self.store.create_typed(&role).await {
                Ok(_) => {}
                Err(e) if e.is_already_exists() => {
                    debug!(role = %role.name(), "cluster role already exists");
                }
                Err(source) => {
                    return Err(InstallError::CreateClusterRole {
                        role: role.name().to_string(),
                        install: request.name().to_string(),
                        source,
                    })
                }
            }
        }
        Ok(())
    }

    /// Name, label, own and create one object decoded from the job output.
    ///
    /// Returns the object as submitted, or `None` for an empty document.
    async fn create_job_output_object(
        &self,
        object: Option<DynamicObject>,
        request: &InstallRequest,
        job: &Job,
    ) -> Result<Option<DynamicObject>> {
        let Some(mut object) = object else {
            return Ok(None);
        };

        if object.is_stack_record() {
            if object.metadata.name.is_empty() {
                object.metadata.name = request.name().to_string();
            }
            if object.metadata.namespace.is_empty() {
                object.metadata.namespace = request.namespace().to_string();
            }
            object.metadata.owner_references = vec![request.as_owner()];
        }

        // A namespaced request cannot own cluster-scoped objects such as
        // CRDs, so ownership is tracked through labels instead.
        let parent = ParentLabels::for_parent(request);
        let mut labels = parent.to_map();

        if object.is_custom_resource_definition() {
            if !request.namespace().is_empty() {
                labels.insert(namespace_label(request.namespace()), "true".to_string());
            }

            self.create_namespace_cluster_roles(request)
                .await
                .map_err(|source| InstallError::ClusterRoles {
                    install: request.name().to_string(),
                    job: job.metadata.name.clone(),
                    source: Box::new(source),
                })?;
        }

        object.metadata.add_labels(labels);

        debug!(
            job = %job.metadata.name,
            name = %object.name(),
            namespace = %object.namespace(),
            api_version = %object.api_version,
            kind = %object.kind,
            parent_group = %parent.group,
            parent_version = %parent.version,
            parent_kind = %parent.kind,
            parent_name = %parent.name,
            parent_namespace = %parent.namespace,
            parent_uid = %parent.uid,
            "creating object from job output"
        );

        match self.store.create(object.clone()).await {
            Ok(_) => {}
            Err(e) if e.is_already_exists() => {
                debug!(name = %object.name(), kind = %object.kind, "object already exists");
            }
            Err(source) => {
                return Err(InstallError::CreateObject {
                    name: object.name().to_string(),
                    job: job.metadata.name.clone(),
                    source,
                })
            }
        }

        Ok(Some(object))
    }

    async fn fetch_stack_record(&self, object: &DynamicObject, job: &Job) -> Result<DynamicObject> {
        self.store
            .get(&object.gvk(), &ObjectKey::of(object))
            .await
            .map_err(|source| InstallError::FetchStackRecord {
                namespace: object.namespace().to_string(),
                name: object.name().to_string(),
                job: job.metadata.name.clone(),
                source,
            })
    }
}

#[async_trait]
impl JobCompleter for InstallJobCompleter {
    #[instrument(
        skip(self, request, job),
        fields(job = %job.metadata.name, namespace = %job.metadata.namespace, install = %request.name())
    )]
    async fn handle_job_completion(
        &self,
        mut request: InstallRequest,
        job: &Job,
    ) -> Result<InstallRequest> {
        let pod = self.find_pod_name_for_job(job).await?;

        let output = self.read_pod_logs(&job.metadata.namespace, &pod).await?;

        // Decode eagerly: the YAML parser is not Send, so every document is
        // decoded before the first await. The decoder stops after the first
        // malformed document, and the loop below stops at that error, so
        // nothing after it is materialized.
        let documents: Vec<_> = YamlOrJsonDecoder::new(&output).collect();

        let mut stack_record: Option<DynamicObject> = None;
        for decoded in documents {
            let decoded = decoded.map_err(|source| InstallError::Decode {
                job: job.metadata.name.clone(),
                source,
            })?;

            let Some(created) = self
                .create_job_output_object(decoded, &request, job)
                .await?
            else {
                continue;
            };

            if created.is_stack_record() {
                // re-fetch so server-assigned fields such as the uid are present
                let fetched = self.fetch_stack_record(&created, job).await?;
                if let Some(previous) = &stack_record {
                    warn!(
                        previous = %previous.name(),
                        current = %fetched.name(),
                        "job output contains more than one stack record"
                    );
                }
                stack_record = Some(fetched);
            }
        }

        let record = stack_record.ok_or_else(|| InstallError::MissingStackRecord {
            job: job.metadata.name.clone(),
        })?;

        request.set_stack_record(ObjectReference {
            api_version: record.api_version.clone(),
            kind: record.kind.clone(),
            name: record.metadata.name.clone(),
            namespace: record.metadata.namespace.clone(),
            uid: record.metadata.uid.clone(),
        });

        info!(
            stack = %record.name(),
            stack_namespace = %record.namespace(),
            "stack record resolved from job output"
        );

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacks_store::{InMemoryLogReader, InMemoryObjectStore};
    use stacks_types::{GroupVersionKind, InstallKind, Resource, PARENT_LABEL_KEYS};

    const STACK_OUTPUT: &str = r#"
apiVersion: stacks.crossplane.io/v1alpha1
kind: Stack
metadata:
  labels:
    app: redis
spec:
  title: Redis
"#;

    fn create_test_request() -> InstallRequest {
        let mut request =
            InstallRequest::new(InstallKind::StackInstall, "team-a", "redis", "redis:1.0");
        request.metadata.uid = "install-uid".into();
        request
    }

    fn create_test_job(request: &InstallRequest) -> Job {
        let mut job = Job::default();
        job.metadata.name = request.name().to_string();
        job.metadata.namespace = request.namespace().to_string();
        job
    }

    async fn setup(output: &str) -> (Arc<InMemoryObjectStore>, InstallJobCompleter, Job) {
        let store = Arc::new(InMemoryObjectStore::new());
        let logs = Arc::new(InMemoryLogReader::new());
        let job = create_test_job(&create_test_request());

        let pod = Pod::for_job(&job, "redis-x7k2p");
        store.create(pod.to_dynamic().unwrap()).await.unwrap();
        logs.insert("team-a", "redis-x7k2p", output);

        let completer = InstallJobCompleter::new(store.clone(), logs);
        (store, completer, job)
    }

    #[tokio::test]
    async fn test_stack_record_defaults_and_owner() {
        let (store, completer, job) = setup(STACK_OUTPUT).await;
        let request = create_test_request();

        let updated = completer
            .handle_job_completion(request.clone(), &job)
            .await
            .unwrap();

        let stack = store
            .get(&GroupVersionKind::stack(), &ObjectKey::new("team-a", "redis"))
            .await
            .unwrap();
        assert_eq!(stack.metadata.owner_references, vec![request.as_owner()]);
        assert_eq!(stack.metadata.labels["app"], "redis");
        for key in PARENT_LABEL_KEYS {
            assert!(stack.metadata.labels.contains_key(key), "missing {}", key);
        }

        let reference = updated.stack_record().unwrap();
        assert_eq!(reference.name, "redis");
        assert_eq!(reference.namespace, "team-a");
        assert_eq!(reference.kind, "Stack");
        assert_eq!(reference.uid, stack.metadata.uid);
    }

    #[tokio::test]
    async fn test_explicit_stack_name_is_kept() {
        let output = "apiVersion: stacks.crossplane.io/v1alpha1\nkind: Stack\nmetadata:\n  name: custom\n  namespace: elsewhere\n";
        let (_store, completer, job) = setup(output).await;

        let updated = completer
            .handle_job_completion(create_test_request(), &job)
            .await
            .unwrap();
        let reference = updated.stack_record().unwrap();
        assert_eq!(reference.name, "custom");
        assert_eq!(reference.namespace, "elsewhere");
    }

    #[tokio::test]
    async fn test_missing_pod_is_error() {
        let store = Arc::new(InMemoryObjectStore::new());
        let completer = InstallJobCompleter::new(store.clone(), Arc::new(InMemoryLogReader::new()));
        let request = create_test_request();

        let err = completer
            .handle_job_completion(request.clone(), &create_test_job(&request))
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::PodCount { count: 0, .. }));
        assert!(err.to_string().contains("job redis"));
    }

    #[tokio::test]
    async fn test_missing_logs_is_open_error() {
        let store = Arc::new(InMemoryObjectStore::new());
        let request = create_test_request();
        let job = create_test_job(&request);
        store
            .create(Pod::for_job(&job, "redis-x7k2p").to_dynamic().unwrap())
            .await
            .unwrap();
        let completer = InstallJobCompleter::new(store, Arc::new(InMemoryLogReader::new()));

        let err = completer.handle_job_completion(request, &job).await.unwrap_err();
        match err {
            InstallError::OpenLogs { pod, .. } => assert_eq!(pod, "redis-x7k2p"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_custom_role_prefix() {
        let output = format!(
            "apiVersion: apiextensions.k8s.io/v1beta1\nkind: CustomResourceDefinition\nmetadata:\n  name: caches.example.org\n---{}",
            STACK_OUTPUT
        );
        let store = Arc::new(InMemoryObjectStore::new());
        let logs = Arc::new(InMemoryLogReader::new());
        let request = create_test_request();
        let job = create_test_job(&request);
        store
            .create(Pod::for_job(&job, "redis-x7k2p").to_dynamic().unwrap())
            .await
            .unwrap();
        logs.insert("team-a", "redis-x7k2p", output);

        let config = InstallConfig {
            role_prefix: "stacks".into(),
            ..Default::default()
        };
        let completer = InstallJobCompleter::with_config(store.clone(), logs, &config);
        completer.handle_job_completion(request, &job).await.unwrap();

        store
            .get(
                &stacks_types::ClusterRole::gvk(),
                &ObjectKey::new("", "stacks:ns:team-a:view"),
            )
            .await
            .unwrap();
    }
}

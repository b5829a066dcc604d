//! Install pipeline error types

use crate::decoder::DecodeError;
use stacks_store::StoreError;
use thiserror::Error;

/// Errors raised while completing an install job
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("pod list for job {job} should only have 1 item, actual: {count}")]
    PodCount { job: String, count: usize },

    #[error("failed to list pods for job {job}: {source}")]
    ListPods {
        job: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to get logs request stream from pod {pod}: {source}")]
    OpenLogs {
        pod: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy logs request stream from pod {pod}: {source}")]
    CopyLogs {
        pod: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse output from job {job}: {source}")]
    Decode {
        job: String,
        #[source]
        source: DecodeError,
    },

    #[error("failed to create object {name} from job output {job}: {source}")]
    CreateObject {
        name: String,
        job: String,
        #[source]
        source: StoreError,
    },

    #[error(
        "failed to create namespace persona clusterroles for stackinstall {install} from job output {job}: {source}"
    )]
    ClusterRoles {
        install: String,
        job: String,
        #[source]
        source: Box<InstallError>,
    },

    #[error("failed to create clusterrole {role} for stackinstall {install}: {source}")]
    CreateClusterRole {
        role: String,
        install: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to retrieve created stack record {namespace}/{name} from job {job}: {source}")]
    FetchStackRecord {
        namespace: String,
        name: String,
        job: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to find a stack record from job {job}")]
    MissingStackRecord { job: String },

    #[error("failed to sweep {kind} objects owned by {install}: {source}")]
    Sweep {
        kind: String,
        install: String,
        #[source]
        source: StoreError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to initialize tracing: {0}")]
    Telemetry(String),
}

/// Result type for install operations
pub type Result<T> = std::result::Result<T, InstallError>;

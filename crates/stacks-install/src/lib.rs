//! Stacks Install - Unpack jobs and their completion
//!
//! Installing a stack package runs a one-shot unpack job whose output is a
//! stream of resource definitions. This crate builds that job and, once it
//! has finished, turns its output into tracked objects:
//!
//! 1. Find the job's single worker pod
//! 2. Read the pod's full output
//! 3. Decode the output as YAML or JSON documents
//! 4. Label, own and create each decoded object, provisioning persona
//!    cluster roles before any schema definition object
//! 5. Point the install request back at the created stack record
//!
//! Object creation tolerates `AlreadyExists`, so a completion run can be
//! repeated after a partial failure. Nothing is retried internally; the
//! reconciliation loop calling [`JobCompleter`] owns retries.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod cleanup;
pub mod completer;
pub mod config;
pub mod decoder;
pub mod error;
pub mod job;
pub mod roles;
pub mod telemetry;

// Re-exports
pub use cleanup::{cluster_scoped_kinds, sweep_owned_objects};
pub use completer::{InstallJobCompleter, JobCompleter};
pub use crate::config::{ExecutorInfo, InstallConfig, LoggingConfig};
pub use decoder::{DecodeError, YamlOrJsonDecoder};
pub use error::{InstallError, Result};
pub use job::create_install_job;
pub use roles::{cluster_role_name, generate_namespace_cluster_roles, PERSONAS};
pub use telemetry::init_tracing;

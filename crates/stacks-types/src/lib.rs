//! Stacks Types - Object model for the stack install pipeline
//!
//! A stack install request is turned into a one-shot unpack job. The job's
//! output is a stream of resource definitions which are materialized into
//! the object store. This crate holds the shapes that flow through that
//! pipeline:
//!
//! - **GroupVersionKind**: Type coordinates identifying every object
//! - **DynamicObject**: A generically-addressable decoded resource
//! - **InstallRequest**: The namespaced or cluster-wide install request
//! - **Job / Pod**: The unpack job and its single worker instance
//! - **ClusterRole**: Aggregated persona roles for namespaced installs
//! - **ParentLabels**: Provenance labels that stand in for native ownership
//!
//! ## Ownership Across Scopes
//!
//! A namespaced install request cannot own a cluster-scoped object, so every
//! object created on its behalf carries [`ParentLabels`]. Cleanup selects on
//! those labels instead of relying on a cascading delete.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod gvk;
pub mod install;
pub mod job;
pub mod labels;
pub mod meta;
pub mod object;
pub mod rbac;

// Re-export main types
pub use gvk::{
    is_custom_resource_definition, is_stack_record, GroupVersionKind, CRD_GROUP, CRD_KIND,
    CRD_VERSION, STACKS_GROUP, STACKS_VERSION, STACK_KIND,
};
pub use install::{InstallKind, InstallRequest, InstallSpec, InstallStatus, PermissionScope};
pub use job::{
    Container, EmptyDirVolumeSource, Job, JobSpec, Pod, PodSpec, PodTemplateSpec, RestartPolicy,
    Volume, VolumeMount, JOB_NAME_LABEL,
};
pub use labels::{
    namespace_label, ParentLabels, LABEL_NAMESPACE_PREFIX, LABEL_PARENT_GROUP, LABEL_PARENT_KIND,
    LABEL_PARENT_NAME, LABEL_PARENT_NAMESPACE, LABEL_PARENT_UID, LABEL_PARENT_VERSION,
    PARENT_LABEL_KEYS,
};
pub use meta::{LabelSelector, ObjectMeta, ObjectReference, OwnerReference};
pub use object::{ConversionError, DynamicObject, Resource};
pub use rbac::{AggregationRule, ClusterRole, PolicyRule};

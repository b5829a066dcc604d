//! Cluster role types

use crate::gvk::GroupVersionKind;
use crate::meta::{LabelSelector, ObjectMeta};
use crate::object::Resource;
use serde::{Deserialize, Serialize};

/// A cluster-wide permission role
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRole {
    pub metadata: ObjectMeta,

    /// When set, the role's rules are the union of all roles matching the selectors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_rule: Option<AggregationRule>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<PolicyRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationRule {
    pub cluster_role_selectors: Vec<LabelSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    #[serde(default)]
    pub api_groups: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    pub verbs: Vec<String>,
}

impl ClusterRole {
    pub fn gvk() -> GroupVersionKind {
        GroupVersionKind::new("rbac.authorization.k8s.io", "v1", "ClusterRole")
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

impl Resource for ClusterRole {
    fn gvk(&self) -> GroupVersionKind {
        ClusterRole::gvk()
    }

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

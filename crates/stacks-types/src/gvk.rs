//! Type coordinates
//!
//! Every object is addressed by its group, version and kind. The core group
//! has an empty group name and an apiVersion of just the version.

use serde::{Deserialize, Serialize};

/// API group of stack objects
pub const STACKS_GROUP: &str = "stacks.crossplane.io";
/// API version of stack objects
pub const STACKS_VERSION: &str = "v1alpha1";
/// Kind of the package record produced by an unpack job
pub const STACK_KIND: &str = "Stack";

/// API group of schema definition objects
pub const CRD_GROUP: &str = "apiextensions.k8s.io";
/// API version of schema definition objects
pub const CRD_VERSION: &str = "v1beta1";
/// Kind of schema definition objects
pub const CRD_KIND: &str = "CustomResourceDefinition";

/// Group, version and kind of an object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Split an apiVersion (`group/version` or bare `version`) and pair it with a kind
    pub fn from_api_version(api_version: &str, kind: impl Into<String>) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) => Self::new(group, version, kind),
            None => Self::new("", api_version, kind),
        }
    }

    /// The apiVersion string for these coordinates
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// The package record type
    pub fn stack() -> Self {
        Self::new(STACKS_GROUP, STACKS_VERSION, STACK_KIND)
    }

    /// The schema definition type
    pub fn custom_resource_definition() -> Self {
        Self::new(CRD_GROUP, CRD_VERSION, CRD_KIND)
    }

    fn matches(&self, group: &str, version: &str, kind: &str) -> bool {
        self.group == group && self.version == version && self.kind.eq_ignore_ascii_case(kind)
    }
}

impl std::fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// Whether the coordinates identify the package record
pub fn is_stack_record(gvk: &GroupVersionKind) -> bool {
    gvk.matches(STACKS_GROUP, STACKS_VERSION, STACK_KIND)
}

/// Whether the coordinates identify a schema definition object
pub fn is_custom_resource_definition(gvk: &GroupVersionKind) -> bool {
    gvk.matches(CRD_GROUP, CRD_VERSION, CRD_KIND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_round_trip() {
        let gvk = GroupVersionKind::from_api_version("batch/v1", "Job");
        assert_eq!(gvk.group, "batch");
        assert_eq!(gvk.version, "v1");
        assert_eq!(gvk.api_version(), "batch/v1");

        let core = GroupVersionKind::from_api_version("v1", "Pod");
        assert_eq!(core.group, "");
        assert_eq!(core.api_version(), "v1");
    }

    #[test]
    fn test_stack_predicate_ignores_kind_case() {
        let gvk = GroupVersionKind::new(STACKS_GROUP, STACKS_VERSION, "stack");
        assert!(is_stack_record(&gvk));
        assert!(!is_custom_resource_definition(&gvk));

        let other_version = GroupVersionKind::new(STACKS_GROUP, "v1", STACK_KIND);
        assert!(!is_stack_record(&other_version));
    }

    #[test]
    fn test_crd_predicate() {
        assert!(is_custom_resource_definition(
            &GroupVersionKind::custom_resource_definition()
        ));
        let v1 = GroupVersionKind::new(CRD_GROUP, "v1", CRD_KIND);
        assert!(!is_custom_resource_definition(&v1));
    }
}

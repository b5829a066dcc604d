//! Provenance labels
//!
//! Native owner references cannot point from a cluster-scoped object to a
//! namespaced owner. Objects created on behalf of an install request are
//! tagged with the owner's coordinates instead, and cleanup selects on the
//! full label set.

use crate::meta::{LabelSelector, ObjectMeta};
use crate::object::Resource;
use std::collections::BTreeMap;

pub const LABEL_PARENT_GROUP: &str = "core.crossplane.io/parent-group";
pub const LABEL_PARENT_VERSION: &str = "core.crossplane.io/parent-version";
pub const LABEL_PARENT_KIND: &str = "core.crossplane.io/parent-kind";
pub const LABEL_PARENT_NAMESPACE: &str = "core.crossplane.io/parent-namespace";
pub const LABEL_PARENT_NAME: &str = "core.crossplane.io/parent-name";
pub const LABEL_PARENT_UID: &str = "core.crossplane.io/parent-uid";

/// All provenance label keys
pub const PARENT_LABEL_KEYS: [&str; 6] = [
    LABEL_PARENT_GROUP,
    LABEL_PARENT_VERSION,
    LABEL_PARENT_KIND,
    LABEL_PARENT_NAMESPACE,
    LABEL_PARENT_NAME,
    LABEL_PARENT_UID,
];

/// Prefix of the per-namespace ownership label
pub const LABEL_NAMESPACE_PREFIX: &str = "namespace.crossplane.io/";

/// Key of the label marking an object as belonging to a namespace
pub fn namespace_label(namespace: &str) -> String {
    format!("{}{}", LABEL_NAMESPACE_PREFIX, namespace)
}

/// Identity of the object that caused another object to be created
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParentLabels {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub uid: String,
}

impl ParentLabels {
    pub fn for_parent<R: Resource>(parent: &R) -> Self {
        let gvk = parent.gvk();
        let meta = parent.metadata();
        Self {
            group: gvk.group,
            version: gvk.version,
            kind: gvk.kind,
            namespace: meta.namespace.clone(),
            name: meta.name.clone(),
            uid: meta.uid.clone(),
        }
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        [
            (LABEL_PARENT_GROUP, &self.group),
            (LABEL_PARENT_VERSION, &self.version),
            (LABEL_PARENT_KIND, &self.kind),
            (LABEL_PARENT_NAMESPACE, &self.namespace),
            (LABEL_PARENT_NAME, &self.name),
            (LABEL_PARENT_UID, &self.uid),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }

    /// Merge the labels onto an object without dropping its own labels
    pub fn apply(&self, meta: &mut ObjectMeta) {
        meta.add_labels(self.to_map());
    }

    /// Selector matching every object created for this parent
    pub fn selector(&self) -> LabelSelector {
        LabelSelector::from_labels(self.to_map())
    }
}

//! Install request types
//!
//! An InstallRequest asks for a stack package to be unpacked and registered.
//! The `StackInstall` kind grants the stack namespaced permissions, the
//! `ClusterStackInstall` kind grants cluster-wide permissions.

use crate::gvk::{GroupVersionKind, STACKS_GROUP, STACKS_VERSION};
use crate::meta::{ObjectMeta, ObjectReference, OwnerReference};
use crate::object::Resource;
use serde::{Deserialize, Serialize};

/// Kind of install request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallKind {
    StackInstall,
    ClusterStackInstall,
}

impl InstallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StackInstall => "StackInstall",
            Self::ClusterStackInstall => "ClusterStackInstall",
        }
    }

    /// Permission scope granted by this kind of request
    pub fn permission_scope(&self) -> PermissionScope {
        match self {
            Self::StackInstall => PermissionScope::Namespaced,
            Self::ClusterStackInstall => PermissionScope::Cluster,
        }
    }
}

impl std::fmt::Display for InstallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope of the permissions a stack is granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionScope {
    Namespaced,
    Cluster,
}

impl PermissionScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Namespaced => "Namespaced",
            Self::Cluster => "Cluster",
        }
    }
}

impl std::fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired state of an install request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallSpec {
    /// Package image reference
    pub package: String,
}

/// Observed state of an install request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallStatus {
    /// Back-reference to the stack record produced by the unpack job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_record: Option<ObjectReference>,
}

/// A request to install a stack package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallRequest {
    pub kind: InstallKind,
    pub metadata: ObjectMeta,
    pub spec: InstallSpec,
    #[serde(default)]
    pub status: InstallStatus,
}

impl InstallRequest {
    pub fn new(
        kind: InstallKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
        package: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            metadata: ObjectMeta::named(namespace, name),
            spec: InstallSpec {
                package: package.into(),
            },
            status: InstallStatus::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn uid(&self) -> &str {
        &self.metadata.uid
    }

    /// Package image to unpack
    pub fn image(&self) -> &str {
        &self.spec.package
    }

    pub fn permission_scope(&self) -> PermissionScope {
        self.kind.permission_scope()
    }

    /// Controller owner reference pointing at this request
    pub fn as_owner(&self) -> OwnerReference {
        let gvk = self.gvk();
        OwnerReference {
            api_version: gvk.api_version(),
            kind: gvk.kind,
            name: self.metadata.name.clone(),
            uid: self.metadata.uid.clone(),
            controller: Some(true),
            block_owner_deletion: Some(true),
        }
    }

    pub fn stack_record(&self) -> Option<&ObjectReference> {
        self.status.stack_record.as_ref()
    }

    pub fn set_stack_record(&mut self, reference: ObjectReference) {
        self.status.stack_record = Some(reference);
    }
}

impl Resource for InstallRequest {
    fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::new(STACKS_GROUP, STACKS_VERSION, self.kind.as_str())
    }

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_follows_kind() {
        let ns = InstallRequest::new(InstallKind::StackInstall, "team-a", "redis", "redis:1.0");
        assert_eq!(ns.permission_scope(), PermissionScope::Namespaced);

        let cluster =
            InstallRequest::new(InstallKind::ClusterStackInstall, "system", "aws", "aws:0.2");
        assert_eq!(cluster.permission_scope(), PermissionScope::Cluster);
    }

    #[test]
    fn test_as_owner_is_controller() {
        let mut request =
            InstallRequest::new(InstallKind::StackInstall, "team-a", "redis", "redis:1.0");
        request.metadata.uid = "uid-1".into();

        let owner = request.as_owner();
        assert_eq!(owner.api_version, "stacks.crossplane.io/v1alpha1");
        assert_eq!(owner.kind, "StackInstall");
        assert_eq!(owner.uid, "uid-1");
        assert_eq!(owner.controller, Some(true));
        assert_eq!(owner.block_owner_deletion, Some(true));
    }

    #[test]
    fn test_to_dynamic_carries_kind() {
        let request =
            InstallRequest::new(InstallKind::ClusterStackInstall, "system", "aws", "aws:0.2");
        let object = request.to_dynamic().unwrap();
        assert_eq!(object.kind, "ClusterStackInstall");
        assert_eq!(object.api_version, "stacks.crossplane.io/v1alpha1");

        let back: InstallRequest = object.try_into_resource().unwrap();
        assert_eq!(back, request);
    }
}

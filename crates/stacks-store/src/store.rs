//! Object store trait
//!
//! The ObjectStore is the single seam to the orchestration system's state.
//! Calls are independent request/response operations; no locks are held
//! across calls, so callers rely on create being idempotent via
//! [`StoreError::AlreadyExists`](crate::StoreError::AlreadyExists).

use crate::error::Result;
use async_trait::async_trait;
use stacks_types::{DynamicObject, GroupVersionKind, LabelSelector, Resource};

/// Namespace and name of an object; namespace is empty for cluster-scoped objects
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn of(object: &DynamicObject) -> Self {
        Self::new(object.namespace(), object.name())
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Store of objects addressed by type coordinates, namespace and name
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Get an object, failing with `NotFound` if it does not exist
    async fn get(&self, gvk: &GroupVersionKind, key: &ObjectKey) -> Result<DynamicObject>;

    /// List objects of a type matching a selector, optionally within one namespace
    async fn list(
        &self,
        gvk: &GroupVersionKind,
        namespace: Option<&str>,
        selector: &LabelSelector,
    ) -> Result<Vec<DynamicObject>>;

    /// Create an object and return it with server-assigned fields populated.
    /// Fails with `AlreadyExists` if an object with the same key exists.
    async fn create(&self, object: DynamicObject) -> Result<DynamicObject>;

    /// Delete an object, failing with `NotFound` if it does not exist
    async fn delete(&self, gvk: &GroupVersionKind, key: &ObjectKey) -> Result<()>;
}

/// Typed conveniences over [`ObjectStore`]
#[async_trait]
pub trait ObjectStoreExt: ObjectStore {
    async fn get_typed<T: Resource>(&self, gvk: &GroupVersionKind, key: &ObjectKey) -> Result<T> {
        let object = self.get(gvk, key).await?;
        Ok(object.try_into_resource()?)
    }

    async fn create_typed<T: Resource>(&self, resource: &T) -> Result<T> {
        let created = self.create(resource.to_dynamic()?).await?;
        Ok(created.try_into_resource()?)
    }
}

impl<S: ObjectStore + ?Sized> ObjectStoreExt for S {}

//! Generic resource definitions
//!
//! Job output is decoded into [`DynamicObject`]s: the type coordinates and
//! well-known metadata are structured, everything else (including metadata
//! fields such as annotations) is kept as an open JSON map so that unknown
//! resource types pass through untouched.

use crate::gvk::{self, GroupVersionKind};
use crate::meta::ObjectMeta;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors converting between typed and generic objects
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Object is not a mapping")]
    NotAnObject,

    #[error("Object '{0}' is missing")]
    MissingField(&'static str),
}

/// An untyped object addressed by its type coordinates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicObject {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default, deserialize_with = "crate::meta::null_as_default")]
    pub metadata: ObjectMeta,

    /// Remaining top-level fields (spec, status, rules, ...)
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl DynamicObject {
    pub fn new(gvk: &GroupVersionKind, metadata: ObjectMeta) -> Self {
        Self {
            api_version: gvk.api_version(),
            kind: gvk.kind.clone(),
            metadata,
            data: Map::new(),
        }
    }

    /// Decode a generic JSON value, requiring `apiVersion` and `kind`
    pub fn from_value(value: Value) -> Result<Self, ConversionError> {
        if !value.is_object() {
            return Err(ConversionError::NotAnObject);
        }
        let object: Self = serde_json::from_value(value)?;
        if object.kind.is_empty() {
            return Err(ConversionError::MissingField("kind"));
        }
        if object.api_version.is_empty() {
            return Err(ConversionError::MissingField("apiVersion"));
        }
        Ok(object)
    }

    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::from_api_version(&self.api_version, self.kind.clone())
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn is_stack_record(&self) -> bool {
        gvk::is_stack_record(&self.gvk())
    }

    pub fn is_custom_resource_definition(&self) -> bool {
        gvk::is_custom_resource_definition(&self.gvk())
    }

    /// Convert into a typed resource
    pub fn try_into_resource<T: Resource>(self) -> Result<T, ConversionError> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }
}

/// An object with fixed type coordinates that can be stored generically
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    fn gvk(&self) -> GroupVersionKind;

    fn metadata(&self) -> &ObjectMeta;

    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    fn to_dynamic(&self) -> Result<DynamicObject, ConversionError> {
        let gvk = self.gvk();
        let mut value = serde_json::to_value(self)?;
        let map = value.as_object_mut().ok_or(ConversionError::NotAnObject)?;
        map.insert("apiVersion".into(), Value::String(gvk.api_version()));
        map.insert("kind".into(), Value::String(gvk.kind));
        Ok(serde_json::from_value(value)?)
    }
}

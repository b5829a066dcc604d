//! Store error types

use stacks_types::{ConversionError, GroupVersionKind};
use thiserror::Error;

/// Object store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} \"{name}\" not found in namespace \"{namespace}\"")]
    NotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("{kind} \"{name}\" already exists in namespace \"{namespace}\"")]
    AlreadyExists {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("Invalid object: {0}")]
    Invalid(String),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn not_found(gvk: &GroupVersionKind, namespace: &str, name: &str) -> Self {
        Self::NotFound {
            kind: gvk.kind.clone(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn already_exists(gvk: &GroupVersionKind, namespace: &str, name: &str) -> Self {
        Self::AlreadyExists {
            kind: gvk.kind.clone(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

//! Object metadata, references and label selectors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Metadata common to every stored object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Object name, unique per type and namespace
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Namespace; empty for cluster-scoped objects
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    /// Server-assigned identity
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub owner_references: Vec<OwnerReference>,

    /// Server-assigned creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,

    /// Metadata fields without a typed accessor (annotations, finalizers,
    /// generation, ...), kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read an explicit `null` as the empty value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ObjectMeta {
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Merge labels into the existing set. Keys present in `labels` win,
    /// keys only present on the object are kept.
    pub fn add_labels<I, K, V>(&mut self, labels: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in labels {
            self.labels.insert(key.into(), value.into());
        }
    }
}

/// Reference from an owned object to its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_owner_deletion: Option<bool>,
}

/// Fully-qualified pointer to another object
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
}

/// Equality-based label selector
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
}

impl LabelSelector {
    /// Selector matching every object
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn from_labels<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            match_labels: labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Whether every selector label is present with the same value
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.match_labels
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }
}

impl std::fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .match_labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_labels_merges() {
        let mut meta = ObjectMeta::named("ns", "obj");
        meta.labels.insert("app".into(), "demo".into());
        meta.add_labels([("tier", "backend")]);

        assert_eq!(meta.labels.get("app").map(String::as_str), Some("demo"));
        assert_eq!(meta.labels.get("tier").map(String::as_str), Some("backend"));
    }

    #[test]
    fn test_selector_matching() {
        let selector = LabelSelector::from_labels([("job-name", "install")]);
        let mut labels = BTreeMap::new();
        assert!(!selector.matches(&labels));

        labels.insert("job-name".to_string(), "install".to_string());
        labels.insert("extra".to_string(), "x".to_string());
        assert!(selector.matches(&labels));
        assert!(LabelSelector::everything().matches(&BTreeMap::new()));
    }

    #[test]
    fn test_unmodeled_fields_are_kept() {
        let input = serde_json::json!({
            "name": "caches.example.org",
            "annotations": { "stacks.crossplane.io/ui-schema": "x" },
            "finalizers": ["stacks.crossplane.io/cleanup"],
            "generation": 3
        });
        let meta: ObjectMeta = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(meta.name, "caches.example.org");
        assert_eq!(meta.extra["generation"], 3);
        assert_eq!(serde_json::to_value(&meta).unwrap(), input);
    }

    #[test]
    fn test_null_collections_read_as_empty() {
        let meta: ObjectMeta = serde_json::from_value(serde_json::json!({
            "name": "a",
            "labels": null,
            "ownerReferences": null
        }))
        .unwrap();
        assert!(meta.labels.is_empty());
        assert!(meta.owner_references.is_empty());
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let mut meta = ObjectMeta::named("", "cluster-wide");
        meta.owner_references.push(OwnerReference {
            api_version: "v1".into(),
            kind: "Thing".into(),
            name: "owner".into(),
            uid: "1".into(),
            controller: Some(true),
            block_owner_deletion: None,
        });
        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("namespace").is_none());
        assert_eq!(json["ownerReferences"][0]["apiVersion"], "v1");
    }
}

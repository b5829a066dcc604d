//! Persona cluster roles for namespaced installs
//!
//! A namespaced stack contributes its permissions to per-namespace
//! `admin`, `edit` and `view` roles. Each persona role aggregates any
//! cluster role labeled for that persona in the namespace, plus the roles
//! labeled as defaults for the persona in every namespace.

use stacks_types::{
    namespace_label, AggregationRule, ClusterRole, InstallRequest, LabelSelector, ObjectMeta,
    ParentLabels, PermissionScope,
};

/// Personas in provisioning order
pub const PERSONAS: [&str; 3] = ["admin", "edit", "view"];

pub const DEFAULT_ROLE_PREFIX: &str = "crossplane";

const AGGREGATE_LABEL_PREFIX: &str = "rbac.crossplane.io/aggregate-to-namespace";

/// `<prefix>:ns:<namespace>:<persona>`
pub fn cluster_role_name(prefix: &str, namespace: &str, persona: &str) -> String {
    format!("{}:ns:{}:{}", prefix, namespace, persona)
}

/// Derive the persona roles implied by the request's permission scope.
/// Cluster-scoped installs get none.
pub fn generate_namespace_cluster_roles(request: &InstallRequest, prefix: &str) -> Vec<ClusterRole> {
    if request.permission_scope() != PermissionScope::Namespaced {
        return Vec::new();
    }

    let namespace = request.namespace();
    let parent = ParentLabels::for_parent(request);

    PERSONAS
        .iter()
        .map(|persona| {
            let mut metadata = ObjectMeta::named("", cluster_role_name(prefix, namespace, persona));
            metadata
                .labels
                .insert(namespace_label(namespace), "true".to_string());
            parent.apply(&mut metadata);

            ClusterRole {
                metadata,
                aggregation_rule: Some(AggregationRule {
                    cluster_role_selectors: vec![
                        LabelSelector::from_labels([
                            (format!("{}-{}", AGGREGATE_LABEL_PREFIX, persona), "true"),
                            (namespace_label(namespace), "true"),
                        ]),
                        LabelSelector::from_labels([(
                            format!("{}-default-{}", AGGREGATE_LABEL_PREFIX, persona),
                            "true",
                        )]),
                    ],
                }),
                rules: Vec::new(),
            }
        })
        .collect()
}

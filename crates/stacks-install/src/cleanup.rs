//! Label-based cleanup
//!
//! Cluster-scoped objects created for a namespaced install request are not
//! garbage collected with it. When the request goes away its objects are
//! found by their provenance labels and deleted explicitly.

use crate::error::{InstallError, Result};
use stacks_store::{ObjectKey, ObjectStore};
use stacks_types::{ClusterRole, GroupVersionKind, InstallRequest, ParentLabels};
use tracing::{debug, info};

/// Types that native ownership cannot reach from a namespaced request
pub fn cluster_scoped_kinds() -> Vec<GroupVersionKind> {
    vec![
        GroupVersionKind::custom_resource_definition(),
        ClusterRole::gvk(),
    ]
}

/// Delete every object of the given types labeled as created for `request`.
///
/// Only objects carrying the request's full provenance label set are
/// touched. Returns the number of objects deleted.
pub async fn sweep_owned_objects(
    store: &dyn ObjectStore,
    request: &InstallRequest,
    kinds: &[GroupVersionKind],
) -> Result<usize> {
    let selector = ParentLabels::for_parent(request).selector();
    let mut deleted = 0;

    for gvk in kinds {
        let sweep_err = |source| InstallError::Sweep {
            kind: gvk.kind.clone(),
            install: request.name().to_string(),
            source,
        };

        let owned = store.list(gvk, None, &selector).await.map_err(sweep_err)?;
        for object in owned {
            match store.delete(gvk, &ObjectKey::of(&object)).await {
                Ok(()) => deleted += 1,
                Err(e) if e.is_not_found() => {
                    debug!(kind = %gvk.kind, name = %object.name(), "object already removed");
                }
                Err(e) => return Err(sweep_err(e)),
            }
        }
    }

    info!(install = %request.name(), deleted, "swept objects owned by install request");
    Ok(deleted)
}

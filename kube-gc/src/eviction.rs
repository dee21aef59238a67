//! Reports deployments that block the cluster autoscaler from draining nodes.

use crate::{
    kubectl::{annotation, Deployment},
    namespace,
    resource::{ResourceKind, ResourceRef},
};

/// Deployments outside `excluded` namespaces that carry no `safe-to-evict` annotation, in input order.
pub fn missing_safe_to_evict<S: AsRef<str>>(deployments: &[Deployment], excluded: &[S]) -> Vec<ResourceRef> {
    deployments
        .iter()
        .filter(|deployment| namespace::is_selected(&deployment.metadata.namespace, "", excluded))
        .filter(|deployment| {
            !deployment
                .metadata
                .annotations
                .contains_key(annotation::SAFE_TO_EVICT)
        })
        .map(|deployment| ResourceRef::new(ResourceKind::Deployment, &deployment.metadata))
        .collect()
}

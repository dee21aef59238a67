use log::debug;
use time::OffsetDateTime;

use crate::{
    cluster::{ClusterApi, QueryError},
    kubectl::{Ingress, Service},
    resource::{DeletionCandidate, ResourceKind, ResourceRef},
};

/// Candidates for every service whose pod selector matches no pods. Services without a selector can not be judged and
/// are kept.
pub fn orphaned_services(
    cluster: &impl ClusterApi,
    namespace: &str,
    services: &[Service],
    observed_at: OffsetDateTime,
) -> Result<Vec<DeletionCandidate>, QueryError> {
    let mut candidates = Vec::new();

    for service in services {
        let Some(selector) = service.pod_selector() else {
            debug!(
                "skipping service {namespace}/{} without selector",
                service.metadata.name
            );
            continue;
        };

        if cluster.pods(namespace, selector)?.is_empty() {
            candidates.push(DeletionCandidate::new(
                ResourceRef::new(ResourceKind::Service, &service.metadata),
                format!("no pods match selector {selector}"),
                observed_at,
            ));
        }
    }

    Ok(candidates)
}

/// Candidates for every ingress none of whose backend services exist. A single existing backend service keeps the
/// whole ingress. Ingresses that reference no service are kept.
pub fn orphaned_ingresses(
    cluster: &impl ClusterApi,
    namespace: &str,
    ingresses: &[Ingress],
    observed_at: OffsetDateTime,
) -> Result<Vec<DeletionCandidate>, QueryError> {
    let mut candidates = Vec::new();

    for ingress in ingresses {
        let services = ingress.backend_service_names();
        if services.is_empty() {
            continue;
        }

        let mut any_exists = false;
        for service in &services {
            if cluster.service_exists(namespace, service)? {
                any_exists = true;
                break;
            }
        }

        if !any_exists {
            candidates.push(DeletionCandidate::new(
                ResourceRef::new(ResourceKind::Ingress, &ingress.metadata),
                format!("backend services {} do not exist", services.join(", ")),
                observed_at,
            ));
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;
    use crate::testing::FakeCluster;

    const NOW: OffsetDateTime = datetime!(2024-06-01 12:00 UTC);

    fn ingress(name: &str, services: &[&str]) -> Ingress {
        let paths = services
            .iter()
            .map(|service| json!({ "path": "/", "backend": { "service": { "name": service } } }))
            .collect::<Vec<_>>();
        serde_json::from_value(json!({
            "metadata": { "name": name, "namespace": "shop-qa" },
            "spec": { "rules": [{ "http": { "paths": paths } }] },
        }))
        .unwrap()
    }

    #[test]
    fn service_without_matching_pods_is_orphaned() {
        let cluster = FakeCluster::default()
            .with(json!({ "kind": "Pod", "metadata": { "name": "web-1", "namespace": "shop-qa", "labels": { "app": "web" } } }))
            .with(json!({ "kind": "Pod", "metadata": { "name": "api-1", "namespace": "other-qa", "labels": { "app": "api" } } }));

        let services: Vec<Service> = serde_json::from_value(json!([
            { "metadata": { "name": "web", "namespace": "shop-qa" }, "spec": { "selector": { "app": "web" } } },
            { "metadata": { "name": "api", "namespace": "shop-qa" }, "spec": { "selector": { "app": "api" } } },
            { "metadata": { "name": "external", "namespace": "shop-qa" }, "spec": {} },
        ]))
        .unwrap();

        let candidates = orphaned_services(&cluster, "shop-qa", &services, NOW).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind(), ResourceKind::Service);
        assert_eq!(candidates[0].name(), "api");
    }

    #[test]
    fn one_existing_backend_protects_the_ingress() {
        let cluster = FakeCluster::default().with(json!({
            "kind": "Service",
            "metadata": { "name": "a", "namespace": "shop-qa" },
        }));

        let ingresses = [
            ingress("partly-dead", &["a", "b"]),
            ingress("dead", &["b", "c", "b"]),
            ingress("empty", &[]),
        ];

        let candidates = orphaned_ingresses(&cluster, "shop-qa", &ingresses, NOW).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind(), ResourceKind::Ingress);
        assert_eq!(candidates[0].name(), "dead");
        assert_eq!(candidates[0].reason, "backend services b, c do not exist");
    }

    #[test]
    fn service_in_another_namespace_does_not_count() {
        let cluster = FakeCluster::default().with(json!({
            "kind": "Service",
            "metadata": { "name": "a", "namespace": "other-qa" },
        }));

        let candidates =
            orphaned_ingresses(&cluster, "shop-qa", &[ingress("shop", &["a"])], NOW).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn default_backend_is_not_a_reference() {
        let ingresses: Vec<Ingress> = serde_json::from_value(json!([
            {
                "metadata": { "name": "fallback-only", "namespace": "shop-qa" },
                "spec": { "defaultBackend": { "service": { "name": "gone" } } },
            },
            {
                "metadata": { "name": "web", "namespace": "shop-qa" },
                "spec": {
                    "defaultBackend": { "service": { "name": "fallback" } },
                    "rules": [{ "http": { "paths": [{ "backend": { "service": { "name": "gone" } } }] } }],
                },
            },
        ]))
        .unwrap();

        let cluster = FakeCluster::default().with(json!({
            "kind": "Service",
            "metadata": { "name": "fallback", "namespace": "shop-qa" },
        }));

        let names = orphaned_ingresses(&cluster, "shop-qa", &ingresses, NOW)
            .unwrap()
            .into_iter()
            .map(|candidate| candidate.resource.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["web"]);
    }

    #[test]
    fn failing_pod_lookup_is_an_error_not_an_orphan() {
        let cluster = FakeCluster::default().failing_query("Pod");
        let services: Vec<Service> = serde_json::from_value(json!([
            { "metadata": { "name": "web", "namespace": "shop-qa" }, "spec": { "selector": { "app": "web" } } },
        ]))
        .unwrap();

        let error = orphaned_services(&cluster, "shop-qa", &services, NOW).unwrap_err();
        assert!(matches!(error, QueryError::Process(_)));
    }

    #[test]
    fn failing_existence_check_is_an_error_not_an_orphan() {
        let cluster = FakeCluster::default().failing_existence_checks();

        let error = orphaned_ingresses(&cluster, "shop-qa", &[ingress("shop", &["a"])], NOW).unwrap_err();
        assert!(matches!(error, QueryError::Process(_)));
    }
}

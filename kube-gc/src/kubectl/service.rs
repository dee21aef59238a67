use serde::Deserialize;

use super::{LabelSelector, ResourceMetadata};

/// Partially implements [Service](https://kubernetes.io/docs/reference/kubernetes-api/service-resources/service-v1/)
#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    pub metadata: ResourceMetadata,
    #[serde(default)]
    pub spec: ServiceSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSpec {
    /// Route service traffic to pods with label keys and values matching this selector. `None` for services without
    /// a selector, such as those backed by manually managed endpoints.
    #[serde(default)]
    pub selector: Option<LabelSelector>,
}

impl Service {
    /// Returns the pod selector if the service has a non-empty one.
    pub fn pod_selector(&self) -> Option<&LabelSelector> {
        self.spec
            .selector
            .as_ref()
            .filter(|selector| !selector.is_empty())
    }
}

/// [Pod](https://kubernetes.io/docs/reference/kubernetes-api/workload-resources/pod-v1/), only the metadata is needed
/// to tell whether a selector matches anything.
#[derive(Debug, Clone, Deserialize)]
pub struct Pod {
    pub metadata: ResourceMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_null_selector_is_no_selector() {
        let service: Service = serde_json::from_value(serde_json::json!({
            "metadata": { "name": "db" },
            "spec": { "selector": null, "type": "ExternalName" },
        }))
        .unwrap();
        assert_eq!(service.pod_selector(), None);

        let service: Service = serde_json::from_value(serde_json::json!({
            "metadata": { "name": "db" },
            "spec": { "selector": {} },
        }))
        .unwrap();
        assert_eq!(service.pod_selector(), None);

        let service: Service = serde_json::from_value(serde_json::json!({
            "metadata": { "name": "web" },
            "spec": { "selector": { "app": "web" } },
        }))
        .unwrap();
        assert_eq!(
            service.pod_selector().map(ToString::to_string).as_deref(),
            Some("app=web")
        );
    }
}

use itertools::Itertools;
use serde::Deserialize;

use super::ResourceMetadata;

/// Partially implements [Ingress](https://kubernetes.io/docs/reference/kubernetes-api/service-resources/ingress-v1/).
/// Backends written in the `extensions/v1beta1` shape are understood as well.
#[derive(Debug, Clone, Deserialize)]
pub struct Ingress {
    pub metadata: ResourceMetadata,
    #[serde(default)]
    pub spec: IngressSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpec {
    #[serde(default)]
    pub rules: Vec<IngressRule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngressRule {
    #[serde(default)]
    pub http: Option<HttpIngressRuleValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpIngressRuleValue {
    #[serde(default)]
    pub paths: Vec<HttpIngressPath>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpIngressPath {
    pub backend: IngressBackend,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressBackend {
    /// `networking.k8s.io/v1`
    #[serde(default)]
    pub service: Option<IngressServiceBackend>,

    /// `extensions/v1beta1`
    #[serde(default)]
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngressServiceBackend {
    pub name: String,
}

impl IngressBackend {
    pub fn service_name(&self) -> Option<&str> {
        self.service
            .as_ref()
            .map(|service| service.name.as_str())
            .or(self.service_name.as_deref())
    }
}

impl Ingress {
    /// Distinct names of the services the rule paths of this ingress route to, in order of first appearance. The
    /// default backend only catches unmatched traffic and is not part of this set. Backends that point at something
    /// other than a service (resource backends) are skipped.
    pub fn backend_service_names(&self) -> Vec<&str> {
        self.spec
            .rules
            .iter()
            .filter_map(|rule| rule.http.as_ref())
            .flat_map(|http| http.paths.iter())
            .map(|path| &path.backend)
            .filter_map(IngressBackend::service_name)
            .unique()
            .collect()
    }
}

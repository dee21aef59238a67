use serde::Deserialize;

use super::ResourceMetadata;

/// [Namespace](https://kubernetes.io/docs/reference/kubernetes-api/cluster-resources/namespace-v1/)
#[derive(Debug, Clone, Deserialize)]
pub struct Namespace {
    pub metadata: ResourceMetadata,
}

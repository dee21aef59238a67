use serde::Deserialize;

use super::ResourceMetadata;

/// Partially implements
/// [HorizontalPodAutoscaler](https://kubernetes.io/docs/reference/kubernetes-api/workload-resources/horizontal-pod-autoscaler-v2/)
#[derive(Debug, Clone, Deserialize)]
pub struct HorizontalPodAutoscaler {
    pub metadata: ResourceMetadata,
    #[serde(default)]
    pub status: HorizontalPodAutoscalerStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalPodAutoscalerStatus {
    /// Current number of replicas of pods managed by this autoscaler. Omitted by the API server when zero.
    #[serde(default)]
    pub current_replicas: u32,
}

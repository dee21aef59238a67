use serde::Deserialize;

use super::ResourceMetadata;

/// Partially implements [ReplicaSet](https://kubernetes.io/docs/reference/kubernetes-api/workload-resources/replica-set-v1/)
#[derive(Debug, Clone, Deserialize)]
pub struct ReplicaSet {
    pub metadata: ResourceMetadata,
    #[serde(default)]
    pub status: ReplicaSetStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplicaSetStatus {
    /// The API server omits the field when it is zero.
    #[serde(default)]
    pub replicas: u32,
}

/// [Deployment](https://kubernetes.io/docs/reference/kubernetes-api/workload-resources/deployment-v1/), only the
/// metadata is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    pub metadata: ResourceMetadata,
}

/// [StatefulSet](https://kubernetes.io/docs/reference/kubernetes-api/workload-resources/stateful-set-v1/), only the
/// metadata is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct StatefulSet {
    pub metadata: ResourceMetadata,
}

/// [CronJob](https://kubernetes.io/docs/reference/kubernetes-api/workload-resources/cron-job-v1/), only the metadata
/// is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct CronJob {
    pub metadata: ResourceMetadata,
}

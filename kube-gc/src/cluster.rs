use crate::{
    kubectl::{
        Certificate, CronJob, Deployment, HorizontalPodAutoscaler, Ingress, LabelSelector, Namespace,
        Pod, ReplicaSet, Secret, Service, StatefulSet,
    },
    process,
    resource::ResourceKind,
};

/// Read and delete access to the cluster. Every call blocks until the cluster answered. Implementations never retry.
pub trait ClusterApi {
    fn namespaces(&self) -> Result<Vec<Namespace>, QueryError>;

    fn replica_sets(&self, namespace: &str) -> Result<Vec<ReplicaSet>, QueryError>;

    fn cron_jobs(&self, namespace: &str) -> Result<Vec<CronJob>, QueryError>;

    fn horizontal_pod_autoscalers(
        &self,
        namespace: &str,
    ) -> Result<Vec<HorizontalPodAutoscaler>, QueryError>;

    fn services(&self, namespace: &str) -> Result<Vec<Service>, QueryError>;

    /// Pods in `namespace` whose labels match every pair in `selector`.
    fn pods(&self, namespace: &str, selector: &LabelSelector) -> Result<Vec<Pod>, QueryError>;

    fn ingresses(&self, namespace: &str) -> Result<Vec<Ingress>, QueryError>;

    /// Whether a service named `name` currently exists in `namespace`.
    fn service_exists(&self, namespace: &str, name: &str) -> Result<bool, QueryError>;

    fn stateful_sets(&self, namespace: &str) -> Result<Vec<StatefulSet>, QueryError>;

    /// Deployments in `namespace`, or in all namespaces when `None`.
    fn deployments(&self, namespace: Option<&str>) -> Result<Vec<Deployment>, QueryError>;

    /// Secrets in all namespaces.
    fn secrets(&self) -> Result<Vec<Secret>, QueryError>;

    /// Certificates in all namespaces.
    fn certificates(&self) -> Result<Vec<Certificate>, QueryError>;

    fn delete(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<(), DeletionError>;
}

/// Listing resources failed. Aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Process(#[from] process::Error),

    #[error("unable to decode the output of `{command}`: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Deleting a resource failed. No further resources are deleted.
#[derive(Debug, thiserror::Error)]
#[error("failed to delete {kind} {namespace}/{name}: {source}")]
pub struct DeletionError {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
    #[source]
    pub source: process::Error,
}

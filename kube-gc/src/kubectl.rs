use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::{
    cluster::{ClusterApi, DeletionError, QueryError},
    process,
    resource::ResourceKind,
};

mod autoscaler;
pub use autoscaler::*;

mod certificate;
pub use certificate::*;

mod common;
pub use common::*;

mod ingress;
pub use ingress::*;

mod namespace;
pub use namespace::*;

mod service;
pub use service::*;

mod workload;
pub use workload::*;

/// Which namespaces a `kubectl get` call covers.
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    /// Cluster scoped resources such as namespaces.
    Cluster,
    Namespace(&'a str),
    AllNamespaces,
}

/// Talks to the cluster by running `kubectl`.
pub struct Kubectl {
    kubeconfig: Option<PathBuf>,
}

impl Kubectl {
    /// Without a kubeconfig path, kubectl falls back to `$KUBECONFIG` and `~/.kube/config` on its own.
    pub fn new(kubeconfig: Option<PathBuf>) -> Self {
        Self { kubeconfig }
    }

    /// Returns the kubectl command where authentication arguments have already been set.
    fn kubectl(&self) -> process::Command {
        let command = process::Command::new("kubectl");
        match &self.kubeconfig {
            Some(kubeconfig) => process::args!(command, "--kubeconfig", kubeconfig),
            None => command,
        }
    }

    fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        scope: Scope<'_>,
        selector: Option<&LabelSelector>,
    ) -> Result<Vec<T>, QueryError> {
        let mut command = process::args!(self.kubectl(), "get", resource, "--output=json");
        command = match scope {
            Scope::Cluster => command,
            Scope::Namespace(namespace) => process::args!(command, "--namespace", namespace),
            Scope::AllNamespaces => process::args!(command, "--all-namespaces"),
        };
        if let Some(selector) = selector {
            command = process::args!(command, format!("--selector={selector}"));
        }

        let output = command.output()?;

        serde_json::from_slice::<GetResource<T>>(&output.stdout)
            .map(|list| list.items)
            .map_err(|source| QueryError::Decode {
                command: format!("{:?}", output.command),
                source,
            })
    }
}

impl ClusterApi for Kubectl {
    fn namespaces(&self) -> Result<Vec<Namespace>, QueryError> {
        self.get("namespaces", Scope::Cluster, None)
    }

    fn replica_sets(&self, namespace: &str) -> Result<Vec<ReplicaSet>, QueryError> {
        self.get("replicasets", Scope::Namespace(namespace), None)
    }

    fn cron_jobs(&self, namespace: &str) -> Result<Vec<CronJob>, QueryError> {
        self.get("cronjobs", Scope::Namespace(namespace), None)
    }

    fn horizontal_pod_autoscalers(
        &self,
        namespace: &str,
    ) -> Result<Vec<HorizontalPodAutoscaler>, QueryError> {
        self.get("horizontalpodautoscalers", Scope::Namespace(namespace), None)
    }

    fn services(&self, namespace: &str) -> Result<Vec<Service>, QueryError> {
        self.get("services", Scope::Namespace(namespace), None)
    }

    fn pods(&self, namespace: &str, selector: &LabelSelector) -> Result<Vec<Pod>, QueryError> {
        self.get("pods", Scope::Namespace(namespace), Some(selector))
    }

    fn ingresses(&self, namespace: &str) -> Result<Vec<Ingress>, QueryError> {
        self.get("ingresses", Scope::Namespace(namespace), None)
    }

    fn service_exists(&self, namespace: &str, name: &str) -> Result<bool, QueryError> {
        // With `--ignore-not-found` a missing service is a successful call that prints nothing.
        let output = process::args!(
            self.kubectl(),
            "get",
            "service",
            "--namespace",
            namespace,
            "--ignore-not-found",
            "--output=name",
            name,
        )
        .output()?;

        Ok(!output.stdout.trim_ascii().is_empty())
    }

    fn stateful_sets(&self, namespace: &str) -> Result<Vec<StatefulSet>, QueryError> {
        self.get("statefulsets", Scope::Namespace(namespace), None)
    }

    fn deployments(&self, namespace: Option<&str>) -> Result<Vec<Deployment>, QueryError> {
        let scope = namespace.map_or(Scope::AllNamespaces, Scope::Namespace);
        self.get("deployments", scope, None)
    }

    fn secrets(&self) -> Result<Vec<Secret>, QueryError> {
        self.get("secrets", Scope::AllNamespaces, None)
    }

    fn certificates(&self) -> Result<Vec<Certificate>, QueryError> {
        self.get("certificates", Scope::AllNamespaces, None)
    }

    fn delete(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<(), DeletionError> {
        process::args!(
            self.kubectl(),
            "delete",
            kind.kubectl_name(),
            "--namespace",
            namespace,
            name,
        )
        .output()
        .map(drop)
        .map_err(|source| DeletionError {
            kind,
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            source,
        })
    }
}

/// Annotations read from cluster resources.
pub mod annotation {
    /// Unix timestamp (seconds) of the CI build that produced a QA resource.
    pub const BUILD_TIMESTAMP: &str = "buildTimestamp";

    /// When `"true"`, the cluster autoscaler may evict the pods of a deployment while scaling down.
    pub const SAFE_TO_EVICT: &str = "cluster-autoscaler.kubernetes.io/safe-to-evict";
}

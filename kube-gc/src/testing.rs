//! In-memory [`ClusterApi`] for tests.

use std::{cell::RefCell, num::NonZeroI32};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    cluster::{ClusterApi, DeletionError, QueryError},
    kubectl::*,
    process,
    resource::ResourceKind,
};

/// Holds resources as the JSON `kubectl` would print for them. Every object needs a `kind` and `metadata.name`;
/// namespaced objects also need `metadata.namespace`.
#[derive(Default)]
pub struct FakeCluster {
    objects: RefCell<Vec<Value>>,
    failing_queries: Vec<&'static str>,
    failing_deletes: Vec<String>,
    failing_existence_checks: bool,
    deleted: RefCell<Vec<String>>,
    queries: RefCell<Vec<String>>,
}

impl FakeCluster {
    pub fn with(self, object: Value) -> Self {
        self.objects.borrow_mut().push(object);
        self
    }

    /// Listing resources of `kind` fails. `Pod` covers selector lookups.
    pub fn failing_query(mut self, kind: &'static str) -> Self {
        self.failing_queries.push(kind);
        self
    }

    /// Deleting any resource called `name` fails.
    pub fn failing_delete(mut self, name: &str) -> Self {
        self.failing_deletes.push(name.to_owned());
        self
    }

    /// Checking whether a service exists fails, while listing services still works.
    pub fn failing_existence_checks(mut self) -> Self {
        self.failing_existence_checks = true;
        self
    }

    /// Deleted resources as `Kind namespace/name`, in order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.borrow().clone()
    }

    /// Issued queries as `kind namespace`, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }

    fn list<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        namespace: Option<&str>,
    ) -> Result<Vec<T>, QueryError> {
        self.queries
            .borrow_mut()
            .push(format!("{kind} {}", namespace.unwrap_or("*")));

        if self.failing_queries.contains(&kind) {
            return Err(failure("get", kind).into());
        }

        self.objects
            .borrow()
            .iter()
            .filter(|object| object["kind"] == kind)
            .filter(|object| namespace.map_or(true, |namespace| object["metadata"]["namespace"] == namespace))
            .map(|object| {
                serde_json::from_value(object.clone()).map_err(|source| QueryError::Decode {
                    command: format!("get {kind}"),
                    source,
                })
            })
            .collect()
    }
}

fn failure(verb: &str, what: &str) -> process::Error {
    process::Error {
        command: process::command!("kubectl", verb, what),
        kind: process::ErrorKind::NonZeroExitStatus {
            code: NonZeroI32::new(1),
            stderr: format!("fake failure for {verb} {what}"),
        },
    }
}

impl ClusterApi for FakeCluster {
    fn namespaces(&self) -> Result<Vec<Namespace>, QueryError> {
        self.list("Namespace", None)
    }

    fn replica_sets(&self, namespace: &str) -> Result<Vec<ReplicaSet>, QueryError> {
        self.list("ReplicaSet", Some(namespace))
    }

    fn cron_jobs(&self, namespace: &str) -> Result<Vec<CronJob>, QueryError> {
        self.list("CronJob", Some(namespace))
    }

    fn horizontal_pod_autoscalers(
        &self,
        namespace: &str,
    ) -> Result<Vec<HorizontalPodAutoscaler>, QueryError> {
        self.list("HorizontalPodAutoscaler", Some(namespace))
    }

    fn services(&self, namespace: &str) -> Result<Vec<Service>, QueryError> {
        self.list("Service", Some(namespace))
    }

    fn pods(&self, namespace: &str, selector: &LabelSelector) -> Result<Vec<Pod>, QueryError> {
        Ok(self
            .list::<Pod>("Pod", Some(namespace))?
            .into_iter()
            .filter(|pod| selector.matches(&pod.metadata.labels))
            .collect())
    }

    fn ingresses(&self, namespace: &str) -> Result<Vec<Ingress>, QueryError> {
        self.list("Ingress", Some(namespace))
    }

    fn service_exists(&self, namespace: &str, name: &str) -> Result<bool, QueryError> {
        if self.failing_existence_checks {
            return Err(failure("get service", name).into());
        }

        Ok(self
            .list::<Service>("Service", Some(namespace))?
            .iter()
            .any(|service| service.metadata.name == name))
    }

    fn stateful_sets(&self, namespace: &str) -> Result<Vec<StatefulSet>, QueryError> {
        self.list("StatefulSet", Some(namespace))
    }

    fn deployments(&self, namespace: Option<&str>) -> Result<Vec<Deployment>, QueryError> {
        self.list("Deployment", namespace)
    }

    fn secrets(&self) -> Result<Vec<Secret>, QueryError> {
        self.list("Secret", None)
    }

    fn certificates(&self) -> Result<Vec<Certificate>, QueryError> {
        self.list("Certificate", None)
    }

    fn delete(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<(), DeletionError> {
        let error = |verb| DeletionError {
            kind,
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            source: failure(verb, name),
        };

        if self.failing_deletes.iter().any(|failing| failing == name) {
            return Err(error("delete"));
        }

        let mut objects = self.objects.borrow_mut();
        let position = objects
            .iter()
            .position(|object| {
                object["kind"] == kind.as_str()
                    && object["metadata"]["namespace"] == namespace
                    && object["metadata"]["name"] == name
            })
            .ok_or_else(|| error("delete missing"))?;
        objects.remove(position);

        self.deleted
            .borrow_mut()
            .push(format!("{kind} {namespace}/{name}"));
        Ok(())
    }
}

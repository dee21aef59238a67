use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use crate::kubectl::ResourceMetadata;

/// The kinds of resources that can be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Deployment,
    CronJob,
    HorizontalPodAutoscaler,
    Service,
    Ingress,
    StatefulSet,
    Certificate,
}

impl ResourceKind {
    /// The resource type as accepted by `kubectl delete`.
    pub const fn kubectl_name(&self) -> &'static str {
        match self {
            ResourceKind::Deployment => "deployment",
            ResourceKind::CronJob => "cronjob",
            ResourceKind::HorizontalPodAutoscaler => "horizontalpodautoscaler",
            ResourceKind::Service => "service",
            ResourceKind::Ingress => "ingress",
            ResourceKind::StatefulSet => "statefulset",
            ResourceKind::Certificate => "certificate",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Deployment => "Deployment",
            ResourceKind::CronJob => "CronJob",
            ResourceKind::HorizontalPodAutoscaler => "HorizontalPodAutoscaler",
            ResourceKind::Service => "Service",
            ResourceKind::Ingress => "Ingress",
            ResourceKind::StatefulSet => "StatefulSet",
            ResourceKind::Certificate => "Certificate",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource as observed in a snapshot. Identity is `(kind, namespace, name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
    pub created_at: Option<time::OffsetDateTime>,
    pub annotations: HashMap<String, String>,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, metadata: &ResourceMetadata) -> Self {
        Self {
            kind,
            namespace: metadata.namespace.clone(),
            name: metadata.name.clone(),
            created_at: metadata.creation_timestamp,
            annotations: metadata.annotations.clone(),
        }
    }

    pub fn identity(&self) -> Identity<'_> {
        Identity {
            kind: self.kind,
            namespace: &self.namespace,
            name: &self.name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity<'a> {
    pub kind: ResourceKind,
    pub namespace: &'a str,
    pub name: &'a str,
}

impl fmt::Display for Identity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// A resource that a classifier decided should be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionCandidate {
    pub resource: ResourceRef,
    pub reason: String,
    pub observed_at: time::OffsetDateTime,
}

impl DeletionCandidate {
    pub fn new(
        resource: ResourceRef,
        reason: impl Into<String>,
        observed_at: time::OffsetDateTime,
    ) -> Self {
        Self {
            resource,
            reason: reason.into(),
            observed_at,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.resource.kind
    }

    pub fn namespace(&self) -> &str {
        &self.resource.namespace
    }

    pub fn name(&self) -> &str {
        &self.resource.name
    }

    pub fn identity(&self) -> Identity<'_> {
        self.resource.identity()
    }
}

/// Ordered, append only collection of candidates in which every identity appears at most once.
#[derive(Debug, Default)]
pub struct CandidateSet {
    seen: HashSet<(ResourceKind, String, String)>,
    candidates: Vec<DeletionCandidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the candidate unless one with the same identity is already present. Returns whether it was added.
    pub fn push(&mut self, candidate: DeletionCandidate) -> bool {
        let key = (
            candidate.kind(),
            candidate.namespace().to_owned(),
            candidate.name().to_owned(),
        );
        if self.seen.insert(key) {
            self.candidates.push(candidate);
            true
        } else {
            false
        }
    }

    pub fn into_vec(self) -> Vec<DeletionCandidate> {
        self.candidates
    }
}

impl Extend<DeletionCandidate> for CandidateSet {
    fn extend<T: IntoIterator<Item = DeletionCandidate>>(&mut self, iter: T) {
        for candidate in iter {
            self.push(candidate);
        }
    }
}

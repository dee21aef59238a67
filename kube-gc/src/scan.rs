//! Runs every classifier over the selected namespaces and collects the candidates. Nothing is deleted here.

use log::{debug, info};
use time::OffsetDateTime;

use crate::{
    classify,
    cluster::{ClusterApi, QueryError},
    resource::{CandidateSet, DeletionCandidate},
};

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Resources created or built before this moment are stale.
    pub cutoff: OffsetDateTime,

    /// Stamped on every candidate.
    pub observed_at: OffsetDateTime,

    /// Also consider memcached and redis stateful sets in namespaces without deployments.
    pub stateful_sets: bool,
}

/// The candidates found in a single namespace.
#[derive(Debug)]
pub struct NamespaceScan {
    pub namespace: String,
    pub candidates: Vec<DeletionCandidate>,
}

/// Queries the resources of one namespace and classifies them. Fails on the first query that fails.
pub fn scan_namespace(
    cluster: &impl ClusterApi,
    namespace: &str,
    options: &ScanOptions,
) -> Result<NamespaceScan, QueryError> {
    let ScanOptions {
        cutoff,
        observed_at,
        stateful_sets,
    } = *options;

    let mut candidates = Vec::new();
    let mut report = |what: &str, found: Vec<DeletionCandidate>| {
        debug!("{namespace}: {} {what} to be removed", found.len());
        candidates.extend(found);
    };

    let replica_sets = cluster.replica_sets(namespace)?;
    report(
        "deployments",
        classify::stale_deployments(&replica_sets, cutoff, observed_at),
    );

    let cron_jobs = cluster.cron_jobs(namespace)?;
    report(
        "cron jobs",
        classify::stale_cron_jobs(&cron_jobs, cutoff, observed_at),
    );

    let autoscalers = cluster.horizontal_pod_autoscalers(namespace)?;
    report(
        "horizontal pod autoscalers",
        classify::idle_autoscalers(&autoscalers, observed_at),
    );

    let services = cluster.services(namespace)?;
    report(
        "services",
        classify::orphaned_services(cluster, namespace, &services, observed_at)?,
    );

    let ingresses = cluster.ingresses(namespace)?;
    report(
        "ingresses",
        classify::orphaned_ingresses(cluster, namespace, &ingresses, observed_at)?,
    );

    if stateful_sets {
        let stateful_sets = cluster.stateful_sets(namespace)?;
        let deployments = cluster.deployments(Some(namespace))?;
        report(
            "stateful sets",
            classify::abandoned_stateful_sets(&stateful_sets, deployments.len(), observed_at),
        );
    }

    Ok(NamespaceScan {
        namespace: namespace.to_owned(),
        candidates,
    })
}

/// Scans `namespaces` one after the other and merges their candidates in scan order. A resource is listed at most once
/// even when several replica sets point at the same deployment.
pub fn scan<N: AsRef<str>>(
    cluster: &impl ClusterApi,
    namespaces: &[N],
    options: &ScanOptions,
) -> Result<Vec<DeletionCandidate>, QueryError> {
    let mut set = CandidateSet::new();
    for namespace in namespaces {
        let NamespaceScan {
            namespace,
            candidates,
        } = scan_namespace(cluster, namespace.as_ref(), options)?;
        info!("{namespace}: found {} items to be removed", candidates.len());
        set.extend(candidates);
    }
    Ok(set.into_vec())
}

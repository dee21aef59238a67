use log::warn;
use time::OffsetDateTime;

use crate::{
    kubectl::{annotation, CronJob, HorizontalPodAutoscaler, OwnerReference, ReplicaSet, StatefulSet},
    resource::{DeletionCandidate, ResourceKind, ResourceRef},
};

/// Stateful sets that only back QA deployments and are useless once the namespace has no deployments left.
pub const DISPOSABLE_STATEFUL_SETS: [&str; 2] = ["memcached", "redis"];

const DEPLOYMENT_KIND: &str = "Deployment";

/// Returns the deployment owning `replica_set` if that deployment is stale.
///
/// Replica sets without replicas have been superseded by a newer rollout and say nothing about the deployment, so they
/// are ignored. A missing creation timestamp never counts as old.
pub fn stale_deployment_owner(
    replica_set: &ReplicaSet,
    cutoff: OffsetDateTime,
) -> Option<&OwnerReference> {
    if replica_set.status.replicas == 0 {
        return None;
    }

    let owner = replica_set.metadata.controller()?;
    if owner.kind != DEPLOYMENT_KIND {
        return None;
    }

    let created = replica_set.metadata.creation_timestamp?;
    (created < cutoff).then_some(owner)
}

/// Candidates for every deployment whose live replica set was created before `cutoff`. The candidate names the owning
/// deployment, not the replica set.
pub fn stale_deployments(
    replica_sets: &[ReplicaSet],
    cutoff: OffsetDateTime,
    observed_at: OffsetDateTime,
) -> Vec<DeletionCandidate> {
    replica_sets
        .iter()
        .filter_map(|replica_set| {
            let owner = stale_deployment_owner(replica_set, cutoff)?;
            let metadata = &replica_set.metadata;
            Some(DeletionCandidate::new(
                ResourceRef {
                    kind: ResourceKind::Deployment,
                    namespace: metadata.namespace.clone(),
                    name: owner.name.clone(),
                    created_at: metadata.creation_timestamp,
                    annotations: Default::default(),
                },
                format!(
                    "replica set {} with {} replicas was created before the cutoff",
                    metadata.name, replica_set.status.replicas
                ),
                observed_at,
            ))
        })
        .collect()
}

/// Parses the `buildTimestamp` annotation. Returns `None` when it is absent or not a unix timestamp in seconds.
pub fn build_timestamp(cron_job: &CronJob) -> Option<OffsetDateTime> {
    let value = cron_job
        .metadata
        .annotations
        .get(annotation::BUILD_TIMESTAMP)?;

    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok())
        .or_else(|| {
            warn!(
                "ignoring cron job {}/{} with invalid {} annotation {value:?}",
                cron_job.metadata.namespace,
                cron_job.metadata.name,
                annotation::BUILD_TIMESTAMP
            );
            None
        })
}

/// Candidates for every cron job built before `cutoff`. Cron jobs without a build timestamp are never stale, their
/// age says nothing about the build they run.
pub fn stale_cron_jobs(
    cron_jobs: &[CronJob],
    cutoff: OffsetDateTime,
    observed_at: OffsetDateTime,
) -> Vec<DeletionCandidate> {
    cron_jobs
        .iter()
        .filter_map(|cron_job| {
            let built = build_timestamp(cron_job).filter(|&built| built < cutoff)?;
            let mut resource = ResourceRef::new(ResourceKind::CronJob, &cron_job.metadata);
            resource.created_at = Some(built);
            Some(DeletionCandidate::new(
                resource,
                "built before the cutoff",
                observed_at,
            ))
        })
        .collect()
}

/// Candidates for every autoscaler that currently manages no replicas, regardless of age.
pub fn idle_autoscalers(
    autoscalers: &[HorizontalPodAutoscaler],
    observed_at: OffsetDateTime,
) -> Vec<DeletionCandidate> {
    autoscalers
        .iter()
        .filter(|autoscaler| autoscaler.status.current_replicas == 0)
        .map(|autoscaler| {
            DeletionCandidate::new(
                ResourceRef::new(ResourceKind::HorizontalPodAutoscaler, &autoscaler.metadata),
                "scales no replicas",
                observed_at,
            )
        })
        .collect()
}

/// Candidates for the memcached and redis stateful sets of a namespace that has no deployments. `deployment_count`
/// must come from the same pass as `stateful_sets`.
pub fn abandoned_stateful_sets(
    stateful_sets: &[StatefulSet],
    deployment_count: usize,
    observed_at: OffsetDateTime,
) -> Vec<DeletionCandidate> {
    if deployment_count > 0 {
        return Vec::new();
    }

    stateful_sets
        .iter()
        .filter(|stateful_set| DISPOSABLE_STATEFUL_SETS.contains(&stateful_set.metadata.name.as_str()))
        .map(|stateful_set| {
            DeletionCandidate::new(
                ResourceRef::new(ResourceKind::StatefulSet, &stateful_set.metadata),
                "namespace has no deployments left",
                observed_at,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::{macros::datetime, Duration};

    use super::*;

    const NOW: OffsetDateTime = datetime!(2024-06-01 12:00 UTC);

    fn cutoff() -> OffsetDateTime {
        NOW - Duration::days(30)
    }

    fn replica_set(created: Option<&str>, replicas: u32, owner_kind: &str) -> ReplicaSet {
        let mut metadata = json!({
            "name": "web-5d9c",
            "namespace": "shop-qa",
            "ownerReferences": [{ "kind": owner_kind, "name": "web" }],
        });
        if let Some(created) = created {
            metadata["creationTimestamp"] = json!(created);
        }
        serde_json::from_value(json!({
            "metadata": metadata,
            "status": { "replicas": replicas },
        }))
        .unwrap()
    }

    fn cron_job(build_timestamp: Option<&str>) -> CronJob {
        let mut metadata = json!({
            "name": "nightly",
            "namespace": "shop-qa",
            "creationTimestamp": "2020-01-01T00:00:00Z",
        });
        if let Some(value) = build_timestamp {
            metadata["annotations"] = json!({ "buildTimestamp": value });
        }
        serde_json::from_value(json!({ "metadata": metadata })).unwrap()
    }

    #[test]
    fn old_replica_set_names_its_deployment() {
        let forty_days_ago = "2024-04-22T12:00:00Z";
        let candidates = stale_deployments(
            &[replica_set(Some(forty_days_ago), 3, "Deployment")],
            cutoff(),
            NOW,
        );

        assert_eq!(candidates.len(), 1);
        let candidate = &candidates[0];
        assert_eq!(candidate.kind(), ResourceKind::Deployment);
        assert_eq!(candidate.namespace(), "shop-qa");
        assert_eq!(candidate.name(), "web");
        assert_eq!(candidate.observed_at, NOW);
    }

    #[test]
    fn replica_set_without_replicas_is_never_stale() {
        let ancient = replica_set(Some("2001-01-01T00:00:00Z"), 0, "Deployment");
        assert_eq!(stale_deployment_owner(&ancient, cutoff()), None);
        assert!(stale_deployments(&[ancient], cutoff(), NOW).is_empty());
    }

    #[test]
    fn replica_set_must_be_owned_by_a_deployment() {
        let replica_set = replica_set(Some("2001-01-01T00:00:00Z"), 2, "Rollout");
        assert_eq!(stale_deployment_owner(&replica_set, cutoff()), None);
    }

    #[test]
    fn unknown_creation_time_is_fresh() {
        assert_eq!(stale_deployment_owner(&replica_set(None, 2, "Deployment"), cutoff()), None);
        assert_eq!(
            stale_deployment_owner(&replica_set(Some("yesterday-ish"), 2, "Deployment"), cutoff()),
            None
        );
    }

    #[test]
    fn recent_replica_set_is_kept() {
        let replica_set = replica_set(Some("2024-05-25T00:00:00Z"), 1, "Deployment");
        assert_eq!(stale_deployment_owner(&replica_set, cutoff()), None);
    }

    #[test]
    fn cron_job_without_build_timestamp_is_never_stale() {
        assert!(stale_cron_jobs(&[cron_job(None)], cutoff(), NOW).is_empty());
        assert!(stale_cron_jobs(&[cron_job(Some("not a number"))], cutoff(), NOW).is_empty());
    }

    #[test]
    fn cron_job_is_judged_by_build_timestamp() {
        let old = (cutoff() - Duration::seconds(1)).unix_timestamp().to_string();
        let new = (cutoff() + Duration::seconds(1)).unix_timestamp().to_string();

        let candidates = stale_cron_jobs(&[cron_job(Some(&old)), cron_job(Some(&new))], cutoff(), NOW);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind(), ResourceKind::CronJob);
        assert_eq!(candidates[0].name(), "nightly");
        assert_eq!(
            candidates[0].resource.created_at,
            Some(cutoff() - Duration::seconds(1))
        );
    }

    #[test]
    fn only_idle_autoscalers_are_candidates() {
        let autoscalers: Vec<HorizontalPodAutoscaler> = serde_json::from_value(json!([
            { "metadata": { "name": "idle", "namespace": "shop-qa" }, "status": { "currentReplicas": 0 } },
            { "metadata": { "name": "omitted", "namespace": "shop-qa" }, "status": {} },
            {
                "metadata": { "name": "busy", "namespace": "shop-qa", "creationTimestamp": "2001-01-01T00:00:00Z" },
                "status": { "currentReplicas": 2 },
            },
        ]))
        .unwrap();

        let names = idle_autoscalers(&autoscalers, NOW)
            .into_iter()
            .map(|candidate| candidate.resource.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["idle", "omitted"]);
    }

    #[test]
    fn stateful_sets_go_only_with_the_last_deployment() {
        let stateful_sets: Vec<StatefulSet> = serde_json::from_value(json!([
            { "metadata": { "name": "memcached", "namespace": "shop-qa" } },
            { "metadata": { "name": "redis", "namespace": "shop-qa" } },
            { "metadata": { "name": "redis-cache", "namespace": "shop-qa" } },
            { "metadata": { "name": "postgres", "namespace": "shop-qa" } },
        ]))
        .unwrap();

        assert!(abandoned_stateful_sets(&stateful_sets, 1, NOW).is_empty());

        let names = abandoned_stateful_sets(&stateful_sets, 0, NOW)
            .into_iter()
            .map(|candidate| candidate.resource.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["memcached", "redis"]);
    }
}

//! Deletes candidates one after the other and stops at the first failure.

use std::fmt;

use log::info;

use crate::{
    cluster::{ClusterApi, DeletionError},
    resource::DeletionCandidate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Deleted,
    Failed,
    /// Not attempted because an earlier deletion failed.
    Skipped,
}

impl Outcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Outcome::Deleted => "deleted",
            Outcome::Failed => "failed",
            Outcome::Skipped => "skipped",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deletion failed. `outcomes` has one entry per candidate, in candidate order.
#[derive(Debug)]
pub struct ExecutionAborted {
    pub outcomes: Vec<Outcome>,
    pub source: DeletionError,
}

impl fmt::Display for ExecutionAborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} remaining deletions were skipped)",
            self.source,
            self.skipped()
        )
    }
}

impl std::error::Error for ExecutionAborted {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl ExecutionAborted {
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|&&outcome| outcome == Outcome::Skipped)
            .count()
    }
}

/// Deletes a single candidate.
pub fn delete(cluster: &impl ClusterApi, candidate: &DeletionCandidate) -> Result<(), DeletionError> {
    cluster.delete(candidate.kind(), candidate.namespace(), candidate.name())
}

/// Deletes `candidates` in order. The first failure stops the run; later candidates are not attempted.
pub fn execute(
    cluster: &impl ClusterApi,
    candidates: &[DeletionCandidate],
) -> Result<Vec<Outcome>, ExecutionAborted> {
    let mut outcomes = Vec::with_capacity(candidates.len());

    for (index, candidate) in candidates.iter().enumerate() {
        if let Err(source) = delete(cluster, candidate) {
            outcomes.push(Outcome::Failed);
            outcomes.resize(candidates.len(), Outcome::Skipped);
            return Err(ExecutionAborted { outcomes, source });
        }

        outcomes.push(Outcome::Deleted);
        info!(
            "[{}/{}] removed {}",
            index + 1,
            candidates.len(),
            candidate.identity()
        );
    }

    Ok(outcomes)
}

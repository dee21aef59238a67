//! Decides which resources of a namespace snapshot should be deleted.
//!
//! The staleness rules only look at the snapshot they are given. The orphan rules additionally query the cluster for
//! the resources a service or ingress depends on.

mod orphan;
mod staleness;

pub use orphan::*;
pub use staleness::*;

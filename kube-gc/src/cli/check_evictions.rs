use clap::Args;
use log::info;

use super::common;
use crate::{cluster::ClusterApi, eviction, namespace, Result};

#[derive(Debug, Args)]
pub struct CheckEvictionsArgs {
    /// Deployments in this namespace are not checked. May be repeated, replaces the defaults.
    #[arg(
        long = "exclude",
        value_name = "NAMESPACE",
        default_values = namespace::PROTECTED_NAMESPACES
    )]
    exclude: Vec<String>,
}

pub fn check_evictions(cluster: &impl ClusterApi, args: CheckEvictionsArgs) -> Result<()> {
    info!("getting all deployments");
    let deployments = cluster.deployments(None)?;

    let missing = eviction::missing_safe_to_evict(&deployments, &args.exclude);

    let mut table = common::table(["Name", "Namespace"]);
    for resource in &missing {
        table.add_row([&resource.name, &resource.namespace]);
    }
    println!("{table}");

    info!(
        "{} of {} deployments can not be evicted by the cluster autoscaler",
        missing.len(),
        deployments.len()
    );

    Ok(())
}

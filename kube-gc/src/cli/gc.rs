use clap::Args;
use log::info;

use super::common;
use crate::{
    cluster::ClusterApi,
    cutoff::Days,
    namespace,
    scan::{self, ScanOptions},
    time_ext, Result,
};

#[derive(Debug, Args)]
pub struct GcArgs {
    /// Remove resources built more than this many days ago, e.g. `30` or `30d`.
    days: Days,

    /// Only namespaces whose name ends with this suffix are scanned.
    #[arg(long = "suffix", default_value = namespace::QA_SUFFIX)]
    suffix: String,

    /// Never scan this namespace. May be repeated.
    #[arg(long = "exclude", value_name = "NAMESPACE")]
    exclude: Vec<String>,

    /// Also remove memcached and redis stateful sets from namespaces that have no deployments left.
    #[arg(long = "stateful-sets")]
    stateful_sets: bool,

    /// Show what would be removed without deleting anything.
    #[arg(long = "dry-run")]
    dry_run: bool,
}

pub fn gc(cluster: &impl ClusterApi, args: GcArgs) -> Result<()> {
    let now = time::OffsetDateTime::now_utc();
    let cutoff = args
        .days
        .before(now)
        .ok_or_else(|| format!("{} before now is out of range", args.days))?;

    info!(
        "removing resources from namespaces ending in {:?} built before {}",
        args.suffix,
        time_ext::format_local(cutoff)?
    );

    let all = cluster
        .namespaces()?
        .into_iter()
        .map(|namespace| namespace.metadata.name)
        .collect::<Vec<_>>();
    let namespaces = namespace::select_namespaces(&all, &args.suffix, &args.exclude);

    let mut table = common::table([format!(
        "Found {} namespaces to check for removable resources",
        namespaces.len()
    )]);
    for namespace in &namespaces {
        table.add_row([namespace]);
    }
    println!("{table}");

    let options = ScanOptions {
        cutoff,
        observed_at: now,
        stateful_sets: args.stateful_sets,
    };
    let candidates = scan::scan(cluster, &namespaces, &options)?;

    common::remove(cluster, &candidates, args.dry_run)
}

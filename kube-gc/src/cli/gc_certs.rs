use clap::Args;
use log::{info, warn};

use super::common;
use crate::{
    certificate::{self, CertificateRecord, Expiry, Openssl},
    cluster::ClusterApi,
    Result,
};

#[derive(Debug, Args)]
pub struct GcCertsArgs {
    /// Show which certificates would be removed without deleting anything.
    #[arg(long = "dry-run")]
    dry_run: bool,
}

fn expiry_cell(expiry: &Expiry) -> Result<String> {
    Ok(match expiry {
        Expiry::NotIssued => "not issued".to_owned(),
        Expiry::Valid(at) => common::format_date(Some(*at))?,
        Expiry::Expired(at) => format!("{} EXPIRED!", common::format_date(Some(*at))?),
        Expiry::Unreadable(_) => "unreadable".to_owned(),
    })
}

fn record_row(record: &CertificateRecord) -> Result<Vec<String>> {
    Ok(vec![
        record.name.clone(),
        record.namespace.clone(),
        record.domains.join(" "),
        if record.exists { "✔" } else { "✖" }.to_owned(),
        common::format_date(record.created_at)?,
        expiry_cell(&record.expiry)?,
        record.issuance_method.to_string(),
        record.secret_name.clone().unwrap_or_default(),
    ])
}

pub fn gc_certs(cluster: &impl ClusterApi, args: GcCertsArgs) -> Result<()> {
    let now = time::OffsetDateTime::now_utc();

    info!("auditing all certificates against their secrets");
    let audit = certificate::audit_cluster(cluster, &Openssl, now)?;

    let mut table = common::table([
        "Name",
        "Namespace",
        "Domains",
        "Status",
        "Order date",
        "Expiry date",
        "Method",
        "Secret name",
    ]);
    for record in &audit.records {
        table.add_row(record_row(record)?);
    }
    println!("{table}");

    let ambiguous = audit.ambiguities().count();
    if ambiguous > 0 {
        warn!("{ambiguous} certificates have a secret that could not be read, they are left alone");
    }

    info!("total certificates: {}", audit.records.len());
    info!("certificates never issued: {}", audit.candidates.len());

    common::remove(cluster, &audit.candidates, args.dry_run)
}

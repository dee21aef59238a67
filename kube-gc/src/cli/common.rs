use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use log::info;

use crate::{
    cluster::ClusterApi,
    executor::{self, Outcome},
    resource::DeletionCandidate,
    time_ext, Result,
};

pub fn table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .into_iter()
                .map(|name| Cell::new(name.into()).add_attribute(Attribute::Bold)),
        );
    table
}

pub fn format_date(value: Option<time::OffsetDateTime>) -> Result<String> {
    Ok(match value {
        Some(value) => time_ext::format_local(value)?,
        None => "unknown".to_owned(),
    })
}

/// Renders candidates, with a trailing outcome column when `outcomes` is given.
pub fn candidate_table(candidates: &[DeletionCandidate], outcomes: Option<&[Outcome]>) -> Result<Table> {
    let mut header = vec!["Namespace", "Name", "Created at", "Kind", "Reason"];
    if outcomes.is_some() {
        header.push("Outcome");
    }

    let mut table = table(header);
    for (index, candidate) in candidates.iter().enumerate() {
        let mut row = vec![
            candidate.namespace().to_owned(),
            candidate.name().to_owned(),
            format_date(candidate.resource.created_at)?,
            candidate.kind().to_string(),
            candidate.reason.clone(),
        ];
        if let Some(outcome) = outcomes.and_then(|outcomes| outcomes.get(index)) {
            row.push(outcome.to_string());
        }
        table.add_row(row);
    }
    Ok(table)
}

/// Deletes `candidates` unless `dry_run` is set and prints what happened.
pub fn remove(cluster: &impl ClusterApi, candidates: &[DeletionCandidate], dry_run: bool) -> Result<()> {
    if candidates.is_empty() {
        info!("nothing to remove");
        return Ok(());
    }

    println!("{}", candidate_table(candidates, None)?);

    if dry_run {
        info!("dry run, {} resources left in place", candidates.len());
        return Ok(());
    }

    match executor::execute(cluster, candidates) {
        Ok(outcomes) => {
            println!("{}", candidate_table(candidates, Some(&outcomes))?);
            info!("successfully removed {} resources", outcomes.len());
            Ok(())
        }
        Err(aborted) => {
            println!("{}", candidate_table(candidates, Some(&aborted.outcomes))?);
            Err(aborted.into())
        }
    }
}

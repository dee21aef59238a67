mod check_evictions;
mod common;
mod gc;
mod gc_certs;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use constcat::concat;

use crate::{kubectl::annotation, kubectl::Kubectl, Result};

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the kubeconfig used to reach the cluster. When omitted, kubectl resolves it on its own.
    #[arg(long = "kubeconfig", global = true)]
    kubeconfig: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Remove stale QA deployments, cron jobs, autoscalers, services and ingresses
    #[command(name = "gc", arg_required_else_help = true)]
    Gc(gc::GcArgs),

    /// Remove certificates that were never issued
    #[command(name = "gc-certs")]
    GcCerts(gc_certs::GcCertsArgs),

    #[command(
        name = "check-evictions",
        about = concat!("List deployments without the `", annotation::SAFE_TO_EVICT, "` annotation")
    )]
    CheckEvictions(check_evictions::CheckEvictionsArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let kubectl = Kubectl::new(self.kubeconfig);

        match self.command {
            Commands::Gc(args) => {
                gc::gc(&kubectl, args)?;
            }
            Commands::GcCerts(args) => {
                gc_certs::gc_certs(&kubectl, args)?;
            }
            Commands::CheckEvictions(args) => {
                check_evictions::check_evictions(&kubectl, args)?;
            }
        }

        Ok(())
    }
}

//! idc-pipeline
//!
//! Driver binary for the Identity Center pipeline: validate templates,
//! reconcile permission sets, expand assignments. Each subcommand is one
//! pipeline stage; exit code 0 means the stage completed cleanly.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(
    name = "idc-pipeline",
    version,
    about = "Declarative pipeline for AWS IAM Identity Center"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reconcile live permission sets against the repository templates.
    PermissionSets {
        /// Directory of permission set templates.
        #[arg(long = "ps-folder", default_value = "templates/permissionsets")]
        ps_folder: PathBuf,
    },
    /// Resolve repository assignments into assignments.json.
    Assignments {
        /// Role to assume in the organization management account.
        #[arg(long = "org_role")]
        org_role: String,
        /// Management account ID, excluded from every resolved target.
        #[arg(long = "mgmt_account")]
        mgmt_account: String,
        /// Directory of assignment templates.
        #[arg(long = "assignments-folder", default_value = "templates/assignments")]
        assignments_folder: PathBuf,
    },
    /// Validate repository templates without touching live state.
    Validate {
        /// Directory of permission set templates.
        #[arg(long = "ps-folder")]
        ps_folder: PathBuf,
        /// Directory of assignment templates.
        #[arg(long = "assignments-folder")]
        assignments_folder: PathBuf,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::PermissionSets { ps_folder } => commands::permission_sets(&ps_folder).await,
        Command::Assignments {
            org_role,
            mgmt_account,
            assignments_folder,
        } => commands::assignments(&org_role, &mgmt_account, &assignments_folder).await,
        Command::Validate {
            ps_folder,
            assignments_folder,
        } => commands::validate(&ps_folder, &assignments_folder).await,
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .init();
}

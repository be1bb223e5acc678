//! WARDEN: access-control list CLI
//!
//! Grants, revokes, and checks permissions on resources held in a local
//! JSON record store, journaling every committed change.
//!
//! Usage:
//!   warden grant  --resource etaoin --mode read --agent u1
//!   warden grant  --resource etaoin --mode edit --group public
//!   warden check  --resource etaoin --mode read --agent u1
//!   warden revoke --resource etaoin --mode read --agent u1
//!   warden show   --resource etaoin
//!   warden apply  grants.toml
//!   warden journal

mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use warden_contracts::{
    access_control::ResourceId,
    agent::{Agent, Group, Principal},
    error::AclResult,
    permission::Mode,
};
use warden_core::AccessControlList;
use warden_journal::InMemoryJournal;
use warden_policy::GrantManifest;
use warden_store::InMemoryStore;

use config::Config;

// ── CLI definition ────────────────────────────────────────────────────────────

/// WARDEN: resource access-control lists.
#[derive(Parser)]
#[command(
    name = "warden",
    version,
    about = "Manage per-resource access-control lists",
    long_about = "Grants, revokes, and checks discover/read/edit permissions on resources,\n\
                  saving only when something changed and journaling every commit."
)]
struct Cli {
    /// Config file (default: ./warden.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Record store snapshot; overrides the config file.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Change journal file; overrides the config file.
    #[arg(long, global = true)]
    journal: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Grant a mode on a resource to an agent or group.
    Grant(Target),
    /// Revoke a mode on a resource from an agent or group.
    Revoke(Target),
    /// Check whether an agent or group holds a mode. Exits 2 when denied.
    Check(Target),
    /// List every permission on a resource.
    Show {
        #[arg(short, long)]
        resource: String,
    },
    /// Apply a TOML grant manifest.
    Apply {
        /// Path to the manifest.
        manifest: PathBuf,
    },
    /// Print the change journal and verify its hash chain.
    Journal,
}

#[derive(Args)]
struct Target {
    #[arg(short, long)]
    resource: String,

    /// discover, read, or edit.
    #[arg(short, long)]
    mode: Mode,

    #[command(flatten)]
    principal: PrincipalArgs,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct PrincipalArgs {
    /// Individual agent name.
    #[arg(long)]
    agent: Option<String>,

    /// Group name, without the "group/" prefix.
    #[arg(long)]
    group: Option<String>,
}

impl PrincipalArgs {
    fn principal(&self) -> Principal {
        match (&self.agent, &self.group) {
            (_, Some(group)) => Group::new(group.as_str()).into(),
            (Some(agent), None) => Agent::new(agent.as_str()).into(),
            (None, None) => unreachable!("clap requires one of --agent or --group"),
        }
    }
}

// ── Workspace ─────────────────────────────────────────────────────────────────

/// The store and journal a command operates on, with their file paths.
struct Workspace {
    store: InMemoryStore,
    store_path: PathBuf,
    journal: InMemoryJournal,
    journal_path: PathBuf,
}

impl Workspace {
    fn open(cli: &Cli) -> AclResult<Self> {
        let config = Config::discover(cli.config.as_deref())?;
        let store_path = cli.store.clone().unwrap_or(config.store.path);
        let journal_path = cli.journal.clone().unwrap_or(config.journal.path);
        debug!(
            store = %store_path.display(),
            journal = %journal_path.display(),
            "opening workspace"
        );

        Ok(Self {
            store: InMemoryStore::open(&store_path)?,
            journal: InMemoryJournal::open(&journal_path)?,
            store_path,
            journal_path,
        })
    }

    fn acl(&self, resource: &ResourceId) -> AccessControlList<'_> {
        AccessControlList::new(resource, &self.store, &self.store)
    }

    fn flush(&self) -> AclResult<()> {
        self.store.flush(&self.store_path)?;
        self.journal.flush(&self.journal_path)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("warden error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> AclResult<ExitCode> {
    let workspace = Workspace::open(cli)?;

    match &cli.command {
        Command::Grant(target) => cmd_grant(&workspace, target),
        Command::Revoke(target) => cmd_revoke(&workspace, target),
        Command::Check(target) => cmd_check(&workspace, target),
        Command::Show { resource } => cmd_show(&workspace, &ResourceId::from(resource.as_str())),
        Command::Apply { manifest } => cmd_apply(&workspace, manifest),
        Command::Journal => cmd_journal(&workspace),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn cmd_grant(workspace: &Workspace, target: &Target) -> AclResult<ExitCode> {
    let resource = ResourceId::from(target.resource.as_str());
    let principal = target.principal.principal();

    let mut acl = workspace.acl(&resource);
    acl.grant(target.mode).to(&principal)?;
    commit(workspace, &mut acl)?;

    println!("granted {} on {} to {}", target.mode, resource, principal);
    Ok(ExitCode::SUCCESS)
}

fn cmd_revoke(workspace: &Workspace, target: &Target) -> AclResult<ExitCode> {
    let resource = ResourceId::from(target.resource.as_str());
    let principal = target.principal.principal();

    let mut acl = workspace.acl(&resource);
    acl.revoke(target.mode).from(&principal)?;
    commit(workspace, &mut acl)?;

    println!("revoked {} on {} from {}", target.mode, resource, principal);
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(workspace: &Workspace, target: &Target) -> AclResult<ExitCode> {
    let resource = ResourceId::from(target.resource.as_str());
    let principal = target.principal.principal();

    if workspace.acl(&resource).has_grant(target.mode, &principal)? {
        println!("allowed");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("denied");
        Ok(ExitCode::from(2))
    }
}

fn cmd_show(workspace: &Workspace, resource: &ResourceId) -> AclResult<ExitCode> {
    let mut permissions: Vec<_> = workspace.acl(resource).permissions()?.into_iter().collect();
    permissions.sort();

    if permissions.is_empty() {
        println!("no permissions on {}", resource);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{:<10}  {:<8}  AGENT", "MODE", "KIND");
    println!("{}", "-".repeat(40));
    for permission in permissions {
        let kind = match Principal::from_agent_key(&permission.agent) {
            Principal::Agent(_) => "agent",
            Principal::Group(_) => "group",
        };
        println!("{:<10}  {:<8}  {}", permission.mode, kind, permission.agent);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_apply(workspace: &Workspace, manifest: &Path) -> AclResult<ExitCode> {
    let manifest = GrantManifest::from_file(manifest)?;
    let summary = manifest.apply(&workspace.store, &workspace.store, Some(&workspace.journal))?;
    workspace.flush()?;

    println!(
        "{} resources: {} saved, {} unchanged",
        summary.resources, summary.saved, summary.unchanged
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_journal(workspace: &Workspace) -> AclResult<ExitCode> {
    let entries = workspace.journal.entries()?;

    for entry in &entries {
        println!(
            "#{:<4} {}  {}",
            entry.sequence,
            entry.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            entry.access_to
        );
        for permission in &entry.diff.added {
            println!("      + {} {}", permission.mode, permission.agent);
        }
        for permission in &entry.diff.removed {
            println!("      - {} {}", permission.mode, permission.agent);
        }
    }

    if workspace.journal.verify_integrity() {
        println!("{} entries, chain intact", entries.len());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{} entries, CHAIN BROKEN", entries.len());
        Ok(ExitCode::FAILURE)
    }
}

/// Save pending changes (journaling the diff) and flush both files. A clean
/// list writes nothing.
fn commit(workspace: &Workspace, acl: &mut AccessControlList<'_>) -> AclResult<()> {
    if !acl.pending_changes()? {
        return Ok(());
    }
    acl.save_journaled(&workspace.journal)?;
    workspace.flush()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

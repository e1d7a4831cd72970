//! specmerge command-line tool.
//!
//! Provides subcommands for speculative merge checks, policy-driven merge
//! plans, and inspecting or generating merge policy files.
//!
//! Exit codes: 0 for a clean merge (or an auto-resolvable plan), 1 when the
//! merge would conflict (or needs manual review), 2 on any fatal error.

mod report;
mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use specmerge_core::policy::{load_policy, resolve_policy_path, DEFAULT_POLICY};
use specmerge_core::{MergePolicy, ResolutionPlanner, SpeculativeMerge};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// specmerge command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "specmerge",
    version,
    about = "Predict merge conflicts without touching your checkout"
)]
struct Cli {
    /// Log filter (e.g. "debug", "specmerge_core=trace"). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Speculative merge checks.
    Merge {
        #[command(subcommand)]
        action: MergeAction,
    },

    /// Inspect or generate merge policy files.
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },
}

#[derive(Subcommand, Debug)]
enum MergeAction {
    /// Run a speculative merge and report conflicts.
    Check {
        #[command(flatten)]
        target: MergeTarget,

        /// Output the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run a speculative merge and map conflicts to policy resolutions.
    Plan {
        #[command(flatten)]
        target: MergeTarget,

        /// Path to the merge policy file.
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// Output the plan as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct MergeTarget {
    /// Path to the repository.
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Base branch or commit (merged into).
    #[arg(long)]
    base: String,

    /// Head branch or commit (merged from).
    #[arg(long)]
    head: String,
}

#[derive(Subcommand, Debug)]
enum PolicyAction {
    /// Print the effective policy as YAML.
    Show {
        /// Path to the merge policy file.
        #[arg(short, long)]
        policy: Option<PathBuf>,
    },
    /// Load a policy and summarize it.
    Validate {
        /// Path to the merge policy file.
        #[arg(short, long)]
        policy: Option<PathBuf>,
    },
    /// Write the default policy to a file.
    Init {
        /// Output path for the generated policy file.
        #[arg(short, long, default_value = "./merge_policy.yaml")]
        output: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Merge { action } => match action {
            MergeAction::Check { target, json } => cmd_check(&target, json),
            MergeAction::Plan {
                target,
                policy,
                json,
            } => cmd_plan(&target, policy.as_deref(), json),
        },
        Commands::Policy { action } => {
            match action {
                PolicyAction::Show { policy } => cmd_policy_show(policy.as_deref())?,
                PolicyAction::Validate { policy } => cmd_policy_validate(policy.as_deref())?,
                PolicyAction::Init { output } => cmd_policy_init(&output)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_check(target: &MergeTarget, json: bool) -> Result<ExitCode> {
    let outcome = SpeculativeMerge::check(&target.repo, &target.base, &target.head)
        .context("speculative merge check failed")?;

    if json {
        println!("{}", report::to_sorted_json(&outcome)?);
    } else {
        println!(
            "{}",
            report::format_outcome(&target.base, &target.head, &outcome)
        );
    }

    Ok(verdict(!outcome.conflicts))
}

fn cmd_plan(target: &MergeTarget, policy: Option<&Path>, json: bool) -> Result<ExitCode> {
    let policy_path = resolve_policy_path(policy);
    debug!(policy = ?policy_path, "policy path resolved");
    let plan = ResolutionPlanner::plan(
        &target.repo,
        &target.base,
        &target.head,
        policy_path.as_deref(),
    )
    .context("merge planning failed")?;

    if json {
        println!("{}", report::to_sorted_json(&plan)?);
    } else {
        println!("{}", report::format_plan(&plan));
    }

    Ok(verdict(plan.auto_resolve))
}

fn cmd_policy_show(policy: Option<&Path>) -> Result<()> {
    let (_, policy) = load_effective_policy(policy)?;
    print!("{}", policy.to_yaml()?);
    Ok(())
}

fn cmd_policy_validate(policy: Option<&Path>) -> Result<()> {
    let (source, policy) = load_effective_policy(policy)?;

    println!("{}", report::format_policy_summary(&source, &policy));
    println!();
    println!("{}", style::success("Policy is valid."));
    Ok(())
}

fn cmd_policy_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, DEFAULT_POLICY).context("failed to write policy file")?;

    println!(
        "{}",
        style::success(&format!("Default policy written to {}", output.display()))
    );
    println!();
    println!("Next steps:");
    println!("  1. Edit the priority rules for your repository layout");
    println!(
        "  2. Validate with: specmerge policy validate --policy {}",
        output.display()
    );
    println!(
        "  3. Plan a merge: specmerge merge plan --base main --head feature --policy {}",
        output.display()
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

/// Resolve and load the policy, returning a label for its source.
fn load_effective_policy(explicit: Option<&Path>) -> Result<(String, MergePolicy)> {
    let path = resolve_policy_path(explicit);
    let source = path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<bundled>".to_string());

    let document = load_policy(path.as_deref())
        .with_context(|| format!("failed to load policy from {}", source))?;
    Ok((source, MergePolicy::from_document(&document)))
}

fn verdict(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

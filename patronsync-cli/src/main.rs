//! Patronsync — inject the latest supporter tier into marker-delimited file
//! regions, commit on a dedicated branch, and open (or reuse) a pull request.
//!
//! # Usage
//!
//! ```text
//! patronsync --roster-url <URL> --files <LIST> \
//!     --start-marker <STR> --end-marker <STR> \
//!     [--repo owner/name] [--branch <NAME>] [--base <NAME>] \
//!     [--git-email <EMAIL>] [--fail-on-missing-markers <BOOL>] \
//!     [--force-reset-branch] [--workdir <PATH>] [--dry-run]
//! ```
//!
//! The GitHub token is read from `GITHUB_TOKEN`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use patronsync_core::config::{
    parse_files_list, RepoSlug, SyncConfig, DEFAULT_BASE, DEFAULT_BRANCH, DEFAULT_GIT_EMAIL,
};
use patronsync_core::error::ConfigError;
use patronsync_core::types::{BranchPolicy, MarkerSpec};
use patronsync_sync::pipeline::{self, FileOutcome, HttpRoster, PullRequestOutcome, RunOutcome};
use patronsync_sync::{GitCli, GitHubApi};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "patronsync",
    version,
    about = "Sync the latest supporter tier into marker-delimited file regions",
    long_about = None,
)]
struct Cli {
    /// Roster endpoint URL.
    #[arg(long)]
    roster_url: String,

    /// Files to update: a YAML sequence or newline-separated relative paths.
    #[arg(long, allow_hyphen_values = true)]
    files: String,

    /// Literal string opening the replaceable region.
    #[arg(long)]
    start_marker: String,

    /// Literal string closing the replaceable region.
    #[arg(long)]
    end_marker: String,

    /// Fail the run when a target file has no usable marker region.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    fail_on_missing_markers: bool,

    /// Author email for the update commit.
    #[arg(long, default_value = DEFAULT_GIT_EMAIL)]
    git_email: String,

    /// Dedicated working branch.
    #[arg(long, default_value = DEFAULT_BRANCH)]
    branch: String,

    /// Main-line branch the pull request targets.
    #[arg(long, default_value = DEFAULT_BASE)]
    base: String,

    /// GitHub repository as owner/name (required unless --dry-run).
    #[arg(long)]
    repo: Option<String>,

    /// Repository checkout to operate in.
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// Force-reset the working branch onto the base instead of reusing it.
    #[arg(long)]
    force_reset_branch: bool,

    /// Show per-file diffs without writing, committing, or opening a PR.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let outcome = execute(cli)?;
    print_outcome(&outcome);
    Ok(())
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

fn execute(cli: Cli) -> Result<RunOutcome> {
    let config = SyncConfig {
        roster_url: cli.roster_url,
        workdir: cli.workdir,
        files: parse_files_list(&cli.files)?,
        markers: MarkerSpec {
            start: cli.start_marker,
            end: cli.end_marker,
            fail_on_missing: cli.fail_on_missing_markers,
        },
        git_email: cli.git_email,
        branch: cli.branch,
        base: cli.base,
        branch_policy: if cli.force_reset_branch {
            BranchPolicy::ForceReset
        } else {
            BranchPolicy::Reuse
        },
    };
    config.validate()?;

    let source = HttpRoster::new(config.roster_url.clone());

    if cli.dry_run {
        return Ok(pipeline::dry_run(&config, &source)?);
    }

    // Gateway credentials are checked up front so misconfiguration aborts
    // before any network or file activity.
    let repo: RepoSlug = cli
        .repo
        .as_deref()
        .ok_or(ConfigError::MissingRepo)?
        .parse()?;
    let token = std::env::var("GITHUB_TOKEN").map_err(|_| ConfigError::MissingToken)?;

    let vcs = GitCli::new(&config.workdir);
    let prs = GitHubApi::new(repo, token);
    Ok(pipeline::run(&config, &source, &vcs, &prs)?)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NoSupporters => {
            println!("✓ roster has no tiers — nothing to do");
        }
        RunOutcome::NoChanges { files } => {
            println!(
                "✓ already up to date ({} file(s) checked, nothing to commit)",
                files.len()
            );
            print_files(files);
        }
        RunOutcome::Completed {
            files,
            pull_request,
        } => {
            println!("✓ patrons list synced");
            print_files(files);
            match pull_request {
                PullRequestOutcome::Created { pr, auto_merge } => {
                    let suffix = if *auto_merge {
                        ", auto-merge enabled"
                    } else {
                        ""
                    };
                    println!("  ⇡ opened pull request #{} {}{suffix}", pr.number, pr.html_url);
                }
                PullRequestOutcome::AlreadyOpen { pr } => {
                    println!("  ⇡ pull request #{} already open {}", pr.number, pr.html_url);
                }
            }
        }
        RunOutcome::DryRun { files, diffs } => {
            println!("[dry-run] {} file(s) checked", files.len());
            print_files(files);
            for diff in diffs {
                println!();
                print!("{}", diff.unified_diff);
            }
        }
    }
}

fn print_files(files: &[FileOutcome]) {
    for file in files {
        match file {
            FileOutcome::Updated { path } => println!("  ✎  {}", path.display()),
            FileOutcome::WouldUpdate { path } => println!("  ~  {}", path.display()),
            FileOutcome::Unchanged { path } => println!("  ·  {}", path.display()),
            FileOutcome::RegionNotFound { path } => {
                println!("  ✗  {} (no marker region)", path.display())
            }
            FileOutcome::Failed { path, error } => {
                println!("  ✗  {}: {error}", path.display())
            }
        }
    }
}

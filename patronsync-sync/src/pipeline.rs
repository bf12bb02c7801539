//! Synchronization controller.
//!
//! One run walks the state machine
//! `START → BRANCH_READY → FILES_PROCESSED → {NO_CHANGES | COMMITTED →
//! PUSHED → PR_RECONCILED}`, with any fatal error short-circuiting the run.
//! The per-file loop is partial-failure tolerant: read/write errors and
//! missing marker regions never stop the remaining files from processing.

use std::path::PathBuf;

use patronsync_core::config::SyncConfig;
use patronsync_core::types::SupporterDocument;
use patronsync_roster::{display_names, RosterError};

use crate::diff::{self, FileDiff};
use crate::error::SyncError;
use crate::git::VcsGateway;
use crate::github::{PullRequest, PullRequestGateway};
use crate::markers::{self, Substitution};
use crate::writer::{self, WriteResult};

/// Fixed message for the roster-update commit.
pub const COMMIT_MESSAGE: &str = "docs: updated patrons list";

/// Fixed title of the roster-update pull request.
pub const PR_TITLE: &str = "docs: update patrons list";

/// Fixed body of the roster-update pull request.
pub const PR_BODY: &str =
    "Automated update of the patrons list from the latest supporter roster.";

// ---------------------------------------------------------------------------
// Roster source seam
// ---------------------------------------------------------------------------

/// Where the supporter roster comes from. Production uses [`HttpRoster`];
/// tests substitute canned documents.
pub trait RosterSource {
    fn fetch(&self) -> Result<SupporterDocument, RosterError>;
}

/// [`RosterSource`] backed by the configured HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpRoster {
    url: String,
}

impl HttpRoster {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl RosterSource for HttpRoster {
    fn fetch(&self) -> Result<SupporterDocument, RosterError> {
        patronsync_roster::fetch(&self.url)
    }
}

// ---------------------------------------------------------------------------
// Run outcomes
// ---------------------------------------------------------------------------

/// Per-target-file result of the substitution loop. Paths are as
/// configured, relative to the checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Marker region replaced and the file rewritten.
    Updated { path: PathBuf },
    /// Dry run: the file would have been rewritten.
    WouldUpdate { path: PathBuf },
    /// Substitution produced content identical to what is on disk.
    Unchanged { path: PathBuf },
    /// Markers absent or misordered; file left untouched.
    RegionNotFound { path: PathBuf },
    /// Read or write failure; file skipped, batch continued.
    Failed { path: PathBuf, error: String },
}

/// How the pull request was reconciled after a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestOutcome {
    /// A new pull request was opened. `auto_merge` records whether the
    /// best-effort enablement succeeded.
    Created { pr: PullRequest, auto_merge: bool },
    /// An open pull request for the working branch already existed; nothing
    /// was created.
    AlreadyOpen { pr: PullRequest },
}

/// Terminal state of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The roster's tier list was empty: nothing written, no pull request.
    NoSupporters,
    /// Substitution left the staging area empty: no commit, no pull request.
    NoChanges { files: Vec<FileOutcome> },
    /// Changes were committed, pushed, and the pull request reconciled.
    Completed {
        files: Vec<FileOutcome>,
        pull_request: PullRequestOutcome,
    },
    /// Dry run: per-file previews only, no side effects.
    DryRun {
        files: Vec<FileOutcome>,
        diffs: Vec<FileDiff>,
    },
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Run the full synchronization pipeline.
pub fn run<V, P>(
    config: &SyncConfig,
    source: &dyn RosterSource,
    vcs: &V,
    prs: &P,
) -> Result<RunOutcome, SyncError>
where
    V: VcsGateway + ?Sized,
    P: PullRequestGateway + ?Sized,
{
    config.validate()?;

    let document = source.fetch()?;
    let Some(names) = display_names(&document) else {
        log::info!("roster has no tiers; nothing to do");
        return Ok(RunOutcome::NoSupporters);
    };

    vcs.prepare_branch(&config.branch, &config.base, config.branch_policy)?;

    let (files, _) = process_files(config, &names, false);
    enforce_marker_policy(config, &files)?;

    vcs.stage_all()?;
    if !vcs.has_staged_changes()? {
        log::info!("no pending changes; skipping commit and pull request");
        return Ok(RunOutcome::NoChanges { files });
    }

    vcs.commit(COMMIT_MESSAGE, &config.git_email)?;
    vcs.push_force(&config.branch)?;

    let pull_request = reconcile_pull_request(config, prs)?;
    Ok(RunOutcome::Completed {
        files,
        pull_request,
    })
}

/// Preview what a run would change, with no version-control or
/// pull-request side effects. Only the roster fetch leaves the process.
pub fn dry_run(config: &SyncConfig, source: &dyn RosterSource) -> Result<RunOutcome, SyncError> {
    config.validate()?;

    let document = source.fetch()?;
    let Some(names) = display_names(&document) else {
        log::info!("roster has no tiers; nothing to do");
        return Ok(RunOutcome::NoSupporters);
    };

    let (files, diffs) = process_files(config, &names, true);
    enforce_marker_policy(config, &files)?;
    Ok(RunOutcome::DryRun { files, diffs })
}

// ---------------------------------------------------------------------------
// File loop
// ---------------------------------------------------------------------------

fn process_files(config: &SyncConfig, names: &str, dry: bool) -> (Vec<FileOutcome>, Vec<FileDiff>) {
    let mut outcomes = Vec::with_capacity(config.files.len());
    let mut diffs = Vec::new();

    for relative in &config.files {
        let path = config.workdir.join(relative);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                log::error!("skipping {}: {err}", path.display());
                outcomes.push(FileOutcome::Failed {
                    path: relative.clone(),
                    error: err.to_string(),
                });
                continue;
            }
        };

        match markers::substitute(&text, &config.markers, names) {
            Substitution::RegionNotFound => {
                log::warn!("marker region not found in {}", path.display());
                outcomes.push(FileOutcome::RegionNotFound {
                    path: relative.clone(),
                });
            }
            Substitution::Replaced(updated) => {
                match writer::write_if_changed(&path, &updated, dry) {
                    Ok(WriteResult::Written { .. }) => outcomes.push(FileOutcome::Updated {
                        path: relative.clone(),
                    }),
                    Ok(WriteResult::Unchanged { .. }) => outcomes.push(FileOutcome::Unchanged {
                        path: relative.clone(),
                    }),
                    Ok(WriteResult::WouldWrite { .. }) => {
                        let existing = text.replace("\r\n", "\n");
                        let updated = updated.replace("\r\n", "\n");
                        diffs.push(diff::render_unified(relative, &existing, &updated));
                        outcomes.push(FileOutcome::WouldUpdate {
                            path: relative.clone(),
                        });
                    }
                    Err(err) => {
                        log::error!("failed to write {}: {err}", path.display());
                        outcomes.push(FileOutcome::Failed {
                            path: relative.clone(),
                            error: err.to_string(),
                        });
                    }
                }
            }
        }
    }

    (outcomes, diffs)
}

/// Fail the run after the batch completes when the strict marker policy is
/// in force and any file lacked a usable region. Every file still processes
/// independently before this fires.
fn enforce_marker_policy(config: &SyncConfig, files: &[FileOutcome]) -> Result<(), SyncError> {
    if !config.markers.fail_on_missing {
        return Ok(());
    }
    let failed = files
        .iter()
        .filter(|outcome| matches!(outcome, FileOutcome::RegionNotFound { .. }))
        .count();
    if failed > 0 {
        return Err(SyncError::Markers {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pull-request reconciliation
// ---------------------------------------------------------------------------

fn reconcile_pull_request<P>(config: &SyncConfig, prs: &P) -> Result<PullRequestOutcome, SyncError>
where
    P: PullRequestGateway + ?Sized,
{
    if let Some(pr) = prs.find_open(&config.branch)? {
        log::info!(
            "pull request #{} already open for '{}'; nothing to do",
            pr.number,
            config.branch
        );
        return Ok(PullRequestOutcome::AlreadyOpen { pr });
    }

    let pr = prs.create(&config.branch, &config.base, PR_TITLE, PR_BODY)?;
    log::info!("opened pull request #{}: {}", pr.number, pr.html_url);

    // Auto-merge is a best-effort side channel; its failure never fails the
    // run.
    let auto_merge = match prs.enable_auto_merge(&pr) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("could not enable auto-merge on #{}: {err}", pr.number);
            false
        }
    };

    Ok(PullRequestOutcome::Created { pr, auto_merge })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Ownership fingerprint: who has been touching the changed files, and how
//! concentrated that knowledge is.
//!
//! Counts one touch per author per commit per file over a lookback window
//! (180 days by default). A merge counts only for files it changed against
//! every parent.

pub mod analyzer;
pub mod mentions;
mod report;

use std::error::Error;

use chrono::Utc;
use tracing::warn;

use crate::config::{OwnershipSettings, Settings};
use crate::git::GitRepo;
use crate::util::days_before;
use analyzer::{OwnershipFingerprint, ownership_fingerprint};
use report::{print_json, print_report};

/// Fingerprint `files` from repository history. Unreadable commits are
/// skipped; a walk that cannot start degrades to an empty fingerprint.
pub fn analyze(
    git_repo: &GitRepo,
    settings: &OwnershipSettings,
    files: &[String],
    now: i64,
) -> OwnershipFingerprint {
    let since = days_before(now, settings.lookback_days);
    let mut history = match git_repo.authors_by_path(files, Some(since)) {
        Ok(history) => history,
        Err(err) => {
            warn!("author history unavailable: {err}");
            Default::default()
        }
    };
    ownership_fingerprint(files, settings.top, |file| {
        Ok::<_, String>(history.remove(file).unwrap_or_default())
    })
}

/// `nw ownership`: fingerprint the files changed against the base branch.
pub fn run(settings: &Settings, base_ref: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let git_repo = GitRepo::open(&settings.repo_path)
        .map_err(|e| format!("not a git repository (or any parent): {e}"))?;
    let files = git_repo.diff_name_only(base_ref)?;
    let fp = analyze(&git_repo, &settings.ownership, &files, Utc::now().timestamp());

    if json {
        print_json(&fp, files.len(), settings.ownership.lookback_days)
    } else {
        print_report(&fp, files.len(), settings.ownership.lookback_days);
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

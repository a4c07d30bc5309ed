//! Sensitive-file detection: flags changed paths that match a banned
//! pattern and no allowed pattern. Path matching only; file contents are
//! never read.

mod report;

use std::collections::HashMap;
use std::error::Error;

use serde::Serialize;
use tracing::warn;

use crate::config::Settings;
use crate::git::{ChangeStatus, GitRepo};
use crate::patterns::{self, PatternConfig, PatternSources, reasons};
use report::{print_json, print_report};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensitiveMatch {
    pub file: String,
    pub status: ChangeStatus,
    pub pattern: String,
    pub reason: String,
}

/// Apply the pattern configuration to `files`, in input order. Allowed
/// patterns always win over banned ones; each file yields at most one match.
pub fn find_sensitive_files(
    cfg: &PatternConfig,
    statuses: &HashMap<String, ChangeStatus>,
    files: &[String],
) -> Vec<SensitiveMatch> {
    files
        .iter()
        .filter(|file| !cfg.is_allowed(file))
        .filter_map(|file| {
            let rule = cfg.first_banned(file)?;
            Some(SensitiveMatch {
                file: file.clone(),
                status: statuses.get(file).copied().unwrap_or_default(),
                pattern: rule.display().to_string(),
                reason: reasons::reason_for(file, rule),
            })
        })
        .collect()
}

/// Name-status lookup against `base_ref`. A failed diff (missing ref,
/// shallow clone) degrades to an empty map.
pub fn status_map(git_repo: &GitRepo, base_ref: &str) -> HashMap<String, ChangeStatus> {
    match git_repo.diff_name_status(base_ref) {
        Ok(entries) => entries
            .into_iter()
            .map(|(status, path)| (path, status))
            .collect(),
        Err(err) => {
            warn!("name-status diff against {base_ref} failed: {err}");
            HashMap::new()
        }
    }
}

/// Detect sensitive files among `files` changed relative to `base_ref`.
pub fn detect(
    git_repo: &GitRepo,
    cfg: &PatternConfig,
    base_ref: &str,
    files: &[String],
) -> Vec<SensitiveMatch> {
    let statuses = status_map(git_repo, base_ref);
    find_sensitive_files(cfg, &statuses, files)
}

/// `nw sensitive`: scan the local diff against the base branch.
pub fn run(settings: &Settings, base_ref: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let git_repo = GitRepo::open(&settings.repo_path)
        .map_err(|e| format!("not a git repository (or any parent): {e}"))?;
    let cfg = patterns::load(&PatternSources::from_settings(settings));
    let files = git_repo.diff_name_only(base_ref)?;
    let matches = detect(&git_repo, &cfg, base_ref, &files);

    if json {
        print_json(&matches)
    } else {
        print_report(&matches, files.len());
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

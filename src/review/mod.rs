//! Pull request review: runs every analysis over the change set and
//! renders the result as a PR comment.
//!
//! Outside a pull request only the developer state line is printed.

mod json;
pub mod markdown;

use std::collections::HashMap;
use std::error::Error;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::blast::{BlastRadius, blast_radius};
use crate::classify::{Classifier, is_test_file};
use crate::config::Settings;
use crate::fatigue::{self, FatigueState};
use crate::git::{ChangeStatus, GitRepo};
use crate::github::{CommentAction, CommitRecord, GitHubClient, Overlap};
use crate::ownership::{self, analyzer::OwnershipFingerprint, mentions::contributor_mentions};
use crate::patterns::{self, PatternConfig, PatternSources};
use crate::score::{self, DiffStats, SafetyScore, adjusted_score, calculate_score};
use crate::sensitive::{self, SensitiveMatch, find_sensitive_files};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything collected from the repository and the platform.
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    pub pr_number: Option<u64>,
    pub files: Vec<String>,
    pub statuses: HashMap<String, ChangeStatus>,
    pub stats: DiffStats,
    pub commits: Vec<CommitRecord>,
    pub overlaps: Vec<Overlap>,
    pub state: Option<FatigueState>,
    pub ownership: Option<OwnershipFingerprint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub pr_number: Option<u64>,
    /// Safety score after the sensitive-file penalty.
    pub adjusted_score: u32,
    pub safety: SafetyScore,
    pub state: FatigueState,
    pub blast: BlastRadius,
    pub stats: DiffStats,
    pub has_tests: bool,
    pub sensitive: Vec<SensitiveMatch>,
    pub ownership: OwnershipFingerprint,
    pub mentions: Vec<String>,
    pub overlaps: Vec<Overlap>,
    pub commits: usize,
    pub version: &'static str,
}

const NO_HISTORY: OwnershipFingerprint = OwnershipFingerprint {
    contributors: Vec::new(),
    bus_factor: 3,
    top_share: 0.0,
};

const NOT_FATIGUED: FatigueState = FatigueState {
    focused: true,
    fatigue: false,
    late_week: 0,
};

/// Combine the evidence into an assessment. Pure.
pub fn assess(evidence: Evidence, classifier: &Classifier, cfg: &PatternConfig) -> Assessment {
    let sensitive = find_sensitive_files(cfg, &evidence.statuses, &evidence.files);
    let safety = calculate_score(
        classifier,
        &evidence.files,
        evidence.stats.additions,
        evidence.stats.deletions,
    );
    let ownership = evidence.ownership.unwrap_or(NO_HISTORY);
    let mentions = contributor_mentions(&ownership.contributors, &evidence.commits);

    Assessment {
        pr_number: evidence.pr_number,
        adjusted_score: adjusted_score(safety.score, !sensitive.is_empty()),
        safety,
        state: evidence.state.unwrap_or(NOT_FATIGUED),
        blast: blast_radius(classifier, &evidence.files),
        stats: evidence.stats,
        has_tests: evidence.files.iter().any(|f| is_test_file(f)),
        sensitive,
        ownership,
        mentions,
        overlaps: evidence.overlaps,
        commits: evidence.commits.len(),
        version: VERSION,
    }
}

pub struct ReviewOptions<'a> {
    pub base_ref: &'a str,
    pub pr: Option<u64>,
    pub post: bool,
    pub json: bool,
}

/// Changed files: the local diff first, then the PR file list.
fn changed_files(
    git_repo: &GitRepo,
    client: Option<&GitHubClient>,
    base_ref: &str,
    pr: u64,
) -> Result<Vec<String>, Box<dyn Error>> {
    let local = git_repo.diff_name_only(base_ref).unwrap_or_else(|err| {
        warn!("local diff against {base_ref} failed: {err}");
        Vec::new()
    });
    if !local.is_empty() {
        return Ok(local);
    }

    let remote = match client {
        Some(client) => client.pull_files(pr).unwrap_or_else(|err| {
            warn!("PR #{pr} file list unavailable: {err}");
            Vec::new()
        }),
        None => Vec::new(),
    };
    if remote.is_empty() {
        return Err(format!("no changed files found for PR #{pr} against {base_ref}").into());
    }
    Ok(remote)
}

/// `nw review`
pub fn run(settings: &Settings, opts: &ReviewOptions) -> Result<(), Box<dyn Error>> {
    let git_repo = GitRepo::open(&settings.repo_path)
        .map_err(|e| format!("not a git repository (or any parent): {e}"))?;
    debug!(root = %git_repo.root().display(), "repository opened");
    let now = Utc::now().timestamp();
    let state = fatigue::analyze(&git_repo, settings, now);

    let Some(pr) = opts.pr.or(settings.github.pr_number) else {
        debug!("not a pull request run");
        println!("{}", state.status_line());
        return Ok(());
    };

    let client = match GitHubClient::from_context(&settings.github) {
        Ok(client) => Some(client),
        Err(err) if opts.post => return Err(err),
        Err(err) => {
            debug!("running without the GitHub API: {err}");
            None
        }
    };

    if let Err(err) = git_repo.fetch_base(opts.base_ref, settings.github.token.as_deref()) {
        warn!("fetch of {} failed: {err}", opts.base_ref);
    }

    let files = changed_files(&git_repo, client.as_ref(), opts.base_ref, pr)?;
    let (commits, overlaps) = match &client {
        Some(client) => (
            client.pull_commits(pr).unwrap_or_else(|err| {
                warn!("PR #{pr} commits unavailable: {err}");
                Vec::new()
            }),
            client.overlapping_pulls(pr, &files).unwrap_or_else(|err| {
                warn!("open PRs unavailable: {err}");
                Vec::new()
            }),
        ),
        None => (Vec::new(), Vec::new()),
    };

    let evidence = Evidence {
        pr_number: Some(pr),
        statuses: sensitive::status_map(&git_repo, opts.base_ref),
        stats: score::diff_stats(&git_repo, opts.base_ref),
        ownership: Some(ownership::analyze(&git_repo, &settings.ownership, &files, now)),
        state: Some(state),
        files,
        commits,
        overlaps,
    };
    let cfg = patterns::load(&PatternSources::from_settings(settings));
    let assessment = assess(evidence, &Classifier::new(&settings.classify), &cfg);

    if opts.post {
        let client = client.ok_or("GitHub client unavailable")?;
        let body = markdown::render(&assessment);
        let action = client.upsert_comment(pr, &body)?;
        info!(?action, pr, "review comment posted");
        println!(
            "{} nightwatch comment on PR #{pr}",
            match action {
                CommentAction::Created => "Posted",
                CommentAction::Updated => "Updated",
            }
        );
        Ok(())
    } else if opts.json {
        json::print_json(&assessment)
    } else {
        print!("{}", markdown::render(&assessment));
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

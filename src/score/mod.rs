//! Safety score for a change set: size, risky paths, public surface,
//! churn and whether tests came along.

mod report;
pub mod scoring;

use std::error::Error;

use serde::Serialize;
use tracing::warn;

use crate::classify::{Classifier, is_test_file};
use crate::config::Settings;
use crate::git::{GitRepo, LineStat};
use report::{print_json, print_report};
pub use scoring::{SafetyScore, ScoreInputs, adjusted_score, breakdown, safety_score};

/// Added and deleted lines across the diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
}

impl DiffStats {
    pub fn churn(&self) -> usize {
        self.additions + self.deletions
    }
}

impl FromIterator<LineStat> for DiffStats {
    fn from_iter<I: IntoIterator<Item = LineStat>>(iter: I) -> Self {
        iter.into_iter().fold(DiffStats::default(), |acc, s| DiffStats {
            additions: acc.additions + s.additions,
            deletions: acc.deletions + s.deletions,
        })
    }
}

/// Numstat totals against `base_ref`; zero when the diff cannot be computed.
pub fn diff_stats(git_repo: &GitRepo, base_ref: &str) -> DiffStats {
    match git_repo.diff_numstat(base_ref) {
        Ok(stats) => stats.into_iter().collect(),
        Err(err) => {
            warn!("numstat diff against {base_ref} failed: {err}");
            DiffStats::default()
        }
    }
}

/// Classify `files` and derive the score inputs.
pub fn score_inputs(classifier: &Classifier, files: &[String], stats: DiffStats) -> ScoreInputs {
    ScoreInputs {
        files: files.len(),
        risky: files.iter().filter(|f| classifier.is_risky(f)).count(),
        public_touched: files.iter().any(|f| classifier.is_public_surface(f)),
        tests_touched: files.iter().any(|f| is_test_file(f)),
        churn: stats.churn(),
    }
}

pub fn calculate_score(
    classifier: &Classifier,
    files: &[String],
    additions: usize,
    deletions: usize,
) -> SafetyScore {
    let stats = DiffStats {
        additions,
        deletions,
    };
    safety_score(&score_inputs(classifier, files, stats))
}

/// `nw score`: safety score of the local diff with its breakdown.
pub fn run(settings: &Settings, base_ref: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let git_repo = GitRepo::open(&settings.repo_path)
        .map_err(|e| format!("not a git repository (or any parent): {e}"))?;
    let files = git_repo.diff_name_only(base_ref)?;
    let stats = diff_stats(&git_repo, base_ref);
    let inputs = score_inputs(&Classifier::new(&settings.classify), &files, stats);
    let score = safety_score(&inputs);
    let parts = breakdown(&inputs);

    if json {
        print_json(&score, &parts, &stats)
    } else {
        print_report(&score, &parts, &inputs);
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

//! Blast radius: how a change spreads across functional domains.
//!
//! A coarse impact estimate. Each changed path lands in exactly one domain
//! of the classifier; no call-graph or semantic analysis is attempted.

mod report;

use std::error::Error;

use serde::Serialize;

use crate::classify::{self, Classifier};
use crate::config::Settings;
use crate::git::GitRepo;
use crate::util::Tally;
use report::{print_json, print_report};

/// Number of domains kept in the ranked views.
pub const TOP_DOMAINS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCount {
    pub name: String,
    pub count: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlastRadius {
    /// Top domains by file count, ties in first-seen order.
    pub affects: Vec<String>,
    pub affects_with_counts: Vec<DomainCount>,
    /// Every domain touched, in first-seen order.
    pub counts: Vec<DomainCount>,
    pub risky: usize,
    pub files_changed: usize,
}

impl BlastRadius {
    /// `` `Label` (**n**) `` for each ranked domain, or `None`.
    pub fn summary(&self) -> String {
        if self.affects_with_counts.is_empty() {
            return "None".to_string();
        }
        self.affects_with_counts
            .iter()
            .map(|d| format!("`{}` (**{}**)", d.label, d.count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn domain_count((name, count): (String, usize)) -> DomainCount {
    DomainCount {
        label: classify::label(&name),
        name,
        count,
    }
}

pub fn blast_radius(classifier: &Classifier, files: &[String]) -> BlastRadius {
    let tally: Tally = files.iter().map(|f| classifier.domain(f)).collect();
    let risky = files.iter().filter(|f| classifier.is_risky(f)).count();

    let affects_with_counts: Vec<DomainCount> = tally
        .ranked()
        .into_iter()
        .take(TOP_DOMAINS)
        .map(domain_count)
        .collect();

    BlastRadius {
        affects: affects_with_counts.iter().map(|d| d.name.clone()).collect(),
        affects_with_counts,
        counts: tally.entries().iter().cloned().map(domain_count).collect(),
        risky,
        files_changed: files.len(),
    }
}

/// `nw blast`: blast radius of the local diff against the base branch.
pub fn run(settings: &Settings, base_ref: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let git_repo = GitRepo::open(&settings.repo_path)
        .map_err(|e| format!("not a git repository (or any parent): {e}"))?;
    let files = git_repo.diff_name_only(base_ref)?;
    let radius = blast_radius(&Classifier::new(&settings.classify), &files);

    if json {
        print_json(&radius)
    } else {
        print_report(&radius);
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

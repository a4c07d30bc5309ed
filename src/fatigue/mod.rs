//! Developer fatigue: late-night commit activity over the past week.
//!
//! Looks at the most recent commits on HEAD (50 by default), keeps those
//! from the last 7 days, and counts the ones made between midnight and
//! 5 a.m. in the configured time zone. Three or more flag fatigue.

use std::error::Error;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{FatigueSettings, Settings};
use crate::git::GitRepo;
use crate::report_helpers::print_json_stdout;
use crate::timezone::TimeZoneRule;
use crate::util::days_before;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueState {
    /// Always true for now; kept so consumers can rely on the field.
    pub focused: bool,
    pub fatigue: bool,
    pub late_week: usize,
}

impl FatigueState {
    /// `Developer State: fatigue=<bool> lateWeek=<n>`
    pub fn status_line(&self) -> String {
        format!(
            "Developer State: fatigue={} lateWeek={}",
            self.fatigue, self.late_week
        )
    }
}

/// Classify commit `timestamps` (Unix seconds) relative to `now`.
pub fn developer_state(
    timestamps: &[i64],
    now: i64,
    tz: TimeZoneRule,
    settings: &FatigueSettings,
) -> FatigueState {
    let since = days_before(now, settings.window_days);
    let band = settings.late_start..settings.late_end;
    let late_week = timestamps
        .iter()
        .take(settings.sample)
        .filter(|&&ts| ts >= since)
        .filter_map(|&ts| tz.hour(ts))
        .filter(|hour| band.contains(hour))
        .count();

    FatigueState {
        focused: true,
        fatigue: late_week >= settings.threshold,
        late_week,
    }
}

/// Fatigue state of the repository at HEAD. An unreadable history counts
/// as no late-night activity.
pub fn analyze(git_repo: &GitRepo, settings: &Settings, now: i64) -> FatigueState {
    let timestamps = git_repo
        .recent_commit_times(settings.fatigue.sample)
        .unwrap_or_else(|err| {
            warn!("commit history unavailable: {err}");
            Vec::new()
        });
    let state = developer_state(&timestamps, now, settings.timezone, &settings.fatigue);
    debug!(
        sampled = timestamps.len(),
        late_week = state.late_week,
        timezone = %settings.timezone,
        "developer state"
    );
    state
}

/// `nw state`: print the developer state line.
pub fn run(settings: &Settings, json: bool) -> Result<(), Box<dyn Error>> {
    let git_repo = GitRepo::open(&settings.repo_path)
        .map_err(|e| format!("not a git repository (or any parent): {e}"))?;
    let state = analyze(&git_repo, settings, Utc::now().timestamp());
    if json {
        print_json_stdout(&state)
    } else {
        println!("{}", state.status_line());
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

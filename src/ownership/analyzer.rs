use std::fmt::Display;

use serde::Serialize;
use tracing::warn;

use crate::util::Tally;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnershipFingerprint {
    /// Most frequent authors across the changed files, highest first.
    pub contributors: Vec<String>,
    /// 1 (one person holds the knowledge) to 3 (well spread).
    pub bus_factor: u8,
    /// Share of touches by the top author, 0 with no history.
    pub top_share: f64,
}

/// Estimate bus factor from ranked counts.
///
/// One author above 60% gives 1; the top two above 75% gives 2; anything
/// more spread out gives 3. Both thresholds are strict.
pub fn bus_factor(ranked: &[(String, usize)], total: usize) -> u8 {
    if total == 0 {
        return 3;
    }
    let share = |n: usize| n as f64 / total as f64;
    let top = ranked.first().map_or(0, |(_, n)| *n);
    if share(top) > 0.6 {
        return 1;
    }
    let top_two: usize = ranked.iter().take(2).map(|(_, n)| n).sum();
    if share(top_two) > 0.75 {
        return 2;
    }
    3
}

/// Fingerprint from an author tally.
pub fn fingerprint(tally: &Tally, top: usize) -> OwnershipFingerprint {
    let total = tally.total();
    let ranked = tally.ranked();
    let top_share = match ranked.first() {
        Some((_, n)) if total > 0 => *n as f64 / total as f64,
        _ => 0.0,
    };

    OwnershipFingerprint {
        contributors: ranked.iter().take(top).map(|(name, _)| name.clone()).collect(),
        bus_factor: bus_factor(&ranked, total),
        top_share,
    }
}

/// Look up the authors touching each file and fingerprint the result.
/// A file whose lookup fails is skipped.
pub fn ownership_fingerprint<E: Display>(
    files: &[String],
    top: usize,
    mut lookup: impl FnMut(&str) -> Result<Vec<String>, E>,
) -> OwnershipFingerprint {
    let mut tally = Tally::new();
    for file in files {
        match lookup(file) {
            Ok(authors) => {
                for author in &authors {
                    tally.add(author);
                }
            }
            Err(err) => warn!("skipping history of {file}: {err}"),
        }
    }
    fingerprint(&tally, top)
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;

//! Safety score arithmetic.
//!
//! Start at 100 and apply capped deductions for size, risky paths, public
//! surface and churn, plus a ±10 swing for whether tests were touched.
//! The result is clamped to 0–100.

use serde::Serialize;

// ─── Weights ─────────────────────────────────────────────────────────

pub const BASE: i64 = 100;
/// One point per changed file, up to this many.
pub const FILES_CAP: i64 = 40;
pub const PER_RISKY: i64 = 6;
pub const RISKY_CAP: i64 = 30;
pub const PUBLIC_PENALTY: i64 = 15;
/// Added when tests were touched, subtracted otherwise.
pub const TESTS_SWING: i64 = 10;
pub const CHURN_UNIT: usize = 500;
pub const PER_CHURN_UNIT: i64 = 5;
pub const CHURN_CAP: i64 = 20;
/// Applied by the review on top of the score when a sensitive file shows up.
pub const SENSITIVE_PENALTY: u32 = 10;

// ─── Inputs and result ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreInputs {
    pub files: usize,
    pub risky: usize,
    pub public_touched: bool,
    pub tests_touched: bool,
    /// Added plus deleted lines.
    pub churn: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetyScore {
    pub score: u32,
    pub tests_touched: bool,
    pub public_touched: bool,
}

/// Signed contribution of each factor, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub files: i64,
    pub risky: i64,
    pub public: i64,
    pub tests: i64,
    pub churn: i64,
}

impl Breakdown {
    pub fn total(&self) -> i64 {
        self.files + self.risky + self.public + self.tests + self.churn
    }

    pub fn rows(&self) -> [(&'static str, i64); 5] {
        [
            ("Files changed", self.files),
            ("Risky files", self.risky),
            ("Public surface", self.public),
            ("Tests", self.tests),
            ("Churn", self.churn),
        ]
    }
}

fn saturating(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

pub fn breakdown(inputs: &ScoreInputs) -> Breakdown {
    let churn_units = saturating(inputs.churn / CHURN_UNIT);
    Breakdown {
        files: -saturating(inputs.files).min(FILES_CAP),
        risky: -saturating(inputs.risky)
            .saturating_mul(PER_RISKY)
            .min(RISKY_CAP),
        public: if inputs.public_touched { -PUBLIC_PENALTY } else { 0 },
        tests: if inputs.tests_touched {
            TESTS_SWING
        } else {
            -TESTS_SWING
        },
        churn: -churn_units.saturating_mul(PER_CHURN_UNIT).min(CHURN_CAP),
    }
}

/// Pure; identical inputs always give identical scores.
pub fn safety_score(inputs: &ScoreInputs) -> SafetyScore {
    let raw = BASE + breakdown(inputs).total();
    SafetyScore {
        score: raw.clamp(0, 100) as u32,
        tests_touched: inputs.tests_touched,
        public_touched: inputs.public_touched,
    }
}

/// Score after the flat penalty for sensitive files, floored at zero.
pub fn adjusted_score(score: u32, has_sensitive: bool) -> u32 {
    if has_sensitive {
        score.saturating_sub(SENSITIVE_PENALTY)
    } else {
        score
    }
}

#[cfg(test)]
#[path = "scoring_test.rs"]
mod tests;

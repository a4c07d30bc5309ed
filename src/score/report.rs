use serde::Serialize;

use super::scoring::{BASE, Breakdown, SafetyScore, ScoreInputs};
use super::DiffStats;
use crate::report_helpers::{print_json_stdout, separator, yes_no};

pub fn print_report(score: &SafetyScore, parts: &Breakdown, inputs: &ScoreInputs) {
    let sep = separator(40);
    println!("Safety Score: {} / 100", score.score);
    println!("{sep}");
    println!(" {:<16} {:>6}", "Base", BASE);
    for (name, delta) in parts.rows() {
        println!(" {name:<16} {delta:>+6}");
    }
    println!("{sep}");
    println!(
        " files={} risky={} churn={} tests={} public={}",
        inputs.files,
        inputs.risky,
        inputs.churn,
        yes_no(score.tests_touched),
        yes_no(score.public_touched)
    );
}

#[derive(Serialize)]
struct JsonScore<'a> {
    #[serde(flatten)]
    score: &'a SafetyScore,
    breakdown: &'a Breakdown,
    additions: usize,
    deletions: usize,
}

pub fn print_json(
    score: &SafetyScore,
    parts: &Breakdown,
    stats: &DiffStats,
) -> Result<(), Box<dyn std::error::Error>> {
    print_json_stdout(&JsonScore {
        score,
        breakdown: parts,
        additions: stats.additions,
        deletions: stats.deletions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::scoring::{breakdown, safety_score};

    fn inputs() -> ScoreInputs {
        ScoreInputs {
            files: 7,
            risky: 1,
            public_touched: true,
            tests_touched: false,
            churn: 640,
        }
    }

    #[test]
    fn print_report_does_not_panic() {
        let i = inputs();
        print_report(&safety_score(&i), &breakdown(&i), &i);
    }

    #[test]
    fn print_json_does_not_panic() {
        let i = inputs();
        let stats = DiffStats {
            additions: 600,
            deletions: 40,
        };
        print_json(&safety_score(&i), &breakdown(&i), &stats).unwrap();
    }
}

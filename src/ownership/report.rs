use serde::Serialize;

use super::analyzer::OwnershipFingerprint;
use crate::report_helpers::{print_json_stdout, separator};

pub fn print_report(fp: &OwnershipFingerprint, files: usize, lookback_days: u32) {
    let sep = separator(60);
    println!("Ownership: {files} changed files, last {lookback_days} days");
    println!("{sep}");
    if fp.contributors.is_empty() {
        println!(" No history for the changed files.");
    } else {
        for (rank, name) in fp.contributors.iter().enumerate() {
            println!(" {:>2}. {name}", rank + 1);
        }
    }
    println!("{sep}");
    println!(" Bus factor: {}", fp.bus_factor);
    println!(" Top share:  {:.0}%", fp.top_share * 100.0);
}

#[derive(Serialize)]
struct JsonOwnership<'a> {
    files: usize,
    lookback_days: u32,
    #[serde(flatten)]
    fingerprint: &'a OwnershipFingerprint,
}

pub fn print_json(
    fp: &OwnershipFingerprint,
    files: usize,
    lookback_days: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    print_json_stdout(&JsonOwnership {
        files,
        lookback_days,
        fingerprint: fp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OwnershipFingerprint {
        OwnershipFingerprint {
            contributors: vec!["Alice".to_string(), "Bob".to_string()],
            bus_factor: 1,
            top_share: 0.7,
        }
    }

    #[test]
    fn print_report_does_not_panic() {
        print_report(&sample(), 4, 180);
    }

    #[test]
    fn print_report_no_history() {
        let fp = OwnershipFingerprint {
            contributors: vec![],
            bus_factor: 3,
            top_share: 0.0,
        };
        print_report(&fp, 0, 180);
    }

    #[test]
    fn print_json_does_not_panic() {
        print_json(&sample(), 4, 180).unwrap();
    }
}

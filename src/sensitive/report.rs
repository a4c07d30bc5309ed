use super::SensitiveMatch;
use crate::report_helpers::{max_width, print_json_stdout, separator};

pub fn print_report(matches: &[SensitiveMatch], scanned: usize) {
    if matches.is_empty() {
        println!("No sensitive files among {scanned} changed files.");
        return;
    }

    let max_file = max_width(matches.iter().map(|m| m.file.as_str()), 4);
    let max_reason = max_width(matches.iter().map(|m| m.reason.as_str()), 6);
    let sep = separator((max_file + max_reason + 12).max(60));

    println!("Sensitive files: {} of {scanned} changed", matches.len());
    println!("{sep}");
    println!(
        " {:<3} {:<fw$}  {:<rw$}  Pattern",
        "St",
        "File",
        "Reason",
        fw = max_file,
        rw = max_reason
    );
    println!("{sep}");
    for m in matches {
        println!(
            " {:<3} {:<fw$}  {:<rw$}  {}",
            m.status.marker(),
            m.file,
            m.reason,
            m.pattern,
            fw = max_file,
            rw = max_reason
        );
    }
    println!("{sep}");
}

pub fn print_json(matches: &[SensitiveMatch]) -> Result<(), Box<dyn std::error::Error>> {
    print_json_stdout(&matches)
}

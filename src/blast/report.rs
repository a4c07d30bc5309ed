use super::BlastRadius;
use crate::report_helpers::{max_width, print_json_stdout, separator};

pub fn print_report(radius: &BlastRadius) {
    if radius.files_changed == 0 {
        println!("No changed files.");
        return;
    }

    let max_label = max_width(radius.counts.iter().map(|d| d.label.as_str()), 6);
    let sep = separator((max_label + 20).max(40));

    println!(
        "Blast Radius: {} files, {} risky",
        radius.files_changed, radius.risky
    );
    println!("{sep}");
    println!(" {:<lw$} {:>6} {:>6}", "Domain", "Files", "%", lw = max_label);
    println!("{sep}");
    for d in &radius.counts {
        let pct = d.count as f64 / radius.files_changed as f64 * 100.0;
        println!(
            " {:<lw$} {:>6} {:>5.0}%",
            d.label,
            d.count,
            pct,
            lw = max_label
        );
    }
    println!("{sep}");
    println!(" Affects: {}", radius.affects.join(", "));
}

pub fn print_json(radius: &BlastRadius) -> Result<(), Box<dyn std::error::Error>> {
    print_json_stdout(radius)
}

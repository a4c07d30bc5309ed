use super::Assessment;
use crate::github::COMMENT_MARKER;
use crate::report_helpers::yes_no;
use crate::score::scoring::SENSITIVE_PENALTY;

/// Escape backslashes and pipe characters so markdown tables render
/// correctly. Backslashes must be escaped first to avoid double-escaping.
fn escape_md(s: &str) -> String {
    s.replace('\\', "\\\\").replace('|', "\\|")
}

/// Inline code for `s`. The fence is one backtick longer than the longest
/// backtick run inside, padded with a space when `s` starts or ends with one.
fn code_span(s: &str) -> String {
    let longest = s.split(|c| c != '`').map(str::len).max().unwrap_or(0);
    let fence = "`".repeat(longest + 1);
    let pad = if s.starts_with('`') || s.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{fence}{pad}{s}{pad}{fence}")
}

/// Code span inside a table cell. Backslashes are literal in code, so only
/// pipes are escaped.
fn code_cell(s: &str) -> String {
    code_span(&s.replace('|', "\\|"))
}

fn code_list(items: &[String]) -> String {
    items
        .iter()
        .map(|f| code_span(f))
        .collect::<Vec<_>>()
        .join(", ")
}

fn score_line(a: &Assessment) -> String {
    if a.adjusted_score == a.safety.score {
        format!("**Safety score: {} / 100**", a.adjusted_score)
    } else {
        format!(
            "**Safety score: {} / 100** (base {}, -{SENSITIVE_PENALTY} for sensitive files)",
            a.adjusted_score, a.safety.score
        )
    }
}

/// The PR comment body. Starts with the hidden marker so a later run can
/// find and edit it.
pub fn render(a: &Assessment) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push(COMMENT_MARKER.to_string());
    out.push(match a.pr_number {
        Some(n) => format!("## Nightwatch report for #{n}"),
        None => "## Nightwatch report".to_string(),
    });
    out.push(String::new());
    out.push(score_line(a));
    out.push(String::new());

    out.push("| Signal | Value |".to_string());
    out.push("|--------|-------|".to_string());
    out.push(format!(
        "| Developer state | fatigue: {} (late-night commits this week: {}) |",
        yes_no(a.state.fatigue),
        a.state.late_week
    ));
    out.push(format!("| Blast radius | {} |", a.blast.summary()));
    out.push(format!(
        "| Files changed | {} ({} risky) |",
        a.blast.files_changed, a.blast.risky
    ));
    out.push(format!(
        "| Churn | +{} / -{} |",
        a.stats.additions, a.stats.deletions
    ));
    out.push(format!("| Tests touched | {} |", yes_no(a.has_tests)));
    out.push(format!(
        "| Public surface | {} |",
        yes_no(a.safety.public_touched)
    ));

    out.push(String::new());
    out.push("### Sensitive files".to_string());
    out.push(String::new());
    if a.sensitive.is_empty() {
        out.push("None detected.".to_string());
    } else {
        out.push("| File | Status | Reason | Pattern |".to_string());
        out.push("|------|:------:|--------|---------|".to_string());
        for m in &a.sensitive {
            out.push(format!(
                "| {} | {} | {} | {} |",
                code_cell(&m.file),
                m.status.marker(),
                escape_md(&m.reason),
                code_cell(&m.pattern)
            ));
        }
    }

    out.push(String::new());
    out.push("### Ownership".to_string());
    out.push(String::new());
    if a.mentions.is_empty() {
        out.push("No recent history for the changed files.".to_string());
    } else {
        out.push(format!("Recent contributors: {}", a.mentions.join(", ")));
    }
    out.push(String::new());
    out.push(format!(
        "Bus factor: **{}**, top contributor share: **{:.0}%**",
        a.ownership.bus_factor,
        a.ownership.top_share * 100.0
    ));

    if !a.overlaps.is_empty() {
        out.push(String::new());
        out.push("### Overlapping pull requests".to_string());
        out.push(String::new());
        for o in &a.overlaps {
            out.push(format!(
                "- [#{} {}]({}): {}",
                o.number,
                escape_md(&o.title),
                o.url,
                code_list(&o.files)
            ));
        }
    }

    out.push(String::new());
    out.push("---".to_string());
    out.push(format!(
        "<sub>nightwatch v{} · {} commits analyzed</sub>",
        a.version, a.commits
    ));
    out.push(String::new());
    out.join("\n")
}

#[cfg(test)]
#[path = "markdown_test.rs"]
mod tests;

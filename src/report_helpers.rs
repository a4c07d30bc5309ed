use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Terminal column width of `s`.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Widest display width among `items`, with a minimum of `min`.
pub fn max_width<'a>(items: impl Iterator<Item = &'a str>, min: usize) -> usize {
    items.map(display_width).max().unwrap_or(min).max(min)
}

/// Print a horizontal separator of box-drawing chars.
pub fn separator(width: usize) -> String {
    "\u{2500}".repeat(width)
}

/// Serialize to pretty JSON and print to stdout.
pub fn print_json_stdout(value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a yes/no flag the way every table does.
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
#[path = "report_helpers_test.rs"]
mod tests;

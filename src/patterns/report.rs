use serde::Serialize;

use super::{PatternConfig, PatternRule, PatternSources, Tier};
use crate::report_helpers::{max_width, print_json_stdout, separator};

fn print_section(title: &str, tier: Tier, rules: &[PatternRule], width: usize) {
    println!(" {title} ({}, {} rules)", tier.label(), rules.len());
    for rule in rules {
        match &rule.reason {
            Some(reason) => println!("   {:<width$}  {reason}", rule.display()),
            None => println!("   {}", rule.display()),
        }
    }
}

pub fn print_report(cfg: &PatternConfig, sources: &PatternSources) {
    let width = max_width(
        cfg.banned.iter().chain(&cfg.allowed).map(PatternRule::display),
        7,
    );
    let sep = separator((width + 30).max(60));

    println!("Effective pattern configuration");
    println!("{sep}");
    println!(
        " inline: {}",
        if sources.inline.is_some() { "set" } else { "unset" }
    );
    println!(" file:   {}", sources.file.display());
    println!("{sep}");
    print_section("banned", cfg.banned_tier, &cfg.banned, width);
    println!();
    print_section("allowed", cfg.allowed_tier, &cfg.allowed, width);
    println!("{sep}");
}

#[derive(Serialize)]
struct JsonRule<'a> {
    pattern: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonSection<'a> {
    tier: Tier,
    rules: Vec<JsonRule<'a>>,
}

#[derive(Serialize)]
struct JsonConfig<'a> {
    file: String,
    inline: bool,
    banned: JsonSection<'a>,
    allowed: JsonSection<'a>,
}

fn section(tier: Tier, rules: &[PatternRule]) -> JsonSection<'_> {
    JsonSection {
        tier,
        rules: rules
            .iter()
            .map(|r| JsonRule {
                pattern: r.display(),
                reason: r.reason.as_deref(),
            })
            .collect(),
    }
}

pub fn print_json(
    cfg: &PatternConfig,
    sources: &PatternSources,
) -> Result<(), Box<dyn std::error::Error>> {
    print_json_stdout(&JsonConfig {
        file: sources.file.display().to_string(),
        inline: sources.inline.is_some(),
        banned: section(cfg.banned_tier, &cfg.banned),
        allowed: section(cfg.allowed_tier, &cfg.allowed),
    })
}

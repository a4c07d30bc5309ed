//! Banned/allowed filename patterns used by the sensitive-file detector.
//!
//! Patterns come from three tiers, tried per section: an inline
//! configuration string (usually `DANGEROUS_PATTERNS`), a configuration
//! file (`dangerous-patterns.yml` unless overridden), and built-in
//! defaults. A section that is missing or has no usable pattern in one
//! tier falls through to the next; `banned` and `allowed` resolve
//! independently of each other.

pub mod parser;
pub mod reasons;
mod report;

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Settings;
use parser::{RawConfig, RawEntry};
use report::{print_json, print_report};

/// A compiled filename pattern with an optional human-readable reason.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub pattern: Regex,
    pub reason: Option<String>,
    display: String,
}

impl PatternRule {
    /// Display form, `/body/flags`.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}

impl fmt::Display for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Which tier a section was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Inline,
    File,
    Default,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Inline => "inline",
            Tier::File => "file",
            Tier::Default => "default",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternConfig {
    pub banned: Vec<PatternRule>,
    pub allowed: Vec<PatternRule>,
    pub banned_tier: Tier,
    pub allowed_tier: Tier,
}

impl PatternConfig {
    /// True when any allowed pattern matches the path.
    pub fn is_allowed(&self, path: &str) -> bool {
        self.allowed.iter().any(|rule| rule.is_match(path))
    }

    /// First banned rule matching the path, in configured order.
    pub fn first_banned(&self, path: &str) -> Option<&PatternRule> {
        self.banned.iter().find(|rule| rule.is_match(path))
    }
}

/// Where to look for pattern configuration. Built once from `Settings`.
#[derive(Debug, Clone, Default)]
pub struct PatternSources {
    pub inline: Option<String>,
    pub file: PathBuf,
}

impl PatternSources {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            inline: settings.patterns_inline.clone(),
            file: settings.patterns_file.clone(),
        }
    }
}

const DEFAULT_BANNED: &[(&str, &str)] = &[(r"^\.env$", "Dotenv file")];

const DEFAULT_ALLOWED: &[&str] = &[
    r"^\.env\.example$",
    r"\.example$",
    "sample",
    "fixtures?",
    "test-data",
];

/// Built-in banned rules.
pub fn default_banned() -> Vec<PatternRule> {
    DEFAULT_BANNED
        .iter()
        .filter_map(|(pattern, reason)| {
            let mut rule = compile(pattern)?;
            rule.reason = Some(reason.to_string());
            Some(rule)
        })
        .collect()
}

/// Built-in allowed rules.
pub fn default_allowed() -> Vec<PatternRule> {
    DEFAULT_ALLOWED.iter().filter_map(|p| compile(p)).collect()
}

/// Resolve the effective configuration. Never fails: unreadable sources and
/// bad patterns only make a tier fall through.
pub fn load(sources: &PatternSources) -> PatternConfig {
    let inline = sources
        .inline
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parser::parse);

    let file = match fs::read_to_string(&sources.file) {
        Ok(text) => Some(parser::parse(&text)),
        Err(err) => {
            debug!(path = %sources.file.display(), "no pattern file: {err}");
            None
        }
    };

    let (banned, banned_tier) = resolve(
        [(Tier::Inline, &inline), (Tier::File, &file)],
        |raw| normalize_banned(&raw.banned),
        default_banned,
    );
    let (allowed, allowed_tier) = resolve(
        [(Tier::Inline, &inline), (Tier::File, &file)],
        |raw| normalize_allowed(&raw.allowed),
        default_allowed,
    );

    debug!(
        banned = banned.len(),
        banned_tier = banned_tier.label(),
        allowed = allowed.len(),
        allowed_tier = allowed_tier.label(),
        "pattern configuration loaded"
    );

    PatternConfig {
        banned,
        allowed,
        banned_tier,
        allowed_tier,
    }
}

fn resolve(
    tiers: [(Tier, &Option<RawConfig>); 2],
    normalize: impl Fn(&RawConfig) -> Vec<PatternRule>,
    default: impl FnOnce() -> Vec<PatternRule>,
) -> (Vec<PatternRule>, Tier) {
    for (tier, raw) in tiers {
        if let Some(raw) = raw {
            let rules = normalize(raw);
            if !rules.is_empty() {
                return (rules, tier);
            }
        }
    }
    (default(), Tier::Default)
}

/// `nw patterns`: show the effective configuration and where each section
/// came from.
pub fn run(settings: &Settings, json: bool) -> Result<(), Box<dyn Error>> {
    let sources = PatternSources::from_settings(settings);
    let cfg = load(&sources);
    if json {
        print_json(&cfg, &sources)
    } else {
        print_report(&cfg, &sources);
        Ok(())
    }
}

/// Compile banned entries, keeping their reasons. Bad patterns are dropped.
pub fn normalize_banned(entries: &[RawEntry]) -> Vec<PatternRule> {
    entries
        .iter()
        .filter_map(|entry| {
            let mut rule = compile(&entry.pattern)?;
            rule.reason = entry.reason.as_deref().map(unquote).map(str::to_string);
            Some(rule)
        })
        .collect()
}

/// Compile allowed entries. Reasons carry no meaning here and are dropped.
pub fn normalize_allowed(entries: &[RawEntry]) -> Vec<PatternRule> {
    entries.iter().filter_map(|e| compile(&e.pattern)).collect()
}

/// Compile one configured value into a rule, logging and skipping invalid
/// patterns.
pub fn compile(value: &str) -> Option<PatternRule> {
    match try_compile(value) {
        Ok(rule) => Some(rule),
        Err(err) => {
            warn!("skipping pattern {value:?}: {err}");
            None
        }
    }
}

/// `/body/flags` honors the `i`, `m`, `s` and `x` flags; any other value is
/// compiled case-insensitively.
fn try_compile(value: &str) -> Result<PatternRule, Box<dyn Error>> {
    let value = unquote(value.trim());
    if value.is_empty() {
        return Err("empty pattern".into());
    }

    let (body, flags) = match split_literal(value) {
        Some(parts) => parts,
        None => (value, "i"),
    };

    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => return Err(format!("unsupported flag '{other}'").into()),
        };
    }
    let pattern = builder.build()?;

    Ok(PatternRule {
        pattern,
        reason: None,
        display: format!("/{body}/{flags}"),
    })
}

/// Split `/body/flags` into its parts.
fn split_literal(value: &str) -> Option<(&str, &str)> {
    let inner = value.strip_prefix('/')?;
    let end = inner.rfind('/')?;
    let (body, flags) = (&inner[..end], &inner[end + 1..]);
    if body.is_empty() {
        return None;
    }
    Some((body, flags))
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value
                .strip_prefix(quote)
                .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

//! Run settings, assembled once in `main` and passed down explicitly.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! settings file, environment variables, then command-line flags (applied
//! by the caller).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::timezone::TimeZoneRule;

pub const DEFAULT_SETTINGS_FILE: &str = "nightwatch.toml";
pub const DEFAULT_PATTERNS_FILE: &str = "dangerous-patterns.yml";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BASE_REF: &str = "main";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OwnershipSettings {
    /// History window for authorship, in days.
    pub lookback_days: u32,
    /// Number of ranked contributors to keep.
    pub top: usize,
}

impl Default for OwnershipSettings {
    fn default() -> Self {
        Self {
            lookback_days: 180,
            top: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FatigueSettings {
    /// Most recent commits inspected.
    pub sample: usize,
    /// Only commits this recent count.
    pub window_days: u32,
    /// Late-night band, `[late_start, late_end)` local hours.
    pub late_start: u32,
    pub late_end: u32,
    /// Late-night commits needed to flag fatigue.
    pub threshold: usize,
}

impl Default for FatigueSettings {
    fn default() -> Self {
        Self {
            sample: 50,
            window_days: 7,
            late_start: 0,
            late_end: 5,
            threshold: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainRule {
    pub name: String,
    pub globs: Vec<String>,
}

/// Extra classification globs, consulted before the built-in tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifySettings {
    pub domains: Vec<DomainRule>,
    pub risky: Vec<String>,
    pub public: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PatternsSection {
    file: Option<PathBuf>,
}

/// On-disk layout of `nightwatch.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    timezone: Option<String>,
    base: Option<String>,
    ownership: OwnershipSettings,
    fatigue: FatigueSettings,
    classify: ClassifySettings,
    patterns: PatternsSection,
}

/// Where the review runs on the code-hosting platform.
#[derive(Debug, Clone, Default)]
pub struct GitHubContext {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub api_url: String,
    pub pr_number: Option<u64>,
}

impl GitHubContext {
    /// Owner and repository name, when both are known.
    pub fn slug(&self) -> Option<(&str, &str)> {
        Some((self.owner.as_deref()?, self.repo.as_deref()?))
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub repo_path: PathBuf,
    pub base_ref: String,
    pub timezone: TimeZoneRule,
    pub ownership: OwnershipSettings,
    pub fatigue: FatigueSettings,
    pub classify: ClassifySettings,
    pub patterns_inline: Option<String>,
    pub patterns_file: PathBuf,
    pub github: GitHubContext,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            base_ref: DEFAULT_BASE_REF.to_string(),
            timezone: TimeZoneRule::default(),
            ownership: OwnershipSettings::default(),
            fatigue: FatigueSettings::default(),
            classify: ClassifySettings::default(),
            patterns_inline: None,
            patterns_file: PathBuf::from(DEFAULT_PATTERNS_FILE),
            github: GitHubContext {
                api_url: DEFAULT_API_URL.to_string(),
                ..Default::default()
            },
        }
    }
}

/// Subset of the platform event payload we care about.
#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    base: Option<BaseRefPayload>,
}

#[derive(Debug, Deserialize)]
struct BaseRefPayload {
    #[serde(rename = "ref")]
    name: String,
}

impl Settings {
    /// Load settings for the repository at `repo_path`.
    ///
    /// `config` names an explicit settings file (an error if unreadable);
    /// otherwise `NIGHTWATCH_CONFIG`, then `nightwatch.toml` in the
    /// repository, are used when present. `env` looks up environment
    /// variables.
    pub fn load(
        repo_path: &Path,
        config: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let explicit = config
            .map(Path::to_path_buf)
            .or_else(|| env("NIGHTWATCH_CONFIG").map(PathBuf::from));
        let file = match explicit {
            Some(path) => Some(read_settings_file(&path)?),
            None => {
                let implicit = repo_path.join(DEFAULT_SETTINGS_FILE);
                if implicit.is_file() {
                    Some(read_settings_file(&implicit)?)
                } else {
                    None
                }
            }
        }
        .unwrap_or_default();

        let mut settings = Settings {
            repo_path: repo_path.to_path_buf(),
            ownership: file.ownership,
            fatigue: file.fatigue,
            classify: file.classify,
            ..Settings::default()
        };

        if let Some(base) = file.base {
            settings.base_ref = base;
        }
        if let Some(tz) = env("NIGHTWATCH_TZ").or(file.timezone) {
            settings.timezone = tz.parse()?;
        }

        settings.patterns_inline = env("DANGEROUS_PATTERNS");
        settings.patterns_file = env("DANGEROUS_PATTERNS_FILE")
            .map(PathBuf::from)
            .or(file.patterns.file)
            .unwrap_or_else(|| repo_path.join(DEFAULT_PATTERNS_FILE));

        settings.github.token = env("GITHUB_TOKEN");
        if let Some(url) = env("GITHUB_API_URL") {
            settings.github.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(slug) = env("GITHUB_REPOSITORY") {
            let (owner, repo) = parse_slug(&slug)?;
            settings.github.owner = Some(owner);
            settings.github.repo = Some(repo);
        }
        if let Some(base) = env("GITHUB_BASE_REF") {
            settings.base_ref = base;
        }
        if let Some(path) = env("GITHUB_EVENT_PATH") {
            let event = read_event(Path::new(&path))?;
            if let Some(pr) = event.pull_request {
                settings.github.pr_number = Some(pr.number);
                if let Some(base) = pr.base {
                    settings.base_ref = base.name;
                }
            }
        }

        settings.validate()?;
        debug!(
            base = %settings.base_ref,
            timezone = %settings.timezone,
            pr = ?settings.github.pr_number,
            "settings loaded"
        );
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let (start, end) = (self.fatigue.late_start, self.fatigue.late_end);
        if start >= end || end > 24 {
            return Err(ConfigError::LateNightBand { start, end });
        }
        Ok(())
    }
}

fn read_settings_file(path: &Path) -> Result<SettingsFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn read_event(path: &Path) -> Result<EventPayload, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Event {
        path: path.to_path_buf(),
        source,
    })
}

/// Split `owner/name`.
pub fn parse_slug(slug: &str) -> Result<(String, String), ConfigError> {
    match slug.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ConfigError::Repository(slug.to_string())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

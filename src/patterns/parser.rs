//! Line-oriented reader for the `dangerous-patterns.yml` format.
//!
//! Only a tiny YAML-looking subset is understood:
//!
//! ```text
//! banned:
//!   - \.pem$
//!   - pattern: id_rsa
//!     reason: SSH key
//! allowed:
//!   - fixtures?/
//! ```
//!
//! Everything else is skipped silently, so a real YAML file with extra
//! keys still yields whatever `banned`/`allowed` entries it contains.

/// One list item as written in the file, before regex compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub pattern: String,
    pub reason: Option<String>,
}

impl RawEntry {
    fn bare(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            reason: None,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RawConfig {
    pub banned: Vec<RawEntry>,
    pub allowed: Vec<RawEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Banned,
    Allowed,
}

impl RawConfig {
    fn section_mut(&mut self, section: Section) -> &mut Vec<RawEntry> {
        match section {
            Section::Banned => &mut self.banned,
            Section::Allowed => &mut self.allowed,
        }
    }
}

/// Parse the restricted format. Never fails: unknown lines are ignored.
pub fn parse(src: &str) -> RawConfig {
    let mut data = RawConfig::default();
    let mut current: Option<Section> = None;
    // Index into the current section of the last `- pattern:` entry.
    let mut pending: Option<usize> = None;

    for line in src.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if !line.starts_with(' ') && !line.starts_with('\t') && trimmed.ends_with(':') {
            current = match trimmed[..trimmed.len() - 1].trim() {
                "banned" => Some(Section::Banned),
                "allowed" => Some(Section::Allowed),
                _ => None,
            };
            pending = None;
            continue;
        }

        let Some(section) = current else {
            continue;
        };
        let list = data.section_mut(section);

        if let Some(value) = pattern_item(trimmed) {
            list.push(RawEntry::bare(value));
            pending = Some(list.len() - 1);
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('-') {
            let value = rest.trim();
            if !value.is_empty() {
                list.push(RawEntry::bare(value));
            }
            pending = None;
            continue;
        }

        if let Some(value) = reason_line(trimmed)
            && let Some(idx) = pending
        {
            list[idx].reason = Some(value.to_string());
        }
    }

    data
}

/// Match `- pattern: <value>`; the dash must be followed by whitespace and
/// the value must be non-empty.
fn pattern_item(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix('-')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let value = rest.trim_start().strip_prefix("pattern:")?.trim();
    (!value.is_empty()).then_some(value)
}

/// Match `reason: <value>` with a case-insensitive key.
fn reason_line(trimmed: &str) -> Option<&str> {
    const KEY: &str = "reason:";
    let head = trimmed.get(..KEY.len())?;
    if !head.eq_ignore_ascii_case(KEY) {
        return None;
    }
    let value = trimmed[KEY.len()..].trim();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;

use std::collections::{HashMap, HashSet};

use crate::github::CommitRecord;

/// Map contributor names to `@handle` mentions using pull request commits.
///
/// Only commits carrying both a handle and a display name feed the lookup,
/// which is case-insensitive on the name; later commits win. Unmatched
/// names pass through unchanged. The result has no duplicates and keeps
/// first-occurrence order.
pub fn contributor_mentions(contributors: &[String], commits: &[CommitRecord]) -> Vec<String> {
    let mut handles: HashMap<String, String> = HashMap::new();
    for commit in commits {
        if let (Some(handle), Some(name)) = (&commit.author_handle, &commit.author_name) {
            handles.insert(name.to_lowercase(), format!("@{handle}"));
        }
    }

    let mut seen = HashSet::new();
    contributors
        .iter()
        .map(|name| {
            handles
                .get(&name.to_lowercase())
                .cloned()
                .unwrap_or_else(|| name.clone())
        })
        .filter(|mention| seen.insert(mention.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(handle: Option<&str>, name: Option<&str>) -> CommitRecord {
        CommitRecord {
            author_handle: handle.map(str::to_string),
            author_name: name.map(str::to_string),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn maps_names_to_handles() {
        let commits = vec![record(Some("alice"), Some("Alice Liddell"))];
        let out = contributor_mentions(&names(&["alice liddell", "Bob"]), &commits);
        assert_eq!(out, vec!["@alice", "Bob"]);
    }

    #[test]
    fn incomplete_records_are_ignored() {
        let commits = vec![record(None, Some("Bob")), record(Some("bob"), None)];
        let out = contributor_mentions(&names(&["Bob"]), &commits);
        assert_eq!(out, vec!["Bob"]);
    }

    #[test]
    fn later_records_overwrite() {
        let commits = vec![
            record(Some("old-handle"), Some("Dana")),
            record(Some("dana"), Some("DANA")),
        ];
        let out = contributor_mentions(&names(&["Dana"]), &commits);
        assert_eq!(out, vec!["@dana"]);
    }

    #[test]
    fn duplicates_removed_preserving_order() {
        // Two spellings of the same person resolve to one handle.
        let commits = vec![
            record(Some("ed"), Some("Ed Smith")),
            record(Some("ed"), Some("Edward Smith")),
        ];
        let out = contributor_mentions(
            &names(&["Zoe", "Ed Smith", "Edward Smith", "Zoe", "Amy"]),
            &commits,
        );
        assert_eq!(out, vec!["Zoe", "@ed", "Amy"]);
    }

    #[test]
    fn empty_inputs() {
        assert!(contributor_mentions(&[], &[]).is_empty());
        assert_eq!(contributor_mentions(&names(&["A"]), &[]), vec!["A"]);
    }
}

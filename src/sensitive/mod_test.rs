use super::*;
use crate::patterns::{PatternRule, Tier, compile, default_allowed, default_banned};

fn config(banned: &[&str], allowed: &[&str]) -> PatternConfig {
    PatternConfig {
        banned: banned.iter().filter_map(|p| compile(p)).collect(),
        allowed: allowed.iter().filter_map(|p| compile(p)).collect(),
        banned_tier: Tier::Inline,
        allowed_tier: Tier::Inline,
    }
}

fn files(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

#[test]
fn allowed_overrides_banned() {
    let cfg = config(&[r"\.env"], &[r"^\.env\.example$"]);
    let out = find_sensitive_files(
        &cfg,
        &HashMap::new(),
        &files(&[".env", ".env.example", "src/app.js"]),
    );
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].file, ".env");
    assert_eq!(out[0].reason, "Dotenv secrets");
    assert_eq!(out[0].status, ChangeStatus::Modified);
}

#[test]
fn path_matching_both_is_never_reported() {
    let cfg = config(&["secret"], &["secret"]);
    let out = find_sensitive_files(&cfg, &HashMap::new(), &files(&["secret.txt"]));
    assert!(out.is_empty());
}

#[test]
fn first_banned_rule_wins() {
    let mut cfg = config(&[r"\.pem$", "certs/"], &[]);
    cfg.banned[1].reason = Some("Cert dir".to_string());
    let out = find_sensitive_files(&cfg, &HashMap::new(), &files(&["certs/a.pem"]));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].pattern, r"/\.pem$/i");
    assert_eq!(out[0].reason, "Private key");
}

#[test]
fn rule_reason_used_when_present() {
    let mut cfg = config(&["vault"], &[]);
    cfg.banned[0].reason = Some("Vault material".to_string());
    let out = find_sensitive_files(&cfg, &HashMap::new(), &files(&["ops/vault.hcl"]));
    assert_eq!(out[0].reason, "Vault material");
}

#[test]
fn generic_reason_when_unknown() {
    let cfg = config(&["blueprint"], &[]);
    let out = find_sensitive_files(&cfg, &HashMap::new(), &files(&["blueprint.txt"]));
    assert_eq!(out[0].reason, "Sensitive (/blueprint/i)");
}

#[test]
fn status_taken_from_map() {
    let cfg = config(&[r"\.key$"], &[]);
    let statuses = HashMap::from([
        ("a.key".to_string(), ChangeStatus::Added),
        ("b.key".to_string(), ChangeStatus::Deleted),
    ]);
    let out = find_sensitive_files(&cfg, &statuses, &files(&["a.key", "b.key", "c.key"]));
    let got: Vec<_> = out.iter().map(|m| m.status.marker()).collect();
    assert_eq!(got, vec!["A", "D", "M"]);
}

#[test]
fn preserves_input_order() {
    let cfg = config(&[r"\.log$"], &[]);
    let out = find_sensitive_files(&cfg, &HashMap::new(), &files(&["z.log", "a.log", "m.log"]));
    let got: Vec<_> = out.iter().map(|m| m.file.as_str()).collect();
    assert_eq!(got, vec!["z.log", "a.log", "m.log"]);
}

#[test]
fn built_in_defaults() {
    let cfg = PatternConfig {
        banned: default_banned(),
        allowed: default_allowed(),
        banned_tier: Tier::Default,
        allowed_tier: Tier::Default,
    };
    let out = find_sensitive_files(
        &cfg,
        &HashMap::new(),
        &files(&[".env", ".env.example", "config/.env"]),
    );
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].reason, "Dotenv file");
}

#[test]
fn no_rules_no_matches() {
    let cfg = PatternConfig {
        banned: Vec::<PatternRule>::new(),
        allowed: Vec::new(),
        banned_tier: Tier::Default,
        allowed_tier: Tier::Default,
    };
    assert!(find_sensitive_files(&cfg, &HashMap::new(), &files(&[".env"])).is_empty());
}

#[test]
fn missing_base_degrades_to_empty_status_map() {
    let (dir, repo) = crate::git::test_support::create_test_repo();
    crate::git::test_support::make_commit(&repo, &[("a.txt", "x")], "init");
    let git_repo = GitRepo::open(dir.path()).unwrap();
    assert!(status_map(&git_repo, "does-not-exist").is_empty());
}

use super::test_support::*;
use super::*;
use std::fs;

#[test]
fn test_open_repo() {
    let (dir, _repo) = create_test_repo();
    let git_repo = GitRepo::open(dir.path()).unwrap();
    assert_eq!(
        git_repo.root().canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
}

#[test]
fn test_open_not_repo() {
    let dir = tempfile::tempdir().unwrap();
    // Plain directory, no git init
    let sub = dir.path().join("not_a_repo");
    fs::create_dir_all(&sub).unwrap();
    assert!(GitRepo::open(&sub).is_err());
}

/// Base commit with `keep.txt`, `gone.txt`, `edit.txt`; HEAD adds `new.txt`,
/// edits `edit.txt` and deletes `gone.txt`.
fn branch_fixture() -> (tempfile::TempDir, Repository) {
    let (dir, repo) = create_test_repo();
    let base = make_commit_at(
        &repo,
        &[
            ("keep.txt", "same\n"),
            ("gone.txt", "bye\n"),
            ("edit.txt", "one\ntwo\n"),
        ],
        "base",
        1_000_000,
    );
    mark_base(&repo, base);
    make_commit_at(
        &repo,
        &[("new.txt", "a\nb\nc\n"), ("edit.txt", "one\nTWO\nthree\n")],
        "work",
        1_000_100,
    );
    delete_and_commit(&repo, "gone.txt", 1_000_200);
    (dir, repo)
}

#[test]
fn test_diff_name_status() {
    let (dir, _repo) = branch_fixture();
    let git_repo = GitRepo::open(dir.path()).unwrap();
    let mut entries = git_repo.diff_name_status("base").unwrap();
    entries.sort_by(|a, b| a.1.cmp(&b.1));
    assert_eq!(
        entries,
        vec![
            (ChangeStatus::Modified, "edit.txt".to_string()),
            (ChangeStatus::Deleted, "gone.txt".to_string()),
            (ChangeStatus::Added, "new.txt".to_string()),
        ]
    );
}

#[test]
fn test_diff_numstat_totals() {
    let (dir, _repo) = branch_fixture();
    let git_repo = GitRepo::open(dir.path()).unwrap();
    let stats = git_repo.diff_numstat("base").unwrap();
    assert_eq!(stats.len(), 3);
    let additions: usize = stats.iter().map(|s| s.additions).sum();
    let deletions: usize = stats.iter().map(|s| s.deletions).sum();
    // new.txt +3, edit.txt +2 -1, gone.txt -1
    assert_eq!(additions, 5);
    assert_eq!(deletions, 2);
}

#[test]
fn test_diff_name_only() {
    let (dir, _repo) = branch_fixture();
    let git_repo = GitRepo::open(dir.path()).unwrap();
    let mut files = git_repo.diff_name_only("base").unwrap();
    files.sort();
    assert_eq!(files, vec!["edit.txt", "gone.txt", "new.txt"]);
}

#[test]
fn test_unknown_base_is_error() {
    let (dir, _repo) = branch_fixture();
    let git_repo = GitRepo::open(dir.path()).unwrap();
    let err = git_repo.diff_name_status("nope").unwrap_err();
    assert!(err.to_string().contains("unknown base ref"), "got: {err}");
}

#[test]
fn test_authors_by_path() {
    let (dir, repo) = create_test_repo();
    commit_as(&repo, "Alice", &[("a.rs", "1")], "a1", 1_000_000);
    commit_as(&repo, "Bob", &[("a.rs", "2"), ("b.rs", "1")], "b1", 1_000_100);
    commit_as(&repo, "Alice", &[("a.rs", "3")], "a2", 1_000_200);

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let map = git_repo
        .authors_by_path(&["a.rs".to_string(), "b.rs".to_string()], None)
        .unwrap();

    let mut a = map["a.rs"].clone();
    a.sort();
    assert_eq!(a, vec!["Alice", "Alice", "Bob"]);
    assert_eq!(map["b.rs"], vec!["Bob"]);
}

#[test]
fn test_authors_since_window() {
    let (dir, repo) = create_test_repo();
    commit_as(&repo, "Old", &[("a.rs", "1")], "old", 1_000_000);
    commit_as(&repo, "New", &[("a.rs", "2")], "new", 2_000_000);

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let map = git_repo
        .authors_by_path(&["a.rs".to_string()], Some(1_500_000))
        .unwrap();
    assert_eq!(map["a.rs"], vec!["New"]);
}

#[test]
fn test_authors_include_merge_that_differs_from_every_parent() {
    let (dir, repo) = create_test_repo();
    let root = commit_as(
        &repo,
        "Alice",
        &[("a.rs", "base"), ("b.rs", "base")],
        "root",
        1_000_000,
    );
    let main = commit_as(&repo, "Bob", &[("a.rs", "bob")], "bob", 1_000_100);
    let side = commit_with_parents(
        &repo,
        "Carol",
        &[root],
        &[("a.rs", "carol"), ("b.rs", "carol")],
        "carol",
        1_000_200,
        None,
    );
    // a.rs resolved by hand; b.rs taken from the side branch as is.
    commit_with_parents(
        &repo,
        "Dave",
        &[main, side],
        &[("a.rs", "resolved"), ("b.rs", "carol")],
        "merge",
        1_000_300,
        Some("HEAD"),
    );

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let map = git_repo
        .authors_by_path(&["a.rs".to_string(), "b.rs".to_string()], None)
        .unwrap();

    let mut a = map["a.rs"].clone();
    a.sort();
    assert_eq!(a, vec!["Alice", "Bob", "Carol", "Dave"]);
    let mut b = map["b.rs"].clone();
    b.sort();
    assert_eq!(b, vec!["Alice", "Carol"]);
}

#[test]
fn test_authors_walk_stops_before_old_history() {
    let (dir, repo) = create_test_repo();
    let ancient = commit_as(&repo, "Ancient", &[("a.rs", "0")], "root", 900_000);
    for i in 1..=8 {
        let content = i.to_string();
        commit_as(&repo, "Old", &[("a.rs", &content)], "old", 1_000_000 + i);
    }
    commit_as(&repo, "New", &[("a.rs", "n1")], "n1", 2_000_000);
    commit_as(&repo, "New", &[("a.rs", "n2")], "n2", 2_000_100);
    // Anything reaching the root commit now fails.
    drop_object(&repo, ancient);

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let map = git_repo
        .authors_by_path(&["a.rs".to_string()], Some(1_500_000))
        .unwrap();
    assert_eq!(map["a.rs"], vec!["New", "New"]);
}

#[test]
fn test_authors_skip_unreadable_commit() {
    let (dir, repo) = create_test_repo();
    commit_as(&repo, "Alice", &[("a.rs", "1")], "a1", 1_000_000);
    let bob = commit_as(&repo, "Bob", &[("a.rs", "2")], "b1", 1_000_100);
    let bob_tree = repo.find_commit(bob).unwrap().tree_id();
    drop_object(&repo, bob_tree);

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let map = git_repo
        .authors_by_path(&["a.rs".to_string()], None)
        .unwrap();
    assert_eq!(map["a.rs"], vec!["Alice"]);
}

#[test]
fn test_authors_no_paths_is_empty() {
    let (dir, repo) = create_test_repo();
    make_commit(&repo, &[("a.rs", "1")], "a");
    let git_repo = GitRepo::open(dir.path()).unwrap();
    assert!(git_repo.authors_by_path(&[], None).unwrap().is_empty());
}

#[test]
fn test_authors_unknown_path_is_empty() {
    let (dir, repo) = create_test_repo();
    make_commit(&repo, &[("a.rs", "1")], "a");
    let git_repo = GitRepo::open(dir.path()).unwrap();
    let map = git_repo
        .authors_by_path(&["missing.rs".to_string()], None)
        .unwrap();
    assert!(!map.contains_key("missing.rs"));
}

#[test]
fn test_recent_commit_times() {
    let (dir, repo) = create_test_repo();
    make_commit_at(&repo, &[("a", "1")], "1", 1_000);
    make_commit_at(&repo, &[("a", "2")], "2", 2_000);
    make_commit_at(&repo, &[("a", "3")], "3", 3_000);

    let git_repo = GitRepo::open(dir.path()).unwrap();
    assert_eq!(git_repo.recent_commit_times(2).unwrap(), vec![3_000, 2_000]);
    assert_eq!(git_repo.recent_commit_times(10).unwrap().len(), 3);
}

#[test]
fn test_empty_repo() {
    let (dir, _repo) = create_test_repo();
    let git_repo = GitRepo::open(dir.path()).unwrap();

    // Empty repo has no HEAD, revwalk.push_head() will fail
    assert!(git_repo.recent_commit_times(50).is_err());
    assert!(git_repo.authors_by_path(&[], None).is_err());
}

#[test]
fn test_change_status_markers() {
    assert_eq!(ChangeStatus::default(), ChangeStatus::Modified);
    assert_eq!(ChangeStatus::Renamed.marker(), "R");
    assert_eq!(
        serde_json::to_string(&ChangeStatus::Added).unwrap(),
        "\"A\""
    );
}

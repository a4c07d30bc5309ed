//! Throwaway repositories for git-backed tests.

use std::fs;
use std::path::Path;

use git2::Repository;

pub fn create_test_repo() -> (tempfile::TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    // Configure identity for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test").unwrap();
    config.set_str("user.email", "test@test.com").unwrap();

    (dir, repo)
}

/// Commit `files` (path, content) as `author` at `epoch` on HEAD.
pub fn commit_as(
    repo: &Repository,
    author: &str,
    files: &[(&str, &str)],
    message: &str,
    epoch: i64,
) -> git2::Oid {
    let email = format!("{}@test.com", author.to_lowercase());
    let sig = git2::Signature::new(author, &email, &git2::Time::new(epoch, 0)).unwrap();
    let mut index = repo.index().unwrap();

    for (path, content) in files {
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }

    index.write().unwrap();
    let tree_oid = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// Remove `path` from the index and working tree, then commit.
pub fn delete_and_commit(repo: &Repository, path: &str, epoch: i64) -> git2::Oid {
    let sig = git2::Signature::new("Test", "test@test.com", &git2::Time::new(epoch, 0)).unwrap();
    let mut index = repo.index().unwrap();
    fs::remove_file(repo.workdir().unwrap().join(path)).unwrap();
    index.remove_path(Path::new(path)).unwrap();
    index.write().unwrap();
    let tree_oid = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();
    let parent = repo.head().unwrap().peel_to_commit().unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "delete", &tree, &[&parent])
        .unwrap()
}

pub fn make_commit_at(
    repo: &Repository,
    files: &[(&str, &str)],
    message: &str,
    epoch: i64,
) -> git2::Oid {
    commit_as(repo, "Test", files, message, epoch)
}

pub fn make_commit(repo: &Repository, files: &[(&str, &str)], message: &str) -> git2::Oid {
    make_commit_at(repo, files, message, 1_700_000_000)
}

/// Point a local `base` branch at `oid`, standing in for the PR base.
pub fn mark_base(repo: &Repository, oid: git2::Oid) {
    let commit = repo.find_commit(oid).unwrap();
    repo.branch("base", &commit, false).unwrap();
}

/// Commit top-level `files` on the tree of `parents[0]` with the given
/// parents, leaving the index and working tree alone. `update_ref` is
/// passed through to `Repository::commit`.
pub fn commit_with_parents(
    repo: &Repository,
    author: &str,
    parents: &[git2::Oid],
    files: &[(&str, &str)],
    message: &str,
    epoch: i64,
    update_ref: Option<&str>,
) -> git2::Oid {
    let email = format!("{}@test.com", author.to_lowercase());
    let sig = git2::Signature::new(author, &email, &git2::Time::new(epoch, 0)).unwrap();
    let parents: Vec<git2::Commit> = parents
        .iter()
        .map(|oid| repo.find_commit(*oid).unwrap())
        .collect();

    let base_tree = parents[0].tree().unwrap();
    let mut builder = repo.treebuilder(Some(&base_tree)).unwrap();
    for (path, content) in files {
        let blob = repo.blob(content.as_bytes()).unwrap();
        builder.insert(path, blob, 0o100644).unwrap();
    }
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();

    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(update_ref, &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

/// Delete the loose object `oid` so later lookups fail.
pub fn drop_object(repo: &Repository, oid: git2::Oid) {
    let hex = oid.to_string();
    let path = repo.path().join("objects").join(&hex[..2]).join(&hex[2..]);
    fs::remove_file(path).unwrap();
}

use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use git2::{
    Cred, Delta, DiffFindOptions, DiffOptions, FetchOptions, Oid, Patch, RemoteCallbacks,
    Repository, Sort,
};
use serde::Serialize;
use tracing::{debug, warn};

/// Consecutive commits older than the lookback window tolerated before a
/// history walk stops. Commit dates are not strictly ordered.
const WINDOW_SLOP: usize = 5;

pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
}

/// Per-file change marker as printed by `git diff --name-status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeStatus {
    #[serde(rename = "A")]
    Added,
    #[default]
    #[serde(rename = "M")]
    Modified,
    #[serde(rename = "D")]
    Deleted,
    #[serde(rename = "R")]
    Renamed,
    #[serde(rename = "C")]
    Copied,
    #[serde(rename = "T")]
    TypeChanged,
}

impl ChangeStatus {
    pub fn marker(&self) -> &'static str {
        match self {
            ChangeStatus::Added => "A",
            ChangeStatus::Modified => "M",
            ChangeStatus::Deleted => "D",
            ChangeStatus::Renamed => "R",
            ChangeStatus::Copied => "C",
            ChangeStatus::TypeChanged => "T",
        }
    }

    fn from_delta(delta: Delta) -> Option<Self> {
        match delta {
            Delta::Added | Delta::Untracked => Some(ChangeStatus::Added),
            Delta::Modified => Some(ChangeStatus::Modified),
            Delta::Deleted => Some(ChangeStatus::Deleted),
            Delta::Renamed => Some(ChangeStatus::Renamed),
            Delta::Copied => Some(ChangeStatus::Copied),
            Delta::Typechange => Some(ChangeStatus::TypeChanged),
            _ => None,
        }
    }
}

/// Per-file line counts from a numstat diff. Binary files count zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStat {
    pub additions: usize,
    pub deletions: usize,
}

impl GitRepo {
    pub fn open(path: &Path) -> Result<Self, Box<dyn Error>> {
        let repo = Repository::discover(path)?;
        let root = repo
            .workdir()
            .ok_or("bare repositories are not supported")?
            .to_path_buf();
        Ok(Self { repo, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fetch `refs/heads/<base>` from `origin` into `refs/remotes/origin/<base>`.
    /// The token, when given, is sent as HTTPS basic credentials.
    pub fn fetch_base(&self, base_ref: &str, token: Option<&str>) -> Result<(), Box<dyn Error>> {
        let mut remote = self.repo.find_remote("origin")?;
        let mut callbacks = RemoteCallbacks::new();
        if let Some(token) = token {
            let token = token.to_string();
            callbacks.credentials(move |_url, _user, _allowed| {
                Cred::userpass_plaintext("x-access-token", &token)
            });
        }
        let mut opts = FetchOptions::new();
        opts.remote_callbacks(callbacks);
        let refspec = format!("+refs/heads/{base_ref}:refs/remotes/origin/{base_ref}");
        remote.fetch(&[refspec.as_str()], Some(&mut opts), None)?;
        Ok(())
    }

    /// `git diff --name-status origin/<base>...HEAD`
    pub fn diff_name_status(
        &self,
        base_ref: &str,
    ) -> Result<Vec<(ChangeStatus, String)>, Box<dyn Error>> {
        let diff = self.merge_base_diff(base_ref)?;
        let mut out = Vec::new();
        for delta in diff.deltas() {
            let Some(status) = ChangeStatus::from_delta(delta.status()) else {
                continue;
            };
            if let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) {
                out.push((status, path_string(path)));
            }
        }
        Ok(out)
    }

    /// `git diff --numstat origin/<base>...HEAD`, one entry per file.
    pub fn diff_numstat(&self, base_ref: &str) -> Result<Vec<LineStat>, Box<dyn Error>> {
        let diff = self.merge_base_diff(base_ref)?;
        let count = diff.deltas().count();
        let mut out = Vec::with_capacity(count);
        for idx in 0..count {
            let stat = match Patch::from_diff(&diff, idx)? {
                Some(patch) if !patch.delta().flags().is_binary() => {
                    let (_, additions, deletions) = patch.line_stats()?;
                    LineStat {
                        additions,
                        deletions,
                    }
                }
                _ => LineStat::default(),
            };
            out.push(stat);
        }
        Ok(out)
    }

    /// `git diff --name-only origin/<base>...HEAD`
    pub fn diff_name_only(&self, base_ref: &str) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self
            .diff_name_status(base_ref)?
            .into_iter()
            .map(|(_, path)| path)
            .collect())
    }

    /// Author names of every commit since `since` that touched one of
    /// `paths`, keyed by path. Names repeat once per touching commit.
    /// Paths with no commit in the window are absent from the map.
    ///
    /// A merge counts for a path only when the path differs from every
    /// parent, as with `git log -- <path>`. The walk stops once
    /// `WINDOW_SLOP` consecutive commits fall before `since`. Unreadable
    /// commits are skipped with a warning.
    pub fn authors_by_path(
        &self,
        paths: &[String],
        since: Option<i64>,
    ) -> Result<HashMap<String, Vec<String>>, Box<dyn Error>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(Sort::TIME)?;
        if paths.is_empty() {
            return Ok(map);
        }

        let mut stale = 0;
        for oid in revwalk {
            let commit = match oid.and_then(|oid| self.repo.find_commit(oid)) {
                Ok(commit) => commit,
                Err(err) => {
                    warn!("skipping unreadable commit: {err}");
                    continue;
                }
            };

            if let Some(since_ts) = since
                && commit.time().seconds() < since_ts
            {
                stale += 1;
                if stale > WINDOW_SLOP {
                    break;
                }
                continue;
            }
            stale = 0;

            let touched = match self.touched_paths(&commit, paths) {
                Ok(touched) => touched,
                Err(err) => {
                    warn!(commit = %commit.id(), "skipping commit: {err}");
                    continue;
                }
            };
            if touched.is_empty() {
                continue;
            }
            let author = commit.author().name().unwrap_or("unknown").to_string();
            for path in touched {
                map.entry(path).or_default().push(author.clone());
            }
        }

        debug!(files = map.len(), "collected author history");
        Ok(map)
    }

    /// `git log -n <limit> --pretty=%ct`
    pub fn recent_commit_times(&self, limit: usize) -> Result<Vec<i64>, Box<dyn Error>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(Sort::TIME)?;

        let mut times = Vec::with_capacity(limit);
        for oid in revwalk.take(limit) {
            let commit = self.repo.find_commit(oid?)?;
            times.push(commit.time().seconds());
        }
        Ok(times)
    }

    /// Resolve the base branch, preferring the remote-tracking ref.
    fn resolve_base(&self, base_ref: &str) -> Result<Oid, Box<dyn Error>> {
        let candidates = [format!("origin/{base_ref}"), base_ref.to_string()];
        for spec in &candidates {
            if let Ok(obj) = self.repo.revparse_single(spec) {
                return Ok(obj.peel_to_commit()?.id());
            }
        }
        Err(format!("unknown base ref: {base_ref}").into())
    }

    /// Diff from the merge base of `base_ref` and HEAD to HEAD, with rename
    /// detection, matching the three-dot form of `git diff`.
    fn merge_base_diff(&self, base_ref: &str) -> Result<git2::Diff<'_>, Box<dyn Error>> {
        let head = self.repo.head()?.peel_to_commit()?;
        let base = self.resolve_base(base_ref)?;
        let merge_base = self.repo.merge_base(base, head.id())?;
        let base_tree = self.repo.find_commit(merge_base)?.tree()?;
        let head_tree = head.tree()?;

        let mut opts = DiffOptions::new();
        let mut diff =
            self.repo
                .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), Some(&mut opts))?;
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))?;
        Ok(diff)
    }

    /// Which of `paths` `commit` changed. For a merge, only paths that
    /// differ from every parent.
    fn touched_paths(
        &self,
        commit: &git2::Commit,
        paths: &[String],
    ) -> Result<Vec<String>, git2::Error> {
        let tree = commit.tree()?;
        if commit.parent_count() == 0 {
            return self.changed_paths(None, &tree, paths);
        }

        let mut touched: Option<Vec<String>> = None;
        for idx in 0..commit.parent_count() {
            let parent_tree = commit.parent(idx)?.tree()?;
            let changed = self.changed_paths(Some(&parent_tree), &tree, paths)?;
            let narrowed = match touched {
                None => changed,
                Some(prev) => prev.into_iter().filter(|p| changed.contains(p)).collect(),
            };
            if narrowed.is_empty() {
                return Ok(narrowed);
            }
            touched = Some(narrowed);
        }
        Ok(touched.unwrap_or_default())
    }

    /// Paths among `paths` that differ between two trees. The diff is
    /// limited to `paths` as literal pathspecs.
    fn changed_paths(
        &self,
        old: Option<&git2::Tree>,
        new: &git2::Tree,
        paths: &[String],
    ) -> Result<Vec<String>, git2::Error> {
        let mut opts = DiffOptions::new();
        opts.disable_pathspec_match(true);
        for path in paths {
            opts.pathspec(path.as_str());
        }
        let diff = self.repo.diff_tree_to_tree(old, Some(new), Some(&mut opts))?;

        let mut changed = Vec::new();
        for delta in diff.deltas() {
            let new_path = delta.new_file().path().map(path_string);
            let old_path = delta.old_file().path().map(path_string);
            if let Some(p) = &new_path {
                changed.push(p.clone());
            }
            if let Some(p) = old_path
                && Some(&p) != new_path.as_ref()
            {
                changed.push(p);
            }
        }
        changed.retain(|p| paths.contains(p));
        Ok(changed)
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

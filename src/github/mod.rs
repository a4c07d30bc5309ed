//! Minimal GitHub REST client: pull request commits and files, open pull
//! requests touching the same files, and the review comment.

use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GitHubContext;
use crate::error::ConfigError;

const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PER_PAGE: usize = 100;
const MAX_PAGES: usize = 10;
/// Open pull requests inspected for overlapping files.
pub const OVERLAP_SCAN: usize = 20;
/// Hidden marker identifying the comment this tool owns.
pub const COMMENT_MARKER: &str = "<!-- nightwatch -->";

/// Who authored a pull request commit. The handle is absent for commits
/// whose email is not linked to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub author_handle: Option<String>,
    pub author_name: Option<String>,
}

/// Another open pull request changing some of the same files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Created,
    Updated,
}

#[derive(Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Deserialize)]
struct ApiGitAuthor {
    name: Option<String>,
}

#[derive(Deserialize)]
struct ApiGitCommit {
    author: Option<ApiGitAuthor>,
}

#[derive(Deserialize)]
struct ApiCommit {
    author: Option<ApiUser>,
    commit: ApiGitCommit,
}

impl From<ApiCommit> for CommitRecord {
    fn from(c: ApiCommit) -> Self {
        CommitRecord {
            author_handle: c.author.map(|u| u.login),
            author_name: c.commit.author.and_then(|a| a.name),
        }
    }
}

#[derive(Deserialize)]
struct ApiFile {
    filename: String,
}

#[derive(Deserialize)]
struct ApiPull {
    number: u64,
    title: String,
    html_url: String,
}

#[derive(Deserialize)]
struct ApiComment {
    id: u64,
    body: Option<String>,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Build a client from the platform context; needs a token and the
    /// `owner/name` slug.
    pub fn from_context(ctx: &GitHubContext) -> Result<Self, Box<dyn Error>> {
        let token = ctx.token.clone().ok_or(ConfigError::Missing("GITHUB_TOKEN"))?;
        let (owner, repo) = ctx.slug().ok_or(ConfigError::Missing("GITHUB_REPOSITORY"))?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("nightwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_url: ctx.api_url.clone(),
            token,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}/{path}", self.api_url, self.owner, self.repo)
    }

    fn send(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response, Box<dyn Error>> {
        let resp = req
            .bearer_auth(&self.token)
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", API_VERSION)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(format!("GitHub API error ({status}): {body}").into());
        }
        Ok(resp)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, Box<dyn Error>> {
        debug!("GET {url}");
        Ok(self.send(self.http.get(url))?.json()?)
    }

    /// Follow `page=` until a short page comes back.
    fn get_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, Box<dyn Error>> {
        let sep = if path.contains('?') { '&' } else { '?' };
        let mut out = Vec::new();
        for page in 1..=MAX_PAGES {
            let url = self.repo_url(&format!("{path}{sep}per_page={PER_PAGE}&page={page}"));
            let batch: Vec<T> = self.get_json(&url)?;
            let done = batch.len() < PER_PAGE;
            out.extend(batch);
            if done {
                break;
            }
        }
        Ok(out)
    }

    pub fn pull_commits(&self, pr: u64) -> Result<Vec<CommitRecord>, Box<dyn Error>> {
        let commits: Vec<ApiCommit> = self.get_pages(&format!("pulls/{pr}/commits"))?;
        Ok(commits.into_iter().map(CommitRecord::from).collect())
    }

    pub fn pull_files(&self, pr: u64) -> Result<Vec<String>, Box<dyn Error>> {
        let files: Vec<ApiFile> = self.get_pages(&format!("pulls/{pr}/files"))?;
        Ok(files.into_iter().map(|f| f.filename).collect())
    }

    /// Other open pull requests (the first `OVERLAP_SCAN`) sharing files
    /// with `files`.
    pub fn overlapping_pulls(
        &self,
        pr: u64,
        files: &[String],
    ) -> Result<Vec<Overlap>, Box<dyn Error>> {
        let url = self.repo_url(&format!("pulls?state=open&per_page={OVERLAP_SCAN}"));
        let pulls: Vec<ApiPull> = self.get_json(&url)?;

        Ok(collect_overlaps(pr, files, pulls, |number| self.pull_files(number)))
    }

    /// Edit the comment carrying `COMMENT_MARKER`, or create one.
    pub fn upsert_comment(&self, pr: u64, body: &str) -> Result<CommentAction, Box<dyn Error>> {
        let comments: Vec<ApiComment> = self.get_pages(&format!("issues/{pr}/comments"))?;
        let payload = CommentBody { body };

        match find_marked(&comments) {
            Some(id) => {
                let url = self.repo_url(&format!("issues/comments/{id}"));
                self.send(self.http.patch(&url).json(&payload))?;
                Ok(CommentAction::Updated)
            }
            None => {
                let url = self.repo_url(&format!("issues/{pr}/comments"));
                self.send(self.http.post(&url).json(&payload))?;
                Ok(CommentAction::Created)
            }
        }
    }
}

fn find_marked(comments: &[ApiComment]) -> Option<u64> {
    comments
        .iter()
        .find(|c| c.body.as_deref().is_some_and(|b| b.contains(COMMENT_MARKER)))
        .map(|c| c.id)
}

/// Files of `ours` also present in `theirs`, in our order.
/// Overlaps between `files` and each open pull other than `pr`. A pull
/// whose file list cannot be fetched is skipped with a warning.
fn collect_overlaps<E: Display>(
    pr: u64,
    files: &[String],
    pulls: Vec<ApiPull>,
    mut fetch_files: impl FnMut(u64) -> Result<Vec<String>, E>,
) -> Vec<Overlap> {
    let mut overlaps = Vec::new();
    for pull in pulls.into_iter().filter(|p| p.number != pr) {
        let theirs = match fetch_files(pull.number) {
            Ok(theirs) => theirs,
            Err(err) => {
                warn!(pull = pull.number, "skipping overlap check: {err}");
                continue;
            }
        };
        let shared = shared_files(files, &theirs);
        if !shared.is_empty() {
            overlaps.push(Overlap {
                number: pull.number,
                title: pull.title,
                url: pull.html_url,
                files: shared,
            });
        }
    }
    overlaps
}

pub fn shared_files(ours: &[String], theirs: &[String]) -> Vec<String> {
    let theirs: HashSet<&str> = theirs.iter().map(String::as_str).collect();
    ours.iter()
        .filter(|f| theirs.contains(f.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

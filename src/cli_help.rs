//! Long help text constants for CLI subcommands.
//!
//! Kept apart from `cli.rs` so the argument definitions stay short.

/// Full PR assessment.
pub const REVIEW: &str = "\
Assess the current pull request and render the review comment.

Combines every analysis over the files changed against the base branch:
  Sensitive files  banned filename patterns not covered by an allowed one
  Blast radius     changed files per domain (source, test, ci, docs, ...)
  Ownership        recent authors of the changed files and the bus factor
  Developer state  late-night commits on HEAD over the past week
  Safety score     0-100, see `nw score --help`

Outside a pull request (no --pr and no pull_request event) only the
developer state line is printed.

With --post the markdown is written to the PR as a comment. A previous
comment from this tool is edited in place instead of adding a new one.
Requires GITHUB_TOKEN and GITHUB_REPOSITORY.";

/// Safety score formula.
pub const SCORE: &str = "\
Compute the safety score of the changes against the base branch.

Score = 100
  - 1 per changed file            (at most 40)
  - 6 per risky file              (at most 30)
  - 15 if a public surface file changed
  + 10 if tests were touched, otherwise - 10
  - 5 per full 500 lines of churn (at most 20)

The result is clamped to 0-100. `nw review` subtracts another 10 when a
sensitive file is part of the change.";

/// Pattern configuration format.
pub const PATTERNS: &str = "\
Show the effective sensitive-file pattern configuration.

Each section resolves on its own from, in order:
  1. the DANGEROUS_PATTERNS environment variable
  2. the pattern file (DANGEROUS_PATTERNS_FILE, default dangerous-patterns.yml)
  3. the built-in defaults

Format:
  banned:
    - pattern: \"\\.pem$\"
      reason: \"Private key\"
    - \"/^secrets\\//i\"
  allowed:
    - \"\\.example$\"

Plain values are case-insensitive regexes. /body/flags accepts the i, m, s
and x flags. A section with no usable pattern falls back to the next source.";

/// Developer fatigue.
pub const STATE: &str = "\
Print the developer state line.

Looks at the 50 most recent commits on HEAD, keeps the ones from the last
7 days and counts those made between 00:00 and 05:00 in the configured time
zone (NIGHTWATCH_TZ: local, utc or an offset such as +02:00). Three or more
flag fatigue.";

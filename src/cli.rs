/// CLI argument definitions for the `nw` command.
///
/// Defines all subcommands, their arguments, and long help text
/// using the `clap` derive macros.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::cli_help;

/// Top-level CLI parser with a single subcommand selector.
#[derive(Parser)]
#[command(name = "nw", version, about = "Pull request risk review")]
pub struct Cli {
    /// Settings file (default: nightwatch.toml in the repository, if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Repository to analyze (default: current directory)
    #[arg(short = 'C', long, global = true)]
    pub repo: Option<PathBuf>,

    /// Debug logging on stderr (NIGHTWATCH_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by the diff-based commands.
#[derive(Args)]
pub struct CommonArgs {
    /// Base branch to diff against (default: from the event, else main)
    #[arg(long)]
    pub base: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// All available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Assess the pull request and render (or post) the review comment
    #[command(long_about = cli_help::REVIEW)]
    Review {
        #[command(flatten)]
        common: CommonArgs,

        /// Pull request number (default: from GITHUB_EVENT_PATH)
        #[arg(long)]
        pr: Option<u64>,

        /// Post or update the PR comment instead of printing it
        #[arg(long, conflicts_with = "json")]
        post: bool,
    },

    /// Print the developer state (late-night commit activity)
    #[command(long_about = cli_help::STATE)]
    State {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List changed files matching banned patterns
    Sensitive {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show how the change spreads across domains
    Blast {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show recent contributors and bus factor of the changed files
    Ownership {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Compute the safety score with its breakdown
    #[command(long_about = cli_help::SCORE)]
    Score {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show the effective sensitive-file patterns
    #[command(long_about = cli_help::PATTERNS)]
    Patterns {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a shell completion script
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_review_flags() {
        let cli = Cli::parse_from(["nw", "review", "--base", "develop", "--pr", "17", "--post"]);
        match cli.command {
            Commands::Review { common, pr, post } => {
                assert_eq!(common.base.as_deref(), Some("develop"));
                assert_eq!(pr, Some(17));
                assert!(post);
            }
            _ => panic!("expected review"),
        }
    }

    #[test]
    fn post_conflicts_with_json() {
        assert!(Cli::try_parse_from(["nw", "review", "--post", "--json"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["nw", "blast", "-v", "--config", "x.toml", "-C", "repo"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert_eq!(cli.repo, Some(PathBuf::from("repo")));
    }

    #[test]
    fn completions_shell() {
        let cli = Cli::parse_from(["nw", "completions", "bash"]);
        assert!(matches!(cli.command, Commands::Completions { shell: Shell::Bash }));
    }
}

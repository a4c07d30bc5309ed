mod blast;
mod classify;
mod cli;
mod cli_help;
mod config;
mod error;
mod fatigue;
mod git;
mod github;
mod logging;
mod ownership;
mod patterns;
mod report_helpers;
mod review;
mod score;
mod sensitive;
mod timezone;
mod util;

use std::error::Error;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands, CommonArgs};
use config::Settings;

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "nw", &mut std::io::stdout());
        return Ok(());
    }

    let repo = cli.repo.unwrap_or_else(|| PathBuf::from("."));
    let settings = Settings::load(&repo, cli.config.as_deref(), |key| std::env::var(key).ok())?;
    let base = |common: &CommonArgs| {
        common
            .base
            .clone()
            .unwrap_or_else(|| settings.base_ref.clone())
    };

    match cli.command {
        Commands::Review { common, pr, post } => review::run(
            &settings,
            &review::ReviewOptions {
                base_ref: &base(&common),
                pr,
                post,
                json: common.json,
            },
        ),
        Commands::State { json } => fatigue::run(&settings, json),
        Commands::Sensitive { common } => sensitive::run(&settings, &base(&common), common.json),
        Commands::Blast { common } => blast::run(&settings, &base(&common), common.json),
        Commands::Ownership { common } => ownership::run(&settings, &base(&common), common.json),
        Commands::Score { common } => score::run(&settings, &base(&common), common.json),
        Commands::Patterns { json } => patterns::run(&settings, json),
        Commands::Completions { .. } => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

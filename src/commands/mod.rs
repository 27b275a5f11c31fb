//! Command-line interface and command dispatch.

use crate::config::FetchConfig;
use crate::feed::{GithubFeed, RepoId};
use crate::pipeline;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

const DEFAULT_OUT_DIR: &str = "data/releases_output";

#[derive(Debug, Parser)]
#[command(name = "release-pulse", about = "Release cadence statistics for GitHub projects", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch release history and write the raw record and statistic tables
    Stats {
        /// Owner of the tracked repositories
        #[arg(long)]
        owner: String,

        /// Repository name; repeat to track several repositories
        #[arg(long = "repo", required = true)]
        repos: Vec<String>,

        /// GitHub personal access token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Directory the tables are written to
        #[arg(long, default_value = DEFAULT_OUT_DIR)]
        out: PathBuf,
    },

    /// Derive the enriched release table from the persisted raw table
    Enrich {
        /// Directory holding the raw table; the enriched table lands beside it
        #[arg(long, default_value = DEFAULT_OUT_DIR)]
        out: PathBuf,
    },
}

/// Parse arguments and run the selected command.
pub async fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::parse_from(args).command {
        Command::Stats { owner, repos, token, out } => {
            let config = FetchConfig::new(token)?;
            let feed = GithubFeed::new(&config.token)?;
            let repos: Vec<RepoId> = repos.into_iter().map(|name| RepoId::new(owner.clone(), name)).collect();
            pipeline::run_stats(&feed, &repos, &out).await
        }
        Command::Enrich { out } => pipeline::run_enrich(&out, None),
    }
}

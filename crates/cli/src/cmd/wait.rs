use anyhow::{Context, Result};
use argp::FromArgs;
use dispatch_wait_core::{
    actions::{self, ActionEnv},
    config::PollConfig,
};
use dispatch_wait_github::{GitHub, poll::wait_for_conclusion};

use crate::cmd::{input, marker, required, token};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Wait for the conclusion of a run dispatched earlier.
#[argp(subcommand, name = "wait")]
pub struct Args {
    #[argp(option)]
    /// repository owner (input: owner)
    owner: Option<String>,
    #[argp(option)]
    /// repository name (input: repo)
    repo: Option<String>,
    #[argp(option)]
    /// access token (input: token)
    token: Option<String>,
    #[argp(option)]
    /// correlation marker, e.g. a commit SHA (input: sha)
    sha: Option<String>,
    #[argp(option)]
    /// seconds between polls, default 10 (input: poll-interval)
    poll_interval: Option<String>,
    #[argp(option)]
    /// overall wait limit in seconds, default 600 (input: timeout)
    timeout: Option<String>,
    #[argp(option)]
    /// recent runs inspected per search, default 10 (input: max-runs)
    max_runs: Option<String>,
}

pub async fn run(args: Args, env: &ActionEnv) -> Result<()> {
    let owner = required(&args.owner, env, "owner")?;
    let repo = required(&args.repo, env, "repo")?;
    let token = token(&args.token, env)?;
    actions::add_mask(token);
    let marker = marker(&args.sha, env)?;
    let config = PollConfig::from_overrides(
        input(&args.poll_interval, env, "poll-interval"),
        input(&args.timeout, env, "timeout"),
        input(&args.max_runs, env, "max-runs"),
    )?;

    let github = GitHub::new(token)?;
    let source = github.runs(owner, repo);
    let conclusion = wait_for_conclusion(&source, marker, config).await?;
    env.set_output("conclusion", conclusion.as_str()).context("Failed to write step output")?;
    Ok(())
}

use anyhow::Result;
use argp::FromArgs;
use dispatch_wait_core::{
    actions::{self, ActionEnv},
    models::DispatchRequest,
};
use dispatch_wait_github::GitHub;

use crate::cmd::{input, marker, required, token};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Fire the dispatch event without waiting for a run.
#[argp(subcommand, name = "dispatch")]
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
    /// dispatch event type (input: event-type)
    event_type: Option<String>,
    #[argp(option, long = "ref")]
    /// target ref, forwarded inside the payload (input: ref)
    git_ref: Option<String>,
    #[argp(option)]
    /// extra client payload, a JSON object (input: client-payload)
    client_payload: Option<String>,
}

pub async fn run(args: Args, env: &ActionEnv) -> Result<()> {
    let owner = required(&args.owner, env, "owner")?;
    let repo = required(&args.repo, env, "repo")?;
    let token = token(&args.token, env)?;
    actions::add_mask(token);
    let marker = marker(&args.sha, env)?;
    let event_type = required(&args.event_type, env, "event-type")?;
    let request = DispatchRequest::new(
        event_type,
        marker,
        input(&args.client_payload, env, "client-payload"),
        input(&args.git_ref, env, "ref"),
    )?;

    let github = GitHub::new(token)?;
    github.dispatch(owner, repo, &request).await?;
    Ok(())
}

pub mod poll;
pub mod resolve;

use anyhow::{Context, Result};
use dispatch_wait_core::models::{DispatchRequest, Job, JobList, WorkflowRun, WorkflowRunList};
use http::StatusCode;
use http_body_util::BodyExt;
use octocrab::Octocrab;
use thiserror::Error;

/// The dispatch endpoint acknowledges with 204 and nothing else; anything
/// other than that exact status is a rejection, 2xx bodies included.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch rejected with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error(transparent)]
    Api(#[from] octocrab::Error),
}

/// One list page is capped by the provider.
const MAX_PAGE: usize = 100;

#[derive(serde::Serialize)]
struct ListParams {
    per_page: u8,
}

/// Read access to a repository's workflow runs. The resolver and poller are
/// generic over this so the step-name correlation heuristic can be swapped
/// out without touching the wait loop, should the dispatch API ever return
/// a run identifier directly.
#[allow(async_fn_in_trait)]
pub trait RunSource {
    /// The most recent runs, newest first, at most `limit` of them.
    async fn recent_runs(&self, limit: usize) -> Result<Vec<WorkflowRun>>;
    /// The jobs (with their steps) of one run.
    async fn run_jobs(&self, run_id: u64) -> Result<Vec<Job>>;
    /// The current state of one run.
    async fn run(&self, run_id: u64) -> Result<WorkflowRun>;
}

/// Authenticated GitHub API client.
#[derive(Clone)]
pub struct GitHub {
    pub client: Octocrab,
}

impl GitHub {
    pub fn new(token: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .context("Failed to create GitHub client")?;
        Ok(Self { client })
    }

    /// Fire a repository dispatch event. The response carries no run
    /// identifier; correlation happens afterwards via the payload marker.
    pub async fn dispatch(
        &self,
        owner: &str,
        repo: &str,
        request: &DispatchRequest,
    ) -> Result<(), DispatchError> {
        let response = self
            .client
            ._post(format!("/repos/{owner}/{repo}/dispatches"), Some(request))
            .await?;
        let status = response.status();
        let body = if status == StatusCode::NO_CONTENT {
            String::new()
        } else {
            match response.into_body().collect().await {
                Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).into_owned(),
                Err(_) => String::new(),
            }
        };
        check_accepted(status, body)?;
        tracing::info!("Dispatched {} event to {}/{}", request.event_type, owner, repo);
        Ok(())
    }

    /// Scope run lookups to a single repository.
    pub fn runs(&self, owner: &str, repo: &str) -> RepoRuns {
        RepoRuns { github: self.clone(), owner: owner.to_string(), repo: repo.to_string() }
    }
}

fn check_accepted(status: StatusCode, body: String) -> Result<(), DispatchError> {
    if status == StatusCode::NO_CONTENT {
        Ok(())
    } else {
        Err(DispatchError::Rejected { status, body })
    }
}

/// Run lookups for one repository.
#[derive(Clone)]
pub struct RepoRuns {
    github: GitHub,
    owner: String,
    repo: String,
}

impl RunSource for RepoRuns {
    async fn recent_runs(&self, limit: usize) -> Result<Vec<WorkflowRun>> {
        let Self { github, owner, repo } = self;
        let response: WorkflowRunList = github
            .client
            .get(
                format!("/repos/{owner}/{repo}/actions/runs"),
                Some(&ListParams { per_page: limit.min(MAX_PAGE) as u8 }),
            )
            .await
            .context("Failed to list workflow runs")?;
        Ok(response.workflow_runs)
    }

    async fn run_jobs(&self, run_id: u64) -> Result<Vec<Job>> {
        let Self { github, owner, repo } = self;
        let response: JobList = github
            .client
            .get(
                format!("/repos/{owner}/{repo}/actions/runs/{run_id}/jobs"),
                Some(&ListParams { per_page: MAX_PAGE as u8 }),
            )
            .await
            .with_context(|| format!("Failed to list jobs for run {run_id}"))?;
        Ok(response.jobs)
    }

    async fn run(&self, run_id: u64) -> Result<WorkflowRun> {
        let Self { github, owner, repo } = self;
        github
            .client
            .get(format!("/repos/{owner}/{repo}/actions/runs/{run_id}"), None::<&()>)
            .await
            .with_context(|| format!("Failed to fetch workflow run {run_id}"))
    }
}

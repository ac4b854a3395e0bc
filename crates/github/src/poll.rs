use std::time::Duration;

use anyhow::Context;
use dispatch_wait_core::{
    config::PollConfig,
    models::{Conclusion, RunStatus},
};
use thiserror::Error;
use tokio::time::{MissedTickBehavior, interval, sleep};

use crate::{RunSource, resolve::resolve_run};

#[derive(Debug, Error)]
pub enum WaitError {
    /// The deadline elapsed before the run reached a terminal state,
    /// whether or not a run had been matched by then.
    #[error("timed out after {0:?} waiting for the workflow run to complete")]
    Timeout(Duration),
    #[error(transparent)]
    Api(#[from] anyhow::Error),
}

/// Poll until the run correlated with `marker` completes, and return its
/// conclusion.
///
/// Every tick performs one action: while no run id is known, re-issue the
/// resolution search (a miss just defers to the next tick); once a run id is
/// known, fetch that run's status. A one-shot deadline races the ticker and
/// wins ties, so the wait always terminates. In-flight API calls are not
/// cancelled by the deadline; it is only consulted between calls.
pub async fn wait_for_conclusion(
    source: &impl RunSource,
    marker: &str,
    config: PollConfig,
) -> Result<Conclusion, WaitError> {
    let deadline = sleep(config.timeout);
    tokio::pin!(deadline);
    let mut ticker = interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut run_id = None;
    loop {
        tokio::select! {
            biased;
            _ = &mut deadline => return Err(WaitError::Timeout(config.timeout)),
            _ = ticker.tick() => {}
        }
        match run_id {
            None => match resolve_run(source, marker, config.max_runs).await? {
                Some(id) => {
                    tracing::info!("Matched workflow run {id}");
                    run_id = Some(id);
                }
                // Dispatch is asynchronous; the run may simply not exist yet.
                None => tracing::debug!(
                    "No step named '{}' in the {} most recent runs",
                    marker,
                    config.max_runs
                ),
            },
            Some(id) => {
                let run = source.run(id).await?;
                if run.status == RunStatus::Completed {
                    let conclusion =
                        run.conclusion.context("completed run reports no conclusion")?;
                    tracing::info!("Workflow run {id} completed: {conclusion}");
                    return Ok(conclusion);
                }
                tracing::debug!("Workflow run {id} status: {:?}", run.status);
            }
        }
    }
}

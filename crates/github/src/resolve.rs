use anyhow::Result;

use crate::RunSource;

/// Find the run that a dispatch event produced: scan the most recent
/// `max_runs` runs, newest first, for a job step named exactly `marker`
/// (case-sensitive, no normalization).
///
/// `Ok(None)` means nothing matched yet. Runs materialize asynchronously
/// after the event fires, so callers re-issue the search on a timer rather
/// than treating that as fatal. The search is stateless and bounded by
/// record count, not elapsed time; a backlog of unrelated runs can starve a
/// legitimate match.
pub async fn resolve_run(
    source: &impl RunSource,
    marker: &str,
    max_runs: usize,
) -> Result<Option<u64>> {
    let runs = source.recent_runs(max_runs).await?;
    for run in runs.iter().take(max_runs) {
        let jobs = source.run_jobs(run.id).await?;
        for job in &jobs {
            if job.steps.iter().any(|step| step.name == marker) {
                tracing::debug!("Run {} job '{}' carries step '{}'", run.id, job.name, marker);
                return Ok(Some(run.id));
            }
        }
    }
    Ok(None)
}

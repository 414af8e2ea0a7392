//! The polling loop: drives a submitted [`Job`] to a terminal status by
//! repeated status queries with a bounded, non-decreasing backoff schedule.

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::provider::{ImageProvider, StatusTag};

use super::job::{Job, JobStatus, PollConfig};

/// Poll until the job reaches a terminal status.
///
/// Per attempt the provider's status response is classified:
/// - `Ready` ends the job with its artifact (a `Ready` response missing the
///   artifact field ends it as a provider error instead);
/// - `Error` / `Failed` end it immediately with the provider's error field;
/// - any in-flight tag counts the attempt and waits per the schedule;
/// - a transport failure is retried but still counts toward `max_attempts`,
///   and is recorded as the failure reason if it lands on the final attempt.
///
/// The cancellation token is observed once per iteration and during the
/// inter-attempt wait; a cancelled job ends in `Cancelled` without a further
/// status query. Attempts are strictly sequential; the job ends in
/// `TimedOut` with `attempt == max_attempts` if the ceiling is reached.
pub async fn poll_to_completion<P: ImageProvider>(
    provider: &P,
    job: &mut Job,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> JobStatus {
    while !job.status.is_terminal() {
        if cancel.is_cancelled() {
            cancel_job(job);
            break;
        }

        job.attempt += 1;
        match provider.status(&job.polling_url).await {
            Ok(resp) => match resp.status {
                StatusTag::Ready => {
                    match resp.result.and_then(|r| r.sample) {
                        Some(artifact) => {
                            job.finish(JobStatus::Ready, Some(artifact), None);
                        }
                        // A success tag without an artifact must not turn
                        // into an empty success.
                        None => {
                            warn!(job_id = %job.id, "ready status without artifact");
                            job.finish(
                                JobStatus::Error,
                                None,
                                Some("malformed success response".into()),
                            );
                        }
                    }
                }
                StatusTag::Error | StatusTag::Failed => {
                    let terminal = if resp.status == StatusTag::Error {
                        JobStatus::Error
                    } else {
                        JobStatus::Failed
                    };
                    let reason = resp
                        .error
                        .unwrap_or_else(|| "provider reported a failure".into());
                    job.finish(terminal, None, Some(reason));
                }
                StatusTag::Processing | StatusTag::Pending | StatusTag::Other(_) => {
                    debug!(job_id = %job.id, attempt = job.attempt, "job still in flight");
                    job.mark_processing();
                    if job.attempt >= config.max_attempts {
                        job.finish(
                            JobStatus::TimedOut,
                            None,
                            Some(format!("no terminal status after {} attempts", job.attempt)),
                        );
                    }
                }
            },
            Err(e) => {
                warn!(job_id = %job.id, attempt = job.attempt, error = %e, "status query failed");
                if job.attempt >= config.max_attempts {
                    job.finish(JobStatus::TimedOut, None, Some(e.to_string()));
                }
            }
        }

        if !job.status.is_terminal() {
            tokio::select! {
                _ = cancel.cancelled() => cancel_job(job),
                _ = sleep(config.delay_for_attempt(job.attempt)) => {}
            }
        }
    }

    job.status
}

fn cancel_job(job: &mut Job) {
    job.finish(
        JobStatus::Cancelled,
        None,
        Some("polling cancelled by caller".into()),
    );
}

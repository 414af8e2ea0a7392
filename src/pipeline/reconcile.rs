//! Normalizes a terminal [`Job`] into the caller-facing outcome.

use serde::{Deserialize, Serialize};

use crate::error::RecolorError;
use crate::provider::ProviderError;

use super::job::{Job, JobStatus};

/// Stable tag attached to every surfaced failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad caller input, never sent to the provider.
    Validation,
    /// The provider rejected the work or returned malformed data.
    Provider,
    /// Network-level failure during submission.
    Transport,
    /// The polling attempt ceiling was reached.
    TimedOut,
    /// The caller aborted the job.
    Cancelled,
    /// Insufficient credit balance; nothing was submitted.
    Credits,
    /// Internal misuse, e.g. a duplicate poll for one job id.
    Internal,
}

/// Caller-facing result of a full job lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success { artifact: String },
    Failure { kind: ErrorKind, message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Outcome::Failure {
            kind,
            message: message.into(),
        }
    }
}

/// Map a terminal job to its outcome. Pure and idempotent: reconciling the
/// same job twice yields the same value.
///
/// A `Ready` job without an artifact (the poll loop prevents this, but the
/// job may come from elsewhere) is reported as a provider error rather than
/// an empty success.
pub fn reconcile(job: &Job) -> Outcome {
    match job.status {
        JobStatus::Ready => match &job.result {
            Some(artifact) => Outcome::Success {
                artifact: artifact.clone(),
            },
            None => Outcome::failure(ErrorKind::Provider, "malformed success response"),
        },
        JobStatus::Error | JobStatus::Failed => Outcome::failure(
            ErrorKind::Provider,
            format!(
                "the provider could not process this image: {}",
                reason_of(job)
            ),
        ),
        JobStatus::TimedOut => Outcome::failure(
            ErrorKind::TimedOut,
            format!(
                "processing did not finish after {} status checks ({})",
                job.attempt,
                reason_of(job)
            ),
        ),
        JobStatus::Cancelled => Outcome::failure(ErrorKind::Cancelled, reason_of(job)),
        JobStatus::Submitted | JobStatus::Processing => {
            Outcome::failure(ErrorKind::Internal, "job is still in flight")
        }
    }
}

fn reason_of(job: &Job) -> String {
    job.failure_reason
        .clone()
        .unwrap_or_else(|| "no reason given".into())
}

impl From<&RecolorError> for Outcome {
    /// Map an error raised before or during submission to the same surface
    /// the reconciler produces for polled jobs.
    fn from(err: &RecolorError) -> Self {
        let kind = match err {
            RecolorError::Validation(_) => ErrorKind::Validation,
            RecolorError::Provider(ProviderError::Network(_)) => ErrorKind::Transport,
            RecolorError::Provider(_) => ErrorKind::Provider,
            RecolorError::InsufficientCredits { .. } => ErrorKind::Credits,
            RecolorError::DuplicatePoll(_) => ErrorKind::Internal,
            _ => ErrorKind::Internal,
        };
        Outcome::failure(kind, err.to_string())
    }
}

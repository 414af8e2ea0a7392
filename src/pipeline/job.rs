use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tracks the lifecycle status of a job submitted to a provider.
///
/// Transitions are monotone: `Submitted → Processing* → terminal`, where
/// terminal is one of `Ready`, `Error`, `Failed`, `TimedOut`, `Cancelled`.
/// Nothing leaves a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Accepted by the provider, no status check performed yet.
    Submitted,
    /// At least one status check observed the job still in flight.
    Processing,
    /// Completed successfully; `result` holds the artifact.
    Ready,
    /// The provider reported a terminal error for this job.
    Error,
    /// The provider rejected the work (e.g. safety filter).
    Failed,
    /// The attempt ceiling was reached before a terminal provider status.
    TimedOut,
    /// The caller aborted polling before the job finished.
    Cancelled,
}

impl JobStatus {
    /// Whether no further transition can occur from this status.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Submitted | JobStatus::Processing)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Submitted => "SUBMITTED",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Ready => "READY",
            JobStatus::Error => "ERROR",
            JobStatus::Failed => "FAILED",
            JobStatus::TimedOut => "TIMED_OUT",
            JobStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// Configuration for the polling loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Hard ceiling on status checks before a job is marked timed out.
    pub max_attempts: u32,
    /// Wait, in milliseconds, applied after each in-flight attempt.
    /// Attempts past the end of the table reuse the last entry. Must be
    /// non-decreasing: short waits early to catch fast completions, longer
    /// waits late to keep request volume down against a metered provider.
    pub schedule_ms: Vec<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 48,
            schedule_ms: vec![500, 500, 1000, 1000, 2000, 2000, 2000, 2500, 2500, 4000],
        }
    }
}

impl PollConfig {
    /// Wait applied after the given attempt (1-based). Clamps to the last
    /// table entry once the schedule is exhausted.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let idx = (attempt.max(1) as usize - 1).min(self.schedule_ms.len().saturating_sub(1));
        Duration::from_millis(self.schedule_ms.get(idx).copied().unwrap_or(1000))
    }

    /// Whether the schedule table satisfies the non-decreasing requirement.
    pub fn is_monotone(&self) -> bool {
        self.schedule_ms.windows(2).all(|w| w[0] <= w[1])
    }
}

/// One outstanding unit of work submitted to a provider.
///
/// Created by the submitter in `Submitted`, mutated only by the poll loop,
/// and handed to the reconciler once terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Opaque id assigned by the provider.
    pub id: String,
    /// URL used to query status; passed through unmodified.
    pub polling_url: String,
    pub status: JobStatus,
    /// Number of status checks performed so far. Strictly +1 per check,
    /// never reset.
    pub attempt: u32,
    /// Artifact reference, populated only when `status == Ready`.
    pub result: Option<String>,
    /// Populated only for `Error`, `Failed`, `TimedOut` and `Cancelled`.
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: String, polling_url: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            polling_url,
            status: JobStatus::Submitted,
            attempt: 0,
            result: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move into a terminal status with the matching payload.
    ///
    /// Exactly one of `result` / `failure_reason` ends up populated. Calls
    /// on an already-terminal job are ignored so a late classification can
    /// never rewrite an outcome.
    pub(crate) fn finish(
        &mut self,
        status: JobStatus,
        result: Option<String>,
        failure_reason: Option<String>,
    ) {
        debug_assert!(status.is_terminal());
        debug_assert!(result.is_some() != failure_reason.is_some());
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        self.result = result;
        self.failure_reason = failure_reason;
        self.updated_at = Utc::now();
    }

    pub(crate) fn mark_processing(&mut self) {
        if !self.status.is_terminal() {
            self.status = JobStatus::Processing;
            self.updated_at = Utc::now();
        }
    }
}

/// Structured record produced once a job reaches a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: String,
    pub status: JobStatus,
    pub attempts: u32,
    pub failure_reason: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl JobReport {
    /// Generate a report from a terminal job.
    pub fn from_job(job: &Job) -> Self {
        let duration = job.updated_at - job.created_at;
        Self {
            job_id: job.id.clone(),
            status: job.status,
            attempts: job.attempt,
            failure_reason: job.failure_reason.clone(),
            started_at: job.created_at,
            finished_at: job.updated_at,
            duration_ms: duration.num_milliseconds(),
        }
    }
}

//! Drives a full job lifecycle: credit check, submission, polling,
//! reconciliation and post-success credit settlement.

use std::collections::HashSet;
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::credits::CreditLedger;
use crate::error::RecolorError;
use crate::pipeline::{
    InstructionPolicy, Job, JobReport, Outcome, PollConfig, poll_to_completion, reconcile,
    submit_job,
};
use crate::provider::{GenerationRequest, ImageProvider};

/// Outcome of a full run plus the job report, when a job got far enough to
/// produce one.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub outcome: Outcome,
    pub report: Option<JobReport>,
}

/// Caller-facing surface over one provider and one credit ledger.
///
/// One service instance may run many jobs concurrently; each job is a single
/// logical task and jobs share no state beyond the ledger. Polling the same
/// job id twice in parallel is rejected, never duplicated.
pub struct JobService<P, L> {
    pub provider: P,
    pub ledger: L,
    pub poll_config: PollConfig,
    pub instruction_policy: InstructionPolicy,
    /// Credits one successful job costs.
    pub job_cost: u64,
    // Job ids currently being polled by this instance.
    in_flight: Mutex<HashSet<String>>,
}

impl<P: ImageProvider, L: CreditLedger> JobService<P, L> {
    pub fn new(
        provider: P,
        ledger: L,
        poll_config: PollConfig,
        instruction_policy: InstructionPolicy,
    ) -> Self {
        Self {
            provider,
            ledger,
            poll_config,
            instruction_policy,
            job_cost: 1,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Run one job end to end for the given user.
    ///
    /// Never returns `Err`: every failure mode is folded into the outcome
    /// with its stable error kind. Credits are checked up front and deducted
    /// only after a successful reconciliation.
    pub async fn run(
        &self,
        user: &str,
        req: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> RunRecord {
        if !self.ledger.has_sufficient_credits(user, self.job_cost) {
            let err = RecolorError::InsufficientCredits {
                user: user.to_string(),
                needed: self.job_cost,
                available: self.ledger.balance(user),
            };
            return RunRecord {
                outcome: Outcome::from(&err),
                report: None,
            };
        }

        let mut job = match submit_job(&self.provider, req, self.instruction_policy).await {
            Ok(job) => job,
            Err(err) => {
                return RunRecord {
                    outcome: Outcome::from(&err),
                    report: None,
                };
            }
        };

        let outcome = match self.poll_and_settle(user, &mut job, cancel).await {
            Ok(outcome) => outcome,
            Err(err) => Outcome::from(&err),
        };
        RunRecord {
            outcome,
            report: Some(JobReport::from_job(&job)),
        }
    }

    /// Poll an already-submitted job to completion and settle credits.
    ///
    /// Rejects with [`RecolorError::DuplicatePoll`] if this instance is
    /// already polling the same job id.
    pub async fn poll_and_settle(
        &self,
        user: &str,
        job: &mut Job,
        cancel: &CancellationToken,
    ) -> Result<Outcome, RecolorError> {
        let _guard = self.claim(&job.id)?;
        poll_to_completion(&self.provider, job, &self.poll_config, cancel).await;
        let outcome = reconcile(job);

        if outcome.is_success() {
            if self.ledger.deduct(user, self.job_cost) {
                info!(job_id = %job.id, %user, cost = self.job_cost, "credits settled");
            } else {
                // Balance raced to zero between the pre-check and now; the
                // artifact is already produced, so the job still succeeds.
                warn!(job_id = %job.id, %user, "post-success deduction failed");
            }
        }
        Ok(outcome)
    }

    fn claim(&self, id: &str) -> Result<InFlightGuard<'_>, RecolorError> {
        let mut in_flight = self.in_flight.lock().expect("in-flight set poisoned");
        if !in_flight.insert(id.to_string()) {
            return Err(RecolorError::DuplicatePoll(id.to_string()));
        }
        Ok(InFlightGuard {
            set: &self.in_flight,
            id: id.to_string(),
        })
    }
}

/// Releases the in-flight claim when polling ends, on every exit path.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .expect("in-flight set poisoned")
            .remove(&self.id);
    }
}

//! Job submission: validate the caller's request and issue the initial
//! provider call, yielding a [`Job`] ready for polling.

use tracing::info;

use crate::error::RecolorError;
use crate::provider::{GenerationRequest, ImageProvider};

use super::job::Job;

/// Whether the provider mode requires a non-empty instruction string.
///
/// Colorization needs a prompt; the document-scan mode derives everything
/// from the image alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionPolicy {
    Required,
    Optional,
}

/// Validate the request and issue exactly one submission call.
///
/// Validation failures surface as [`RecolorError::Validation`] before any
/// network traffic; a provider rejection is propagated verbatim as
/// [`RecolorError::Provider`].
pub async fn submit_job<P: ImageProvider>(
    provider: &P,
    req: &GenerationRequest,
    policy: InstructionPolicy,
) -> Result<Job, RecolorError> {
    if req.input_image.trim().is_empty() {
        return Err(RecolorError::Validation("input image is empty".into()));
    }
    if policy == InstructionPolicy::Required && req.prompt.trim().is_empty() {
        return Err(RecolorError::Validation(
            "instruction must not be empty".into(),
        ));
    }

    let ack = provider.submit(req).await?;
    info!(job_id = %ack.id, "job submitted");
    Ok(Job::new(ack.id, ack.polling_url))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::pipeline::job::JobStatus;
    use crate::provider::{ProviderError, StatusResponse, SubmitAck};

    /// Counts submissions so tests can assert on outbound call volume.
    struct CountingProvider {
        calls: AtomicU32,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
            }
        }
    }

    impl ImageProvider for CountingProvider {
        async fn submit(&self, _req: &GenerationRequest) -> Result<SubmitAck, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SubmitAck {
                id: "req-1".into(),
                polling_url: "https://poll/req-1".into(),
                status: Some("submitted".into()),
            })
        }

        async fn status(&self, _polling_url: &str) -> Result<StatusResponse, ProviderError> {
            unimplemented!("not polled in these tests")
        }
    }

    #[tokio::test]
    async fn valid_request_yields_submitted_job() {
        let provider = CountingProvider::new();
        let req = GenerationRequest::new("colorize", "data:image/png;base64,AAAA");
        let job = submit_job(&provider, &req, InstructionPolicy::Required)
            .await
            .unwrap();
        assert_eq!(job.id, "req-1");
        assert_eq!(job.polling_url, "https://poll/req-1");
        assert_eq!(job.status, JobStatus::Submitted);
        assert_eq!(job.attempt, 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_image_rejected_before_any_network_call() {
        let provider = CountingProvider::new();
        let req = GenerationRequest::new("colorize", "   ");
        let err = submit_job(&provider, &req, InstructionPolicy::Required)
            .await
            .unwrap_err();
        assert!(matches!(err, RecolorError::Validation(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_instruction_rejected_when_required() {
        let provider = CountingProvider::new();
        let req = GenerationRequest::new("", "data:image/png;base64,AAAA");
        let err = submit_job(&provider, &req, InstructionPolicy::Required)
            .await
            .unwrap_err();
        assert!(matches!(err, RecolorError::Validation(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_instruction_allowed_when_optional() {
        let provider = CountingProvider::new();
        let req = GenerationRequest::new("", "data:image/png;base64,AAAA");
        let job = submit_job(&provider, &req, InstructionPolicy::Optional)
            .await
            .unwrap();
        assert_eq!(job.status, JobStatus::Submitted);
    }
}

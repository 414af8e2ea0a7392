//! Stand-in OCR provider for the document-scan path.
//!
//! Real OCR services (Google Cloud Vision, AWS Textract, Tesseract) are not
//! integrated; this provider answers the same submit/poll contract as the
//! colorization API so the pipeline stays provider-agnostic. It returns a
//! canned invoice extraction after one in-flight poll.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use super::client::ImageProvider;
use super::error::ProviderError;
use super::types::{GenerationRequest, ResultPayload, StatusResponse, StatusTag, SubmitAck};

/// Canned extraction returned for every scanned document.
const MOCK_EXTRACTION: &str = "FACTURA\nNúmero: 001-00012345\nFecha: 15/03/2024\n\
Proveedor: Empresa ABC S.A.\nMonto: $15,000.00\n\nDetalle de productos...";

/// Scheme used in the synthetic polling URLs handed out by this provider.
const MOCK_SCHEME: &str = "mock-ocr://";

/// In-process OCR provider implementing the async submit/poll contract.
///
/// Each submitted job reports `Processing` for a configurable number of
/// polls before turning `Ready`, so the poll loop is exercised the same way
/// the real provider exercises it.
pub struct MockOcrProvider {
    /// Polls a job answers `Processing` before completing.
    polls_until_ready: u32,
    // Poll count per job id.
    jobs: Mutex<HashMap<String, u32>>,
}

impl Default for MockOcrProvider {
    fn default() -> Self {
        Self::new(1)
    }
}

impl MockOcrProvider {
    pub fn new(polls_until_ready: u32) -> Self {
        Self {
            polls_until_ready,
            jobs: Mutex::new(HashMap::new()),
        }
    }
}

impl ImageProvider for MockOcrProvider {
    async fn submit(&self, _req: &GenerationRequest) -> Result<SubmitAck, ProviderError> {
        let id = Uuid::new_v4().to_string();
        self.jobs
            .lock()
            .expect("ocr job map poisoned")
            .insert(id.clone(), 0);
        Ok(SubmitAck {
            polling_url: format!("{MOCK_SCHEME}{id}"),
            id,
            status: Some("submitted".into()),
        })
    }

    async fn status(&self, polling_url: &str) -> Result<StatusResponse, ProviderError> {
        let id = polling_url
            .strip_prefix(MOCK_SCHEME)
            .ok_or_else(|| ProviderError::Malformed(format!("unknown poll url: {polling_url}")))?;

        let mut jobs = self.jobs.lock().expect("ocr job map poisoned");
        let polls = jobs
            .get_mut(id)
            .ok_or_else(|| ProviderError::Malformed(format!("unknown job id: {id}")))?;
        *polls += 1;

        if *polls <= self.polls_until_ready {
            return Ok(StatusResponse {
                status: StatusTag::Processing,
                result: None,
                error: None,
            });
        }

        jobs.remove(id);
        Ok(StatusResponse {
            status: StatusTag::Ready,
            result: Some(ResultPayload {
                sample: Some(MOCK_EXTRACTION.to_string()),
            }),
            error: None,
        })
    }
}

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::error::ProviderError;
use super::types::{GenerationRequest, StatusResponse, SubmitAck};

/// Seam between the pipeline and a concrete provider.
///
/// Implemented by [`FluxClient`] for the real HTTP API and by
/// [`MockOcrProvider`](super::ocr::MockOcrProvider) for the document-scan
/// path. Test code supplies scripted implementations.
pub trait ImageProvider {
    /// Issue the initial submission. Exactly one outbound request.
    async fn submit(&self, req: &GenerationRequest) -> Result<SubmitAck, ProviderError>;

    /// Query the status of a previously submitted job.
    async fn status(&self, polling_url: &str) -> Result<StatusResponse, ProviderError>;
}

/// HTTP client for a Flux-Kontext-style generative image API.
pub struct FluxClient {
    api_key: String,
    client: Client,
    submit_url: String,
}

impl FluxClient {
    /// Create a client for the submission URL named in the configuration
    /// (tests point this at a local mock server).
    pub fn with_submit_url(api_key: String, submit_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            client,
            submit_url,
        }
    }

    async fn read_error_body(response: reqwest::Response) -> (u16, String) {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        (status, message)
    }
}

impl ImageProvider for FluxClient {
    async fn submit(&self, req: &GenerationRequest) -> Result<SubmitAck, ProviderError> {
        let response = self
            .client
            .post(&self.submit_url)
            .header("accept", "application/json")
            .header("x-key", &self.api_key)
            .header("content-type", "application/json")
            .json(req)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = Self::read_error_body(response).await;
            debug!(status, %message, "provider rejected submission");
            return Err(ProviderError::Api { status, message });
        }

        let body = response.text().await?;
        debug!(%body, "submission accepted");
        let ack: SubmitAck = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Malformed(format!("submit response: {e}")))?;
        if ack.polling_url.is_empty() {
            return Err(ProviderError::Malformed("empty polling_url".into()));
        }
        Ok(ack)
    }

    async fn status(&self, polling_url: &str) -> Result<StatusResponse, ProviderError> {
        let response = self
            .client
            .get(polling_url)
            .header("accept", "application/json")
            .header("x-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = Self::read_error_body(response).await;
            debug!(status, %message, "status query failed");
            return Err(ProviderError::Api { status, message });
        }

        let body = response.text().await?;
        debug!(%body, "status query result");
        serde_json::from_str(&body)
            .map_err(|e| ProviderError::Malformed(format!("status response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::types::StatusTag;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_request() -> GenerationRequest {
        GenerationRequest::new("colorize", "data:image/png;base64,AAAA")
    }

    #[tokio::test]
    async fn submit_sends_api_key_and_parses_ack() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/flux-kontext-pro"))
            .and(header("x-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "req-1",
                "polling_url": format!("{}/v1/get_result?id=req-1", server.uri()),
                "status": "submitted"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = FluxClient::with_submit_url(
            "test-key".into(),
            format!("{}/v1/flux-kontext-pro", server.uri()),
        );
        let ack = client.submit(&sample_request()).await.unwrap();
        assert_eq!(ack.id, "req-1");
        assert!(ack.polling_url.contains("req-1"));
    }

    #[tokio::test]
    async fn submit_propagates_provider_rejection_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("image too large"))
            .mount(&server)
            .await;

        let client = FluxClient::with_submit_url("k".into(), server.uri());
        let err = client.submit(&sample_request()).await.unwrap_err();
        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "image too large");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn submit_rejects_ack_without_polling_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "req-1", "polling_url": ""})),
            )
            .mount(&server)
            .await;

        let client = FluxClient::with_submit_url("k".into(), server.uri());
        let err = client.submit(&sample_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[tokio::test]
    async fn status_parses_ready_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/get_result"))
            .and(header("x-key", "k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "Ready",
                "result": {"sample": "https://x/out.jpg"}
            })))
            .mount(&server)
            .await;

        let client = FluxClient::with_submit_url("k".into(), server.uri());
        let resp = client
            .status(&format!("{}/v1/get_result", server.uri()))
            .await
            .unwrap();
        assert_eq!(resp.status, StatusTag::Ready);
        assert_eq!(
            resp.result.unwrap().sample.as_deref(),
            Some("https://x/out.jpg")
        );
    }

    #[tokio::test]
    async fn status_maps_non_2xx_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = FluxClient::with_submit_url("k".into(), server.uri());
        let err = client
            .status(&format!("{}/v1/get_result", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 500, .. }));
    }
}

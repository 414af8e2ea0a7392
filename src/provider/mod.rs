pub mod client;
pub mod error;
pub mod ocr;
pub mod types;

pub use client::{FluxClient, ImageProvider};
pub use error::ProviderError;
pub use ocr::MockOcrProvider;
pub use types::{GenerationRequest, ResultPayload, StatusResponse, StatusTag, SubmitAck};

use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum RecolorError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("A poll is already in flight for job {0}")]
    DuplicatePoll(String),

    #[error("Insufficient credits for user {user}: {needed} needed, {available} available")]
    InsufficientCredits {
        user: String,
        needed: u64,
        available: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

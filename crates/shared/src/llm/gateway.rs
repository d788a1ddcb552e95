use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type BrainFuture<'a> = Pin<Box<dyn Future<Output = Result<BrainReply, BrainError>> + Send + 'a>>;

/// One raw user message forwarded verbatim to the external assistant brain.
/// The deterministic interpreter is bypassed entirely on this path.
#[derive(Debug, Clone, Serialize)]
pub struct BrainRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrainReply {
    pub response: String,
}

#[derive(Debug, Error)]
pub enum BrainError {
    #[error("brain request timed out")]
    Timeout,
    #[error("brain request failed: {0}")]
    ProviderFailure(String),
    #[error("brain returned an invalid payload: {0}")]
    InvalidPayload(String),
    #[error("brain returned an empty response")]
    EmptyResponse,
}

pub trait BrainGateway: Send + Sync {
    fn respond<'a>(&'a self, request: BrainRequest) -> BrainFuture<'a>;
}

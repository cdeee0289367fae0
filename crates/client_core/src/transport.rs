use async_trait::async_trait;
use shared::protocol::{ClientRequest, ServerResponse};
use thiserror::Error;

/// Connectivity-level failure: the request never completed. Application
/// errors travel inside [`ServerResponse::Error`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("no transport configured")]
    Unconfigured,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response kind for this request")]
    UnexpectedResponse,
}

/// Single round-trip RPC boundary to the forum server. No protocol-level
/// retry; callers decide whether a failed request is worth resubmitting.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, request: ClientRequest) -> Result<ServerResponse, TransportError>;
}

/// Null transport for contexts constructed without a backend (previews,
/// tests of non-networked paths).
pub struct MissingTransport;

#[async_trait]
impl Transport for MissingTransport {
    async fn call(&self, _request: ClientRequest) -> Result<ServerResponse, TransportError> {
        Err(TransportError::Unconfigured)
    }
}

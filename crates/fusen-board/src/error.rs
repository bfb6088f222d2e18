//! Error type for backend gateway calls.

/// Failure modes a [`NoteBackend`](crate::NoteBackend) call can surface.
///
/// `Cancelled` is the cooperative outcome: the caller revoked the request's
/// cancellation token and the backend gave up before (or instead of)
/// completing. It is routine during bursts of edits and is handled quietly.
/// `Transport` covers everything genuinely broken: I/O failures, serialization
/// failures, unreachable stores.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request's cancellation token fired before the call completed.
    #[error("request cancelled")]
    Cancelled,
    /// The backing store failed to service the call.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl GatewayError {
    /// True for the cooperative-cancellation outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GatewayError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

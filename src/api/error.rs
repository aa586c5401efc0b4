//! The user-facing error taxonomy every API call is normalized into.

use std::io;

/// Fallback message for 5xx responses that carry no detail.
const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again.";

/// Normalized API failure. `Display` is the message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out. Please retry.")]
    Timeout,
    /// The backend could not be reached at all.
    #[error("Network unreachable. Check the API URL and your connection.")]
    NetworkUnreachable,
    /// HTTP 401, typically a wrong training key.
    #[error("Unauthorized: Training key invalid.")]
    Unauthorized,
    /// HTTP 404.
    #[error("Endpoint not found.")]
    NotFound,
    /// HTTP 5xx.
    #[error("{0}")]
    ServerError(String),
    /// Anything else; the message is passed through.
    #[error("{0}")]
    Unknown(String),
}

impl ApiError {
    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::NetworkUnreachable)
    }

    /// Map an HTTP error status and its (possibly empty) body.
    pub fn from_status(code: u16, body: &str) -> Self {
        match (code, extract_detail(body)) {
            (401, _) => Self::Unauthorized,
            (404, _) => Self::NotFound,
            (500, None) => Self::ServerError(SERVER_ERROR_MESSAGE.to_string()),
            // Other 5xx only count as server errors when the backend explained itself.
            (500..=599, Some(detail)) => Self::ServerError(format!("{code}: {detail}")),
            (_, Some(detail)) => Self::Unknown(format!("{code}: {detail}")),
            (_, None) => Self::Unknown(format!("Request failed with status code {code}")),
        }
    }

    /// Map a transport failure (no HTTP status was received).
    pub fn from_transport(err: &ureq::Transport) -> Self {
        if source_chain_timed_out(err) {
            return Self::Timeout;
        }
        match err.kind() {
            ureq::ErrorKind::Dns
            | ureq::ErrorKind::ConnectionFailed
            | ureq::ErrorKind::ProxyConnect
            | ureq::ErrorKind::Io => Self::NetworkUnreachable,
            _ => Self::Unknown(err.to_string()),
        }
    }

    /// Map a failure while reading or decoding a response body.
    pub(crate) fn from_body_io(err: &io::Error) -> Self {
        if is_timeout_kind(err.kind()) {
            Self::Timeout
        } else {
            Self::Unknown(format!("Failed to read response: {err}"))
        }
    }
}

fn source_chain_timed_out(err: &ureq::Transport) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(current) = source {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            if is_timeout_kind(io_err.kind()) {
                return true;
            }
        }
        source = current.source();
    }
    false
}

fn is_timeout_kind(kind: io::ErrorKind) -> bool {
    matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

/// Pull FastAPI-style `detail` out of an error body.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

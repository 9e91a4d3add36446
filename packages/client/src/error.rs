//! The client-side error model.
//!
//! Every endpoint call resolves to a typed value or fails with exactly one
//! [`ApiError`]. The three variants keep the failure taxonomy flat so callers
//! can branch on what actually went wrong instead of string-matching messages.

use serde_json::Value;

/// Why an endpoint call failed.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a usable HTTP response: connection refused,
    /// DNS failure, TLS trouble, or the body stream broke off mid-read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response arrived but its body is not the JSON we need. `body` holds
    /// the raw text exactly as received so it can be logged or shown.
    #[error("unreadable body in HTTP {status} reply")]
    BadBody {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON arrived with a status outside the accepted set for the
    /// call. The parsed body rides along; error replies usually carry an
    /// `{"error": ...}` envelope worth inspecting.
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16, body: Value },
}

impl ApiError {
    /// The HTTP status this failure is tied to, if any response arrived.
    ///
    /// Transport failures have no status (reqwest occasionally records one,
    /// which is passed through when present).
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            ApiError::BadBody { status, .. } => Some(*status),
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
        }
    }
}
